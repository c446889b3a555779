//! Persistence: key/value gateways and the repositories built on them

mod autosave;
mod error;
mod file;
mod memory;
mod repository;
mod submissions;
mod traits;

pub use autosave::Autosave;
pub use error::{StoreError, SubmitError};
pub use file::FileGateway;
pub use memory::MemoryGateway;
pub use repository::FormRepository;
pub use submissions::{SubmissionRecord, SubmissionStore};
#[cfg(test)]
pub use traits::MockPersistenceGateway;
pub use traits::PersistenceGateway;
