//! Saved-form repository over a persistence gateway
//!
//! Each form is stored as one JSON document under `form.<id>`. The ordered
//! list of saved ids lives under `form.list`.

use super::{PersistenceGateway, StoreError};
use crate::state::Form;
use std::sync::Arc;

const LIST_KEY: &str = "form.list";

fn form_key(form_id: &str) -> String {
    format!("form.{form_id}")
}

#[derive(Clone)]
pub struct FormRepository {
    gateway: Arc<dyn PersistenceGateway>,
}

impl FormRepository {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> Arc<dyn PersistenceGateway> {
        Arc::clone(&self.gateway)
    }

    async fn ids(&self) -> Result<Vec<String>, StoreError> {
        match self.gateway.get(LIST_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(ids)?;
        self.gateway.set(LIST_KEY, &raw).await
    }

    /// Write the full document and register its id
    pub async fn save_form(&self, form: &Form) -> Result<(), StoreError> {
        let raw = serde_json::to_string(form)?;
        self.gateway.set(&form_key(&form.id), &raw).await?;

        let mut ids = self.ids().await?;
        if !ids.contains(&form.id) {
            ids.push(form.id.clone());
            self.write_ids(&ids).await?;
        }
        tracing::debug!("Saved form {} ({} fields)", form.id, form.field_count());
        Ok(())
    }

    pub async fn load_form(&self, form_id: &str) -> Result<Option<Form>, StoreError> {
        match self.gateway.get(&form_key(form_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// All saved forms in save order; unreadable entries are skipped
    pub async fn list_forms(&self) -> Result<Vec<Form>, StoreError> {
        let mut forms = Vec::new();
        for id in self.ids().await? {
            match self.load_form(&id).await {
                Ok(Some(form)) => forms.push(form),
                Ok(None) => tracing::warn!("Form {id} is listed but missing"),
                Err(e) => tracing::warn!("Skipping unreadable form {id}: {e}"),
            }
        }
        Ok(forms)
    }

    pub async fn delete_form(&self, form_id: &str) -> Result<(), StoreError> {
        self.gateway.remove(&form_key(form_id)).await?;
        let mut ids = self.ids().await?;
        let before = ids.len();
        ids.retain(|id| id != form_id);
        if ids.len() != before {
            self.write_ids(&ids).await?;
        }
        tracing::info!("Deleted form {form_id}");
        Ok(())
    }
}
