//! Platform-specific shortcut handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Platform-appropriate modifier for undo/redo/save shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

#[cfg(target_os = "macos")]
pub const SAVE_SHORTCUT: &str = "Cmd+S";

#[cfg(not(target_os = "macos"))]
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

#[cfg(target_os = "macos")]
pub const UNDO_SHORTCUT: &str = "Cmd+Z";

#[cfg(not(target_os = "macos"))]
pub const UNDO_SHORTCUT: &str = "Ctrl+Z";

#[cfg(target_os = "macos")]
pub const REDO_SHORTCUT: &str = "Cmd+Y";

#[cfg(not(target_os = "macos"))]
pub const REDO_SHORTCUT: &str = "Ctrl+Y";

/// Whether `key` is the shortcut `c` with the platform modifier.
///
/// Ctrl is accepted everywhere since many macOS terminals swallow Cmd.
pub fn is_shortcut(key: &KeyEvent, c: char) -> bool {
    let modified = key.modifiers.contains(SHORTCUT_MODIFIER)
        || key.modifiers.contains(KeyModifiers::CONTROL);
    modified && matches!(key.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
}
