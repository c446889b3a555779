//! Application state and core logic

use crate::config::BuilderConfig;
use crate::platform::is_shortcut;
use crate::state::reorder::move_item;
use crate::state::{
    Action, AppState, BuilderPanel, DragSession, EditSession, EditTarget, Field, FieldPatch,
    FieldType, FormPatch, FormStore, HomeEntry, Property, ReorderTarget, Step, View,
};
use crate::store::{Autosave, FormRepository, PersistenceGateway, SubmissionStore, SubmitError};
use crate::ui::layout::{
    builder_layout, capacity, create_layout, first_visible, hit_item, FIELD_CARD_HEIGHT,
    STEP_ROW_HEIGHT,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Margin, Rect};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Window in which a second Ctrl+C quits
const DOUBLE_CTRL_C: Duration = Duration::from_millis(1000);

/// Main application struct
pub struct App {
    /// View and interaction state
    pub state: AppState,
    /// Builder state and the form being edited
    pub store: FormStore,
    /// User configuration
    pub config: BuilderConfig,
    repository: FormRepository,
    submissions: SubmissionStore,
    /// Whether the app should quit
    quit: bool,
    /// Terminal size for hit-testing (height, width)
    pub terminal_size: Option<(u16, u16)>,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App over `gateway`, saving edits through `autosave` if given
    pub fn new(
        config: BuilderConfig,
        gateway: Arc<dyn PersistenceGateway>,
        autosave: Option<Autosave>,
    ) -> Self {
        let mut store = FormStore::new(autosave);
        if let Some(theme) = config.theme_mode {
            store.dispatch(Action::SetTheme(theme));
        }
        if let Some(mode) = config.preview_mode {
            store.dispatch(Action::SetPreviewMode(mode));
        }

        Self {
            state: AppState::default(),
            store,
            config,
            repository: FormRepository::new(Arc::clone(&gateway)),
            submissions: SubmissionStore::new(gateway),
            quit: false,
            terminal_size: None,
            last_ctrl_c: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Reload the saved form list from storage
    pub async fn refresh_forms(&mut self) {
        match self.repository.list_forms().await {
            Ok(forms) => {
                self.state.saved_forms = forms;
                let len = self.state.home_entries().len();
                self.state.clamp_selection(len);
            }
            Err(e) => self.push_error(format!("Failed to load forms: {e}")),
        }
    }

    /// Area above the status bar, as laid out on the last draw
    fn content_area(&self) -> Rect {
        let (height, width) = self.terminal_size.unwrap_or((24, 80));
        create_layout(Rect::new(0, 0, width, height)).0
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_ctrl_c();
            return Ok(());
        }

        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Handle delete confirmation (modal)
        if self.state.confirm_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.state.confirm_delete = None;
                    self.delete_selected().await;
                }
                KeyCode::Char('n') | KeyCode::Esc => self.state.confirm_delete = None,
                _ => {}
            }
            return Ok(());
        }

        // Inline edit captures all keys
        if self.state.editing.is_some() {
            self.handle_edit_key(key);
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.current_view {
            View::Home => self.handle_home_key(key).await?,
            View::Builder => self.handle_builder_key(key).await?,
            View::Preview => self.handle_preview_key(key).await?,
            View::Responses => self.handle_responses_key(key).await?,
        }

        Ok(())
    }

    fn handle_ctrl_c(&mut self) {
        let now = Instant::now();
        if self
            .last_ctrl_c
            .is_some_and(|last| now.duration_since(last) < DOUBLE_CTRL_C)
        {
            self.quit = true;
        } else {
            self.last_ctrl_c = Some(now);
            self.state.status_message = Some("Press Ctrl+C again to quit".to_string());
        }
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = view;
        self.state.reset_selection();
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        if let Some(view) = self.state.view_history.pop() {
            self.state.current_view = view;
            self.state.reset_selection();
        }
    }

    async fn go_home(&mut self) {
        self.state.view_history.clear();
        self.state.current_view = View::Home;
        self.state.drag = None;
        self.state.reset_selection();
        self.refresh_forms().await;
    }

    /// Handle keys on the home screen
    async fn handle_home_key(&mut self, key: KeyEvent) -> Result<()> {
        let len = self.state.home_entries().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(len),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => self.open_selected_entry(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(HomeEntry::Saved(form)) = self.state.selected_home_entry() {
                    self.state.confirm_delete = Some(form.title.clone());
                }
            }
            KeyCode::Char('r') => self.refresh_forms().await,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    /// Open the highlighted home entry in the builder
    fn open_selected_entry(&mut self) {
        let form = match self.state.selected_home_entry() {
            Some(HomeEntry::Blank) | None => None,
            Some(HomeEntry::Template(template)) => Some(template.instantiate()),
            Some(HomeEntry::Saved(form)) => Some(form.clone()),
        };
        match form {
            Some(form) => {
                tracing::info!("Opening form {} ({})", form.title, form.id);
                self.store.dispatch(Action::SetForm(form));
            }
            None => self.store.create(),
        }
        self.state.panel = BuilderPanel::default();
        self.state.property_index = 0;
        self.navigate(View::Builder);
    }

    /// Delete whatever the confirmation dialog was asking about
    async fn delete_selected(&mut self) {
        match self.state.current_view {
            View::Home => {
                let Some(HomeEntry::Saved(form)) = self.state.selected_home_entry() else {
                    return;
                };
                let id = form.id.clone();
                if let Err(e) = self.repository.delete_form(&id).await {
                    self.push_error(format!("Failed to delete form: {e}"));
                    return;
                }
                self.state.status_message = Some("Form deleted".to_string());
                self.refresh_forms().await;
            }
            View::Responses => {
                let Some(record) = self.state.submissions.get(self.state.selected_index) else {
                    return;
                };
                let id = record.id.clone();
                if let Err(e) = self.submissions.delete(&id).await {
                    self.push_error(format!("Failed to delete response: {e}"));
                    return;
                }
                self.state.submissions.retain(|r| r.id != id);
                let len = self.state.submissions.len();
                self.state.clamp_selection(len);
                self.state.status_message = Some("Response deleted".to_string());
            }
            View::Builder | View::Preview => {}
        }
    }

    /// Handle keys in the builder
    async fn handle_builder_key(&mut self, key: KeyEvent) -> Result<()> {
        if is_shortcut(&key, 'z') {
            self.store.undo();
            return Ok(());
        }
        if is_shortcut(&key, 'y') {
            self.store.redo();
            return Ok(());
        }
        if is_shortcut(&key, 's') {
            self.save_form().await;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.go_home().await,
            KeyCode::Tab => self.state.panel = self.state.panel.next(),
            KeyCode::BackTab => self.state.panel = self.state.panel.prev(),
            KeyCode::Char('u') => self.store.undo(),
            KeyCode::Char('U') => self.store.redo(),
            KeyCode::Char('p') => self.open_preview(),
            KeyCode::Char('m') => {
                let mode = self.store.state().preview_mode.next();
                self.store.dispatch(Action::SetPreviewMode(mode));
                self.state.status_message = Some(format!("Preview: {}", mode.label()));
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('P') => self.toggle_published().await,
            KeyCode::Char('T') => self.begin_edit(EditTarget::FormTitle),
            KeyCode::Char('D') => self.begin_edit(EditTarget::FormDescription),
            KeyCode::Char('R') => self.open_responses().await,
            _ => match self.state.panel {
                BuilderPanel::Steps => self.handle_steps_key(key),
                BuilderPanel::Toolbox => self.handle_toolbox_key(key),
                BuilderPanel::Fields => self.handle_fields_key(key),
                BuilderPanel::Properties => self.handle_properties_key(key),
            },
        }
        Ok(())
    }

    fn handle_steps_key(&mut self, key: KeyEvent) {
        let Some(form) = self.store.snapshot() else {
            return;
        };
        let current = self.store.state().current_step_index;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.store.dispatch(Action::SetCurrentStep(current + 1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.store
                    .dispatch(Action::SetCurrentStep(current.saturating_sub(1)));
            }
            KeyCode::Char('a') => {
                let title = format!("Step {}", form.steps.len() + 1);
                self.store.dispatch(Action::AddStep(Step::new(&title)));
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if form.steps.len() < 2 {
                    self.state.status_message = Some("A form needs at least one step".to_string());
                    return;
                }
                if let Some(step) = form.steps.get(current) {
                    self.store.dispatch(Action::RemoveStep {
                        step_id: step.id.clone(),
                    });
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(step) = form.steps.get(current) {
                    self.begin_edit(EditTarget::StepTitle {
                        step_id: step.id.clone(),
                    });
                }
            }
            KeyCode::Char('J') => self.move_step(current, current + 1),
            KeyCode::Char('K') if current > 0 => self.move_step(current, current - 1),
            _ => {}
        }
    }

    fn move_step(&mut self, from: usize, to: usize) {
        let Some(form) = self.store.form() else {
            return;
        };
        if let Some(new_order) = move_item(&form.step_ids(), from, to) {
            self.store.dispatch(Action::ReorderSteps { new_order });
        }
    }

    fn handle_toolbox_key(&mut self, key: KeyEvent) {
        let count = FieldType::ALL.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.toolbox_index = (self.state.toolbox_index + 1) % count;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.toolbox_index = (self.state.toolbox_index + count - 1) % count;
            }
            KeyCode::Enter => self.add_field(self.state.toolbox_type()),
            _ => {}
        }
    }

    /// Append a new field of `field_type` to the current step and select it
    fn add_field(&mut self, field_type: FieldType) {
        let Some(step) = self.store.state().current_step() else {
            return;
        };
        let step_id = step.id.clone();
        self.store.dispatch(Action::AddField {
            step_id,
            field: Field::new(field_type),
        });
        self.state.panel = BuilderPanel::Fields;
    }

    fn handle_fields_key(&mut self, key: KeyEvent) {
        let Some(step) = self.store.state().current_step().cloned() else {
            return;
        };
        let selected = self
            .store
            .state()
            .selected_field_id
            .as_deref()
            .and_then(|id| step.field_index(id));
        let select = |index: usize| step.fields.get(index).map(|f| f.id.clone());

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let next = selected.map_or(0, |i| i + 1);
                if let Some(id) = select(next) {
                    self.store.dispatch(Action::SelectField(Some(id)));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let prev = selected.map_or(0, |i| i.saturating_sub(1));
                if let Some(id) = select(prev) {
                    self.store.dispatch(Action::SelectField(Some(id)));
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = selected.and_then(select) {
                    self.store.dispatch(Action::RemoveField {
                        step_id: step.id.clone(),
                        field_id: id,
                    });
                }
            }
            KeyCode::Char('J') => {
                if let Some(index) = selected {
                    self.move_field(&step, index, index + 1);
                }
            }
            KeyCode::Char('K') => {
                if let Some(index) = selected.filter(|i| *i > 0) {
                    self.move_field(&step, index, index - 1);
                }
            }
            KeyCode::Enter if selected.is_some() => {
                self.state.panel = BuilderPanel::Properties;
                self.state.property_index = 0;
            }
            _ => {}
        }
    }

    fn move_field(&mut self, step: &Step, from: usize, to: usize) {
        if let Some(new_order) = move_item(&step.field_ids(), from, to) {
            self.store.dispatch(Action::ReorderFields {
                step_id: step.id.clone(),
                new_order,
            });
        }
    }

    fn handle_properties_key(&mut self, key: KeyEvent) {
        let Some(field) = self.store.state().selected_field().cloned() else {
            return;
        };
        let Some(step_id) = self.store.state().current_step().map(|s| s.id.clone()) else {
            return;
        };
        let properties = Property::for_field(&field);

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.property_index + 1 < properties.len() {
                    self.state.property_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.property_index = self.state.property_index.saturating_sub(1);
            }
            KeyCode::Char('o') if field.field_type.has_options() => {
                let mut edited = field.clone();
                edited.add_option(&format!("Option {}", field.options().len() + 1));
                self.store.dispatch(Action::UpdateField {
                    step_id,
                    field_id: field.id.clone(),
                    patch: FieldPatch {
                        options: Some(edited.options),
                        ..Default::default()
                    },
                });
            }
            KeyCode::Enter => {
                let Some(property) = properties.get(self.state.property_index).copied() else {
                    return;
                };
                if let Some(patch) = property.toggle_patch(&field) {
                    self.store.dispatch(Action::UpdateField {
                        step_id,
                        field_id: field.id.clone(),
                        patch,
                    });
                } else {
                    self.begin_edit(EditTarget::Field {
                        step_id,
                        field_id: field.id.clone(),
                        property,
                    });
                }
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self, target: EditTarget) {
        let Some(form) = self.store.form() else {
            return;
        };
        self.state.editing = EditSession::begin(form, target);
    }

    /// Handle keys while an inline edit is open
    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(edit) = self.state.editing.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.editing = None,
            KeyCode::Backspace => edit.input.pop_char(),
            KeyCode::Enter => {
                let Some(form) = self.store.form() else {
                    self.state.editing = None;
                    return;
                };
                match edit.commit(form) {
                    Ok(action) => {
                        self.state.editing = None;
                        if let Some(action) = action {
                            self.store.dispatch(action);
                        }
                    }
                    Err(message) => self.push_error(message),
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                edit.input.clear();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                edit.input.push_char(c);
            }
            _ => {}
        }
    }

    async fn save_form(&mut self) {
        let Some(form) = self.store.snapshot() else {
            return;
        };
        match self.repository.save_form(&form).await {
            Ok(()) => self.state.status_message = Some(format!("Saved \"{}\"", form.title)),
            Err(e) => self.push_error(format!("Failed to save form: {e}")),
        }
    }

    async fn toggle_published(&mut self) {
        let Some(published) = self.store.form().map(|f| f.is_published) else {
            return;
        };
        self.store.dispatch(Action::UpdateForm(FormPatch {
            is_published: Some(!published),
            ..Default::default()
        }));
        self.save_form().await;
        if !published && !self.state.has_errors() {
            self.state.status_message = Some("Form published".to_string());
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.store.state().theme_mode.toggle();
        self.store.dispatch(Action::SetTheme(theme));
        self.config.theme_mode = Some(theme);
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {e:#}");
        }
    }

    fn open_preview(&mut self) {
        if self.store.form().is_none() {
            return;
        }
        self.store.dispatch(Action::TogglePreview(Some(true)));
        self.state.preview.reset();
        self.navigate(View::Preview);
    }

    fn close_preview(&mut self) {
        self.store.dispatch(Action::TogglePreview(Some(false)));
        self.go_back();
    }

    async fn open_responses(&mut self) {
        let Some(form_id) = self.store.form().map(|f| f.id.clone()) else {
            return;
        };
        match self.submissions.for_form(&form_id).await {
            Ok(records) => {
                self.state.submissions = records;
                self.navigate(View::Responses);
            }
            Err(e) => self.push_error(format!("Failed to load responses: {e}")),
        }
    }

    /// Handle keys while filling in the preview
    async fn handle_preview_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(form) = self.store.snapshot() else {
            self.close_preview();
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.close_preview();
                return Ok(());
            }
            KeyCode::F(2) => {
                let mode = self.store.state().preview_mode.next();
                self.store.dispatch(Action::SetPreviewMode(mode));
                return Ok(());
            }
            _ => {}
        }

        let session = &mut self.state.preview;
        if session.is_submitted() {
            if key.code == KeyCode::Enter {
                session.reset();
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => session.move_focus(&form, true),
            KeyCode::BackTab => session.move_focus(&form, false),
            KeyCode::Left => session.previous(),
            KeyCode::Enter if session.is_last_step(&form) => {
                if let Some(values) = session.submit(&form) {
                    match self.submissions.submit(&form, values).await {
                        Ok(_) => self.state.preview.mark_submitted(),
                        Err(SubmitError::Invalid(errors)) => {
                            tracing::debug!("Submission rejected with {} error(s)", errors.len());
                        }
                        Err(e) => self.push_error(format!("Failed to record submission: {e}")),
                    }
                }
            }
            KeyCode::Enter => {
                session.next(&form);
            }
            KeyCode::Backspace => {
                if let Some(field) = session.focused_field(&form) {
                    session.backspace(field);
                }
            }
            KeyCode::Char(c) => {
                let Some(field) = session.focused_field(&form) else {
                    return Ok(());
                };
                if field.field_type.has_options() {
                    let chosen = c
                        .to_digit(10)
                        .and_then(|d| (d as usize).checked_sub(1))
                        .and_then(|i| field.options().get(i));
                    if let Some(option) = chosen {
                        session.choose(field, &option.value);
                    }
                } else {
                    session.type_char(field, c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the responses list
    async fn handle_responses_key(&mut self, key: KeyEvent) -> Result<()> {
        let len = self.state.submissions.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(len),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('x') | KeyCode::Delete if len > 0 => {
                self.state.confirm_delete = Some("this response".to_string());
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        // Modals swallow the mouse
        if self.state.has_errors()
            || self.state.confirm_delete.is_some()
            || self.state.editing.is_some()
        {
            return Ok(());
        }

        match self.state.current_view {
            View::Home => {
                let len = self.state.home_entries().len();
                if self.handle_list_mouse(mouse, len) {
                    self.open_selected_entry();
                }
            }
            View::Responses => {
                let len = self.state.submissions.len();
                self.handle_list_mouse(mouse, len);
            }
            View::Builder => self.handle_builder_mouse(mouse),
            View::Preview => {}
        }
        Ok(())
    }

    /// Click-to-select in a bordered full-screen list.
    ///
    /// Returns true when the click landed on the already selected row.
    fn handle_list_mouse(&mut self, mouse: MouseEvent, len: usize) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.state.move_selection_down(len),
            MouseEventKind::ScrollUp => self.state.move_selection_up(),
            MouseEventKind::Down(MouseButton::Left) => {
                let list = self.content_area().inner(Margin::new(1, 1));
                let first = first_visible(Some(self.state.selected_index), len, capacity(list, 1));
                if let Some((index, _)) = hit_item(list, 1, first, len, mouse.column, mouse.row) {
                    if index == self.state.selected_index {
                        return true;
                    }
                    self.state.selected_index = index;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_builder_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.builder_mouse_down(mouse),
            MouseEventKind::Drag(MouseButton::Left) => self.builder_mouse_drag(mouse),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(session) = self.state.drag.take() {
                    if session.release() {
                        self.state.status_message = Some("Moved".to_string());
                    }
                }
            }
            _ => {}
        }
    }

    /// Index and pointer position of the list item under the mouse
    fn hover_target(&self, target: &ReorderTarget, column: u16, row: u16) -> Option<(usize, f32)> {
        let layout = builder_layout(self.content_area());
        let state = self.store.state();
        match target {
            ReorderTarget::Fields { .. } => {
                let step = state.current_step()?;
                let list = layout.field_list();
                let selected = state
                    .selected_field_id
                    .as_deref()
                    .and_then(|id| step.field_index(id));
                let count = step.fields.len();
                let first = first_visible(selected, count, capacity(list, FIELD_CARD_HEIGHT));
                hit_item(list, FIELD_CARD_HEIGHT, first, count, column, row)
            }
            ReorderTarget::Steps => {
                let count = state.current_form.as_ref()?.steps.len();
                let list = layout.step_list();
                let first = first_visible(
                    Some(state.current_step_index),
                    count,
                    capacity(list, STEP_ROW_HEIGHT),
                );
                hit_item(list, STEP_ROW_HEIGHT, first, count, column, row)
            }
        }
    }

    fn builder_mouse_down(&mut self, mouse: MouseEvent) {
        let Some(form) = self.store.snapshot() else {
            return;
        };
        let (column, row) = (mouse.column, mouse.row);

        if let Some(step) = self.store.state().current_step().cloned() {
            let target = ReorderTarget::Fields {
                step_id: step.id.clone(),
            };
            if let Some((index, _)) = self.hover_target(&target, column, row) {
                let field_id = step.fields[index].id.clone();
                self.store.dispatch(Action::SelectField(Some(field_id.clone())));
                self.state.panel = BuilderPanel::Fields;
                self.state.drag = Some(DragSession::begin(target, field_id, index));
                return;
            }
        }

        if let Some((index, _)) = self.hover_target(&ReorderTarget::Steps, column, row) {
            self.store.dispatch(Action::SetCurrentStep(index));
            self.state.panel = BuilderPanel::Steps;
            self.state.drag = Some(DragSession::begin(
                ReorderTarget::Steps,
                form.steps[index].id.clone(),
                index,
            ));
            return;
        }

        let layout = builder_layout(self.content_area());
        let toolbox = layout.toolbox_list();
        let count = FieldType::ALL.len();
        if let Some((index, _)) = hit_item(toolbox, 1, 0, count, column, row) {
            self.state.toolbox_index = index;
            self.state.panel = BuilderPanel::Toolbox;
            self.add_field(FieldType::ALL[index]);
            return;
        }

        let properties = layout.properties.inner(Margin::new(1, 1));
        if let Some(field) = self.store.state().selected_field() {
            let count = Property::for_field(field).len();
            if let Some((index, _)) = hit_item(properties, 1, 0, count, column, row) {
                self.state.panel = BuilderPanel::Properties;
                self.state.property_index = index;
            }
        }
    }

    fn builder_mouse_drag(&mut self, mouse: MouseEvent) {
        let Some(mut session) = self.state.drag.take() else {
            return;
        };
        let hovered = self.hover_target(&session.target, mouse.column, mouse.row);
        if let (Some((index, pointer)), Some(form)) = (hovered, self.store.snapshot()) {
            if let Some(action) = session.hover(&form, index, pointer) {
                self.store.dispatch(action);
            }
        }
        self.state.drag = Some(session);
    }
}
