//! Application state and core logic
//!
//! Key handling runs on the UI thread. Network and file work is spawned on
//! the tokio runtime and reports back as [`ApiEvent`]s, which the event loop
//! drains every tick through [`App::process_events`].

use crate::api::{ApiClient, ApiError, PortalApi, PreviewDocument};
use crate::config::PortalConfig;
use crate::platform;
use crate::state::attachment::{self, Attachment, AttachmentError, AttachmentSlot};
use crate::state::forms::{FieldId, FieldKind, FormUpdate};
use crate::state::search::{self, SearchOutcome};
use crate::state::submission::{self, SubmissionPayload};
use crate::state::{
    Advance, AppState, ConfirmSubmit, Notice, SearchFocus, Shareholder, SplashState, Stockbroker,
    SubmissionReceipt, SubmittedForm, View, WizardStep,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const NOT_FOUND: &str = "No shareholders found with that name";
const SEARCH_FAILED: &str = "Error searching for shareholders. Please try again.";
const LOAD_FAILED: &str = "Failed to load shareholder details";
const STEP_INCOMPLETE: &str = "Please complete all required fields in this step";
const SUBMIT_OK: &str = "Form submitted successfully!";
const SUBMIT_FAILED: &str = "Failed to submit form";
const PREVIEW_FAILED: &str = "Failed to generate preview";

/// What to do with a rendered preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPurpose {
    /// Write to a scratch file and open it
    View,
    /// Save under the download directory
    Download,
}

/// Completion of background work, tagged with what it was issued for
#[derive(Debug)]
pub enum ApiEvent {
    SearchCompleted {
        query: String,
        result: Result<Vec<Shareholder>, ApiError>,
    },
    ShareholderLoaded {
        id: String,
        result: Result<Shareholder, ApiError>,
    },
    StockbrokersLoaded(Result<Vec<Stockbroker>, ApiError>),
    SubmitCompleted {
        session: u64,
        result: Result<SubmittedForm, ApiError>,
    },
    PreviewReady {
        purpose: PreviewPurpose,
        session: u64,
        reg_account_number: String,
        result: Result<PreviewDocument, ApiError>,
    },
    AttachmentAdmitted {
        session: u64,
        slot: AttachmentSlot,
        result: Result<Attachment, AttachmentError>,
    },
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Portal backend
    api: Arc<dyn PortalApi>,
    config: PortalConfig,
    events_tx: UnboundedSender<ApiEvent>,
    events_rx: UnboundedReceiver<ApiEvent>,
    /// Whether the app should quit
    quit: bool,
    /// Splash screen animation state
    pub splash_state: Option<SplashState>,
    /// Terminal size (height, width)
    pub terminal_size: Option<(u16, u16)>,
}

impl App {
    /// Create a new App talking to the configured portal
    pub fn new(config: PortalConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api_base_url, config.token.as_deref())?;
        tracing::info!(base_url = client.base_url(), "portal client ready");
        Ok(Self::with_api(Arc::new(client), config))
    }

    /// Create an App over any portal implementation
    pub fn with_api(api: Arc<dyn PortalApi>, config: PortalConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = AppState {
            current_view: View::Splash,
            resources: config.documents.clone(),
            ..Default::default()
        };

        Self {
            state,
            api,
            config,
            events_tx,
            events_rx,
            quit: false,
            splash_state: Some(SplashState::new()),
            terminal_size: None,
        }
    }

    /// Update splash animation state.
    /// Returns true once the animation finished and the search view is shown.
    pub fn update_splash(&mut self, terminal_height: u16) -> bool {
        if let Some(ref mut splash) = self.splash_state {
            splash.update(terminal_height);
            if splash.is_complete() {
                self.finish_splash();
                return true;
            }
        }
        false
    }

    fn finish_splash(&mut self) {
        self.splash_state = None;
        if self.state.current_view == View::Splash {
            self.state.current_view = View::Search;
        }
    }

    /// Check if in splash screen
    pub fn in_splash(&self) -> bool {
        matches!(self.state.current_view, View::Splash)
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a request the user is waiting on is still out
    pub fn is_busy(&self) -> bool {
        self.state.searching
            || self.state.loading_shareholder.is_some()
            || self.state.submitting
            || self.state.previewing
    }

    /// Apply every completed background event
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_api_event(event);
        }
    }

    /// Per-tick housekeeping
    pub fn tick(&mut self) {
        self.process_events();
        self.state.clear_expired_notice();
    }

    fn notify(&mut self, notice: Notice) {
        self.state.show_notice(notice);
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Splash => self.finish_splash(),
            View::Search => self.handle_search_key(key)?,
            View::SearchResults => self.handle_results_key(key),
            View::Wizard => self.handle_wizard_key(key),
            View::Submitted => self.handle_submitted_key(key),
        }
        Ok(())
    }

    // ---- Search -------------------------------------------------------

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state.search_focus {
            SearchFocus::Input => self.handle_search_input_key(key),
            SearchFocus::Resources => self.handle_resources_key(key)?,
        }
        Ok(())
    }

    fn handle_search_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_search(),
            KeyCode::Tab | KeyCode::Down if !self.state.resources.is_empty() => {
                self.state.search_focus.toggle();
            }
            KeyCode::Esc => self.state.search_input.clear(),
            KeyCode::Backspace => {
                self.state.search_input.pop();
            }
            KeyCode::Char(c) if is_plain(&key) => self.state.search_input.push(c),
            _ => {}
        }
    }

    fn handle_resources_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_resource_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_resource_up(),
            KeyCode::Enter | KeyCode::Char('o') => self.open_selected_resource(),
            KeyCode::Char('y') => self.copy_selected_resource(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => self.state.search_focus.toggle(),
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    fn open_selected_resource(&mut self) {
        let Some(link) = self.state.selected_resource().cloned() else {
            return;
        };
        match platform::open_target(&link.url) {
            Ok(()) => self.notify(Notice::info(format!("Opening {}", link.title))),
            Err(err) => {
                tracing::warn!(url = %link.url, %err, "could not open link");
                self.notify(Notice::error(format!("Could not open {}", link.title)));
            }
        }
    }

    fn copy_selected_resource(&mut self) {
        let Some(link) = self.state.selected_resource().cloned() else {
            return;
        };
        match self.copy_to_clipboard(&link.url) {
            Ok(()) => self.notify(Notice::success(format!("Copied link: {}", link.title))),
            Err(err) => {
                tracing::warn!(%err, "clipboard unavailable");
                self.notify(Notice::error("Could not copy to clipboard"));
            }
        }
    }

    /// Validate the typed name and start a search
    fn submit_search(&mut self) {
        if self.state.searching {
            return;
        }
        let query = match search::prepare_query(&self.state.search_input) {
            Ok(query) => query,
            Err(err) => {
                self.notify(Notice::error(err.to_string()));
                return;
            }
        };

        self.state.searching = true;
        self.state.pending_query = Some(query.clone());

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let limit = self.config.search_page_size;
        tokio::spawn(async move {
            let result = api.search_shareholders(&query, 1, limit).await;
            let _ = tx.send(ApiEvent::SearchCompleted { query, result });
        });
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let max = self.state.search_results.len();
                self.state.move_selection_down(max);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_result().map(|s| s.id.clone()) {
                    self.load_shareholder(id);
                }
            }
            KeyCode::Esc | KeyCode::Char('b') => {
                self.state.loading_shareholder = None;
                self.state.current_view = View::Search;
            }
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    /// Fetch a shareholder for the wizard, plus brokers on first use
    fn load_shareholder(&mut self, id: String) {
        if self.state.loading_shareholder.is_some() {
            return;
        }
        tracing::info!(id = %id, "opening wizard");
        self.state.loading_shareholder = Some(id.clone());

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.get_shareholder(&id).await;
            let _ = tx.send(ApiEvent::ShareholderLoaded { id, result });
        });

        if self.state.stockbrokers.is_empty() {
            let api = Arc::clone(&self.api);
            let tx = self.events_tx.clone();
            tokio::spawn(async move {
                let result = api.list_stockbrokers().await;
                let _ = tx.send(ApiEvent::StockbrokersLoaded(result));
            });
        }
    }

    // ---- Wizard -------------------------------------------------------

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        if self.state.confirm_submit.is_some() {
            self.handle_confirm_key(key);
            return;
        }

        if platform::has_action_modifier(&key) {
            match key.code {
                KeyCode::Char('s') => self.open_confirm(),
                KeyCode::Char('n') => self.next_step(),
                KeyCode::Char('b') => self.previous_step(),
                KeyCode::Char('p') => self.request_preview(PreviewPurpose::View),
                KeyCode::Char('a') => {
                    if !self.state.add_signature_slot() {
                        self.notify(Notice::info("Extra signatures are for joint signing"));
                    }
                }
                KeyCode::Char('x') => {
                    if !self.state.remove_focused_signature_slot() {
                        self.notify(Notice::info("Focus a joint signature slot to remove it"));
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::PageDown => self.next_step(),
            KeyCode::PageUp => self.previous_step(),
            KeyCode::Esc => self.wizard_escape(),
            KeyCode::Tab => self.state.next_form_field(),
            KeyCode::BackTab => self.state.prev_form_field(),
            _ => match self.state.active_field_id() {
                Some(field) => self.handle_field_key(field, key),
                None => self.handle_review_key(key),
            },
        }
    }

    /// Keys on steps without editable fields
    fn handle_review_key(&mut self, key: KeyEvent) {
        let at_last = self.current_step() == Some(WizardStep::LAST);
        match key.code {
            KeyCode::Enter if at_last => self.open_confirm(),
            KeyCode::Enter => self.next_step(),
            KeyCode::Char('s') if at_last => self.open_confirm(),
            KeyCode::Char('p') if at_last => self.request_preview(PreviewPurpose::View),
            KeyCode::Char('d') if at_last => self.request_preview(PreviewPurpose::Download),
            _ => {}
        }
    }

    fn handle_field_key(&mut self, field: FieldId, key: KeyEvent) {
        let kind = field.kind();
        match (kind, key.code) {
            (FieldKind::BrokerPicker, KeyCode::Down) => self.state.move_broker_down(),
            (FieldKind::BrokerPicker, KeyCode::Up) => self.state.move_broker_up(),
            (FieldKind::BrokerPicker, KeyCode::Enter) => match self.state.select_highlighted_broker()
            {
                Some(name) => {
                    self.notify(Notice::info(format!("Stockbroker: {name}")));
                    self.state.next_form_field();
                }
                None => self.notify(Notice::error("No options found")),
            },
            (_, KeyCode::Down) => self.state.next_form_field(),
            (_, KeyCode::Up) => self.state.prev_form_field(),
            (FieldKind::Checkbox, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.state.toggle_active_field();
            }
            (FieldKind::Choice, KeyCode::Left) => self.state.cycle_choice(false),
            (FieldKind::Choice, KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ')) => {
                self.state.cycle_choice(true)
            }
            (FieldKind::File, KeyCode::Enter) => self.admit_attachment(field),
            (_, KeyCode::Enter) => self.advance_focus(),
            (_, KeyCode::Backspace) => self.state.form_backspace(),
            (_, KeyCode::Char(c)) if is_plain(&key) && field.accepts_text() => {
                self.state.form_input_char(c)
            }
            _ => {}
        }
    }

    /// Enter on a plain field: next field, or next step from the last one
    fn advance_focus(&mut self) {
        let count = self.state.step_fields().len();
        if self.state.active_field + 1 >= count {
            self.next_step();
        } else {
            self.state.next_form_field();
        }
    }

    fn wizard_escape(&mut self) {
        let picking = self.state.active_field_id().map(|f| f.kind()) == Some(FieldKind::BrokerPicker);
        if picking && !self.state.broker_filter.is_empty() {
            self.state.broker_filter.clear();
            self.state.broker_index = 0;
            return;
        }
        if self.current_step() == Some(WizardStep::FIRST) {
            tracing::info!("leaving wizard");
            self.state.close_wizard();
        } else {
            self.previous_step();
        }
    }

    fn current_step(&self) -> Option<WizardStep> {
        self.state.wizard.as_ref().map(|w| w.step())
    }

    fn next_step(&mut self) {
        let Some(wizard) = self.state.wizard.as_mut() else {
            return;
        };
        match wizard.next() {
            Advance::Moved(step) => {
                tracing::debug!(step = step.number(), "wizard advanced");
                self.state.reset_field_focus();
            }
            Advance::AtEnd => self.open_confirm(),
            Advance::Blocked => self.notify(Notice::error(STEP_INCOMPLETE)),
        }
    }

    fn previous_step(&mut self) {
        let Some(wizard) = self.state.wizard.as_mut() else {
            return;
        };
        if wizard.step() == WizardStep::FIRST {
            return;
        }
        wizard.previous();
        self.state.reset_field_focus();
    }

    /// Hand the typed path for a file field to the attachment gate
    fn admit_attachment(&mut self, field: FieldId) {
        let slot = match field {
            FieldId::Receipt => AttachmentSlot::Receipt,
            FieldId::Signature(index) => AttachmentSlot::Signature(index),
            _ => return,
        };
        if self.state.wizard.is_none() {
            return;
        }
        let session = self.state.session;
        let raw = self.state.pending_path(field);
        // Drag-and-drop into a terminal often quotes the path
        let path = raw.trim().trim_matches(|c| c == '\'' || c == '"').to_string();
        if path.is_empty() {
            self.notify(Notice::error("Type the path of a JPG or PNG file first"));
            return;
        }

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = attachment::admit_file(Path::new(&path)).await;
            let _ = tx.send(ApiEvent::AttachmentAdmitted {
                session,
                slot,
                result,
            });
        });
    }

    // ---- Submission ---------------------------------------------------

    fn open_confirm(&mut self) {
        if self.current_step() != Some(WizardStep::LAST) {
            self.notify(Notice::info("Complete every step before submitting"));
            return;
        }
        if self.state.submitting {
            self.notify(Notice::info("Submission already in progress"));
            return;
        }
        self.state.confirm_submit = Some(ConfirmSubmit {
            selected_option: true,
        });
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some(confirm) = self.state.confirm_submit.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h' | 'l') => {
                confirm.selected_option = !confirm.selected_option;
            }
            KeyCode::Enter => {
                let submit = confirm.selected_option;
                self.state.confirm_submit = None;
                if submit {
                    self.submit_form();
                }
            }
            KeyCode::Char('y') => {
                self.state.confirm_submit = None;
                self.submit_form();
            }
            KeyCode::Esc | KeyCode::Char('n') => self.state.confirm_submit = None,
            _ => {}
        }
    }

    /// Package the form and post it
    fn submit_form(&mut self) {
        if self.state.submitting {
            return;
        }
        let Some(wizard) = self.state.wizard.as_ref() else {
            return;
        };
        let shareholder_id = wizard.shareholder().id.clone();
        let payload = SubmissionPayload::build(wizard.form(), &shareholder_id);
        tracing::info!(shareholder = %shareholder_id, files = ?payload.file_names(), "submitting form");
        let session = self.state.session;

        self.state.submitting = true;
        self.notify(Notice::info("Submitting form..."));

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.submit_rights(payload).await;
            let _ = tx.send(ApiEvent::SubmitCompleted {
                session,
                result,
            });
        });
    }

    fn request_preview(&mut self, purpose: PreviewPurpose) {
        if self.state.previewing {
            return;
        }
        let Some(wizard) = self.state.wizard.as_ref() else {
            return;
        };
        if self.state.current_view == View::Wizard && wizard.step() != WizardStep::LAST {
            self.notify(Notice::info("Preview is available on the final step"));
            return;
        }
        let shareholder_id = wizard.shareholder().id.clone();
        let reg_account_number = wizard.form().prefill.reg_account_number.clone();
        let body = submission::preview_body(wizard.form(), &shareholder_id);
        let session = self.state.session;

        self.state.previewing = true;
        self.notify(Notice::info("Generating preview..."));

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.preview_rights(body).await;
            let _ = tx.send(ApiEvent::PreviewReady {
                purpose,
                session,
                reg_account_number,
                result,
            });
        });
    }

    /// Write a rendered preview where its purpose wants it
    fn store_preview(
        &self,
        purpose: PreviewPurpose,
        reg_account_number: &str,
        document: &PreviewDocument,
    ) -> Result<PathBuf> {
        let path = match purpose {
            PreviewPurpose::View => std::env::temp_dir().join(format!(
                "rights-preview-{}.{}",
                uuid::Uuid::new_v4(),
                document.extension()
            )),
            PreviewPurpose::Download => {
                fs::create_dir_all(&self.config.download_dir)?;
                self.config
                    .download_dir
                    .join(document.file_name(reg_account_number))
            }
        };
        fs::write(&path, &document.bytes)?;
        Ok(path)
    }

    fn handle_submitted_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('v') => self.request_preview(PreviewPurpose::View),
            KeyCode::Char('d') => self.request_preview(PreviewPurpose::Download),
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Enter => self.state.reset_session(),
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    // ---- Background results -------------------------------------------

    fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::SearchCompleted { query, result } => self.on_search_completed(query, result),
            ApiEvent::ShareholderLoaded { id, result } => self.on_shareholder_loaded(id, result),
            ApiEvent::StockbrokersLoaded(result) => match result {
                Ok(brokers) => {
                    tracing::info!(count = brokers.len(), "stockbrokers loaded");
                    self.state.set_stockbrokers(brokers);
                }
                Err(err) => {
                    tracing::warn!(%err, "could not load stockbrokers");
                    self.state.set_stockbrokers(Vec::new());
                }
            },
            ApiEvent::SubmitCompleted { session, result } => {
                self.on_submit_completed(session, result)
            }
            ApiEvent::PreviewReady {
                purpose,
                session,
                reg_account_number,
                result,
            } => self.on_preview_ready(purpose, session, reg_account_number, result),
            ApiEvent::AttachmentAdmitted {
                session,
                slot,
                result,
            } => self.on_attachment_admitted(session, slot, result),
        }
    }

    fn on_search_completed(&mut self, query: String, result: Result<Vec<Shareholder>, ApiError>) {
        if self.state.pending_query.as_deref() != Some(query.as_str()) {
            tracing::debug!(query = %query, "discarding stale search result");
            return;
        }
        self.state.searching = false;
        self.state.pending_query = None;
        if self.state.current_view != View::Search {
            return;
        }

        let results = match result {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(%err, query = %query, "search failed");
                self.notify(Notice::error(err.user_message(SEARCH_FAILED)));
                return;
            }
        };

        tracing::info!(query = %query, matches = results.len(), "search completed");
        match SearchOutcome::classify(results, query) {
            SearchOutcome::NotFound => self.notify(Notice::error(NOT_FOUND)),
            SearchOutcome::Single(id) => self.load_shareholder(id),
            SearchOutcome::Multiple { results, query } => {
                self.state.search_results = results;
                self.state.results_query = query;
                self.state.reset_selection();
                self.state.current_view = View::SearchResults;
            }
        }
    }

    fn on_shareholder_loaded(&mut self, id: String, result: Result<Shareholder, ApiError>) {
        if self.state.loading_shareholder.as_deref() != Some(id.as_str()) {
            tracing::debug!(id = %id, "discarding stale shareholder");
            return;
        }
        match result {
            Ok(shareholder) => self.state.open_wizard(shareholder),
            Err(err) => {
                tracing::warn!(%err, id = %id, "shareholder load failed");
                self.state.loading_shareholder = None;
                self.notify(Notice::error(err.user_message(LOAD_FAILED)));
            }
        }
    }

    fn on_submit_completed(&mut self, session: u64, result: Result<SubmittedForm, ApiError>) {
        if session != self.state.session {
            tracing::debug!(session, "discarding stale submission result");
            return;
        }
        self.state.submitting = false;
        match result {
            Ok(form) => {
                let total = self
                    .state
                    .wizard
                    .as_ref()
                    .map(|w| w.form().total_payable())
                    .unwrap_or_default();
                tracing::info!(form_id = %form.id, "rights form submitted");
                self.state.submitted = Some(SubmissionReceipt { form, total });
                self.state.current_view = View::Submitted;
                self.notify(Notice::success(SUBMIT_OK));
            }
            Err(err) => {
                tracing::warn!(%err, "submission failed");
                self.state.push_error(err.user_message(SUBMIT_FAILED));
            }
        }
    }

    fn on_preview_ready(
        &mut self,
        purpose: PreviewPurpose,
        session: u64,
        reg_account_number: String,
        result: Result<PreviewDocument, ApiError>,
    ) {
        if session != self.state.session {
            tracing::debug!(session, "discarding stale preview");
            return;
        }
        self.state.previewing = false;

        let document = match result {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(%err, "preview failed");
                self.state.push_error(err.user_message(PREVIEW_FAILED));
                return;
            }
        };

        let path = match self.store_preview(purpose, &reg_account_number, &document) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(%err, "could not write preview");
                self.state.push_error(format!("Could not save the document: {err}"));
                return;
            }
        };

        match purpose {
            PreviewPurpose::View => match platform::open_target(&path.to_string_lossy()) {
                Ok(()) => self.notify(Notice::info("Preview opened")),
                Err(err) => {
                    tracing::warn!(%err, path = %path.display(), "could not open preview");
                    self.notify(Notice::info(format!("Preview saved to {}", path.display())));
                }
            },
            PreviewPurpose::Download => {
                tracing::info!(path = %path.display(), "form downloaded");
                self.notify(Notice::success(format!("Saved {}", path.display())));
            }
        }
    }

    fn on_attachment_admitted(
        &mut self,
        session: u64,
        slot: AttachmentSlot,
        result: Result<Attachment, AttachmentError>,
    ) {
        if session != self.state.session {
            tracing::debug!(session, ?slot, "discarding stale attachment");
            return;
        }
        let field = match slot {
            AttachmentSlot::Receipt => FieldId::Receipt,
            AttachmentSlot::Signature(index) => FieldId::Signature(index),
        };
        // Accepted or not, the typed path is spent
        self.state.clear_pending_path(field);

        match result {
            Ok(attachment) => {
                if let Some(wizard) = self.state.wizard.as_mut() {
                    wizard.update(FormUpdate::Attach(slot, attachment));
                }
                self.notify(Notice::success(slot.accepted_message()));
            }
            Err(err) => {
                tracing::warn!(%err, ?slot, "attachment rejected");
                self.notify(Notice::error(err.to_string()));
            }
        }
    }

    /// Copy text to system clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// A character typed without Ctrl or Alt
fn is_plain(key: &KeyEvent) -> bool {
    !key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPortalApi;
    use crate::state::forms::ActionType;
    use crate::state::{NoticeKind, ResourceLink, Wizard};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn holder(id: &str, name: &str) -> Shareholder {
        Shareholder {
            id: id.to_string(),
            reg_account_number: format!("RA-{id:0>4}"),
            name: name.to_string(),
            holdings: "15000".to_string(),
            rights_issue: "5000".to_string(),
            holdings_after: "20000".to_string(),
            amount_due: "1000".to_string(),
        }
    }

    fn brokers() -> Vec<Stockbroker> {
        vec![Stockbroker {
            id: "3".to_string(),
            name: "Apel Securities".to_string(),
        }]
    }

    fn png(name: &str) -> Attachment {
        Attachment {
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn test_config() -> PortalConfig {
        PortalConfig {
            documents: vec![ResourceLink::new("Circular", "https://example.com/c.pdf")],
            ..Default::default()
        }
    }

    fn app_with(mock: MockPortalApi) -> App {
        let mut app = App::with_api(Arc::new(mock), test_config());
        app.finish_splash();
        app
    }

    /// Wizard filled through step 6 and parked on the given step
    fn wizard_on(step: WizardStep, with_documents: bool) -> Wizard {
        let mut wizard = Wizard::new(holder("42", "John Doe"));
        wizard.set_stockbrokers(brokers());
        wizard.update(FormUpdate::Toggle(FieldId::InstructionsRead));
        wizard.update(FormUpdate::SelectBroker("3".to_string()));
        wizard.update(FormUpdate::SetText(FieldId::Chn, "C0042".to_string()));
        wizard.update(FormUpdate::SetActionType(ActionType::FullAcceptance));
        wizard.update(FormUpdate::Toggle(FieldId::AcceptFull));
        wizard.update(FormUpdate::Toggle(FieldId::ApplyAdditional));
        wizard.update(FormUpdate::SetText(FieldId::AdditionalShares, "100".to_string()));
        wizard.update(FormUpdate::SetText(FieldId::BankName, "Zenith".to_string()));
        for field in WizardStep::PersonalAndBank.fields(wizard.form()) {
            wizard.update(FormUpdate::SetText(field, "x".to_string()));
        }
        if with_documents {
            wizard.update(FormUpdate::Attach(AttachmentSlot::Receipt, png("receipt.png")));
            wizard.update(FormUpdate::Attach(
                AttachmentSlot::Signature(0),
                png("signature.png"),
            ));
        }
        while wizard.step() < step {
            assert!(matches!(wizard.next(), Advance::Moved(_)));
        }
        wizard
    }

    fn app_on_step(mock: MockPortalApi, step: WizardStep, with_documents: bool) -> App {
        let mut app = app_with(mock);
        app.state.stockbrokers = brokers();
        app.state.open_wizard(holder("42", "John Doe"));
        app.state.wizard = Some(wizard_on(step, with_documents));
        app
    }

    /// Wait for one background event and apply it
    async fn settle(app: &mut App) {
        let event = tokio::time::timeout(Duration::from_secs(5), app.events_rx.recv())
            .await
            .expect("background event in time")
            .expect("channel open");
        app.handle_api_event(event);
    }

    async fn settle_until(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..5 {
            if done(app) {
                return;
            }
            settle(app).await;
        }
        assert!(done(app), "condition not reached");
    }

    fn notice_text(app: &App) -> Option<(NoticeKind, String)> {
        app.state.notice.as_ref().map(|n| (n.kind, n.text.clone()))
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_starts_on_splash_with_resources() {
            let app = App::with_api(Arc::new(MockPortalApi::new()), test_config());
            assert!(app.in_splash());
            assert_eq!(app.state.resources.len(), 1);
            assert!(!app.should_quit());
        }

        #[tokio::test]
        async fn test_any_key_skips_splash() {
            let mut app = App::with_api(Arc::new(MockPortalApi::new()), test_config());
            app.handle_key(key(KeyCode::Char('x'))).unwrap();
            assert_eq!(app.state.current_view, View::Search);
            assert!(app.splash_state.is_none());
        }

        #[tokio::test]
        async fn test_error_modal_swallows_keys_until_dismissed() {
            let mut app = app_with(MockPortalApi::new());
            app.state.push_error("boom".to_string());
            type_text(&mut app, "ab");
            assert!(app.state.search_input.is_empty());
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert!(!app.state.has_errors());
        }
    }

    mod search {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_short_query_is_rejected_locally() {
            let mut app = app_with(MockPortalApi::new());
            type_text(&mut app, " J ");
            app.handle_key(key(KeyCode::Enter)).unwrap();

            assert!(!app.state.searching);
            assert_eq!(
                notice_text(&app),
                Some((
                    NoticeKind::Error,
                    "Please enter at least 2 characters to search".to_string()
                ))
            );
        }

        #[tokio::test]
        async fn test_no_matches_stays_on_search() {
            let mut mock = MockPortalApi::new();
            mock.expect_search_shareholders()
                .withf(|name, page, limit| name.to_string() == "John" && *page == 1 && *limit == 10)
                .times(1)
                .returning(|_, _, _| Ok(Vec::new()));
            let mut app = app_with(mock);

            type_text(&mut app, "John");
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert!(app.state.searching);
            settle(&mut app).await;

            assert!(!app.state.searching);
            assert_eq!(app.state.current_view, View::Search);
            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Error, NOT_FOUND.to_string()))
            );
        }

        #[tokio::test]
        async fn test_single_match_opens_wizard() {
            let mut mock = MockPortalApi::new();
            mock.expect_search_shareholders()
                .returning(|_, _, _| Ok(vec![holder("42", "John Doe")]));
            mock.expect_get_shareholder()
                .withf(|id| id.to_string() == "42")
                .times(1)
                .returning(|_| Ok(holder("42", "John Doe")));
            mock.expect_list_stockbrokers()
                .times(1)
                .returning(|| Ok(brokers()));
            let mut app = app_with(mock);

            type_text(&mut app, "John Doe");
            app.handle_key(key(KeyCode::Enter)).unwrap();
            settle_until(&mut app, |app| {
                app.state.current_view == View::Wizard && !app.state.stockbrokers.is_empty()
            })
            .await;

            let wizard = app.state.wizard.as_ref().unwrap();
            assert_eq!(wizard.shareholder().id, "42");
            assert_eq!(wizard.step(), WizardStep::FIRST);
            assert_eq!(wizard.stockbrokers().len(), 1);
        }

        #[tokio::test]
        async fn test_multiple_matches_show_results() {
            let mut mock = MockPortalApi::new();
            mock.expect_search_shareholders().returning(|_, _, _| {
                Ok(vec![holder("1", "John Doe"), holder("2", "John Smith")])
            });
            let mut app = app_with(mock);

            type_text(&mut app, "John");
            app.handle_key(key(KeyCode::Enter)).unwrap();
            settle(&mut app).await;

            assert_eq!(app.state.current_view, View::SearchResults);
            assert_eq!(app.state.results_query, "John");
            assert_eq!(app.state.search_results.len(), 2);

            app.handle_key(key(KeyCode::Char('j'))).unwrap();
            assert_eq!(app.state.selected_result().unwrap().id, "2");
            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert_eq!(app.state.current_view, View::Search);
        }

        #[tokio::test]
        async fn test_transport_failure_shows_generic_message() {
            let mut app = app_with(MockPortalApi::new());
            app.state.searching = true;
            app.state.pending_query = Some("John".to_string());

            app.handle_api_event(ApiEvent::SearchCompleted {
                query: "John".to_string(),
                result: Err(ApiError::Decode("bad json".to_string())),
            });

            assert!(!app.state.searching);
            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Error, SEARCH_FAILED.to_string()))
            );
        }

        #[tokio::test]
        async fn test_server_message_is_preferred() {
            let mut app = app_with(MockPortalApi::new());
            app.state.pending_query = Some("John".to_string());

            app.handle_api_event(ApiEvent::SearchCompleted {
                query: "John".to_string(),
                result: Err(ApiError::Rejected {
                    message: Some("Search is closed".to_string()),
                }),
            });

            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Error, "Search is closed".to_string()))
            );
        }

        #[tokio::test]
        async fn test_stale_search_result_is_discarded() {
            let mut app = app_with(MockPortalApi::new());
            app.state.searching = true;
            app.state.pending_query = Some("John Doe".to_string());

            app.handle_api_event(ApiEvent::SearchCompleted {
                query: "John".to_string(),
                result: Ok(vec![holder("1", "A"), holder("2", "B")]),
            });

            assert!(app.state.searching);
            assert_eq!(app.state.current_view, View::Search);
            assert!(app.state.search_results.is_empty());
        }

        #[tokio::test]
        async fn test_shareholder_load_failure_reports_and_stays() {
            let mut app = app_with(MockPortalApi::new());
            app.state.loading_shareholder = Some("42".to_string());

            app.handle_api_event(ApiEvent::ShareholderLoaded {
                id: "42".to_string(),
                result: Err(ApiError::Status {
                    status: 404,
                    message: None,
                }),
            });

            assert!(app.state.loading_shareholder.is_none());
            assert_eq!(app.state.current_view, View::Search);
            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Error, LOAD_FAILED.to_string()))
            );
        }

        #[tokio::test]
        async fn test_abandoned_shareholder_load_is_discarded() {
            let mut app = app_with(MockPortalApi::new());
            app.state.loading_shareholder = None;

            app.handle_api_event(ApiEvent::ShareholderLoaded {
                id: "42".to_string(),
                result: Ok(holder("42", "John Doe")),
            });

            assert!(app.state.wizard.is_none());
            assert_eq!(app.state.current_view, View::Search);
        }

        #[tokio::test]
        async fn test_broker_failure_leaves_empty_list() {
            let mut app = app_with(MockPortalApi::new());
            app.handle_api_event(ApiEvent::StockbrokersLoaded(Err(ApiError::Decode(
                "x".to_string(),
            ))));
            assert!(app.state.stockbrokers.is_empty());
            assert!(app.state.notice.is_none());
        }

        #[tokio::test]
        async fn test_tab_moves_to_resources_and_q_quits() {
            let mut app = app_with(MockPortalApi::new());
            app.handle_key(key(KeyCode::Tab)).unwrap();
            assert_eq!(app.state.search_focus, SearchFocus::Resources);
            app.handle_key(key(KeyCode::Char('q'))).unwrap();
            assert!(app.should_quit());
        }
    }

    mod wizard {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_blocked_step_shows_notice() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::FIRST, false);
            app.state.wizard = Some(Wizard::new(holder("42", "John Doe")));
            app.handle_key(key(KeyCode::PageDown)).unwrap();
            assert_eq!(app.current_step(), Some(WizardStep::Instructions));

            app.handle_key(key(KeyCode::PageDown)).unwrap();
            assert_eq!(app.current_step(), Some(WizardStep::Instructions));
            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Error, STEP_INCOMPLETE.to_string()))
            );

            app.handle_key(key(KeyCode::Char(' '))).unwrap();
            app.handle_key(ctrl('n')).unwrap();
            assert_eq!(app.current_step(), Some(WizardStep::BrokerAndChn));
        }

        #[tokio::test]
        async fn test_broker_picker_filters_and_selects() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::BrokerAndChn, false);
            app.state.wizard = Some({
                let mut w = Wizard::new(holder("42", "John Doe"));
                w.set_stockbrokers(brokers());
                w.update(FormUpdate::Toggle(FieldId::InstructionsRead));
                w.next();
                w.next();
                w
            });

            type_text(&mut app, "zzz");
            assert!(app.state.filtered_brokers().is_empty());
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Error, "No options found".to_string()))
            );

            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert!(app.state.broker_filter.is_empty());
            type_text(&mut app, "apel");
            app.handle_key(key(KeyCode::Enter)).unwrap();

            let wizard = app.state.wizard.as_ref().unwrap();
            assert_eq!(wizard.form().stockbroker.as_deref(), Some("3"));
            assert_eq!(app.state.active_field_id(), Some(FieldId::Chn));
        }

        #[tokio::test]
        async fn test_escape_on_first_step_returns_to_search() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::FIRST, false);
            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert_eq!(app.state.current_view, View::Search);
            assert!(app.state.wizard.is_none());
        }

        #[tokio::test]
        async fn test_escape_goes_back_a_step() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::PersonalAndBank, false);
            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert_eq!(app.current_step(), Some(WizardStep::ActionDetails));
        }

        #[tokio::test]
        async fn test_choice_cycles_action_type() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::ActionChoice, false);
            app.handle_key(key(KeyCode::Right)).unwrap();
            let action = app.state.wizard.as_ref().unwrap().form().action_type();
            assert_eq!(action, Some(ActionType::RenunciationPartial));
        }

        #[tokio::test]
        async fn test_submit_only_from_last_step() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::PersonalAndBank, false);
            app.handle_key(ctrl('s')).unwrap();
            assert!(app.state.confirm_submit.is_none());
        }
    }

    mod attachments {
        use super::*;
        use pretty_assertions::assert_eq;

        fn focus_receipt(app: &mut App) {
            let index = app
                .state
                .step_fields()
                .iter()
                .position(|f| *f == FieldId::Receipt)
                .unwrap();
            app.state.active_field = index;
        }

        #[tokio::test]
        async fn test_png_is_admitted() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("receipt.png");
            fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

            let mut app = app_on_step(MockPortalApi::new(), WizardStep::SignatureAndReceipt, false);
            focus_receipt(&mut app);
            type_text(&mut app, &path.to_string_lossy());
            app.handle_key(key(KeyCode::Enter)).unwrap();
            settle(&mut app).await;

            let form = app.state.wizard.as_ref().unwrap().form();
            assert_eq!(form.receipt.as_ref().unwrap().file_name, "receipt.png");
            assert!(app.state.pending_path(FieldId::Receipt).is_empty());
            assert_eq!(
                notice_text(&app),
                Some((
                    NoticeKind::Success,
                    "Receipt uploaded successfully".to_string()
                ))
            );
        }

        #[tokio::test]
        async fn test_pdf_is_rejected_and_input_cleared() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("receipt.pdf");
            fs::write(&path, b"%PDF-1.4").unwrap();

            let mut app = app_on_step(MockPortalApi::new(), WizardStep::SignatureAndReceipt, false);
            focus_receipt(&mut app);
            type_text(&mut app, &path.to_string_lossy());
            app.handle_key(key(KeyCode::Enter)).unwrap();
            settle(&mut app).await;

            let form = app.state.wizard.as_ref().unwrap().form();
            assert!(form.receipt.is_none());
            assert!(app.state.pending_path(FieldId::Receipt).is_empty());
            let (kind, text) = notice_text(&app).unwrap();
            assert_eq!(kind, NoticeKind::Error);
            assert!(text.starts_with("Invalid file type"));
        }

        #[tokio::test]
        async fn test_empty_path_is_not_sent_to_the_gate() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::SignatureAndReceipt, false);
            focus_receipt(&mut app);
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert_eq!(notice_text(&app).unwrap().0, NoticeKind::Error);
            assert!(app.events_rx.try_recv().is_err());
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        fn confirmation() -> SubmittedForm {
            SubmittedForm {
                id: "9".to_string(),
                reg_account_number: "RA-0042".to_string(),
                name: "John Doe".to_string(),
                chn: "C0042".to_string(),
                created_at: None,
            }
        }

        #[tokio::test]
        async fn test_confirmed_submission_shows_summary() {
            let mut mock = MockPortalApi::new();
            mock.expect_submit_rights()
                .withf(|payload| {
                    payload.field("shareholder_id") == Some("42")
                        && payload.file_names() == vec!["receipt", "signature_0"]
                })
                .times(1)
                .returning(|_| Ok(confirmation()));
            let mut app = app_on_step(mock, WizardStep::Summary, true);

            app.handle_key(ctrl('s')).unwrap();
            assert!(app.state.confirm_submit.is_some());
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert!(app.state.submitting);
            assert!(app.is_busy());
            settle(&mut app).await;

            assert!(!app.state.submitting);
            assert_eq!(app.state.current_view, View::Submitted);
            let receipt = app.state.submitted.as_ref().unwrap();
            assert_eq!(receipt.form.chn, "C0042");
            assert_eq!(receipt.total, Decimal::new(170000, 2));
            assert_eq!(
                notice_text(&app),
                Some((NoticeKind::Success, SUBMIT_OK.to_string()))
            );
        }

        #[tokio::test]
        async fn test_cancelled_confirmation_does_not_submit() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::Summary, true);
            app.handle_key(key(KeyCode::Enter)).unwrap();
            app.handle_key(key(KeyCode::Right)).unwrap();
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert!(app.state.confirm_submit.is_none());
            assert!(!app.state.submitting);
        }

        #[tokio::test]
        async fn test_failed_submission_stays_on_last_step() {
            let mut mock = MockPortalApi::new();
            mock.expect_submit_rights().returning(|_| {
                Err(ApiError::Rejected {
                    message: Some("Form already submitted".to_string()),
                })
            });
            let mut app = app_on_step(mock, WizardStep::Summary, true);

            app.handle_key(ctrl('s')).unwrap();
            app.handle_key(key(KeyCode::Char('y'))).unwrap();
            settle(&mut app).await;

            assert!(!app.state.submitting);
            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(app.current_step(), Some(WizardStep::LAST));
            assert_eq!(app.state.current_error(), Some("Form already submitted"));
        }

        #[tokio::test]
        async fn test_submission_in_flight_blocks_another() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::Summary, true);
            app.state.submitting = true;
            app.handle_key(ctrl('s')).unwrap();
            assert!(app.state.confirm_submit.is_none());
        }

        #[tokio::test]
        async fn test_download_writes_named_file() {
            let dir = tempfile::tempdir().unwrap();
            let mut mock = MockPortalApi::new();
            mock.expect_preview_rights()
                .withf(|body| body["reg_account_number"] == "RA-0042")
                .returning(|_| {
                    Ok(PreviewDocument {
                        bytes: b"%PDF-1.4".to_vec(),
                        content_type: "application/pdf".to_string(),
                    })
                });
            let mut app = app_on_step(mock, WizardStep::Summary, true);
            app.config.download_dir = dir.path().join("downloads");
            app.state.submitted = Some(SubmissionReceipt {
                form: confirmation(),
                total: Decimal::ZERO,
            });
            app.state.current_view = View::Submitted;

            app.handle_key(key(KeyCode::Char('d'))).unwrap();
            assert!(app.state.previewing);
            settle(&mut app).await;

            let saved = dir.path().join("downloads").join("rights-form-RA-0042.pdf");
            assert_eq!(fs::read(saved).unwrap(), b"%PDF-1.4");
            assert!(!app.state.previewing);
            assert_eq!(notice_text(&app).unwrap().0, NoticeKind::Success);
        }

        #[tokio::test]
        async fn test_preview_failure_uses_fallback_message() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::Summary, true);
            app.state.previewing = true;
            app.handle_api_event(ApiEvent::PreviewReady {
                purpose: PreviewPurpose::View,
                session: app.state.session,
                reg_account_number: "RA-0042".to_string(),
                result: Err(ApiError::Status {
                    status: 500,
                    message: None,
                }),
            });
            assert!(!app.state.previewing);
            assert_eq!(app.state.current_error(), Some(PREVIEW_FAILED));
        }

        #[tokio::test]
        async fn test_reopened_wizard_ignores_abandoned_submission() {
            let mut mock = MockPortalApi::new();
            mock.expect_submit_rights()
                .times(1)
                .returning(|_| Ok(confirmation()));
            let mut app = app_on_step(mock, WizardStep::Summary, true);

            app.handle_key(ctrl('s')).unwrap();
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert!(app.state.submitting);
            app.state.close_wizard();
            app.state.open_wizard(holder("42", "John Doe"));
            settle(&mut app).await;

            assert_eq!(app.state.current_view, View::Wizard);
            assert!(app.state.submitted.is_none());
            assert_eq!(
                app.state.wizard.as_ref().unwrap().step(),
                WizardStep::ShareholderInfo
            );
        }

        #[tokio::test]
        async fn test_preview_from_earlier_session_is_dropped() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::Summary, true);
            let stale = app.state.session;
            app.state.close_wizard();
            app.state.open_wizard(holder("42", "John Doe"));
            app.state.previewing = true;

            app.handle_api_event(ApiEvent::PreviewReady {
                purpose: PreviewPurpose::View,
                session: stale,
                reg_account_number: "RA-0042".to_string(),
                result: Err(ApiError::Status {
                    status: 500,
                    message: None,
                }),
            });
            assert!(app.state.previewing);
            assert!(!app.state.has_errors());
        }

        #[tokio::test]
        async fn test_back_from_summary_resets_session() {
            let mut app = app_on_step(MockPortalApi::new(), WizardStep::Summary, true);
            app.state.search_input = "John".to_string();
            app.state.current_view = View::Submitted;
            app.handle_key(key(KeyCode::Char('b'))).unwrap();
            assert_eq!(app.state.current_view, View::Search);
            assert!(app.state.wizard.is_none());
            assert!(app.state.search_input.is_empty());
        }
    }
}
