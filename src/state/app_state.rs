//! Application state definitions

use super::forms::{ActionType, FieldId, FieldKind, FormUpdate, SignatureMode};
use super::notice::Notice;
use super::records::{ResourceLink, Shareholder, Stockbroker, SubmittedForm};
use super::wizard::{filter_stockbrokers, Wizard};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Splash screen with logo animation
    Splash,
    #[default]
    Search,
    /// Disambiguation list for several matches
    SearchResults,
    Wizard,
    /// Terminal state after a successful submission
    Submitted,
}

/// Which part of the search screen has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Input,
    Resources,
}

impl SearchFocus {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Input => Self::Resources,
            Self::Resources => Self::Input,
        };
    }
}

/// Pending confirmation before the form is posted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfirmSubmit {
    /// `true` when "Submit" is highlighted, `false` for "Cancel"
    pub selected_option: bool,
}

/// What the summary view shows after submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub form: SubmittedForm,
    /// Total payable at the time of submission
    pub total: Decimal,
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Search
    pub search_input: String,
    pub search_focus: SearchFocus,
    pub searching: bool,
    /// Query of the search in flight, if any
    pub pending_query: Option<String>,
    pub search_results: Vec<Shareholder>,
    pub results_query: String,
    pub resources: Vec<ResourceLink>,
    pub resource_index: usize,

    // Selection
    pub selected_index: usize,

    // Wizard session
    /// Shareholder id being fetched for the wizard
    pub loading_shareholder: Option<String>,
    pub wizard: Option<Wizard>,
    pub stockbrokers: Vec<Stockbroker>,
    pub active_field: usize,
    pub broker_filter: String,
    pub broker_index: usize,
    /// Typed file paths not yet admitted, per file field
    pub pending_paths: HashMap<FieldId, String>,

    // Transport
    /// Bumped whenever a wizard session opens or ends; tags wizard requests
    pub session: u64,
    pub submitting: bool,
    pub previewing: bool,
    pub confirm_submit: Option<ConfirmSubmit>,
    pub submitted: Option<SubmissionReceipt>,

    // Feedback
    pub error_queue: Vec<String>,
    pub notice: Option<Notice>,
}

impl AppState {
    /// Push an error message onto the modal queue
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    /// The error currently displayed
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.first().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        if !self.error_queue.is_empty() {
            self.error_queue.remove(0);
        }
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Drop the notice once it has been shown long enough
    pub fn clear_expired_notice(&mut self) {
        if self.notice.as_ref().is_some_and(Notice::is_expired) {
            self.notice = None;
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Shareholder highlighted in the results list
    pub fn selected_result(&self) -> Option<&Shareholder> {
        self.search_results.get(self.selected_index)
    }

    pub fn selected_resource(&self) -> Option<&ResourceLink> {
        self.resources.get(self.resource_index)
    }

    pub fn move_resource_down(&mut self) {
        if self.resource_index + 1 < self.resources.len() {
            self.resource_index += 1;
        }
    }

    pub fn move_resource_up(&mut self) {
        self.resource_index = self.resource_index.saturating_sub(1);
    }

    /// Start a wizard session for a freshly loaded shareholder
    pub fn open_wizard(&mut self, shareholder: Shareholder) {
        let mut wizard = Wizard::new(shareholder);
        wizard.set_stockbrokers(self.stockbrokers.clone());
        self.wizard = Some(wizard);
        self.next_session();
        self.loading_shareholder = None;
        self.submitted = None;
        self.confirm_submit = None;
        self.reset_field_focus();
        self.current_view = View::Wizard;
    }

    /// Store broker reference data and hand it to an open wizard
    pub fn set_stockbrokers(&mut self, stockbrokers: Vec<Stockbroker>) {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.set_stockbrokers(stockbrokers.clone());
        }
        self.stockbrokers = stockbrokers;
        self.broker_index = 0;
    }

    /// Abandon the wizard and return to the search screen as it was
    pub fn close_wizard(&mut self) {
        self.wizard = None;
        self.next_session();
        self.confirm_submit = None;
        self.submitting = false;
        self.previewing = false;
        self.reset_field_focus();
        self.current_view = View::Search;
    }

    /// Back to an empty search screen; reference data is kept
    pub fn reset_session(&mut self) {
        self.current_view = View::Search;
        self.search_input.clear();
        self.search_focus = SearchFocus::Input;
        self.searching = false;
        self.pending_query = None;
        self.search_results.clear();
        self.results_query.clear();
        self.selected_index = 0;
        self.loading_shareholder = None;
        self.wizard = None;
        self.submitting = false;
        self.previewing = false;
        self.confirm_submit = None;
        self.submitted = None;
        self.next_session();
        self.reset_field_focus();
    }

    fn next_session(&mut self) {
        self.session = self.session.wrapping_add(1);
    }

    pub fn reset_field_focus(&mut self) {
        self.active_field = 0;
        self.broker_filter.clear();
        self.broker_index = 0;
        self.pending_paths.clear();
    }

    /// Fields of the current wizard step
    pub fn step_fields(&self) -> Vec<FieldId> {
        self.wizard
            .as_ref()
            .map(|w| w.step().fields(w.form()))
            .unwrap_or_default()
    }

    pub fn active_field_id(&self) -> Option<FieldId> {
        self.step_fields().get(self.active_field).copied()
    }

    /// Move to next form field
    pub fn next_form_field(&mut self) {
        let count = self.step_fields().len();
        if count > 0 {
            self.active_field = (self.active_field + 1) % count;
        }
    }

    /// Move to previous form field
    pub fn prev_form_field(&mut self) {
        let count = self.step_fields().len();
        if count == 0 {
            return;
        }
        if self.active_field == 0 {
            self.active_field = count - 1;
        } else {
            self.active_field -= 1;
        }
    }

    /// Keep focus in range after the field list changed shape
    pub fn clamp_field_focus(&mut self) {
        let count = self.step_fields().len();
        if self.active_field >= count {
            self.active_field = count.saturating_sub(1);
        }
    }

    /// Route a typed character to the focused field
    pub fn form_input_char(&mut self, c: char) {
        let Some(field) = self.active_field_id() else {
            return;
        };
        match field.kind() {
            FieldKind::Text | FieldKind::Numeric => {
                if field.kind() == FieldKind::Numeric && !(c.is_ascii_digit() || c == '.') {
                    return;
                }
                let Some(wizard) = self.wizard.as_mut() else {
                    return;
                };
                let mut value = wizard.form().text(field).unwrap_or_default().to_string();
                value.push(c);
                wizard.update(FormUpdate::SetText(field, value));
            }
            FieldKind::File => self.pending_paths.entry(field).or_default().push(c),
            FieldKind::BrokerPicker => {
                self.broker_filter.push(c);
                self.broker_index = 0;
            }
            FieldKind::Checkbox | FieldKind::Choice | FieldKind::ReadOnly => {}
        }
    }

    /// Handle backspace in the focused field
    pub fn form_backspace(&mut self) {
        let Some(field) = self.active_field_id() else {
            return;
        };
        match field.kind() {
            FieldKind::Text | FieldKind::Numeric => {
                let Some(wizard) = self.wizard.as_mut() else {
                    return;
                };
                let mut value = wizard.form().text(field).unwrap_or_default().to_string();
                if value.pop().is_some() {
                    wizard.update(FormUpdate::SetText(field, value));
                }
            }
            FieldKind::File => {
                if let Some(path) = self.pending_paths.get_mut(&field) {
                    path.pop();
                }
            }
            FieldKind::BrokerPicker => {
                self.broker_filter.pop();
                self.broker_index = 0;
            }
            FieldKind::Checkbox | FieldKind::Choice | FieldKind::ReadOnly => {}
        }
    }

    /// Space on a checkbox
    pub fn toggle_active_field(&mut self) -> bool {
        let Some(field) = self.active_field_id() else {
            return false;
        };
        if field.kind() != FieldKind::Checkbox {
            return false;
        }
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.update(FormUpdate::Toggle(field));
        }
        true
    }

    /// Left/Right on a choice field
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.active_field_id() else {
            return;
        };
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        match field {
            FieldId::ActionType => {
                let all = ActionType::ALL;
                let next = match wizard.form().action_type() {
                    None if forward => all[0],
                    None => all[all.len() - 1],
                    Some(current) => {
                        let pos = all.iter().position(|a| *a == current).unwrap_or(0);
                        let idx = if forward {
                            (pos + 1) % all.len()
                        } else {
                            (pos + all.len() - 1) % all.len()
                        };
                        all[idx]
                    }
                };
                wizard.update(FormUpdate::SetActionType(next));
            }
            FieldId::SignatureType => {
                let mode = wizard.form().signatures.mode.toggle();
                wizard.update(FormUpdate::SetSignatureMode(mode));
            }
            _ => {}
        }
        self.clamp_field_focus();
    }

    /// Brokers matching the picker filter
    pub fn filtered_brokers(&self) -> Vec<&Stockbroker> {
        match self.wizard.as_ref() {
            Some(wizard) => filter_stockbrokers(wizard.stockbrokers(), &self.broker_filter),
            None => Vec::new(),
        }
    }

    pub fn move_broker_down(&mut self) {
        let count = self.filtered_brokers().len();
        if self.broker_index + 1 < count {
            self.broker_index += 1;
        }
    }

    pub fn move_broker_up(&mut self) {
        self.broker_index = self.broker_index.saturating_sub(1);
    }

    /// Store the highlighted broker; returns its name when one was chosen
    pub fn select_highlighted_broker(&mut self) -> Option<String> {
        let broker = self.filtered_brokers().get(self.broker_index).copied()?.clone();
        let wizard = self.wizard.as_mut()?;
        wizard.update(FormUpdate::SelectBroker(broker.id));
        self.broker_filter.clear();
        self.broker_index = 0;
        Some(broker.name)
    }

    /// Typed path for a file field
    pub fn pending_path(&self, field: FieldId) -> &str {
        self.pending_paths
            .get(&field)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn clear_pending_path(&mut self, field: FieldId) {
        self.pending_paths.remove(&field);
    }

    /// Append a signature slot in joint mode
    pub fn add_signature_slot(&mut self) -> bool {
        let Some(wizard) = self.wizard.as_mut() else {
            return false;
        };
        if wizard.form().signatures.mode != SignatureMode::Joint {
            return false;
        }
        wizard.update(FormUpdate::AddSignatureSlot);
        true
    }

    /// Remove the focused signature slot in joint mode
    pub fn remove_focused_signature_slot(&mut self) -> bool {
        let Some(FieldId::Signature(index)) = self.active_field_id() else {
            return false;
        };
        let Some(wizard) = self.wizard.as_mut() else {
            return false;
        };
        let signatures = &wizard.form().signatures;
        if signatures.mode != SignatureMode::Joint || index >= signatures.slots.len() {
            return false;
        }
        wizard.update(FormUpdate::RemoveSignatureSlot(index));
        // Slot indices shifted, so typed paths no longer line up
        self.pending_paths
            .retain(|field, _| !matches!(field, FieldId::Signature(_)));
        self.clamp_field_focus();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::attachment::{Attachment, AttachmentSlot};
    use crate::state::wizard::{Advance, WizardStep};
    use pretty_assertions::assert_eq;

    fn shareholder() -> Shareholder {
        Shareholder {
            id: "42".to_string(),
            name: "John Doe".to_string(),
            amount_due: "1000".to_string(),
            ..Default::default()
        }
    }

    fn brokers() -> Vec<Stockbroker> {
        vec![
            Stockbroker {
                id: "1".to_string(),
                name: "Apel Securities".to_string(),
            },
            Stockbroker {
                id: "2".to_string(),
                name: "Cordros Capital".to_string(),
            },
        ]
    }

    /// State with a wizard parked on the given step
    fn state_on(step: WizardStep) -> AppState {
        let mut state = AppState::default();
        state.stockbrokers = brokers();
        state.open_wizard(shareholder());
        let wizard = state.wizard.as_mut().unwrap();
        wizard.update(FormUpdate::Toggle(FieldId::InstructionsRead));
        wizard.update(FormUpdate::SelectBroker("1".to_string()));
        wizard.update(FormUpdate::SetText(FieldId::Chn, "C1".to_string()));
        while wizard.step() < step {
            match wizard.step() {
                WizardStep::ActionChoice => {
                    wizard.update(FormUpdate::SetActionType(ActionType::FullAcceptance))
                }
                WizardStep::ActionDetails => wizard.update(FormUpdate::Toggle(FieldId::AcceptFull)),
                WizardStep::PersonalAndBank => {
                    for field in WizardStep::PersonalAndBank.fields(wizard.form()) {
                        wizard.update(FormUpdate::SetText(field, "x".to_string()));
                    }
                }
                _ => {}
            }
            assert!(matches!(wizard.next(), Advance::Moved(_)));
        }
        state
    }

    mod errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_error_queue_is_fifo() {
            let mut state = AppState::default();
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(!state.has_errors());
            state.dismiss_error();
        }
    }

    mod selection {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_results_selection_clamps() {
            let mut state = AppState::default();
            state.move_selection_down(2);
            state.move_selection_down(2);
            assert_eq!(state.selected_index, 1);
            state.move_selection_up();
            state.move_selection_up();
            assert_eq!(state.selected_index, 0);
        }

        #[test]
        fn test_resource_selection() {
            let mut state = AppState {
                resources: vec![
                    ResourceLink::new("Circular", "https://example.com/a.pdf"),
                    ResourceLink::new("Docket", "https://example.com/b.pdf"),
                ],
                ..Default::default()
            };
            state.move_resource_down();
            state.move_resource_down();
            assert_eq!(state.selected_resource().unwrap().title, "Docket");
            state.move_resource_up();
            assert_eq!(state.resource_index, 0);
        }
    }

    mod session {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_open_wizard_hands_over_brokers() {
            let mut state = AppState {
                stockbrokers: brokers(),
                loading_shareholder: Some("42".to_string()),
                ..Default::default()
            };
            state.open_wizard(shareholder());

            assert_eq!(state.current_view, View::Wizard);
            assert!(state.loading_shareholder.is_none());
            assert_eq!(state.wizard.as_ref().unwrap().stockbrokers().len(), 2);
        }

        #[test]
        fn test_late_brokers_reach_open_wizard() {
            let mut state = AppState::default();
            state.open_wizard(shareholder());
            state.set_stockbrokers(brokers());
            assert_eq!(state.wizard.as_ref().unwrap().stockbrokers().len(), 2);
        }

        #[test]
        fn test_reset_session_keeps_reference_data() {
            let mut state = AppState {
                resources: vec![ResourceLink::new("Circular", "https://example.com")],
                ..Default::default()
            };
            state.set_stockbrokers(brokers());
            state.search_input = "John".to_string();
            state.open_wizard(shareholder());

            state.reset_session();

            assert_eq!(state.current_view, View::Search);
            assert!(state.wizard.is_none());
            assert!(state.search_input.is_empty());
            assert_eq!(state.resources.len(), 1);
            assert_eq!(state.stockbrokers.len(), 2);
        }

        #[test]
        fn test_close_wizard_keeps_search_input() {
            let mut state = AppState {
                search_input: "John".to_string(),
                ..Default::default()
            };
            state.open_wizard(shareholder());
            state.close_wizard();

            assert_eq!(state.current_view, View::Search);
            assert!(state.wizard.is_none());
            assert_eq!(state.search_input, "John");
        }

        #[test]
        fn test_reopening_same_shareholder_starts_new_session() {
            let mut state = AppState::default();
            state.open_wizard(shareholder());
            let first = state.session;

            state.close_wizard();
            assert_ne!(state.session, first);
            state.open_wizard(shareholder());
            assert_ne!(state.session, first);

            let before_reset = state.session;
            state.reset_session();
            assert_ne!(state.session, before_reset);
        }
    }

    mod fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_field_focus_wraps() {
            let mut state = state_on(WizardStep::BrokerAndChn);
            assert_eq!(state.active_field_id(), Some(FieldId::Stockbroker));
            state.next_form_field();
            assert_eq!(state.active_field_id(), Some(FieldId::Chn));
            state.next_form_field();
            assert_eq!(state.active_field_id(), Some(FieldId::Stockbroker));
            state.prev_form_field();
            assert_eq!(state.active_field_id(), Some(FieldId::Chn));
        }

        #[test]
        fn test_typing_edits_text_field() {
            let mut state = state_on(WizardStep::BrokerAndChn);
            state.next_form_field();
            state.form_input_char('9');
            assert_eq!(state.wizard.as_ref().unwrap().form().chn, "C19");
            state.form_backspace();
            state.form_backspace();
            assert_eq!(state.wizard.as_ref().unwrap().form().chn, "C");
        }

        #[test]
        fn test_numeric_field_ignores_letters() {
            let mut state = state_on(WizardStep::ActionDetails);
            let wizard = state.wizard.as_mut().unwrap();
            wizard.update(FormUpdate::Toggle(FieldId::ApplyAdditional));
            state.active_field = 2;
            assert_eq!(state.active_field_id(), Some(FieldId::AdditionalShares));

            for c in "1x0a0".chars() {
                state.form_input_char(c);
            }
            let form = state.wizard.as_ref().unwrap().form();
            assert_eq!(form.text(FieldId::AdditionalShares), Some("100"));
            assert_eq!(form.text(FieldId::PaymentAmount), Some("1700.00"));
        }

        #[test]
        fn test_space_toggles_checkbox_only() {
            let mut state = state_on(WizardStep::Instructions);
            assert!(state.toggle_active_field());
            assert!(!state.wizard.as_ref().unwrap().form().instructions_read);

            let mut state = state_on(WizardStep::BrokerAndChn);
            assert!(!state.toggle_active_field());
        }

        #[test]
        fn test_cycle_action_type() {
            let mut state = state_on(WizardStep::ActionChoice);
            state.cycle_choice(true);
            assert_eq!(
                state.wizard.as_ref().unwrap().form().action_type(),
                Some(ActionType::FullAcceptance)
            );
            state.cycle_choice(true);
            assert_eq!(
                state.wizard.as_ref().unwrap().form().action_type(),
                Some(ActionType::RenunciationPartial)
            );
            state.cycle_choice(false);
            assert_eq!(
                state.wizard.as_ref().unwrap().form().action_type(),
                Some(ActionType::FullAcceptance)
            );
        }
    }

    mod broker_picker {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_filter_and_select() {
            let mut state = state_on(WizardStep::BrokerAndChn);
            for c in "cord".chars() {
                state.form_input_char(c);
            }
            assert_eq!(state.filtered_brokers().len(), 1);

            let name = state.select_highlighted_broker();
            assert_eq!(name.as_deref(), Some("Cordros Capital"));
            assert_eq!(
                state.wizard.as_ref().unwrap().form().stockbroker.as_deref(),
                Some("2")
            );
            assert!(state.broker_filter.is_empty());
        }

        #[test]
        fn test_no_match_selects_nothing() {
            let mut state = state_on(WizardStep::BrokerAndChn);
            state.broker_filter = "zzz".to_string();
            assert!(state.filtered_brokers().is_empty());
            assert_eq!(state.select_highlighted_broker(), None);
        }

        #[test]
        fn test_broker_highlight_clamps() {
            let mut state = state_on(WizardStep::BrokerAndChn);
            state.move_broker_down();
            state.move_broker_down();
            assert_eq!(state.broker_index, 1);
            state.move_broker_up();
            state.move_broker_up();
            assert_eq!(state.broker_index, 0);
        }
    }

    mod signatures {
        use super::*;
        use pretty_assertions::assert_eq;

        fn png() -> Attachment {
            Attachment {
                file_name: "s.png".to_string(),
                mime_type: "image/png".to_string(),
                bytes: vec![1],
            }
        }

        #[test]
        fn test_typed_path_accumulates() {
            let mut state = state_on(WizardStep::SignatureAndReceipt);
            state.active_field = 1;
            for c in "/tmp/r.png".chars() {
                state.form_input_char(c);
            }
            state.form_backspace();
            assert_eq!(state.pending_path(FieldId::Receipt), "/tmp/r.pn");
            state.clear_pending_path(FieldId::Receipt);
            assert_eq!(state.pending_path(FieldId::Receipt), "");
        }

        #[test]
        fn test_slot_management_needs_joint_mode() {
            let mut state = state_on(WizardStep::SignatureAndReceipt);
            assert!(!state.add_signature_slot());

            state.cycle_choice(true);
            assert!(state.add_signature_slot());
            let form = state.wizard.as_ref().unwrap().form();
            assert_eq!(form.signatures.slots.len(), 3);
        }

        #[test]
        fn test_remove_focused_slot() {
            let mut state = state_on(WizardStep::SignatureAndReceipt);
            state.cycle_choice(true);
            let wizard = state.wizard.as_mut().unwrap();
            wizard.update(FormUpdate::Attach(AttachmentSlot::Signature(0), png()));
            wizard.update(FormUpdate::Attach(AttachmentSlot::Signature(1), png()));

            // SignatureType, Receipt, Signature(0), Signature(1)
            state.active_field = 3;
            assert!(state.remove_focused_signature_slot());

            let form = state.wizard.as_ref().unwrap().form();
            assert_eq!(form.signatures.slots.len(), 1);
            assert_eq!(state.active_field, 3.min(state.step_fields().len() - 1));
        }

        #[test]
        fn test_remove_padding_slot_reports_nothing_removed() {
            let mut state = state_on(WizardStep::SignatureAndReceipt);
            state.cycle_choice(true);
            state.wizard.as_mut().unwrap().update(FormUpdate::RemoveSignatureSlot(1));
            let form = state.wizard.as_ref().unwrap().form();
            assert_eq!(form.signatures.slots.len(), 1);
            assert_eq!(form.signatures.visible_slots(), 2);

            // Signature(1) is rendered but has no backing slot
            state.active_field = 3;
            assert_eq!(state.active_field_id(), Some(FieldId::Signature(1)));
            assert!(!state.remove_focused_signature_slot());
            let form = state.wizard.as_ref().unwrap().form();
            assert_eq!(form.signatures.slots.len(), 1);
        }
    }
}
