//! The rights-issue participation form record
//!
//! `RightsForm` is owned by the wizard and only changes through
//! [`RightsForm::apply`], which consumes the record and returns the next one.
//! Derived payment values are recomputed after every update.

use super::field::FieldId;
use crate::state::attachment::{Attachment, AttachmentSlot};
use crate::state::payment;
use crate::state::records::Shareholder;

/// What the shareholder wants to do with the provisional allotment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    FullAcceptance,
    RenunciationPartial,
}

impl ActionType {
    pub const ALL: [ActionType; 2] = [Self::FullAcceptance, Self::RenunciationPartial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullAcceptance => "full_acceptance",
            Self::RenunciationPartial => "renunciation_partial",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullAcceptance => "FULL ACCEPTANCE / REQUEST FOR ADDITIONAL ORDINARY SHARES",
            Self::RenunciationPartial => "RENUNCIATION OR PARTIAL ACCEPTANCE",
        }
    }
}

/// Payment evidence captured for either action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub bank_name: String,
    pub cheque_number: String,
    pub branch: String,
}

/// Box A: full acceptance, optionally with additional shares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullAcceptance {
    pub accept_full: bool,
    pub apply_additional: bool,
    pub additional_shares: String,
    /// Derived: `additional_shares × unit price`, empty when not applying
    pub additional_amount: String,
    pub accept_smaller_allotment: bool,
    /// Derived: amount due plus additional amount
    pub payment_amount: String,
    pub payment: PaymentDetails,
}

/// Box B: renunciation or partial acceptance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenunciationPartial {
    pub shares_accepted: String,
    pub amount_payable: String,
    pub shares_renounced: String,
    pub accept_partial: bool,
    pub renounce_rights: bool,
    pub trade_rights: bool,
    pub payment: PaymentDetails,
}

/// Action-specific fields; only the selected variant exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDetails {
    FullAcceptance(FullAcceptance),
    RenunciationPartial(RenunciationPartial),
}

impl ActionDetails {
    pub fn new(action_type: ActionType) -> Self {
        match action_type {
            ActionType::FullAcceptance => Self::FullAcceptance(FullAcceptance::default()),
            ActionType::RenunciationPartial => {
                Self::RenunciationPartial(RenunciationPartial::default())
            }
        }
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Self::FullAcceptance(_) => ActionType::FullAcceptance,
            Self::RenunciationPartial(_) => ActionType::RenunciationPartial,
        }
    }

    fn payment(&self) -> &PaymentDetails {
        match self {
            Self::FullAcceptance(f) => &f.payment,
            Self::RenunciationPartial(r) => &r.payment,
        }
    }

    fn payment_mut(&mut self) -> &mut PaymentDetails {
        match self {
            Self::FullAcceptance(f) => &mut f.payment,
            Self::RenunciationPartial(r) => &mut r.payment,
        }
    }
}

/// Single or joint signatories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMode {
    #[default]
    Single,
    Joint,
}

impl SignatureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Joint => "joint",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Joint => "Joint",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Single => Self::Joint,
            Self::Joint => Self::Single,
        }
    }
}

/// Signature mode plus its positional slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    pub mode: SignatureMode,
    pub slots: Vec<Option<Attachment>>,
}

impl SignatureSet {
    /// Minimum number of slots shown for joint signatories
    pub const JOINT_MIN_SLOTS: usize = 2;

    /// Number of slots holding a file
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Slots that take part in submission: index 0 only for single mode
    pub fn submitted(&self) -> Vec<(usize, &Attachment)> {
        let limit = match self.mode {
            SignatureMode::Single => 1,
            SignatureMode::Joint => self.slots.len(),
        };
        self.slots
            .iter()
            .take(limit)
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|a| (i, a)))
            .collect()
    }

    /// Slot indices shown for the current mode
    pub fn visible_slots(&self) -> usize {
        match self.mode {
            SignatureMode::Single => 1,
            SignatureMode::Joint => self.slots.len().max(Self::JOINT_MIN_SLOTS),
        }
    }
}

/// Prefilled shareholder facts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub reg_account_number: String,
    pub name: String,
    pub holdings: String,
    pub rights_issue: String,
    pub holdings_after: String,
    pub amount_due: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDetails {
    pub contact_name: String,
    pub next_of_kin: String,
    pub daytime_phone: String,
    pub mobile_phone: String,
    pub email: String,
}

/// Bank account for e-dividend mandates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DividendBank {
    pub bank_name_edividend: String,
    pub bank_branch_edividend: String,
    pub account_number: String,
    pub bvn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorporateDetails {
    pub signatory_names: String,
    pub designations: String,
}

/// The whole participation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RightsForm {
    pub prefill: Prefill,
    pub instructions_read: bool,
    /// Selected stockbroker id
    pub stockbroker: Option<String>,
    pub chn: String,
    pub action: Option<ActionDetails>,
    pub personal: PersonalDetails,
    pub bank: DividendBank,
    pub corporate: CorporateDetails,
    pub signatures: SignatureSet,
    pub receipt: Option<Attachment>,
}

/// The declared ways a form may change
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    SetText(FieldId, String),
    Toggle(FieldId),
    SelectBroker(String),
    SetActionType(ActionType),
    SetSignatureMode(SignatureMode),
    Attach(AttachmentSlot, Attachment),
    AddSignatureSlot,
    RemoveSignatureSlot(usize),
}

impl RightsForm {
    /// Start a form prefilled from a shareholder record
    pub fn prefilled(shareholder: &Shareholder) -> Self {
        let form = Self {
            prefill: Prefill {
                reg_account_number: shareholder.reg_account_number.clone(),
                name: shareholder.name.clone(),
                holdings: shareholder.holdings.clone(),
                rights_issue: shareholder.rights_issue.clone(),
                holdings_after: shareholder.holdings_after.clone(),
                amount_due: shareholder.amount_due.clone(),
            },
            personal: PersonalDetails {
                contact_name: shareholder.name.clone(),
                ..Default::default()
            },
            ..Default::default()
        };
        form.recompute()
    }

    pub fn action_type(&self) -> Option<ActionType> {
        self.action.as_ref().map(ActionDetails::action_type)
    }

    pub fn full_acceptance(&self) -> Option<&FullAcceptance> {
        match &self.action {
            Some(ActionDetails::FullAcceptance(f)) => Some(f),
            _ => None,
        }
    }

    pub fn renunciation(&self) -> Option<&RenunciationPartial> {
        match &self.action {
            Some(ActionDetails::RenunciationPartial(r)) => Some(r),
            _ => None,
        }
    }

    /// Total payable for display: amount due plus any additional amount
    pub fn total_payable(&self) -> rust_decimal::Decimal {
        let additional = self
            .full_acceptance()
            .map(|f| f.additional_amount.as_str())
            .unwrap_or("");
        payment::total_payable(&self.prefill.amount_due, additional)
    }

    /// Apply one update and return the resulting form
    pub fn apply(mut self, update: FormUpdate) -> Self {
        match update {
            FormUpdate::SetText(field, value) => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = value;
                }
            }
            FormUpdate::Toggle(field) => {
                if let Some(flag) = self.flag_mut(field) {
                    *flag = !*flag;
                }
            }
            FormUpdate::SelectBroker(id) => self.stockbroker = Some(id),
            FormUpdate::SetActionType(action_type) => {
                if self.action_type() != Some(action_type) {
                    self.action = Some(ActionDetails::new(action_type));
                }
            }
            FormUpdate::SetSignatureMode(mode) => {
                self.signatures.mode = mode;
                if mode == SignatureMode::Joint {
                    while self.signatures.slots.len() < SignatureSet::JOINT_MIN_SLOTS {
                        self.signatures.slots.push(None);
                    }
                }
            }
            FormUpdate::Attach(AttachmentSlot::Receipt, attachment) => {
                self.receipt = Some(attachment);
            }
            FormUpdate::Attach(AttachmentSlot::Signature(index), attachment) => {
                if self.signatures.slots.len() <= index {
                    self.signatures.slots.resize(index + 1, None);
                }
                self.signatures.slots[index] = Some(attachment);
            }
            FormUpdate::AddSignatureSlot => self.signatures.slots.push(None),
            FormUpdate::RemoveSignatureSlot(index) => {
                if index < self.signatures.slots.len() {
                    self.signatures.slots.remove(index);
                }
            }
        }
        self.recompute()
    }

    /// Recompute derived values from their inputs
    fn recompute(mut self) -> Self {
        let amount_due = self.prefill.amount_due.clone();
        if let Some(ActionDetails::FullAcceptance(full)) = &mut self.action {
            full.additional_amount =
                payment::additional_amount(full.apply_additional, &full.additional_shares)
                    .map(payment::format_amount)
                    .unwrap_or_default();
            full.payment_amount = payment::format_amount(payment::total_payable(
                &amount_due,
                &full.additional_amount,
            ));
        }
        self
    }

    /// Current text of a text-like field
    pub fn text(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::Chn => &self.chn,
            FieldId::ContactName => &self.personal.contact_name,
            FieldId::NextOfKin => &self.personal.next_of_kin,
            FieldId::DaytimePhone => &self.personal.daytime_phone,
            FieldId::MobilePhone => &self.personal.mobile_phone,
            FieldId::Email => &self.personal.email,
            FieldId::BankNameEdividend => &self.bank.bank_name_edividend,
            FieldId::BankBranchEdividend => &self.bank.bank_branch_edividend,
            FieldId::AccountNumber => &self.bank.account_number,
            FieldId::Bvn => &self.bank.bvn,
            FieldId::CorporateSignatoryNames => &self.corporate.signatory_names,
            FieldId::CorporateDesignations => &self.corporate.designations,
            FieldId::BankName => &self.action.as_ref()?.payment().bank_name,
            FieldId::ChequeNumber => &self.action.as_ref()?.payment().cheque_number,
            FieldId::Branch => &self.action.as_ref()?.payment().branch,
            FieldId::AdditionalShares => &self.full_acceptance()?.additional_shares,
            FieldId::AdditionalAmount => &self.full_acceptance()?.additional_amount,
            FieldId::PaymentAmount => &self.full_acceptance()?.payment_amount,
            FieldId::SharesAccepted => &self.renunciation()?.shares_accepted,
            FieldId::AmountPayable => &self.renunciation()?.amount_payable,
            FieldId::SharesRenounced => &self.renunciation()?.shares_renounced,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Current state of a checkbox field
    pub fn flag(&self, field: FieldId) -> Option<bool> {
        match field {
            FieldId::InstructionsRead => Some(self.instructions_read),
            FieldId::AcceptFull => self.full_acceptance().map(|f| f.accept_full),
            FieldId::ApplyAdditional => self.full_acceptance().map(|f| f.apply_additional),
            FieldId::AcceptSmallerAllotment => {
                self.full_acceptance().map(|f| f.accept_smaller_allotment)
            }
            FieldId::AcceptPartial => self.renunciation().map(|r| r.accept_partial),
            FieldId::RenounceRights => self.renunciation().map(|r| r.renounce_rights),
            FieldId::TradeRights => self.renunciation().map(|r| r.trade_rights),
            _ => None,
        }
    }

    /// Editable text slot; derived fields are not writable
    fn text_slot_mut(&mut self, field: FieldId) -> Option<&mut String> {
        let slot = match field {
            FieldId::Chn => &mut self.chn,
            FieldId::ContactName => &mut self.personal.contact_name,
            FieldId::NextOfKin => &mut self.personal.next_of_kin,
            FieldId::DaytimePhone => &mut self.personal.daytime_phone,
            FieldId::MobilePhone => &mut self.personal.mobile_phone,
            FieldId::Email => &mut self.personal.email,
            FieldId::BankNameEdividend => &mut self.bank.bank_name_edividend,
            FieldId::BankBranchEdividend => &mut self.bank.bank_branch_edividend,
            FieldId::AccountNumber => &mut self.bank.account_number,
            FieldId::Bvn => &mut self.bank.bvn,
            FieldId::CorporateSignatoryNames => &mut self.corporate.signatory_names,
            FieldId::CorporateDesignations => &mut self.corporate.designations,
            FieldId::BankName => &mut self.action.as_mut()?.payment_mut().bank_name,
            FieldId::ChequeNumber => &mut self.action.as_mut()?.payment_mut().cheque_number,
            FieldId::Branch => &mut self.action.as_mut()?.payment_mut().branch,
            FieldId::AdditionalShares => match self.action.as_mut()? {
                ActionDetails::FullAcceptance(f) => &mut f.additional_shares,
                _ => return None,
            },
            FieldId::SharesAccepted
            | FieldId::AmountPayable
            | FieldId::SharesRenounced => match self.action.as_mut()? {
                ActionDetails::RenunciationPartial(r) => match field {
                    FieldId::SharesAccepted => &mut r.shares_accepted,
                    FieldId::AmountPayable => &mut r.amount_payable,
                    _ => &mut r.shares_renounced,
                },
                _ => return None,
            },
            _ => return None,
        };
        Some(slot)
    }

    fn flag_mut(&mut self, field: FieldId) -> Option<&mut bool> {
        if field == FieldId::InstructionsRead {
            return Some(&mut self.instructions_read);
        }
        match (self.action.as_mut()?, field) {
            (ActionDetails::FullAcceptance(f), FieldId::AcceptFull) => Some(&mut f.accept_full),
            (ActionDetails::FullAcceptance(f), FieldId::ApplyAdditional) => {
                Some(&mut f.apply_additional)
            }
            (ActionDetails::FullAcceptance(f), FieldId::AcceptSmallerAllotment) => {
                Some(&mut f.accept_smaller_allotment)
            }
            (ActionDetails::RenunciationPartial(r), FieldId::AcceptPartial) => {
                Some(&mut r.accept_partial)
            }
            (ActionDetails::RenunciationPartial(r), FieldId::RenounceRights) => {
                Some(&mut r.renounce_rights)
            }
            (ActionDetails::RenunciationPartial(r), FieldId::TradeRights) => {
                Some(&mut r.trade_rights)
            }
            _ => None,
        }
    }
}
