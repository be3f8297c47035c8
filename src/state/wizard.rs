//! Eight-step participation wizard

use super::forms::{ActionDetails, FieldId, FormUpdate, RightsForm, SignatureMode};
use super::records::{Shareholder, Stockbroker};

/// A wizard stage; numbered 1 through 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    ShareholderInfo,
    Instructions,
    BrokerAndChn,
    ActionChoice,
    ActionDetails,
    PersonalAndBank,
    SignatureAndReceipt,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 8] = [
        Self::ShareholderInfo,
        Self::Instructions,
        Self::BrokerAndChn,
        Self::ActionChoice,
        Self::ActionDetails,
        Self::PersonalAndBank,
        Self::SignatureAndReceipt,
        Self::Summary,
    ];

    pub const FIRST: WizardStep = Self::ShareholderInfo;
    pub const LAST: WizardStep = Self::Summary;

    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn from_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Following step, saturating at the last
    pub fn next(&self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(Self::LAST)
    }

    /// Preceding step, saturating at the first
    pub fn previous(&self) -> Self {
        Self::from_number(self.number() - 1).unwrap_or(Self::FIRST)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ShareholderInfo => "Shareholder Information",
            Self::Instructions => "Instructions",
            Self::BrokerAndChn => "Stockbroker & CHN",
            Self::ActionChoice => "Action Choice",
            Self::ActionDetails => "Action Details",
            Self::PersonalAndBank => "Personal & Bank Info",
            Self::SignatureAndReceipt => "Signature & Receipt",
            Self::Summary => "Summary & Submit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ShareholderInfo => "Review your details",
            Self::Instructions => "Read and accept instructions",
            Self::BrokerAndChn => "Enter stockbroker and CHN details",
            Self::ActionChoice => "Select your action type",
            Self::ActionDetails => "Complete your selected action",
            Self::PersonalAndBank => "Contact and banking information",
            Self::SignatureAndReceipt => "Upload documents",
            Self::Summary => "Review and final submission",
        }
    }

    /// Fields editable on this step for the given form
    pub fn fields(&self, form: &RightsForm) -> Vec<FieldId> {
        match self {
            Self::ShareholderInfo | Self::Summary => Vec::new(),
            Self::Instructions => vec![FieldId::InstructionsRead],
            Self::BrokerAndChn => vec![FieldId::Stockbroker, FieldId::Chn],
            Self::ActionChoice => vec![FieldId::ActionType],
            Self::ActionDetails => match &form.action {
                None => Vec::new(),
                Some(ActionDetails::FullAcceptance(_)) => vec![
                    FieldId::AcceptFull,
                    FieldId::ApplyAdditional,
                    FieldId::AdditionalShares,
                    FieldId::AdditionalAmount,
                    FieldId::AcceptSmallerAllotment,
                    FieldId::PaymentAmount,
                    FieldId::BankName,
                    FieldId::ChequeNumber,
                    FieldId::Branch,
                ],
                Some(ActionDetails::RenunciationPartial(_)) => vec![
                    FieldId::SharesAccepted,
                    FieldId::AmountPayable,
                    FieldId::SharesRenounced,
                    FieldId::AcceptPartial,
                    FieldId::BankName,
                    FieldId::ChequeNumber,
                    FieldId::Branch,
                    FieldId::RenounceRights,
                    FieldId::TradeRights,
                ],
            },
            Self::PersonalAndBank => vec![
                FieldId::ContactName,
                FieldId::NextOfKin,
                FieldId::DaytimePhone,
                FieldId::MobilePhone,
                FieldId::Email,
                FieldId::BankNameEdividend,
                FieldId::BankBranchEdividend,
                FieldId::AccountNumber,
                FieldId::Bvn,
                FieldId::CorporateSignatoryNames,
                FieldId::CorporateDesignations,
            ],
            Self::SignatureAndReceipt => {
                let mut fields = vec![FieldId::SignatureType, FieldId::Receipt];
                fields.extend((0..form.signatures.visible_slots()).map(FieldId::Signature));
                fields
            }
        }
    }

    /// Whether the form satisfies this step's exit requirements
    pub fn validate(&self, form: &RightsForm) -> bool {
        STEP_VALIDATORS[*self as usize](form)
    }
}

type StepValidator = fn(&RightsForm) -> bool;

/// Exit predicate per step, indexed by `step.number() - 1`
const STEP_VALIDATORS: [StepValidator; 8] = [
    review_only,
    validate_instructions,
    validate_broker_and_chn,
    validate_action_choice,
    validate_action_details,
    validate_personal_and_bank,
    validate_signature_and_receipt,
    review_only,
];

fn review_only(_form: &RightsForm) -> bool {
    true
}

fn validate_instructions(form: &RightsForm) -> bool {
    form.instructions_read
}

fn validate_action_choice(form: &RightsForm) -> bool {
    form.action.is_some()
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn validate_broker_and_chn(form: &RightsForm) -> bool {
    form.stockbroker.as_deref().is_some_and(filled) && filled(&form.chn)
}

fn validate_action_details(form: &RightsForm) -> bool {
    match &form.action {
        None => false,
        Some(ActionDetails::FullAcceptance(full)) => {
            if !full.accept_full {
                return false;
            }
            if full.apply_additional {
                return filled(&full.additional_shares) && filled(&full.payment.bank_name);
            }
            true
        }
        Some(ActionDetails::RenunciationPartial(r)) => {
            filled(&r.shares_accepted)
                && filled(&r.amount_payable)
                && filled(&r.shares_renounced)
                && (r.accept_partial || r.renounce_rights)
        }
    }
}

fn validate_personal_and_bank(form: &RightsForm) -> bool {
    let p = &form.personal;
    let b = &form.bank;
    [
        &p.contact_name,
        &p.next_of_kin,
        &p.daytime_phone,
        &p.mobile_phone,
        &p.email,
        &b.bank_name_edividend,
        &b.account_number,
        &b.bvn,
    ]
    .iter()
    .all(|v| filled(v))
}

fn validate_signature_and_receipt(form: &RightsForm) -> bool {
    if form.receipt.is_none() {
        return false;
    }
    let slots = &form.signatures.slots;
    match form.signatures.mode {
        SignatureMode::Single => slots.first().is_some_and(Option::is_some),
        SignatureMode::Joint => slots.len() >= 2 && slots.iter().all(Option::is_some),
    }
}

/// Outcome of a forward step attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(WizardStep),
    /// Already on the last step
    AtEnd,
    Blocked,
}

/// Owns the step index, the form record and the wizard's reference data
#[derive(Debug, Clone)]
pub struct Wizard {
    shareholder: Shareholder,
    stockbrokers: Vec<Stockbroker>,
    form: RightsForm,
    step: WizardStep,
}

impl Wizard {
    pub fn new(shareholder: Shareholder) -> Self {
        let form = RightsForm::prefilled(&shareholder);
        Self {
            shareholder,
            stockbrokers: Vec::new(),
            form,
            step: WizardStep::FIRST,
        }
    }

    pub fn shareholder(&self) -> &Shareholder {
        &self.shareholder
    }

    pub fn form(&self) -> &RightsForm {
        &self.form
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn stockbrokers(&self) -> &[Stockbroker] {
        &self.stockbrokers
    }

    pub fn set_stockbrokers(&mut self, stockbrokers: Vec<Stockbroker>) {
        self.stockbrokers = stockbrokers;
    }

    /// Name of the currently selected broker, if any
    pub fn selected_broker_name(&self) -> Option<&str> {
        let id = self.form.stockbroker.as_deref()?;
        self.stockbrokers
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
    }

    pub fn validate(&self, step: WizardStep) -> bool {
        step.validate(&self.form)
    }

    /// Move forward if the current step validates
    pub fn next(&mut self) -> Advance {
        if !self.validate(self.step) {
            return Advance::Blocked;
        }
        if self.step == WizardStep::LAST {
            return Advance::AtEnd;
        }
        self.step = self.step.next();
        Advance::Moved(self.step)
    }

    /// Move back; never validated
    pub fn previous(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    /// Replace the form with the result of one update
    pub fn update(&mut self, update: FormUpdate) {
        self.form = std::mem::take(&mut self.form).apply(update);
    }
}

/// Case-insensitive substring filter for the broker picker
pub fn filter_stockbrokers<'a>(brokers: &'a [Stockbroker], term: &str) -> Vec<&'a Stockbroker> {
    let needle = term.trim().to_lowercase();
    brokers
        .iter()
        .filter(|b| needle.is_empty() || b.name.to_lowercase().contains(&needle))
        .collect()
}
