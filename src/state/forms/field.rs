//! Field identities for the rights form

/// How a field is edited and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Text that must parse as a number on submission
    Numeric,
    /// Boolean toggled with Space
    Checkbox,
    /// Fixed set of options cycled with Left/Right
    Choice,
    /// Computed value, never edited directly
    ReadOnly,
    /// Path to a file admitted through the attachment gate
    File,
    /// Filterable stockbroker list
    BrokerPicker,
}

/// Every user-facing field in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    InstructionsRead,
    Stockbroker,
    Chn,
    ActionType,
    // Full acceptance
    AcceptFull,
    ApplyAdditional,
    AdditionalShares,
    AdditionalAmount,
    AcceptSmallerAllotment,
    PaymentAmount,
    // Renunciation / partial acceptance
    SharesAccepted,
    AmountPayable,
    SharesRenounced,
    AcceptPartial,
    RenounceRights,
    TradeRights,
    // Payment evidence (both actions)
    BankName,
    ChequeNumber,
    Branch,
    // Personal
    ContactName,
    NextOfKin,
    DaytimePhone,
    MobilePhone,
    Email,
    // E-dividend bank
    BankNameEdividend,
    BankBranchEdividend,
    AccountNumber,
    Bvn,
    // Corporate
    CorporateSignatoryNames,
    CorporateDesignations,
    // Documents
    SignatureType,
    Receipt,
    Signature(usize),
}

impl FieldId {
    /// Name used on the wire and in the multipart payload
    pub fn wire_name(&self) -> String {
        let name = match self {
            Self::InstructionsRead => "instructions_read",
            Self::Stockbroker => "stockbroker",
            Self::Chn => "chn",
            Self::ActionType => "action_type",
            Self::AcceptFull => "accept_full",
            Self::ApplyAdditional => "apply_additional",
            Self::AdditionalShares => "additional_shares",
            Self::AdditionalAmount => "additional_amount",
            Self::AcceptSmallerAllotment => "accept_smaller_allotment",
            Self::PaymentAmount => "payment_amount",
            Self::SharesAccepted => "shares_accepted",
            Self::AmountPayable => "amount_payable",
            Self::SharesRenounced => "shares_renounced",
            Self::AcceptPartial => "accept_partial",
            Self::RenounceRights => "renounce_rights",
            Self::TradeRights => "trade_rights",
            Self::BankName => "bank_name",
            Self::ChequeNumber => "cheque_number",
            Self::Branch => "branch",
            Self::ContactName => "contact_name",
            Self::NextOfKin => "next_of_kin",
            Self::DaytimePhone => "daytime_phone",
            Self::MobilePhone => "mobile_phone",
            Self::Email => "email",
            Self::BankNameEdividend => "bank_name_edividend",
            Self::BankBranchEdividend => "bank_branch_edividend",
            Self::AccountNumber => "account_number",
            Self::Bvn => "bvn",
            Self::CorporateSignatoryNames => "corporate_signatory_names",
            Self::CorporateDesignations => "corporate_designations",
            Self::SignatureType => "signature_type",
            Self::Receipt => "receipt",
            Self::Signature(index) => return format!("signature_{index}"),
        };
        name.to_string()
    }

    pub fn label(&self) -> String {
        let label = match self {
            Self::InstructionsRead => "I have read and understood the instructions",
            Self::Stockbroker => "Stockbroker",
            Self::Chn => "CHN (Clearing House Number)",
            Self::ActionType => "Action",
            Self::AcceptFull => "I accept in full the provisional allotment",
            Self::ApplyAdditional => "I apply for additional shares",
            Self::AdditionalShares => "Number of additional shares",
            Self::AdditionalAmount => "Additional amount payable",
            Self::AcceptSmallerAllotment => {
                "I agree to accept a smaller allotment of additional shares"
            }
            Self::PaymentAmount => "Total amount enclosed",
            Self::SharesAccepted => "Number of shares accepted",
            Self::AmountPayable => "Amount payable",
            Self::SharesRenounced => "Number of shares renounced",
            Self::AcceptPartial => "I accept the shares above (partial acceptance)",
            Self::RenounceRights => "I renounce my rights to the shares above",
            Self::TradeRights => "I wish to trade my rights on the floor of NGX",
            Self::BankName => "Bank name",
            Self::ChequeNumber => "Cheque / transfer reference",
            Self::Branch => "Bank branch",
            Self::ContactName => "Contact name",
            Self::NextOfKin => "Next of kin",
            Self::DaytimePhone => "Daytime phone",
            Self::MobilePhone => "Mobile phone",
            Self::Email => "Email",
            Self::BankNameEdividend => "Bank name (e-dividend)",
            Self::BankBranchEdividend => "Bank branch (e-dividend)",
            Self::AccountNumber => "Account number",
            Self::Bvn => "BVN",
            Self::CorporateSignatoryNames => "Authorised signatory names (corporate)",
            Self::CorporateDesignations => "Designations (corporate)",
            Self::SignatureType => "Signature type",
            Self::Receipt => "Payment receipt (JPG/PNG, max 5MB)",
            Self::Signature(index) => return format!("Signature {}", index + 1),
        };
        label.to_string()
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::InstructionsRead
            | Self::AcceptFull
            | Self::ApplyAdditional
            | Self::AcceptSmallerAllotment
            | Self::AcceptPartial
            | Self::RenounceRights
            | Self::TradeRights => FieldKind::Checkbox,
            Self::AdditionalShares
            | Self::SharesAccepted
            | Self::AmountPayable
            | Self::SharesRenounced => FieldKind::Numeric,
            Self::AdditionalAmount | Self::PaymentAmount => FieldKind::ReadOnly,
            Self::ActionType | Self::SignatureType => FieldKind::Choice,
            Self::Receipt | Self::Signature(_) => FieldKind::File,
            Self::Stockbroker => FieldKind::BrokerPicker,
            _ => FieldKind::Text,
        }
    }

    /// Whether the field takes typed characters
    pub fn accepts_text(&self) -> bool {
        matches!(
            self.kind(),
            FieldKind::Text | FieldKind::Numeric | FieldKind::File | FieldKind::BrokerPicker
        )
    }
}
