//! Packaging the form for submission and preview
//!
//! Only the active action variant contributes fields, so values from a
//! previously selected action can never leak into a payload.

use super::attachment::Attachment;
use super::forms::{ActionDetails, FieldId, RightsForm};
use super::payment;
use serde_json::{Map, Value};

/// Fields the backend stores as numbers
pub const NUMERIC_FIELDS: &[&str] = &[
    "shareholder_id",
    "stockbroker",
    "additional_shares",
    "additional_amount",
    "payment_amount",
    "shares_accepted",
    "amount_payable",
    "shares_renounced",
    "holdings",
    "rights_issue",
    "holdings_after",
    "amount_due",
];

/// A form value before coercion
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawValue {
    Text(String),
    Flag(bool),
}

/// One binary part of the multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub attachment: Attachment,
}

/// Multipart body: coerced text parts followed by files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl SubmissionPayload {
    /// Build the submission payload for a shareholder's form.
    ///
    /// Numeric fields are normalised; empty ones are dropped as null.
    pub fn build(form: &RightsForm, shareholder_id: &str) -> Self {
        let mut fields = Vec::new();
        for (name, value) in raw_fields(form, shareholder_id) {
            let text = match value {
                RawValue::Flag(flag) => flag.to_string(),
                RawValue::Text(text) if NUMERIC_FIELDS.contains(&name.as_str()) => {
                    match coerce_number(&name, &text) {
                        Some(number) => number,
                        None => continue,
                    }
                }
                RawValue::Text(text) => text,
            };
            fields.push((name, text));
        }

        let mut files = Vec::new();
        if let Some(receipt) = &form.receipt {
            files.push(FilePart {
                name: FieldId::Receipt.wire_name(),
                attachment: receipt.clone(),
            });
        }
        for (index, signature) in form.signatures.submitted() {
            files.push(FilePart {
                name: FieldId::Signature(index).wire_name(),
                attachment: signature.clone(),
            });
        }

        tracing::debug!(
            fields = fields.len(),
            files = files.len(),
            "packaged rights submission"
        );

        Self { fields, files }
    }

    /// Value of a text part, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }
}

/// JSON body for the preview endpoint: current values, uncoerced, no files
pub fn preview_body(form: &RightsForm, shareholder_id: &str) -> Value {
    let mut body = Map::new();
    for (name, value) in raw_fields(form, shareholder_id) {
        let json = match value {
            RawValue::Text(text) => Value::String(text),
            RawValue::Flag(flag) => Value::Bool(flag),
        };
        body.insert(name, json);
    }
    Value::Object(body)
}

/// Empty means null; unparseable input is dropped with a warning
fn coerce_number(name: &str, raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    match payment::parse_amount(raw) {
        Some(number) => Some(number.normalize().to_string()),
        None => {
            tracing::warn!(field = name, value = raw, "dropping non-numeric value");
            None
        }
    }
}

fn raw_fields(form: &RightsForm, shareholder_id: &str) -> Vec<(String, RawValue)> {
    let text = |s: &str| RawValue::Text(s.to_string());
    let p = &form.prefill;

    let mut out: Vec<(&str, RawValue)> = vec![
        ("reg_account_number", text(&p.reg_account_number)),
        ("name", text(&p.name)),
        ("holdings", text(&p.holdings)),
        ("rights_issue", text(&p.rights_issue)),
        ("holdings_after", text(&p.holdings_after)),
        ("amount_due", text(&p.amount_due)),
        ("instructions_read", RawValue::Flag(form.instructions_read)),
        (
            "stockbroker",
            text(form.stockbroker.as_deref().unwrap_or_default()),
        ),
        ("chn", text(&form.chn)),
        (
            "action_type",
            text(form.action_type().map(|a| a.as_str()).unwrap_or_default()),
        ),
    ];

    match &form.action {
        None => {}
        Some(ActionDetails::FullAcceptance(f)) => out.extend([
            ("accept_full", RawValue::Flag(f.accept_full)),
            ("apply_additional", RawValue::Flag(f.apply_additional)),
            ("additional_shares", text(&f.additional_shares)),
            ("additional_amount", text(&f.additional_amount)),
            (
                "accept_smaller_allotment",
                RawValue::Flag(f.accept_smaller_allotment),
            ),
            ("payment_amount", text(&f.payment_amount)),
            ("bank_name", text(&f.payment.bank_name)),
            ("cheque_number", text(&f.payment.cheque_number)),
            ("branch", text(&f.payment.branch)),
        ]),
        Some(ActionDetails::RenunciationPartial(r)) => out.extend([
            ("shares_accepted", text(&r.shares_accepted)),
            ("amount_payable", text(&r.amount_payable)),
            ("shares_renounced", text(&r.shares_renounced)),
            ("accept_partial", RawValue::Flag(r.accept_partial)),
            ("renounce_rights", RawValue::Flag(r.renounce_rights)),
            ("trade_rights", RawValue::Flag(r.trade_rights)),
            ("bank_name", text(&r.payment.bank_name)),
            ("cheque_number", text(&r.payment.cheque_number)),
            ("branch", text(&r.payment.branch)),
        ]),
    }

    let personal = &form.personal;
    let bank = &form.bank;
    out.extend([
        ("contact_name", text(&personal.contact_name)),
        ("next_of_kin", text(&personal.next_of_kin)),
        ("daytime_phone", text(&personal.daytime_phone)),
        ("mobile_phone", text(&personal.mobile_phone)),
        ("email", text(&personal.email)),
        ("bank_name_edividend", text(&bank.bank_name_edividend)),
        ("bank_branch_edividend", text(&bank.bank_branch_edividend)),
        ("account_number", text(&bank.account_number)),
        ("bvn", text(&bank.bvn)),
        (
            "corporate_signatory_names",
            text(&form.corporate.signatory_names),
        ),
        ("corporate_designations", text(&form.corporate.designations)),
        ("signature_type", text(form.signatures.mode.as_str())),
        ("shareholder_id", text(shareholder_id)),
    ]);

    out.into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
