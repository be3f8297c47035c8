//! Form domain layer
//!
//! `field` names every editable input; `rights_form` holds the record the
//! wizard edits through [`FormUpdate`].

mod field;
mod rights_form;

pub use field::{FieldId, FieldKind};
pub use rights_form::{
    ActionDetails, ActionType, CorporateDetails, DividendBank, FormUpdate, FullAcceptance,
    PaymentDetails, PersonalDetails, Prefill, RenunciationPartial, RightsForm, SignatureMode,
    SignatureSet,
};
