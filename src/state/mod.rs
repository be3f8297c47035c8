//! Application state module
//!
//! Everything here is pure: no terminal access and no network I/O beyond
//! reading attachment files from disk.

mod app_state;
pub mod attachment;
pub mod forms;
pub mod notice;
pub mod payment;
pub mod records;
pub mod search;
mod splash_state;
pub mod submission;
pub mod wizard;

pub use app_state::*;
pub use notice::{Notice, NoticeKind};
pub use records::{ResourceLink, Shareholder, Stockbroker, SubmittedForm};
pub use splash_state::*;
pub use wizard::{Advance, Wizard, WizardStep};
