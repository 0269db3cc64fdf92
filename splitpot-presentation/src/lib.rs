#![warn(clippy::uninlined_format_args)]

pub mod ledger_presenter;
pub mod text_table;

pub use ledger_presenter::{LedgerPresenter, LedgerView};
