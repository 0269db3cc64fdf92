#![warn(clippy::uninlined_format_args)]

pub mod json_source;
pub mod optimizer;
pub mod settings;

pub use json_source::{JsonLedgerFile, parse_ledger};
pub use optimizer::GreedySettlementOptimizer;
pub use settings::{Settings, SettingsError};
