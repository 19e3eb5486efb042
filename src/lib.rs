pub mod catalog;
pub mod config;
pub mod field;
pub mod projection;
pub mod registry;
pub mod report;
pub mod session;
pub mod view;
pub mod weather;
pub mod web;

pub use config::Config;
pub use field::{Field, FieldDraft};
pub use projection::{adjusted_yield, aggregate, baseline_yield, YieldTotals};
pub use registry::FieldRegistry;
pub use session::Session;
