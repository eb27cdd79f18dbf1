// SSBG Dashboard - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod pages;
pub mod query;
pub mod record;
pub mod states;
pub mod store;
pub mod validation;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use pages::{
    Component, ComponentView, Control, FilterParams, NationalFilters, PageDefaults, PageView,
    ParamError, StateFilters,
};
pub use query::{CategoryBreakdown, RecordSet, SeriesPoint, StateSummary, Totals};
pub use record::{GrantRecord, Metric, NumericField, COLUMNS};
pub use store::{DataStore, FilterOptions, LoadOptions};
pub use validation::{InvariantRule, ValidationIssue, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
