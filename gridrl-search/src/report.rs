//! Sensitivity reports of single hyperparameters.
mod base;
mod bootstrap;
mod config;
mod state;
pub use base::ReportGenerator;
pub use bootstrap::{bootstrap, ConfidenceInterval};
pub use config::ReportGeneratorConfig;
pub use state::{Report, ReportPoint, ReportState};
