//! Infrastructure layer: backend access and configuration.
//!
//! Everything that touches the network or the process environment lives here.
//! The report pipeline itself stays pure in `posreports-reports`.

pub mod config;
pub mod fetcher;
pub mod source;

pub use config::{BackendConfig, ConfigError};
pub use fetcher::{fetch_report_data, fetch_shops};
pub use source::{InMemoryReportSource, PostgrestSource, ReportSource, SourceError};
