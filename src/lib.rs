// Bike Sharing Dashboard - Core Library
// Exposes loading, filtering and chart models for the TUI, the API server and tests

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod logging;
pub mod report;

// Re-export commonly used types
pub use charts::{
    default_renderers, Bar, BoxStats, Chart, ChartGroup, ChartKind, ChartRenderer,
    HistogramBin, Point,
};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardView, GroupOutcome};
pub use data::{load_csv, Dataset, RentalRecord, Season};
pub use error::{ConfigError, LoadError, RenderError};
pub use filter::{parse_date_param, DateRange, FilteredView, RentalSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
