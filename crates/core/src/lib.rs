//! Climate API Core Library
//!
//! Pieces of the service that do no I/O against the data source:
//! - Filter construction from route inputs
//! - Configuration loading (XDG-compliant)

mod config;
pub mod query;

pub use config::{find_config_file, load_config, parse_config, ConfigSource};
pub use query::{
    build_date_range_filter, build_station_filter, date_range, parse_date, trailing_year,
    Condition, Predicate, QueryError, TRAILING_WINDOW_DAYS,
};

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Station with the most observations in the Hawaii data set
pub const DEFAULT_TOBS_STATION: &str = "USC00519281";
