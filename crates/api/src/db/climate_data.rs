use async_trait::async_trait;
use climate_core::Predicate;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(#[from] sqlx::Error),
    #[error("Stored date '{0}' is not a valid YYYY-MM-DD date")]
    StoredDate(String),
}

/// Read access to the `measurement` and `station` tables.
///
/// Every row-returning method yields rows in table order.
#[async_trait]
pub trait ClimateData: Sync + Send {
    async fn precipitation(&self, predicate: &Predicate)
        -> Result<Vec<PrecipitationReading>, Error>;
    /// Station conditions apply to the station table, date conditions keep
    /// stations with at least one observation inside the range.
    async fn station_ids(&self, predicate: &Predicate) -> Result<Vec<String>, Error>;
    async fn temperatures(&self, predicate: &Predicate) -> Result<Vec<Option<f64>>, Error>;
    async fn temperature_stats(&self, predicate: &Predicate) -> Result<TemperatureStats, Error>;
    /// Most recent observation date, `None` on an empty table
    async fn latest_date(&self) -> Result<Option<Date>, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PrecipitationReading {
    /// YYYY-MM-DD
    pub date: String,
    /// Inches
    pub precipitation: Option<f64>,
}

/// Aggregate over `tobs`. All fields are `None` when no row matched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, ToSchema)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `[min, avg, max]`
    pub fn as_triple(&self) -> Vec<Option<f64>> {
        vec![self.min, self.avg, self.max]
    }
}
