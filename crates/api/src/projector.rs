use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use climate_core::{build_station_filter, Predicate};
use log::debug;
use time::Date;

use crate::{ClimateData, Error, TemperatureStats};

/// Date the trailing twelve month window is counted back from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorDate {
    Fixed(Date),
    /// `MAX(date)` of the measurement table, looked up on every request
    LatestInTable,
}

/// Runs predicates against the data source and shapes the rows into the
/// containers the API returns. Holds no per-request state.
pub struct ResultProjector {
    climate_db: Arc<dyn ClimateData>,
    anchor: AnchorDate,
}

impl ResultProjector {
    pub fn new(climate_db: Arc<dyn ClimateData>, anchor: AnchorDate) -> Self {
        Self { climate_db, anchor }
    }

    pub fn anchor(&self) -> AnchorDate {
        self.anchor
    }

    /// `None` only when the anchor is computed and the table is empty
    pub async fn resolve_anchor(&self) -> Result<Option<Date>, Error> {
        match self.anchor {
            AnchorDate::Fixed(date) => Ok(Some(date)),
            AnchorDate::LatestInTable => {
                let latest = self.climate_db.latest_date().await?;
                debug!("resolved anchor date from table: {:?}", latest);
                Ok(latest)
            }
        }
    }

    /// Date to precipitation. When several stations report on the same
    /// date the row fetched last wins; rows come back in table order.
    pub async fn project_precipitation(
        &self,
        predicate: &Predicate,
    ) -> Result<BTreeMap<String, Option<f64>>, Error> {
        let readings = self.climate_db.precipitation(predicate).await?;
        let mut by_date = BTreeMap::new();
        for reading in readings {
            by_date.insert(reading.date, reading.precipitation);
        }
        Ok(by_date)
    }

    /// Distinct station ids in table order
    pub async fn project_station_list(&self, predicate: &Predicate) -> Result<Vec<String>, Error> {
        let mut station_ids = self.climate_db.station_ids(predicate).await?;
        let mut seen = HashSet::new();
        station_ids.retain(|id| seen.insert(id.clone()));
        Ok(station_ids)
    }

    /// Raw readings for one station, one entry per row, duplicates kept
    pub async fn project_temperature_observations(
        &self,
        station_id: &str,
        predicate: &Predicate,
    ) -> Result<Vec<Option<f64>>, Error> {
        let predicate = build_station_filter(Some(station_id)).and(predicate.clone());
        self.climate_db.temperatures(&predicate).await
    }

    pub async fn project_temperature_stats(
        &self,
        predicate: &Predicate,
    ) -> Result<TemperatureStats, Error> {
        self.climate_db.temperature_stats(predicate).await
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.climate_db.health_check().await
    }
}
