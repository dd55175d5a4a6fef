use async_trait::async_trait;
use climate_core::{parse_date, Condition, Predicate};
use log::{debug, info};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Parameters, Select};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::{str::FromStr, sync::LazyLock, time::Duration};
use time::Date;

use super::{ClimateData, Error, PrecipitationReading, TemperatureStats};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("placeholder pattern is valid"));

/// Which table a predicate is rendered against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Measurement,
    Station,
}

pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    /// Opens an existing database file read-only. The file is never created.
    pub async fn new(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("SQLite database opened read-only at: {}", path);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch(&self, select: Select, params: Vec<String>) -> Result<Vec<SqliteRow>, Error> {
        let binding = select.to_string();
        let sql = PLACEHOLDER.replace_all(&binding, "?");
        debug!("query: {} params: {:?}", sql, params);

        let mut query = sqlx::query(&sql);
        for value in &params {
            query = query.bind(value.as_str());
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}

/// Adds the predicate's conditions to `query` as `WHERE ... AND ...`.
///
/// Placeholders are rewritten to positional `?`, so `values` must be pushed
/// in the same order the clauses appear in the rendered SQL: station
/// conditions first, then date conditions.
fn apply_predicate(
    mut query: Select,
    predicate: &Predicate,
    target: Target,
    placeholders: &mut Parameters,
    values: &mut Vec<String>,
) -> Select {
    for condition in predicate.conditions() {
        if let Condition::StationEquals(id) = condition {
            query = query.where_(format!("station = {}", placeholders.next()));
            values.push(id.clone());
        }
    }

    let mut date_clauses = vec![];
    for condition in predicate.conditions() {
        match condition {
            Condition::DateOnOrAfter(date) => {
                date_clauses.push(format!("date >= {}", placeholders.next()));
                values.push(date.to_string());
            }
            Condition::DateOnOrBefore(date) => {
                date_clauses.push(format!("date <= {}", placeholders.next()));
                values.push(date.to_string());
            }
            Condition::StationEquals(_) => {}
        }
    }

    if date_clauses.is_empty() {
        return query;
    }

    match target {
        Target::Measurement => {
            for clause in date_clauses {
                query = query.where_(clause);
            }
            query
        }
        // All date bounds must hold for the same observation row
        Target::Station => query.where_(format!(
            "EXISTS (SELECT 1 FROM measurement WHERE measurement.station = station.station AND {})",
            date_clauses.join(" AND ")
        )),
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<PrecipitationReading>, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = select(("date", "CAST(prcp AS REAL)".as_("prcp"))).from("measurement");
        let query = apply_predicate(
            query,
            predicate,
            Target::Measurement,
            &mut placeholders,
            &mut values,
        )
        .order_by("rowid");

        let rows = self.fetch(query, values).await?;
        rows.iter()
            .map(|row| {
                Ok(PrecipitationReading {
                    date: row.try_get("date")?,
                    precipitation: row.try_get("prcp")?,
                })
            })
            .collect()
    }

    async fn station_ids(&self, predicate: &Predicate) -> Result<Vec<String>, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = select("station").from("station");
        let query = apply_predicate(
            query,
            predicate,
            Target::Station,
            &mut placeholders,
            &mut values,
        )
        .order_by("rowid");

        let rows = self.fetch(query, values).await?;
        rows.iter()
            .map(|row| Ok(row.try_get("station")?))
            .collect()
    }

    async fn temperatures(&self, predicate: &Predicate) -> Result<Vec<Option<f64>>, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = select("CAST(tobs AS REAL)".as_("tobs")).from("measurement");
        let query = apply_predicate(
            query,
            predicate,
            Target::Measurement,
            &mut placeholders,
            &mut values,
        )
        .order_by("rowid");

        let rows = self.fetch(query, values).await?;
        rows.iter()
            .map(|row| Ok(row.try_get("tobs")?))
            .collect()
    }

    async fn temperature_stats(&self, predicate: &Predicate) -> Result<TemperatureStats, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = select((
            "CAST(MIN(tobs) AS REAL)".as_("tmin"),
            "AVG(tobs)".as_("tavg"),
            "CAST(MAX(tobs) AS REAL)".as_("tmax"),
        ))
        .from("measurement");
        let query = apply_predicate(
            query,
            predicate,
            Target::Measurement,
            &mut placeholders,
            &mut values,
        );

        // An aggregate without GROUP BY always yields exactly one row
        let rows = self.fetch(query, values).await?;
        let Some(row) = rows.first() else {
            return Ok(TemperatureStats::empty());
        };

        Ok(TemperatureStats {
            min: row.try_get("tmin")?,
            avg: row.try_get("tavg")?,
            max: row.try_get("tmax")?,
        })
    }

    async fn latest_date(&self) -> Result<Option<Date>, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        latest
            .map(|raw| parse_date(&raw).map_err(|_| Error::StoredDate(raw)))
            .transpose()
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
