//! Filter construction over observation rows
//!
//! Route inputs arrive as raw strings. Everything in here either turns them
//! into a [`Predicate`] or fails with [`QueryError::InvalidDate`] before any
//! query is issued.

use std::fmt;

use time::{macros::format_description, Date, Duration};

/// Length of the default look-back window
pub const TRAILING_WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },
}

/// A single filter condition on an observation row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    DateOnOrAfter(Date),
    DateOnOrBefore(Date),
    StationEquals(String),
}

impl Condition {
    pub fn matches(&self, date: Date, station: &str) -> bool {
        match self {
            Condition::DateOnOrAfter(start) => date >= *start,
            Condition::DateOnOrBefore(end) => date <= *end,
            Condition::StationEquals(id) => station == id,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::DateOnOrAfter(date) => write!(f, "date >= {}", date),
            Condition::DateOnOrBefore(date) => write!(f, "date <= {}", date),
            Condition::StationEquals(id) => write!(f, "station = {}", id),
        }
    }
}

/// Conditions joined by logical AND. The empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn and(mut self, other: Predicate) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, date: Date, station: &str) -> bool {
        self.conditions.iter().all(|c| c.matches(date, station))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "(all rows)");
        }
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

/// Strict `YYYY-MM-DD` parse
pub fn parse_date(input: &str) -> Result<Date, QueryError> {
    Date::parse(input, format_description!("[year]-[month]-[day]")).map_err(|_| {
        QueryError::InvalidDate {
            input: input.to_owned(),
        }
    })
}

/// `[anchor - 365 days, ...)`
pub fn trailing_year(anchor: Date) -> Predicate {
    let start = anchor.saturating_sub(Duration::days(TRAILING_WINDOW_DAYS));
    Predicate::all().with(Condition::DateOnOrAfter(start))
}

/// Range filter for an explicit start and optional end.
///
/// An `end` earlier than `start` is kept as given; the resulting predicate
/// simply matches nothing.
pub fn date_range(start: &str, end: Option<&str>) -> Result<Predicate, QueryError> {
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?;
    Ok(bounded(Predicate::all().with(Condition::DateOnOrAfter(start)), end))
}

/// Range filter where a missing `start` falls back to the trailing year
/// before `anchor`.
pub fn build_date_range_filter(
    start: Option<&str>,
    end: Option<&str>,
    anchor: Date,
) -> Result<Predicate, QueryError> {
    match start {
        Some(start) => date_range(start, end),
        None => {
            let end = end.map(parse_date).transpose()?;
            Ok(bounded(trailing_year(anchor), end))
        }
    }
}

pub fn build_station_filter(station_id: Option<&str>) -> Predicate {
    match station_id {
        Some(id) => Predicate::all().with(Condition::StationEquals(id.to_owned())),
        None => Predicate::all(),
    }
}

fn bounded(predicate: Predicate, end: Option<Date>) -> Predicate {
    match end {
        Some(end) => predicate.with(Condition::DateOnOrBefore(end)),
        None => predicate,
    }
}
