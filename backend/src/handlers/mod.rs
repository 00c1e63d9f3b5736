//! HTTP handlers for the SimpleStock API

mod health;
mod movements;
mod products;
mod quick_out;

pub use health::*;
pub use movements::*;
pub use products::*;
pub use quick_out::*;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};
use shared::validation::{parse_date_bound, validate_date_range, DateBound};

use crate::error::{AppError, AppResult};

/// Parse optional `from`/`to` query values into an ordered date range
pub(crate) fn parse_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let date_from = match from {
        Some(raw) => {
            parse_date_bound(raw, DateBound::Start).map_err(|m| AppError::invalid("from", m))?
        }
        None => None,
    };
    let date_to = match to {
        Some(raw) => {
            parse_date_bound(raw, DateBound::End).map_err(|m| AppError::invalid("to", m))?
        }
        None => None,
    };
    validate_date_range(date_from, date_to).map_err(|m| AppError::invalid("from", m))?;
    Ok((date_from, date_to))
}

/// Query values sent empty (`?type=&page=`) count as absent
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
