use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;

/// Unit of a repeat rule. Stored and serialized in its singular lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    Day,
    Week,
    Month,
}

#[derive(Error, Debug, PartialEq)]
#[error("invalid repeat_unit: {0}")]
pub struct ParseRepeatUnitError(String);

impl FromStr for RepeatUnit {
    type Err = ParseRepeatUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" => Ok(RepeatUnit::Day),
            "week" | "weeks" => Ok(RepeatUnit::Week),
            "month" | "months" => Ok(RepeatUnit::Month),
            _ => Err(ParseRepeatUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for RepeatUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatUnit::Day => write!(f, "day"),
            RepeatUnit::Week => write!(f, "week"),
            RepeatUnit::Month => write!(f, "month"),
        }
    }
}

/// "Repeat every N units". Immutable once constructed; `every` is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    every: u32,
    unit: RepeatUnit,
}

impl RecurrenceRule {
    pub fn new(every: i64, unit: RepeatUnit) -> Result<Self, CoreError> {
        if every <= 0 {
            return Err(CoreError::validation("repeat_every must be > 0"));
        }
        let every = u32::try_from(every)
            .map_err(|_| CoreError::validation("repeat_every is too large"))?;
        Ok(Self { every, unit })
    }

    /// Validates the raw recurrence fields of a task draft.
    ///
    /// Returns `Ok(None)` when neither field is present (a plain task), the
    /// rule when both are present and well formed, and a validation error for
    /// every other combination, including a rule without a `due_at` anchor.
    pub fn from_fields(
        repeat_every: Option<i64>,
        repeat_unit: Option<&str>,
        due_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Self>, CoreError> {
        let (every, unit) = match (repeat_every, repeat_unit) {
            (None, None) => return Ok(None),
            (Some(every), Some(unit)) => (every, unit),
            _ => {
                return Err(CoreError::validation(
                    "repeat_every and repeat_unit must be set together",
                ))
            }
        };

        let unit: RepeatUnit = unit
            .parse()
            .map_err(|e: ParseRepeatUnitError| CoreError::validation(e.to_string()))?;
        let rule = Self::new(every, unit)?;

        if due_at.is_none() {
            return Err(CoreError::validation(
                "due_at is required for recurring tasks",
            ));
        }

        Ok(Some(rule))
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    pub fn unit(&self) -> RepeatUnit {
        self.unit
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.every == 1 {
            write!(f, "every {}", self.unit)
        } else {
            write!(f, "every {} {}s", self.every, self.unit)
        }
    }
}
