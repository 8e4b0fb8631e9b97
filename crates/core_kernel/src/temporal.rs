//! Date windows for filtering claim populations
//!
//! Reporting queries are almost always "claims in the last N days" or
//! "claims between two dates". A `DateWindow` captures either form with
//! inclusive, optionally open bounds.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Window of {days} days ending {end} starts before the earliest representable date")]
    OutOfRange { days: u32, end: NaiveDate },
}

/// An inclusive date range; a missing bound is unbounded on that side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    /// A window that admits every date
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Creates a window from optional bounds, rejecting inverted ranges
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(TemporalError::InvalidWindow { start, end });
            }
        }
        Ok(Self { from, to })
    }

    /// Creates a closed window
    pub fn between(from: NaiveDate, to: NaiveDate) -> Result<Self, TemporalError> {
        Self::new(Some(from), Some(to))
    }

    /// The `days` days ending on (and including) `today`
    pub fn last_days(days: u32, today: NaiveDate) -> Result<Self, TemporalError> {
        let span = u64::from(days.saturating_sub(1));
        let from = today
            .checked_sub_days(Days::new(span))
            .ok_or(TemporalError::OutOfRange { days, end: today })?;
        Ok(Self {
            from: Some(from),
            to: Some(today),
        })
    }

    /// Returns true if the date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    /// Returns true if neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}
