//! Analytics DTOs

use chrono::NaiveDate;
use serde::Deserialize;

use core_kernel::DateWindow;
use domain_claims::ClaimQuery;

use crate::error::ApiError;

/// Reporting window; either bound may be omitted
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Shorthand for the last N days up to today; ignored when `from` is set
    pub days: Option<u32>,
    pub payer: Option<String>,
}

impl WindowParams {
    pub fn into_query(self, today: NaiveDate) -> Result<ClaimQuery, ApiError> {
        let window = match (self.from, self.days) {
            (None, Some(days)) if self.to.is_none() => DateWindow::last_days(days, today)?,
            _ => DateWindow::new(self.from, self.to)?,
        };

        Ok(ClaimQuery {
            payer: self.payer,
            ..ClaimQuery::in_window(window)
        })
    }
}
