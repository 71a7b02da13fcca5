//! Utility functions for the sales_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, Local, NaiveDate};

/// Today's date in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `horizon` consecutive dates starting the day after `start`
pub fn future_dates(start: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let first = start
        .checked_add_days(Days::new(1))
        .ok_or_else(|| ForecastError::InvalidRange(format!("No day after {}", start)))?;

    let dates: Vec<NaiveDate> = first.iter_days().take(horizon).collect();
    if dates.len() != horizon {
        return Err(ForecastError::InvalidRange(format!(
            "{} days after {} overflow the calendar",
            horizon, start
        )));
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_dates_cross_year_boundary() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();
        let dates = future_dates(start, 3).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_future_dates_overflow() {
        assert!(future_dates(NaiveDate::MAX, 1).is_err());
    }
}
