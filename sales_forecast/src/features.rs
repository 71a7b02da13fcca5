//! Calendar feature encoding
//!
//! Training rows and prediction rows must go through the same encoder, so
//! everything that turns a date into model input lives here.

use crate::data::HistoricalRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Column names, in the order produced by [`FeatureVector::to_row`]
pub const FEATURE_NAMES: [&str; 6] = [
    "day_sin",
    "day_cos",
    "month_sin",
    "month_cos",
    "day_of_month",
    "week_of_year",
];

/// Model input for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Sine of the weekday angle
    pub day_sin: f64,
    /// Cosine of the weekday angle
    pub day_cos: f64,
    /// Sine of the month angle
    pub month_sin: f64,
    /// Cosine of the month angle
    pub month_cos: f64,
    /// Day of month (1-31)
    pub day_of_month: u32,
    /// ISO week of year (1-53)
    pub week_of_year: u32,
}

impl FeatureVector {
    /// Encode precomputed calendar fields. `day_of_week` counts from Monday = 0.
    pub fn from_calendar(day_of_week: u32, day_of_month: u32, month: u32, week_of_year: u32) -> Self {
        let day_angle = 2.0 * PI * day_of_week as f64 / 7.0;
        let month_angle = 2.0 * PI * month as f64 / 12.0;

        Self {
            day_sin: day_angle.sin(),
            day_cos: day_angle.cos(),
            month_sin: month_angle.sin(),
            month_cos: month_angle.cos(),
            day_of_month,
            week_of_year,
        }
    }

    /// Encode a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_calendar(
            date.weekday().num_days_from_monday(),
            date.day(),
            date.month(),
            date.iso_week().week(),
        )
    }

    /// Encode a historical record from its stored calendar fields
    pub fn from_record(record: &HistoricalRecord) -> Self {
        Self::from_calendar(
            record.day_of_week,
            record.day_of_month,
            record.month,
            record.week_of_year,
        )
    }

    /// Flatten into a model row, ordered as [`FEATURE_NAMES`]
    pub fn to_row(&self) -> Vec<f64> {
        vec![
            self.day_sin,
            self.day_cos,
            self.month_sin,
            self.month_cos,
            self.day_of_month as f64,
            self.week_of_year as f64,
        ]
    }
}

/// Encode every record into a model row
pub fn encode_records(records: &[HistoricalRecord]) -> Vec<Vec<f64>> {
    records
        .iter()
        .map(|r| FeatureVector::from_record(r).to_row())
        .collect()
}

/// Encode every date into a model row
pub fn encode_dates(dates: &[NaiveDate]) -> Vec<Vec<f64>> {
    dates
        .iter()
        .map(|&d| FeatureVector::from_date(d).to_row())
        .collect()
}
