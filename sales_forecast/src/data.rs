//! Historical sales records and the synthetic history generator

use crate::config::GeneratorConfig;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Level of the linear trend on the first day
pub const TREND_START: f64 = 100.0;
/// Level of the linear trend on the last day
pub const TREND_END: f64 = 500.0;
/// Amplitude of the weekly cycle
pub const WEEKLY_AMPLITUDE: f64 = 50.0;
/// Amplitude of the monthly cycle
pub const MONTHLY_AMPLITUDE: f64 = 30.0;
/// Standard deviation of the daily noise
pub const NOISE_STD_DEV: f64 = 20.0;

/// One day of labelled sales history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Calendar day
    pub date: NaiveDate,
    /// Units sold, never negative
    pub sales: f64,
    /// Day of week, Monday = 0
    pub day_of_week: u32,
    /// Day of month (1-31)
    pub day_of_month: u32,
    /// Month (1-12)
    pub month: u32,
    /// ISO week of year (1-53)
    pub week_of_year: u32,
}

impl HistoricalRecord {
    /// Build a record, deriving the calendar fields from `date`.
    /// Negative sales are floored at zero.
    pub fn new(date: NaiveDate, sales: f64) -> Self {
        Self {
            date,
            sales: sales.max(0.0),
            day_of_week: date.weekday().num_days_from_monday(),
            day_of_month: date.day(),
            month: date.month(),
            week_of_year: date.iso_week().week(),
        }
    }
}

/// Linear trend at position `index` of a series of `periods` points
pub fn trend_component(index: usize, periods: usize) -> f64 {
    if periods <= 1 {
        return TREND_START;
    }
    TREND_START + (TREND_END - TREND_START) * index as f64 / (periods - 1) as f64
}

/// Weekly cycle for a day of week (Monday = 0)
pub fn weekly_component(day_of_week: u32) -> f64 {
    WEEKLY_AMPLITUDE * (2.0 * PI * day_of_week as f64 / 7.0).sin()
}

/// Monthly cycle for a day of month
pub fn monthly_component(day_of_month: u32) -> f64 {
    MONTHLY_AMPLITUDE * (2.0 * PI * day_of_month as f64 / 30.0).sin()
}

/// Generator for synthetic daily sales history
///
/// Sales are `trend + weekly + monthly + noise`, floored at zero.
#[derive(Debug, Clone, Default)]
pub struct SalesDataGenerator {
    config: GeneratorConfig,
}

impl SalesDataGenerator {
    /// Create a generator
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `periods` consecutive days of history
    pub fn generate(&self) -> Result<Vec<HistoricalRecord>> {
        let config = &self.config;
        config.validate()?;

        let noise = Normal::new(0.0, NOISE_STD_DEV)
            .map_err(|e| ForecastError::DataGeneration(e.to_string()))?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut records = Vec::with_capacity(config.periods);
        for (index, date) in config.start.iter_days().take(config.periods).enumerate() {
            let day_of_week = date.weekday().num_days_from_monday();
            let sales = trend_component(index, config.periods)
                + weekly_component(day_of_week)
                + monthly_component(date.day())
                + noise.sample(&mut rng);

            records.push(HistoricalRecord::new(date, sales));
        }

        debug!(
            periods = records.len(),
            start = %config.start,
            seeded = config.seed.is_some(),
            "generated synthetic sales history"
        );

        Ok(records)
    }
}

/// Generate `periods` days of unseeded history from the default anchor date
pub fn generate_sample_data(periods: usize) -> Result<Vec<HistoricalRecord>> {
    SalesDataGenerator::new(GeneratorConfig::default().with_periods(periods))?.generate()
}

/// Sales column of a record slice
pub fn sales_values(records: &[HistoricalRecord]) -> Vec<f64> {
    records.iter().map(|r| r.sales).collect()
}
