//! Forecast records, summaries and export

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Predicted sales for one future day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Calendar day, always after the day the forecast was made
    pub date: NaiveDate,
    /// Predicted units sold
    pub predicted_sales: f64,
}

impl ForecastRecord {
    /// English weekday name, e.g. "Monday"
    pub fn day_name(&self) -> String {
        self.date.format("%A").to_string()
    }
}

/// Aggregate view of a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Sum of all predictions
    pub total: f64,
    /// Mean daily prediction
    pub mean: f64,
    /// Sample standard deviation, zero for a single day
    pub std_dev: f64,
    /// Day with the highest prediction (earliest on ties)
    pub best_day: ForecastRecord,
    /// Day with the lowest prediction (earliest on ties)
    pub worst_day: ForecastRecord,
}

impl ForecastSummary {
    /// Summarise a non-empty forecast
    pub fn from_records(records: &[ForecastRecord]) -> Result<Self> {
        let first = records.first().ok_or_else(|| {
            ForecastError::InsufficientData("Cannot summarise an empty forecast".to_string())
        })?;

        let values: Vec<f64> = records.iter().map(|r| r.predicted_sales).collect();
        let std_dev = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        let mut best = first;
        let mut worst = first;
        for record in &records[1..] {
            if record.predicted_sales > best.predicted_sales {
                best = record;
            }
            if record.predicted_sales < worst.predicted_sales {
                worst = record;
            }
        }

        Ok(Self {
            total: values.iter().sum(),
            mean: values.iter().mean(),
            std_dev,
            best_day: best.clone(),
            worst_day: worst.clone(),
        })
    }
}

/// Render a forecast as CSV with a `date,predicted_sales` header
pub fn to_csv(records: &[ForecastRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ForecastError::Export(e.to_string()))
}

/// Render a forecast as a JSON array
pub fn to_json(records: &[ForecastRecord]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| ForecastError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(day: u32, sales: f64) -> ForecastRecord {
        ForecastRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            predicted_sales: sales,
        }
    }

    #[test]
    fn test_summary() {
        let records = vec![record(1, 10.0), record(2, 30.0), record(3, 20.0), record(4, 30.0)];
        let summary = ForecastSummary::from_records(&records).unwrap();

        assert_relative_eq!(summary.total, 90.0);
        assert_relative_eq!(summary.mean, 22.5);
        assert_eq!(summary.best_day, records[1]);
        assert_eq!(summary.worst_day, records[0]);
        assert!(summary.std_dev > 0.0);
    }

    #[test]
    fn test_single_day_summary() {
        let summary = ForecastSummary::from_records(&[record(5, 42.0)]).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.best_day, summary.worst_day);
    }

    #[test]
    fn test_empty_summary_fails() {
        assert!(ForecastSummary::from_records(&[]).is_err());
    }

    #[test]
    fn test_csv_export() {
        let csv = to_csv(&[record(1, 10.5), record(2, 11.0)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["date,predicted_sales", "2024-03-01,10.5", "2024-03-02,11.0"]);
    }

    #[test]
    fn test_json_export() {
        let json = to_json(&[record(1, 10.5), record(2, 11.0)]).unwrap();
        assert_eq!(
            json,
            r#"[{"date":"2024-03-01","predicted_sales":10.5},{"date":"2024-03-02","predicted_sales":11.0}]"#
        );

        let back: Vec<ForecastRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![record(1, 10.5), record(2, 11.0)]);
    }

    #[test]
    fn test_day_name() {
        // 2024-03-01 was a Friday
        assert_eq!(record(1, 0.0).day_name(), "Friday");
    }
}
