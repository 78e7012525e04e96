use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{EmployeeId, PerformanceMetric};

/// Error raised while parsing an uploaded metrics export.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

#[derive(Debug, Deserialize)]
struct MetricRow {
    employee_id: String,
    period: u32,
    score: f64,
    utilization: f64,
    tasks_completed: u32,
    date: String,
}

/// Parse the upload format: `employee_id,period,score,utilization,
/// tasks_completed,date` with an ISO date column.
pub(crate) fn parse_metric_rows<R: Read>(reader: R) -> Result<Vec<PerformanceMetric>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut metrics = Vec::new();
    for (index, record) in csv_reader.deserialize::<MetricRow>().enumerate() {
        let row_number = index + 1;
        let row = record?;

        if row.employee_id.is_empty() {
            return Err(IngestError::InvalidRow {
                row: row_number,
                message: "employee_id is required".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&row.score) {
            return Err(IngestError::InvalidRow {
                row: row_number,
                message: format!("score {} outside 0-100", row.score),
            });
        }
        if !(0.0..=100.0).contains(&row.utilization) {
            return Err(IngestError::InvalidRow {
                row: row_number,
                message: format!("utilization {} outside 0-100", row.utilization),
            });
        }

        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|err| {
            IngestError::InvalidRow {
                row: row_number,
                message: format!("invalid date '{}' ({err})", row.date),
            }
        })?;

        metrics.push(PerformanceMetric {
            employee_id: EmployeeId(row.employee_id),
            period: row.period,
            score: row.score,
            utilization: row.utilization,
            tasks_completed: row.tasks_completed,
            date,
        });
    }

    Ok(metrics)
}
