use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::domain::Employee;

/// Rendered termination notice plus a digest for tamper-evident auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminationLetter {
    pub body: String,
    pub content_hash: String,
}

/// Render the formal termination notice for an employee.
///
/// Deterministic for identical input: the body carries no wall-clock
/// timestamps beyond the supplied termination date, so the content hash is
/// reproducible.
pub fn termination_letter(
    employee: &Employee,
    final_score: Option<f64>,
    final_utilization: Option<f64>,
    reasons: &[String],
    termination_date: NaiveDate,
) -> TerminationLetter {
    let score_line = match final_score {
        Some(score) => format!("Final Performance Score: {score}%"),
        None => "Final Performance Score: not recorded".to_string(),
    };
    let utilization_line = match final_utilization {
        Some(utilization) => format!("Final Utilization Rate: {utilization}%"),
        None => "Final Utilization Rate: not recorded".to_string(),
    };

    let mut lines = vec![
        "EMPLOYMENT TERMINATION NOTICE".to_string(),
        String::new(),
        format!("Date: {}", termination_date.format("%B %-d, %Y")),
        String::new(),
        "Employee Information:".to_string(),
        format!("Name: {}", employee.name),
        format!("Employee ID: {}", employee.id.0),
        format!("Position: {}", employee.role.as_deref().unwrap_or("Staff")),
        String::new(),
        "Performance Summary:".to_string(),
        score_line,
        utilization_line,
        String::new(),
        "Reasons for Termination:".to_string(),
    ];

    for reason in reasons {
        lines.push(format!("- {reason}"));
    }

    lines.extend([
        String::new(),
        "This decision is based on documented performance issues and failure to meet the \
         minimum standards required for your position. Despite previous coaching efforts \
         and performance improvement opportunities, the required improvements have not \
         been achieved."
            .to_string(),
        String::new(),
        "Next Steps:".to_string(),
        "- Final paycheck will be processed according to company policy".to_string(),
        "- Please return all company property immediately".to_string(),
        "- Benefits information will be sent separately".to_string(),
        "- Contact HR for any questions".to_string(),
        String::new(),
        "Human Resources Department".to_string(),
        "Automated HR Management System".to_string(),
    ]);

    let body = lines.join("\n");

    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    let content_hash = format!("{:x}", hasher.finalize());

    TerminationLetter { body, content_hash }
}
