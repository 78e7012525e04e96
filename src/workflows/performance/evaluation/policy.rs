use super::super::domain::{RiskLevel, SystemSettings, TrendAnalysis, TrendDirection};

pub(crate) fn candidate_risk(
    should_create_pip: bool,
    consecutive_low: u32,
    average_score: f64,
    min_score_threshold: f64,
) -> RiskLevel {
    if should_create_pip {
        RiskLevel::Critical
    } else if consecutive_low >= 2 {
        RiskLevel::High
    } else if average_score < min_score_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub(crate) fn candidate_reason(
    should_create_pip: bool,
    consecutive_low: u32,
    threshold: f64,
) -> String {
    if should_create_pip {
        format!("{consecutive_low} consecutive periods below {threshold}% threshold")
    } else if consecutive_low > 0 {
        format!("{consecutive_low} recent periods below threshold - monitoring required")
    } else {
        "Performance within acceptable range".to_string()
    }
}

/// Assemble the canned guidance list from streak severity, absolute score
/// band, and trend direction. Order is deterministic.
pub(crate) fn candidate_recommendations(
    average_score: f64,
    consecutive_low: u32,
    trend: &TrendAnalysis,
    configured_low_periods: u32,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if consecutive_low >= configured_low_periods {
        recommendations.push("Immediate PIP initiation required".to_string());
        recommendations.push("Schedule comprehensive performance review".to_string());
    } else if consecutive_low >= 2 {
        recommendations.push("Increase coaching frequency".to_string());
        recommendations.push("Monitor closely for PIP trigger".to_string());
    }

    if average_score < 50.0 {
        recommendations.push("Consider fundamental skills training".to_string());
        recommendations.push("Evaluate role fit and expectations".to_string());
    } else if average_score < 60.0 {
        recommendations.push("Provide targeted skill development".to_string());
        recommendations.push("Implement regular check-ins".to_string());
    }

    match trend.direction {
        TrendDirection::Declining => {
            recommendations.push("Address declining performance trend".to_string());
            recommendations.push("Identify and remove performance barriers".to_string());
        }
        TrendDirection::Improving => {
            recommendations.push("Continue current improvement strategies".to_string());
            recommendations.push("Recognize progress and maintain momentum".to_string());
        }
        TrendDirection::Stable => {}
    }

    recommendations
}

/// Default goals written into an automatically opened plan.
pub fn pip_goals(average_score: f64, settings: &SystemSettings) -> Vec<String> {
    let target_score = (settings.min_score_threshold + 10.0).max(80.0);

    let mut goals = vec![
        format!("Achieve and maintain {target_score}% average performance score"),
        "Complete all assigned tasks within specified timeframes".to_string(),
    ];

    if average_score < 60.0 {
        goals.push("Attend mandatory skill development training sessions".to_string());
        goals.push("Meet with supervisor weekly for progress review".to_string());
    } else if average_score < 70.0 {
        goals.push("Improve task quality and attention to detail".to_string());
        goals.push("Demonstrate consistent application of learned skills".to_string());
    }

    goals
}

/// Cadence and focus for the coaching plan attached to a new PIP.
pub fn coaching_plan(average_score: f64, trend: &TrendAnalysis) -> String {
    let mut frequency = "Weekly";
    let mut focus = "general performance improvement";

    if average_score < 50.0 {
        frequency = "Bi-weekly";
        focus = "fundamental skills development and basic requirements";
    } else if average_score < 60.0 {
        focus = "skill building and quality improvement";
    } else if average_score < 70.0 {
        focus = "consistency and meeting performance standards";
    }

    if trend.direction == TrendDirection::Declining {
        frequency = "Bi-weekly";
    }

    format!(
        "{frequency} coaching sessions focusing on {focus}. \
         Regular feedback and progress monitoring with documented action items."
    )
}
