use super::super::domain::{PerformanceMetric, TrendAnalysis, TrendDirection};

/// Count the unbroken run of below-threshold scores starting from the most
/// recent metric. The walk stops permanently at the first passing score, so
/// an older dip past a recovery does not count.
pub(crate) fn consecutive_low_count(metrics: &[&PerformanceMetric], threshold: f64) -> u32 {
    let mut count = 0;
    for metric in metrics {
        if metric.score < threshold {
            count += 1;
        } else {
            break;
        }
    }
    count
}

pub(crate) fn average_score(metrics: &[&PerformanceMetric]) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    metrics.iter().map(|metric| metric.score).sum::<f64>() / metrics.len() as f64
}

/// Compare the latest score against the average of the two observations
/// before it; swings past +/-5% classify as improving/declining.
pub(crate) fn trend(metrics: &[&PerformanceMetric]) -> TrendAnalysis {
    if metrics.len() < 2 {
        return TrendAnalysis::flat();
    }

    let latest = metrics[0].score;
    let previous = &metrics[1..metrics.len().min(3)];
    let previous_avg =
        previous.iter().map(|metric| metric.score).sum::<f64>() / previous.len() as f64;

    let change_percent = (latest - previous_avg) / previous_avg * 100.0;

    let direction = if change_percent > 5.0 {
        TrendDirection::Improving
    } else if change_percent < -5.0 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    TrendAnalysis {
        direction,
        change_percent,
    }
}
