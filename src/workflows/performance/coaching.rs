use serde::{Deserialize, Serialize};

use super::domain::TrendDirection;

/// Performance context the coaching tables key on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingContext {
    pub current_score: f64,
    pub previous_score: Option<f64>,
    pub average_score: f64,
    pub consecutive_low_periods: u32,
    pub trend: TrendDirection,
    pub pip_active: bool,
    /// Expected score threshold for the role.
    pub role_expectations: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingCategory {
    SkillDevelopment,
    Performance,
    Behavior,
    GoalSetting,
    Motivation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Structured feedback produced for one coaching touchpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachingRecommendation {
    pub feedback: String,
    pub category: CoachingCategory,
    pub priority: CoachingPriority,
    pub action_items: Vec<String>,
    pub timeframe: &'static str,
    pub follow_up_required: bool,
}

/// Pure mapping from performance context to structured feedback. Category and
/// priority come from fixed decision tables keyed on score bands (<50,
/// 50-69, 70+), streak length, and the PIP-active override; identical input
/// always yields identical output.
pub struct CoachingEngine;

impl CoachingEngine {
    pub fn recommend(context: &CoachingContext) -> CoachingRecommendation {
        let category = Self::category(context);
        let priority = Self::priority(context);
        let feedback = Self::feedback(context);
        let action_items = Self::action_items(context);
        let timeframe = Self::timeframe(priority, context.pip_active);
        let follow_up_required = context.pip_active
            || priority == CoachingPriority::Urgent
            || priority == CoachingPriority::High
            || context.current_score < 60.0;

        CoachingRecommendation {
            feedback,
            category,
            priority,
            action_items,
            timeframe,
            follow_up_required,
        }
    }

    fn category(context: &CoachingContext) -> CoachingCategory {
        if context.pip_active {
            return CoachingCategory::Performance;
        }
        if context.current_score < 50.0 {
            return CoachingCategory::SkillDevelopment;
        }
        if context.consecutive_low_periods >= 2 {
            return CoachingCategory::Performance;
        }
        if context.current_score < 70.0 {
            return CoachingCategory::GoalSetting;
        }
        CoachingCategory::Motivation
    }

    fn priority(context: &CoachingContext) -> CoachingPriority {
        if context.pip_active && context.current_score < 60.0 {
            return CoachingPriority::Urgent;
        }
        if context.consecutive_low_periods >= 3 {
            return CoachingPriority::Urgent;
        }
        if context.current_score < 50.0 {
            return CoachingPriority::High;
        }
        if context.consecutive_low_periods >= 2 {
            return CoachingPriority::High;
        }
        if context.current_score < 70.0 {
            return CoachingPriority::Medium;
        }
        CoachingPriority::Low
    }

    fn feedback(context: &CoachingContext) -> String {
        if context.pip_active {
            return Self::pip_feedback(context);
        }
        if context.current_score >= context.role_expectations {
            return Self::positive_feedback(context);
        }
        if context.current_score >= 70.0 {
            return Self::improvement_feedback(context);
        }
        Self::development_feedback(context)
    }

    fn pip_feedback(context: &CoachingContext) -> String {
        let score = context.current_score;
        let target = context.role_expectations;
        match context.trend {
            TrendDirection::Improving => format!(
                "Your performance is showing positive improvement during the PIP period. \
                 Current score of {score}% demonstrates your commitment to growth. Continue \
                 implementing the strategies that are working and maintain this momentum to \
                 reach the {target}% target."
            ),
            TrendDirection::Declining => format!(
                "Performance needs immediate attention. The current score of {score}% requires \
                 focused effort to meet PIP requirements. Let's identify specific barriers and \
                 develop targeted solutions to get back on track toward the {target}% goal."
            ),
            TrendDirection::Stable => format!(
                "Performance is stable at {score}% during the PIP period. To successfully \
                 complete the PIP, we need to see consistent improvement toward the {target}% \
                 target. Let's review your action plan and identify opportunities for \
                 acceleration."
            ),
        }
    }

    fn positive_feedback(context: &CoachingContext) -> String {
        let score = context.current_score;
        if context.trend == TrendDirection::Improving {
            format!(
                "Excellent work! Your score of {score}% shows strong performance and continued \
                 improvement. You're meeting expectations and demonstrating great progress. \
                 Keep up the excellent work and continue building on your strengths."
            )
        } else {
            format!(
                "Great job maintaining high performance with a score of {score}%. You're \
                 consistently meeting expectations. Continue to challenge yourself and look \
                 for opportunities to mentor others and share your successful strategies."
            )
        }
    }

    fn improvement_feedback(context: &CoachingContext) -> String {
        let score = context.current_score;
        let target = context.role_expectations;
        if context.trend == TrendDirection::Improving {
            format!(
                "Good progress! Your score of {score}% shows improvement and you're moving in \
                 the right direction. With continued focus, you can reach the {target}% target. \
                 Keep implementing the strategies that are working for you."
            )
        } else {
            format!(
                "Your current score of {score}% indicates room for improvement to reach the \
                 {target}% target. Let's identify specific areas where you can enhance \
                 performance and develop a focused action plan for consistent improvement."
            )
        }
    }

    fn development_feedback(context: &CoachingContext) -> String {
        let score = context.current_score;
        let target = context.role_expectations;
        format!(
            "Your current performance score of {score}% indicates significant opportunity for \
             growth. The target is {target}%, which is achievable with focused development. \
             Let's work together to identify your strengths and create a comprehensive \
             improvement plan with clear, actionable steps."
        )
    }

    fn action_items(context: &CoachingContext) -> Vec<String> {
        let mut items = Vec::new();

        if context.pip_active {
            items.push("Review and implement all PIP action items daily".to_string());
            items.push("Schedule weekly progress check-ins with supervisor".to_string());
        }

        if context.current_score < 50.0 {
            items.push("Complete fundamental skills assessment".to_string());
            items.push("Attend all required training sessions".to_string());
            items.push("Request additional support and resources".to_string());
        } else if context.current_score < 70.0 {
            items.push("Identify top 3 areas for improvement".to_string());
            items.push("Set specific, measurable weekly goals".to_string());
            items.push("Track daily performance metrics".to_string());
        } else {
            items.push("Maintain current performance standards".to_string());
            items.push("Identify opportunities for skill enhancement".to_string());
        }

        if context.consecutive_low_periods >= 2 {
            items.push("Analyze patterns in recent performance".to_string());
            items.push("Implement corrective measures immediately".to_string());
        }

        items
    }

    fn timeframe(priority: CoachingPriority, pip_active: bool) -> &'static str {
        if priority == CoachingPriority::Urgent {
            return "1 week";
        }
        if pip_active {
            return "1-2 weeks";
        }
        match priority {
            CoachingPriority::High => "2-3 weeks",
            CoachingPriority::Medium => "3-4 weeks",
            _ => "4-6 weeks",
        }
    }
}
