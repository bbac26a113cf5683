//! Injury risk assessment
//!
//! Scores overuse patterns over the recent training window: excessive
//! frequency, lack of variety, abrupt distance progression, and missing
//! recovery work. The score is additive and clamped to [0, 100].

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashSet;

use crate::models::{WorkoutRecord, WorkoutType};

/// Number of recent records considered for the risk score
const SCORE_WINDOW: usize = 14;

/// Number of recent records considered for detailed risk factors
const FACTOR_WINDOW: usize = 10;

/// Overall risk category derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 30
    Low,
    /// Score below 60
    Medium,
    /// Score 60 and above
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{label}")
    }
}

/// Severity of an individual risk factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Identified risk factor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    HighVolume,
    LowVariety,
}

/// A detailed risk factor, separate from the numeric score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub description: String,
    pub severity: Severity,
    /// Human-readable measurement backing the factor
    pub value: String,
}

/// Complete injury risk assessment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRiskAssessment {
    pub overall_risk: RiskLevel,
    /// Additive risk score, [0, 100]
    pub risk_score: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub prevention_tips: Vec<String>,
    pub recommended_actions: Vec<String>,
}

/// Injury risk assessment engine
pub struct InjuryRiskAssessor;

impl InjuryRiskAssessor {
    /// Assess injury risk over the most recent training window
    pub fn assess(workouts: &[WorkoutRecord]) -> InjuryRiskAssessment {
        let risk_score = Self::risk_score(workouts);
        let risk_factors = Self::risk_factors(workouts);

        InjuryRiskAssessment {
            overall_risk: Self::categorize(risk_score),
            risk_score,
            prevention_tips: Self::prevention_tips(&risk_factors),
            recommended_actions: Self::recommended_actions(risk_score),
            risk_factors,
        }
    }

    /// Additive risk score over the last 14 records
    fn risk_score(workouts: &[WorkoutRecord]) -> f64 {
        let start = workouts.len().saturating_sub(SCORE_WINDOW);
        let recent = &workouts[start..];
        let mut score: f64 = 0.0;

        // Overuse frequency
        if recent.len() > 10 {
            score += 25.0;
        }

        // Lack of variety
        let types: HashSet<WorkoutType> = recent.iter().map(|w| w.workout_type).collect();
        if types.len() < 2 {
            score += 20.0;
        }

        // Abrupt distance progression: last 2 vs the 2 before
        if workouts.len() >= 4 {
            let len = workouts.len();
            let older: Vec<f64> = workouts[len - 4..len - 2]
                .iter()
                .map(|w| w.distance_f64())
                .collect();
            let newer: Vec<f64> = workouts[len - 2..]
                .iter()
                .map(|w| w.distance_f64())
                .collect();
            if Statistics::mean(&newer) > Statistics::mean(&older) * 1.3 {
                score += 30.0;
            }
        }

        // Missing recovery work
        let recovery = recent
            .iter()
            .filter(|w| w.workout_type == WorkoutType::Recovery)
            .count();
        if recovery == 0 {
            score += 15.0;
        }

        score.clamp(0.0, 100.0)
    }

    fn categorize(risk_score: f64) -> RiskLevel {
        if risk_score < 30.0 {
            RiskLevel::Low
        } else if risk_score < 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Detailed risk factors over the last 10 records
    fn risk_factors(workouts: &[WorkoutRecord]) -> Vec<RiskFactor> {
        let start = workouts.len().saturating_sub(FACTOR_WINDOW);
        let recent = &workouts[start..];
        let mut factors = Vec::new();

        let total_distance: f64 = recent.iter().map(|w| w.distance_f64()).sum();
        if total_distance > 100.0 {
            factors.push(RiskFactor {
                kind: RiskFactorKind::HighVolume,
                description: "Very high training volume".to_string(),
                severity: Severity::Medium,
                value: format!("{total_distance:.1}km"),
            });
        }

        let types: HashSet<WorkoutType> = recent.iter().map(|w| w.workout_type).collect();
        if types.len() < 2 {
            factors.push(RiskFactor {
                kind: RiskFactorKind::LowVariety,
                description: "Little variety in workout types".to_string(),
                severity: Severity::Low,
                value: format!("{} type(s)", types.len()),
            });
        }

        factors
    }

    fn prevention_tips(risk_factors: &[RiskFactor]) -> Vec<String> {
        let mut tips = vec![
            "Follow the gradual progression principle (+10% per week max)".to_string(),
            "Include active recovery sessions".to_string(),
            "Vary your workout types".to_string(),
            "Listen to your body and respect fatigue".to_string(),
        ];

        for factor in risk_factors {
            match factor.kind {
                RiskFactorKind::HighVolume => {
                    tips.push("Temporarily reduce your weekly volume".to_string());
                }
                RiskFactorKind::LowVariety => {
                    tips.push(
                        "Diversify your training (endurance, speed, recovery)".to_string(),
                    );
                }
            }
        }

        tips
    }

    fn recommended_actions(risk_score: f64) -> Vec<String> {
        let mut actions = Vec::new();

        if risk_score > 60.0 {
            actions.push("Take 2-3 days of complete rest".to_string());
            actions.push("Consult a health professional if pain persists".to_string());
        } else if risk_score > 30.0 {
            actions.push("Reduce the intensity of upcoming workouts".to_string());
            actions.push("Prioritize active recovery".to_string());
        }

        actions.push("Watch for signs of excessive fatigue".to_string());
        actions
    }
}
