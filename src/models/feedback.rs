use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SlideType;

/// Score an agent reports when it could not analyze a slide
pub const FALLBACK_SCORE: f64 = 5.0;

/// Clarity Coach result for one slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarityFeedback {
    /// Clarity rating, 1-10
    pub score: f64,
    pub analysis: String,
    pub recommendations: Vec<String>,
    /// Rewritten slide text, when the agent produced one
    pub improved_content: Option<String>,
}

impl ClarityFeedback {
    /// Result used whenever the clarity agent fails
    pub fn fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            analysis: "Unable to process slide for clarity analysis.".to_string(),
            recommendations: vec!["Review slide content for clarity and conciseness.".to_string()],
            improved_content: None,
        }
    }
}

/// Investor agent result for one slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorFeedback {
    /// Investor appeal rating, 1-10
    pub score: f64,
    pub analysis: String,
    pub red_flags: Vec<String>,
    pub recommendations: Vec<String>,
    pub missing_elements: Vec<String>,
}

impl InvestorFeedback {
    /// Result used whenever the investor agent fails
    pub fn fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            analysis: "Unable to process slide for investor analysis.".to_string(),
            red_flags: vec![],
            recommendations: vec![
                "Ensure slide contains specific metrics and data points.".to_string(),
            ],
            missing_elements: vec![],
        }
    }
}

/// Both agent results for a slide plus the merged recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFeedback {
    pub clarity: ClarityFeedback,
    pub investor: InvestorFeedback,
    pub combined_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideFeedback {
    pub slide_id: u32,
    pub slide_title: String,
    pub slide_type: SlideType,
    pub feedback: AgentFeedback,
}

/// Deck-level summary
///
/// Scores are `None` when the deck has no slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallFeedback {
    pub overall_clarity: Option<f64>,
    pub overall_investor_appeal: Option<f64>,
    pub overall_score: Option<f64>,
    pub missing_slide_types: Vec<SlideType>,
    pub top_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub slide_count: usize,
    /// Model that produced the agent feedback
    pub model: String,
}

impl ReportMetadata {
    pub fn new(slide_count: usize, model: impl Into<String>) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            slide_count,
            model: model.into(),
        }
    }
}

/// Complete feedback for a deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckFeedback {
    pub slide_feedback: Vec<SlideFeedback>,
    pub overall_feedback: OverallFeedback,
    pub metadata: ReportMetadata,
}
