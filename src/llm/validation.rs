use serde::Deserialize;
use thiserror::Error;

use crate::models::{ClarityFeedback, InvestorFeedback};

/// Bounds applied to agent replies
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_score: 1.0,
            max_score: 10.0,
        }
    }
}

/// Why an agent reply was rejected
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply is not valid JSON for the schema: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("score {score} outside {min}-{max}")]
    ScoreOutOfRange { score: f64, min: f64, max: f64 },
    #[error("analysis is empty")]
    EmptyAnalysis,
    #[error("recommendation {0} is empty")]
    EmptyRecommendation(usize),
}

/// Expected Clarity Coach reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarityReply {
    pub clarity_score: f64,
    pub analysis: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub improved_content: Option<String>,
}

/// Expected Investor reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorReply {
    pub investor_score: f64,
    pub analysis: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub missing_elements: Vec<String>,
}

/// Parse and validate a Clarity Coach reply
pub fn parse_clarity_reply(
    text: &str,
    config: &ValidationConfig,
) -> Result<ClarityFeedback, ReplyError> {
    let reply: ClarityReply = serde_json::from_str(text)?;
    check_common(reply.clarity_score, &reply.analysis, &reply.recommendations, config)?;

    Ok(ClarityFeedback {
        score: reply.clarity_score,
        analysis: reply.analysis,
        recommendations: reply.recommendations,
        improved_content: reply.improved_content.filter(|c| !c.trim().is_empty()),
    })
}

/// Parse and validate an Investor reply
pub fn parse_investor_reply(
    text: &str,
    config: &ValidationConfig,
) -> Result<InvestorFeedback, ReplyError> {
    let reply: InvestorReply = serde_json::from_str(text)?;
    check_common(reply.investor_score, &reply.analysis, &reply.recommendations, config)?;

    Ok(InvestorFeedback {
        score: reply.investor_score,
        analysis: reply.analysis,
        red_flags: reply.red_flags,
        recommendations: reply.recommendations,
        missing_elements: reply.missing_elements,
    })
}

fn check_common(
    score: f64,
    analysis: &str,
    recommendations: &[String],
    config: &ValidationConfig,
) -> Result<(), ReplyError> {
    if !score.is_finite() || score < config.min_score || score > config.max_score {
        return Err(ReplyError::ScoreOutOfRange {
            score,
            min: config.min_score,
            max: config.max_score,
        });
    }

    if analysis.trim().is_empty() {
        return Err(ReplyError::EmptyAnalysis);
    }

    if let Some(index) = recommendations.iter().position(|r| r.trim().is_empty()) {
        return Err(ReplyError::EmptyRecommendation(index));
    }

    Ok(())
}
