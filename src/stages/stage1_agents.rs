use tracing::{debug, warn};

use crate::llm::{
    CompletionClient, ValidationConfig, build_clarity_prompt, build_investor_prompt,
    parse_clarity_reply, parse_investor_reply, CLARITY_SYSTEM_PROMPT, INVESTOR_SYSTEM_PROMPT,
};
use crate::models::{ClarityFeedback, InvestorFeedback, Slide};

/// Configuration shared by both feedback agents
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Validation applied to every agent reply
    pub validation: ValidationConfig,
}

/// Clarity Coach agent
///
/// Never fails: any transport, parse or schema error is logged and replaced
/// by [`ClarityFeedback::fallback`].
pub async fn clarity_coach<C: CompletionClient>(
    client: &C,
    slide: &Slide,
    config: &AgentConfig,
) -> ClarityFeedback {
    let prompt = build_clarity_prompt(slide);

    let reply = match client.complete_json(CLARITY_SYSTEM_PROMPT, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Clarity Coach failed on slide {}: {:#}", slide.id, e);
            return ClarityFeedback::fallback();
        }
    };

    match parse_clarity_reply(&reply, &config.validation) {
        Ok(feedback) => {
            debug!("Clarity Coach scored slide {} at {}", slide.id, feedback.score);
            feedback
        }
        Err(e) => {
            warn!("Clarity Coach reply rejected for slide {}: {}", slide.id, e);
            ClarityFeedback::fallback()
        }
    }
}

/// Investor agent
///
/// Never fails: any transport, parse or schema error is logged and replaced
/// by [`InvestorFeedback::fallback`].
pub async fn investor_agent<C: CompletionClient>(
    client: &C,
    slide: &Slide,
    config: &AgentConfig,
) -> InvestorFeedback {
    let prompt = build_investor_prompt(slide);

    let reply = match client.complete_json(INVESTOR_SYSTEM_PROMPT, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Investor agent failed on slide {}: {:#}", slide.id, e);
            return InvestorFeedback::fallback();
        }
    };

    match parse_investor_reply(&reply, &config.validation) {
        Ok(feedback) => {
            debug!("Investor agent scored slide {} at {}", slide.id, feedback.score);
            feedback
        }
        Err(e) => {
            warn!("Investor reply rejected for slide {}: {}", slide.id, e);
            InvestorFeedback::fallback()
        }
    }
}
