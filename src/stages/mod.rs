pub mod stage0_segment;
pub mod stage1_agents;
pub mod stage2_aggregate;

pub use stage0_segment::*;
pub use stage1_agents::*;
pub use stage2_aggregate::*;

use crate::llm::CompletionClient;
use crate::models::DeckFeedback;

/// Segment raw deck text and run the full feedback pipeline over it
pub async fn analyze_deck<C: CompletionClient>(
    client: &C,
    raw: &str,
    config: &AgentConfig,
) -> DeckFeedback {
    let slides = segment_deck(raw);
    generate_feedback(client, &slides, config).await
}
