use std::collections::HashSet;

use futures::future::join_all;
use tracing::info;

use super::{AgentConfig, clarity_coach, investor_agent};
use crate::llm::CompletionClient;
use crate::models::{
    AgentFeedback, ClarityFeedback, DeckFeedback, InvestorFeedback, OverallFeedback,
    ReportMetadata, Slide, SlideFeedback, SlideType,
};

/// Characters of an investor recommendation compared against collected ones
const DUPLICATE_PREFIX_CHARS: usize = 20;

/// Maximum number of deck-level recommendations
pub const TOP_RECOMMENDATIONS: usize = 5;

/// Run both agents over every slide and aggregate the results
///
/// All slides are analyzed concurrently; within a slide the two agents run
/// concurrently too. Agents resolve to fallbacks on failure, so this never
/// fails.
pub async fn generate_feedback<C: CompletionClient>(
    client: &C,
    slides: &[Slide],
    config: &AgentConfig,
) -> DeckFeedback {
    info!("Analyzing {} slides", slides.len());

    let slide_feedback: Vec<SlideFeedback> =
        join_all(slides.iter().map(|slide| analyze_slide(client, slide, config))).await;

    let overall_feedback = overall_feedback(slides, &slide_feedback);

    info!(
        "Deck analyzed: overall score {:?}, {} canonical slide types missing",
        overall_feedback.overall_score,
        overall_feedback.missing_slide_types.len()
    );

    DeckFeedback {
        metadata: ReportMetadata::new(slides.len(), client.model()),
        slide_feedback,
        overall_feedback,
    }
}

/// Run both agents on one slide and merge their recommendations
pub async fn analyze_slide<C: CompletionClient>(
    client: &C,
    slide: &Slide,
    config: &AgentConfig,
) -> SlideFeedback {
    let (clarity, investor) = tokio::join!(
        clarity_coach(client, slide, config),
        investor_agent(client, slide, config)
    );

    let combined_recommendations = combine_recommendations(&clarity, &investor);

    SlideFeedback {
        slide_id: slide.id,
        slide_title: slide.title.clone(),
        slide_type: slide.slide_type,
        feedback: AgentFeedback {
            clarity,
            investor,
            combined_recommendations,
        },
    }
}

/// Clarity recommendations first, then investor recommendations that do not
/// look like something already collected
///
/// An investor recommendation counts as a duplicate when its lowercased
/// first 20 characters appear inside any collected recommendation.
pub fn combine_recommendations(
    clarity: &ClarityFeedback,
    investor: &InvestorFeedback,
) -> Vec<String> {
    let mut recommendations = clarity.recommendations.clone();

    for rec in &investor.recommendations {
        let prefix: String = rec.to_lowercase().chars().take(DUPLICATE_PREFIX_CHARS).collect();
        let is_duplicate = recommendations
            .iter()
            .any(|existing| existing.to_lowercase().contains(&prefix));

        if !is_duplicate {
            recommendations.push(rec.clone());
        }
    }

    recommendations
}

/// Deck-level scores, missing categories and top recommendations
pub fn overall_feedback(slides: &[Slide], slide_feedback: &[SlideFeedback]) -> OverallFeedback {
    let average_clarity = mean(slide_feedback.iter().map(|sf| sf.feedback.clarity.score));
    let average_investor = mean(slide_feedback.iter().map(|sf| sf.feedback.investor.score));

    let overall_score = match (average_clarity, average_investor) {
        (Some(clarity), Some(investor)) => Some(round_one_decimal((clarity + investor) / 2.0)),
        _ => None,
    };

    let present: Vec<SlideType> = slides.iter().map(|s| s.slide_type).collect();
    let all_recommendations = slide_feedback
        .iter()
        .flat_map(|sf| sf.feedback.combined_recommendations.iter());

    OverallFeedback {
        overall_clarity: average_clarity.map(round_one_decimal),
        overall_investor_appeal: average_investor.map(round_one_decimal),
        overall_score,
        missing_slide_types: missing_slide_types(&present),
        top_recommendations: top_recommendations(all_recommendations, TOP_RECOMMENDATIONS),
    }
}

/// Canonical categories not present in the deck, in canonical order
pub fn missing_slide_types(present: &[SlideType]) -> Vec<SlideType> {
    SlideType::CANONICAL
        .into_iter()
        .filter(|slide_type| !present.contains(slide_type))
        .collect()
}

/// First `count` distinct recommendations in the order they were seen
pub fn top_recommendations<'a>(
    recommendations: impl IntoIterator<Item = &'a String>,
    count: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    recommendations
        .into_iter()
        .filter(|rec| seen.insert(*rec))
        .take(count)
        .cloned()
        .collect()
}

/// Arithmetic mean, `None` for an empty sequence
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::segment_deck;
    use crate::stages::testing::ScriptedClient;

    fn clarity_with(recs: &[&str], score: f64) -> ClarityFeedback {
        ClarityFeedback {
            score,
            analysis: "ok".to_string(),
            recommendations: recs.iter().map(|r| r.to_string()).collect(),
            improved_content: None,
        }
    }

    fn investor_with(recs: &[&str], score: f64) -> InvestorFeedback {
        InvestorFeedback {
            score,
            analysis: "ok".to_string(),
            red_flags: vec![],
            recommendations: recs.iter().map(|r| r.to_string()).collect(),
            missing_elements: vec![],
        }
    }

    fn feedback_for(slide: &Slide, clarity: f64, investor: f64, recs: &[&str]) -> SlideFeedback {
        SlideFeedback {
            slide_id: slide.id,
            slide_title: slide.title.clone(),
            slide_type: slide.slide_type,
            feedback: AgentFeedback {
                clarity: clarity_with(&[], clarity),
                investor: investor_with(&[], investor),
                combined_recommendations: recs.iter().map(|r| r.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_combine_drops_prefix_duplicates() {
        let clarity = clarity_with(&["Add specific revenue numbers to the slide"], 7.0);
        let investor = investor_with(
            &[
                "ADD SPECIFIC REVENUE figures please",
                "Show customer retention",
            ],
            6.0,
        );

        let combined = combine_recommendations(&clarity, &investor);

        assert_eq!(
            combined,
            vec![
                "Add specific revenue numbers to the slide",
                "Show customer retention",
            ]
        );
    }

    #[test]
    fn test_combine_checks_against_earlier_investor_items() {
        let clarity = clarity_with(&[], 7.0);
        let investor = investor_with(
            &["Quantify the market size clearly", "Quantify the market size"],
            6.0,
        );

        let combined = combine_recommendations(&clarity, &investor);

        assert_eq!(combined, vec!["Quantify the market size clearly"]);
    }

    #[test]
    fn test_missing_slide_types_for_problem_only_deck() {
        let missing = missing_slide_types(&[SlideType::Problem]);

        assert_eq!(missing.len(), 6);
        assert!(!missing.contains(&SlideType::Problem));
        assert_eq!(missing[0], SlideType::Solution);
        assert_eq!(missing[5], SlideType::Ask);
    }

    #[test]
    fn test_missing_ignores_non_canonical_types() {
        let missing = missing_slide_types(&[SlideType::Competition, SlideType::General]);
        assert_eq!(missing, SlideType::CANONICAL.to_vec());
    }

    #[test]
    fn test_top_recommendations_dedups_and_truncates() {
        let recs: Vec<String> = ["a", "b", "a", "c", "d", "b", "e", "f", "g"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let top = top_recommendations(&recs, TOP_RECOMMENDATIONS);

        assert_eq!(top, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_overall_scores_are_rounded_means() {
        let slides = segment_deck("Problem here\n---\nSolution there\n---\nOur team");
        let feedback = vec![
            feedback_for(&slides[0], 7.0, 4.0, &["x"]),
            feedback_for(&slides[1], 8.0, 5.0, &["x", "y"]),
            feedback_for(&slides[2], 8.0, 5.0, &[]),
        ];

        let overall = overall_feedback(&slides, &feedback);

        // clarity 23/3 = 7.667, investor 14/3 = 4.667, overall 6.1667
        assert_eq!(overall.overall_clarity, Some(7.7));
        assert_eq!(overall.overall_investor_appeal, Some(4.7));
        assert_eq!(overall.overall_score, Some(6.2));
        assert_eq!(overall.top_recommendations, vec!["x", "y"]);
        assert_eq!(
            overall.missing_slide_types,
            vec![
                SlideType::Market,
                SlideType::Traction,
                SlideType::BusinessModel,
                SlideType::Ask,
            ]
        );
    }

    #[test]
    fn test_empty_deck_has_no_scores() {
        let overall = overall_feedback(&[], &[]);

        assert_eq!(overall.overall_clarity, None);
        assert_eq!(overall.overall_investor_appeal, None);
        assert_eq!(overall.overall_score, None);
        assert_eq!(overall.missing_slide_types.len(), 7);
        assert!(overall.top_recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_generate_feedback_with_failing_client_uses_fallbacks() {
        let client = ScriptedClient::fixed(None, None);
        let slides = segment_deck("Problem: churn\n---\nSolution: alerts");

        let deck = generate_feedback(&client, &slides, &AgentConfig::default()).await;

        assert_eq!(deck.slide_feedback.len(), 2);
        for sf in &deck.slide_feedback {
            assert_eq!(sf.feedback.clarity, ClarityFeedback::fallback());
            assert_eq!(sf.feedback.investor, InvestorFeedback::fallback());
            assert_eq!(sf.feedback.combined_recommendations.len(), 2);
        }
        assert_eq!(deck.overall_feedback.overall_score, Some(5.0));
        assert_eq!(deck.overall_feedback.top_recommendations.len(), 2);
        assert_eq!(deck.metadata.slide_count, 2);
        assert_eq!(deck.metadata.model, ScriptedClient::MODEL);
    }

    #[tokio::test]
    async fn test_generate_feedback_keeps_slide_order_and_bounds() {
        let client = ScriptedClient::new(|system, user| {
            let score = if user.contains("SLIDE ID: 1") { 9 } else { 2 };
            if system.contains("Clarity Coach") {
                Ok(format!(
                    r#"{{"clarityScore": {score}, "analysis": "a", "recommendations": ["Tighten the headline so it states the problem", "Use one number per point"]}}"#
                ))
            } else {
                Ok(format!(
                    r#"{{"investorScore": {score}, "analysis": "b", "recommendations": ["Tighten the headline wording", "Show CAC/LTV", "Name lead investor", "State runway", "Add logo wall"]}}"#
                ))
            }
        });
        let slides = segment_deck("1. Problem: churn\n2. Market: TAM $5B\n3. We are seeking $1M");

        let deck = generate_feedback(&client, &slides, &AgentConfig::default()).await;
        let overall = &deck.overall_feedback;

        let ids: Vec<u32> = deck.slide_feedback.iter().map(|sf| sf.slide_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(deck.slide_feedback[0].feedback.combined_recommendations.len(), 6);

        let score = overall.overall_score.unwrap();
        assert!((1.0..=10.0).contains(&score));
        assert_eq!(overall.overall_clarity, Some(4.3));
        assert_eq!(overall.overall_score, Some(4.3));
        assert_eq!(overall.top_recommendations.len(), TOP_RECOMMENDATIONS);

        let unique: HashSet<&String> = overall.top_recommendations.iter().collect();
        assert_eq!(unique.len(), overall.top_recommendations.len());
        assert!(!overall.missing_slide_types.contains(&SlideType::Problem));
        assert!(!overall.missing_slide_types.contains(&SlideType::Market));
        assert!(!overall.missing_slide_types.contains(&SlideType::Ask));
    }

    /// Every call blocks until all expected calls are in flight at once
    struct BarrierClient {
        barrier: std::sync::Arc<tokio::sync::Barrier>,
    }

    impl CompletionClient for BarrierClient {
        async fn complete_json(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            self.barrier.wait().await;
            anyhow::bail!("released")
        }

        fn model(&self) -> &str {
            "barrier"
        }
    }

    #[tokio::test]
    async fn test_generate_feedback_runs_all_agent_calls_concurrently() {
        let slides = segment_deck("Problem: churn\n---\nSolution: alerts\n---\nOur team");
        let client = BarrierClient {
            barrier: std::sync::Arc::new(tokio::sync::Barrier::new(2 * slides.len())),
        };

        let deck = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            generate_feedback(&client, &slides, &AgentConfig::default()),
        )
        .await
        .expect("agent calls were not all in flight together");

        assert_eq!(deck.slide_feedback.len(), 3);
        assert_eq!(deck.overall_feedback.overall_score, Some(5.0));
    }
}
