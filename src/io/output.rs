use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{DeckFeedback, SlideFeedback};

/// Write the deck feedback as pretty-printed JSON
pub fn write_json_report(feedback: &DeckFeedback, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, feedback).context("Failed to write JSON")?;
    Ok(())
}

/// Plain-text rendering of deck feedback
pub struct HumanReport<'a> {
    feedback: &'a DeckFeedback,
}

impl<'a> HumanReport<'a> {
    pub fn new(feedback: &'a DeckFeedback) -> Self {
        Self { feedback }
    }

    pub fn format(&self) -> String {
        let overall = &self.feedback.overall_feedback;
        let mut output = String::new();

        output.push_str("Pitch Deck Feedback\n");
        output.push_str("===================\n");
        output.push_str(&format!("Slides: {}\n", self.feedback.slide_feedback.len()));
        output.push_str(&format!("Overall score: {}\n", format_score(overall.overall_score)));
        output.push_str(&format!("Clarity: {}\n", format_score(overall.overall_clarity)));
        output.push_str(&format!(
            "Investor appeal: {}\n\n",
            format_score(overall.overall_investor_appeal)
        ));

        if !overall.missing_slide_types.is_empty() {
            let missing: Vec<&str> = overall.missing_slide_types.iter().map(|t| t.as_str()).collect();
            output.push_str(&format!("Missing slides: {}\n\n", missing.join(", ")));
        }

        if !overall.top_recommendations.is_empty() {
            output.push_str("Top recommendations\n");
            output.push_str("-------------------\n");
            for (i, rec) in overall.top_recommendations.iter().enumerate() {
                output.push_str(&wrap_text(&format!("{}. {}", i + 1, rec), 80));
                output.push('\n');
            }
            output.push('\n');
        }

        for slide in &self.feedback.slide_feedback {
            output.push_str(&format_slide(slide));
            output.push('\n');
        }

        output
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn format_slide(slide: &SlideFeedback) -> String {
    let feedback = &slide.feedback;
    let mut output = format!(
        "[{}] {} ({})\n",
        slide.slide_id, slide.slide_title, slide.slide_type
    );
    output.push_str(&format!(
        "  clarity {} / investor {}\n",
        feedback.clarity.score, feedback.investor.score
    ));

    for flag in &feedback.investor.red_flags {
        output.push_str(&format!("  ! {}\n", flag));
    }
    for rec in &feedback.combined_recommendations {
        output.push_str(&format!("  - {}\n", rec));
    }

    output
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}/10", score),
        None => "n/a".to_string(),
    }
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push_str("\n  ");
            line_len = 2;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AgentFeedback, ClarityFeedback, InvestorFeedback, OverallFeedback, ReportMetadata,
        SlideType,
    };

    fn sample() -> DeckFeedback {
        DeckFeedback {
            slide_feedback: vec![SlideFeedback {
                slide_id: 1,
                slide_title: "The Problem".to_string(),
                slide_type: SlideType::Problem,
                feedback: AgentFeedback {
                    clarity: ClarityFeedback::fallback(),
                    investor: InvestorFeedback {
                        red_flags: vec!["No evidence".to_string()],
                        ..InvestorFeedback::fallback()
                    },
                    combined_recommendations: vec!["Cite a source".to_string()],
                },
            }],
            overall_feedback: OverallFeedback {
                overall_clarity: Some(5.0),
                overall_investor_appeal: Some(5.0),
                overall_score: Some(5.0),
                missing_slide_types: vec![SlideType::Team, SlideType::BusinessModel],
                top_recommendations: vec!["Cite a source".to_string()],
            },
            metadata: ReportMetadata::new(1, "gpt-4"),
        }
    }

    #[test]
    fn test_human_report_sections() {
        let deck = sample();
        let text = HumanReport::new(&deck).format();

        assert!(text.contains("Overall score: 5.0/10"));
        assert!(text.contains("Missing slides: team, business_model"));
        assert!(text.contains("1. Cite a source"));
        assert!(text.contains("[1] The Problem (problem)"));
        assert!(text.contains("  ! No evidence"));
    }

    #[test]
    fn test_format_score_empty_deck() {
        assert_eq!(format_score(None), "n/a");
        assert_eq!(format_score(Some(7.26)), "7.3/10");
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_json_report(&sample(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["slideFeedback"][0]["slideType"], "problem");
        assert_eq!(value["overallFeedback"]["overallScore"], 5.0);
    }

    #[test]
    fn test_wrap_text() {
        let text = "1. This is a long recommendation that should wrap onto an indented continuation line";
        let wrapped = wrap_text(text, 30);
        for line in wrapped.lines() {
            assert!(line.len() <= 35);
        }
        assert!(wrapped.lines().skip(1).all(|l| l.starts_with("   ")));
    }
}
