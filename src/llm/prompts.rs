use crate::models::{Slide, SlideType};

/// System prompt for the Clarity Coach agent
pub const CLARITY_SYSTEM_PROMPT: &str = r#"You are the Clarity Coach, an expert in clear, compelling startup communication.
Your job is to analyze pitch deck slides and provide feedback to improve clarity,
messaging, and story impact. Focus on making language simple, sharp, and persuasive.

Provide specific, actionable recommendations for improvement.
Rate clarity on a scale of 1-10 where 10 is perfect clarity.
Structure your response in JSON format."#;

/// System prompt for the Investor agent
pub const INVESTOR_SYSTEM_PROMPT: &str = r#"You are the Investor Agent, an experienced venture capitalist who has
evaluated thousands of startup pitch decks. Your job is to analyze pitch deck slides
from an investor's perspective and provide feedback focusing on traction metrics,
market size (TAM/SAM/SOM), go-to-market strategy, and potential red flags.

Be critical but constructive. Rate investor appeal on a scale of 1-10 where 10
would immediately attract investment. Structure your response in JSON format."#;

/// Build the user prompt for the Clarity Coach
pub fn build_clarity_prompt(slide: &Slide) -> String {
    let mut prompt = String::new();

    prompt.push_str("Please analyze the following pitch deck slide and provide clarity feedback:\n\n");
    push_slide_block(&mut prompt, slide);

    prompt.push_str("Please provide:\n");
    prompt.push_str("1. A clarity score (1-10)\n");
    prompt.push_str("2. Analysis of current clarity issues\n");
    prompt.push_str("3. Specific recommendations for improvement\n");
    prompt.push_str("4. Improved, clearer version of the content\n\n");

    prompt.push_str("Format your response as a JSON object with the following structure:\n");
    prompt.push_str(
        r#"{
  "clarityScore": number,
  "analysis": "string with analysis",
  "recommendations": ["array", "of", "recommendations"],
  "improvedContent": "string with improved content"
}
"#,
    );

    prompt
}

/// Build the user prompt for the Investor agent
pub fn build_investor_prompt(slide: &Slide) -> String {
    let mut prompt = String::new();

    prompt.push_str("Please analyze the following pitch deck slide from an investor's perspective:\n\n");
    push_slide_block(&mut prompt, slide);

    prompt.push_str(investor_guidance(slide.slide_type));
    prompt.push_str("\n\n");

    prompt.push_str("Please provide:\n");
    prompt.push_str("1. An investor appeal score (1-10)\n");
    prompt.push_str("2. Analysis from an investor's perspective\n");
    prompt.push_str("3. Any red flags for investors\n");
    prompt.push_str("4. Specific recommendations for improvement\n");
    prompt.push_str("5. Important elements missing from this slide\n\n");

    prompt.push_str("Format your response as a JSON object with the following structure:\n");
    prompt.push_str(
        r#"{
  "investorScore": number,
  "analysis": "string with analysis",
  "redFlags": ["array", "of", "red flags"],
  "recommendations": ["array", "of", "recommendations"],
  "missingElements": ["array", "of", "missing elements"]
}
"#,
    );

    prompt
}

/// What an investor should focus on for each slide category
pub fn investor_guidance(slide_type: SlideType) -> &'static str {
    match slide_type {
        SlideType::Problem => "Focus on problem validity, market size, and pain point intensity.",
        SlideType::Solution => "Evaluate solution differentiation, scalability, and unique value.",
        SlideType::Market => {
            "Analyze TAM/SAM/SOM credibility, growth potential, and market dynamics."
        }
        SlideType::Traction => {
            "Assess metrics validity, growth curves, user engagement, and revenue trends."
        }
        SlideType::Team => "Evaluate team credentials, domain expertise, and track record.",
        SlideType::Competition => {
            "Analyze competitive landscape awareness, differentiation strategy, and barriers to entry."
        }
        SlideType::BusinessModel => {
            "Evaluate revenue model viability, scaling potential, and unit economics."
        }
        SlideType::Ask => {
            "Assess funding request reasonability, use of funds clarity, and valuation justification."
        }
        SlideType::General => {
            "Evaluate this slide for key investor-relevant information and metrics."
        }
    }
}

fn push_slide_block(prompt: &mut String, slide: &Slide) {
    prompt.push_str(&format!("SLIDE ID: {}\n", slide.id));
    prompt.push_str(&format!("SLIDE TITLE: {}\n", slide.title));
    prompt.push_str(&format!("SLIDE TYPE: {}\n\n", slide.slide_type));
    prompt.push_str("CONTENT:\n");
    prompt.push_str(&slide.content);
    prompt.push_str("\n\n");
}
