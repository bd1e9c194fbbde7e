use std::fmt;

use serde::{Deserialize, Serialize};

/// Content category assigned to a slide by the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Problem,
    Solution,
    Market,
    Traction,
    Team,
    Competition,
    BusinessModel,
    Ask,
    General,
}

impl SlideType {
    /// Categories every complete pitch deck is expected to cover, in report order
    pub const CANONICAL: [SlideType; 7] = [
        SlideType::Problem,
        SlideType::Solution,
        SlideType::Market,
        SlideType::Traction,
        SlideType::Team,
        SlideType::BusinessModel,
        SlideType::Ask,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideType::Problem => "problem",
            SlideType::Solution => "solution",
            SlideType::Market => "market",
            SlideType::Traction => "traction",
            SlideType::Team => "team",
            SlideType::Competition => "competition",
            SlideType::BusinessModel => "business_model",
            SlideType::Ask => "ask",
            SlideType::General => "general",
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One segment of the input deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based position in the deck
    pub id: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    /// Trimmed slide text
    pub content: String,
}
