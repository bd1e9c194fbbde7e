pub mod io;
pub mod llm;
pub mod models;
pub mod server;
pub mod stages;

pub use io::{read_deck, write_json_report, HumanReport};
pub use llm::{CompletionClient, OpenAiClient, OpenAiConfig, ValidationConfig};
pub use models::{DeckFeedback, OverallFeedback, Slide, SlideFeedback, SlideType};
pub use server::{run_server, ServerConfig};
pub use stages::{analyze_deck, generate_feedback, segment_deck, AgentConfig};
