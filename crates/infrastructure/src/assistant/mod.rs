pub mod prompts;

pub use prompts::{analysis_prompt, parse_analysis, suggestion_prompt, PromptPair};
