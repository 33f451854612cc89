//! Grounded answer generation

pub mod answer;
pub mod prompt;

pub use answer::AnswerSynthesizer;
pub use prompt::PromptBuilder;
