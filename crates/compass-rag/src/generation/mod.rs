//! Answer generation with a grounded prompt

mod answer;
pub mod prompt;

pub use answer::{AnswerGenerator, GENERATION_TEMPERATURE};
pub use prompt::{PromptBuilder, CONTEXT_DELIMITER};
