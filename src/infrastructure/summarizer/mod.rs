pub mod openai;

pub use openai::{OpenAiConfig, OpenAiSummarizer};
