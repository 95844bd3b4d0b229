// Mock-interview engine: prompt composition, turn-taking, assessment.
// All model calls go through llm_client::ChatModel; nothing here talks HTTP to the provider.

pub mod composer;
pub mod driver;
pub mod finalizer;
pub mod handlers;
pub mod prompts;
pub mod seed;
