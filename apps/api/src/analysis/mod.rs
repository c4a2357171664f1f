// Mistake analysis: prompt composition, generation, safety filtering, and
// parsing of the model's reply into the response schema.
// All generations go through llm_client; nothing here spawns processes directly.

pub mod cleaner;
pub mod composer;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod safety;
