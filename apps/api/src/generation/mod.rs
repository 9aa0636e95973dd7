// Cover letter generation: prompt building, the generation call, response
// grammar parsing and in-flight deduplication.
// All LLM calls go through llm_client. Grammar-dependent parsing stays in grammar.rs.

pub mod dedup;
pub mod grammar;
pub mod handlers;
pub mod options;
pub mod prompt_builder;
pub mod prompts;
pub mod section;
pub mod skill_matcher;
