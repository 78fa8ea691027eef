// Résumé screening: extract → prompt → parse → validate → persist.
// All model calls go through llm_client; all writes go through storage.

pub mod handlers;
pub mod parse;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod table;
pub mod upload;
pub mod validation;
