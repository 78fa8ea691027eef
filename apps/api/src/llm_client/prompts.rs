// Cross-cutting prompt fragments shared by every prompt sent through the client.
// Each feature that calls the model defines its own prompts.rs alongside it.

/// Instruction appended to prompts whose answer is parsed as a JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond only with the structured JSON and use only these keys. \
Make sure the key names are exactly the ones given. \
Do not add explanations or notes outside the JSON.";
