//! Model name mapping

/// Canonical model used for any name the upstream does not know
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Public model aliases and the canonical upstream names they map to
pub const SUPPORTED_MODELS: &[(&str, &str)] = &[
    ("gpt-4o-mini", DEFAULT_MODEL),
    ("claude-3-haiku", "claude-3-haiku-20240307"),
    ("llama-3.1-70b", "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo"),
    ("mixtral-8x7b", "mistralai/Mixtral-8x7B-Instruct-v0.1"),
];

/// Map a caller-supplied model name to the upstream's canonical name.
///
/// Matching ignores ASCII case. Unknown and empty names fall back to
/// [`DEFAULT_MODEL`].
pub fn map_model(requested: &str) -> &'static str {
    let requested = requested.to_ascii_lowercase();

    SUPPORTED_MODELS
        .iter()
        .find(|(alias, _)| *alias == requested)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(DEFAULT_MODEL)
}
