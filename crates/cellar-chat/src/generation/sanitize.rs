//! Text sanitization for model-bound and model-produced strings

/// Remove quote characters from text
///
/// Applied to rewritten queries, assembled context, and final answers
/// before they travel further down the pipeline.
pub fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| *c != '\'' && *c != '"').collect()
}
