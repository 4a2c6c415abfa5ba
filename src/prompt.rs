//! Prompt formatting: the five fixed templates sent to the provider.
//!
//! Fields substitute directly into the template strings; missing optional
//! fields render as empty. There is no escaping and no length limit other
//! than the sample excerpt cap applied by [`rewrite_prompt`].

use crate::sample::truncate_chars;

/// Maximum number of characters of the style sample quoted into a rewrite
/// prompt.
pub const SAMPLE_EXCERPT_CHARS: usize = 2000;

/// User-request line used by `/enhance/` when no `style` field is given.
pub const ENHANCE_DEFAULT_REQUEST: &str = "Rewrite in the uploaded style.";

/// User-request line used by `/mimic/` when no `style` field is given.
pub const MIMIC_DEFAULT_REQUEST: &str = "Mimic the uploaded style.";

/// Prompt for `/generate/`: a fresh piece in a mode/genre/tone.
pub fn generate_prompt(mode: &str, genre: &str, tone: &str, input_text: &str) -> String {
    format!("Write a {mode} in the {genre} genre. Tone: {tone}. Start with:\n{input_text}")
}

/// Prompt for `/expand/`: continue an existing piece.
pub fn expand_prompt(mode: &str, input_text: &str) -> String {
    format!("Continue this {mode} in the same tone and style:\n{input_text}")
}

/// Prompt for `/analyze/`: describe tone and style.
pub fn analyze_prompt(input_text: &str) -> String {
    format!("Analyze the tone and writing style of the following text:\n{input_text}")
}

/// Prompt for `/enhance/` and `/mimic/`: rewrite `input_text` in the style
/// of the uploaded sample, quoting at most [`SAMPLE_EXCERPT_CHARS`] of it.
pub fn rewrite_prompt(sample: &str, input_text: &str, user_request: &str) -> String {
    let excerpt = truncate_chars(sample, SAMPLE_EXCERPT_CHARS);
    format!(
        "Rewrite the following text in the uploaded style. \
         Return only the rewritten text, preserving formatting and paragraph breaks. \
         Do not include explanations, commentary, or bullet points.\
         \n\nSample:\n{excerpt}\n\nText to change:\n{input_text}\nUser request: {user_request}"
    )
}
