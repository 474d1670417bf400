//! Cleanup for generated text before display.

use std::sync::OnceLock;

use regex::Regex;

static SPECIAL_TOKENS: OnceLock<Regex> = OnceLock::new();

/// Matches chat special tokens such as `<|eot_id|>` or `<|assistant|>`.
fn special_tokens() -> &'static Regex {
    SPECIAL_TOKENS.get_or_init(|| Regex::new(r"<\|.*?\|>").expect("valid special-token pattern"))
}

/// Strip markup artifacts models leak into completions, such as code-fence
/// markers, chat special tokens, and stray end-of-sequence tags. Trims the
/// result. Opt-in; the default output path prints provider text verbatim.
pub fn clean(text: &str) -> String {
    let without_fences = text.replace("```", "");
    let without_tokens = special_tokens().replace_all(&without_fences, "");
    without_tokens.replace("</s>", "").trim().to_string()
}
