//! Chat markup for instruction-tuned model families.
//!
//! Base completion endpoints take a raw string, so a system instruction has
//! to be framed in whatever template the model was tuned on. Detection is a
//! substring check on the model id; unknown families get a plain layout.

/// Prompt-template family, detected from the model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Llama3,
    Phi3,
    Generic,
}

impl ModelFamily {
    /// Detect the family from a hub model id.
    pub fn detect(model_id: &str) -> Self {
        let id = model_id.to_ascii_lowercase();
        if id.contains("llama-3") {
            Self::Llama3
        } else if id.contains("phi-3") {
            Self::Phi3
        } else {
            Self::Generic
        }
    }
}

/// Wrap a system instruction and user prompt in the chat markup of the
/// model family behind `model_id`. Both segments are trimmed first.
pub fn render(model_id: &str, system: &str, user: &str) -> String {
    let system = system.trim();
    let user = user.trim();

    match ModelFamily::detect(model_id) {
        ModelFamily::Llama3 => format!(
            "<|begin_of_text|><|start_header_id|>system<|end_header_id|>\n\
             {system}\n\
             <|eot_id|><|start_header_id|>user<|end_header_id|>\n\
             {user}\n\
             <|eot_id|><|start_header_id|>assistant<|end_header_id|>\n"
        ),
        ModelFamily::Phi3 => format!(
            "<|system|>\n{system}\n<|user|>\n{user}\n<|assistant|>\n"
        ),
        ModelFamily::Generic => format!("{system}\n\nUser:\n{user}\nAssistant:"),
    }
}
