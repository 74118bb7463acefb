//! Prompt builder for chat-completion translators.
//!
//! [`PromptBuilder`] renders a template with `{from}`, `{to}` and `{text}`
//! placeholders into a single user-role message.  When an explanation
//! language is configured and the source text is in that language, an extra
//! instruction asks the model to append a `---`-delimited note about
//! mistakes in the source.  The delimiter is never parsed here; splitting is
//! left to the display side.

use super::Language;

/// Default template: translation only, line breaks preserved.
pub const DEFAULT_TEMPLATE: &str = "\
Translate the following text from {from} to {to}.
Reply with ONLY the translated text: no quotes, no notes, no commentary.
Preserve the original line breaks exactly.

{text}";

/// Appended when the source is in the explanation language.
const EXPLANATION_INSTRUCTION: &str = "\n\nIf the source text contains grammar, spelling or word-choice mistakes, \
append a line containing only `---` after the translation, followed by a \
short explanation of the mistakes in {from}. If there are no mistakes, do \
not add the `---` line.";

/// Builds translation prompts.
///
/// # Example
/// ```rust
/// use hotkey_translator::translate::{Language, PromptBuilder};
///
/// let builder = PromptBuilder::new(None, None);
/// let prompt = builder.build("Привет", Language::Russian, Language::English);
/// assert!(prompt.contains("from Russian to English"));
/// assert!(prompt.ends_with("Привет"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
    explain_language: Option<String>,
}

impl PromptBuilder {
    /// `template` falls back to [`DEFAULT_TEMPLATE`]; `explain_language` is
    /// an ISO-639-1 code such as `"en"`.
    pub fn new(template: Option<&str>, explain_language: Option<&str>) -> Self {
        Self {
            template: template.unwrap_or(DEFAULT_TEMPLATE).to_string(),
            explain_language: explain_language.map(|l| l.trim().to_ascii_lowercase()),
        }
    }

    /// Render the user message for one request.
    pub fn build(&self, text: &str, from: Language, to: Language) -> String {
        let mut prompt = render(&self.template, text, from, to);
        if self.wants_explanation(from) {
            prompt.push_str(&render(EXPLANATION_INSTRUCTION, text, from, to));
        }
        prompt
    }

    fn wants_explanation(&self, from: Language) -> bool {
        self.explain_language.as_deref() == Some(from.code())
    }
}

/// `{text}` is substituted last so placeholders inside the user's selection
/// stay literal.
fn render(template: &str, text: &str, from: Language, to: Language) -> String {
    let filled = template
        .replace("{from}", from.english_name())
        .replace("{to}", to.english_name());
    filled.replace("{text}", text)
}
