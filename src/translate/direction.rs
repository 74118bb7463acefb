//! Script-based language direction detection.
//!
//! Any character from the Cyrillic block (U+0400–U+04FF) means the selection
//! is Russian and should be translated to English; everything else is
//! treated as English going to Russian.

use std::fmt;

/// Languages the translator switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Russian,
    English,
}

impl Language {
    /// ISO-639-1 code sent to providers.
    pub fn code(self) -> &'static str {
        match self {
            Language::Russian => "ru",
            Language::English => "en",
        }
    }

    /// English name used inside LLM prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::Russian => "Russian",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A `(from, to)` language pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub from: Language,
    pub to: Language,
}

impl Direction {
    /// Resolve the direction for `text`.
    ///
    /// ```
    /// use hotkey_translator::translate::{Direction, Language};
    ///
    /// let d = Direction::detect("Привет мир");
    /// assert_eq!((d.from, d.to), (Language::Russian, Language::English));
    /// ```
    pub fn detect(text: &str) -> Self {
        if text.chars().any(is_cyrillic) {
            Self {
                from: Language::Russian,
                to: Language::English,
            }
        } else {
            Self {
                from: Language::English,
                to: Language::Russian,
            }
        }
    }
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}
