use crate::language::Language;
use rand::Rng;

/// Configuration for prompt generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGenConfig {
    pub number_of_words: usize,
    pub custom_prompt: Option<String>,
}

/// Produces the target text for each new session
#[derive(Debug, Clone)]
pub struct WordGenerator {
    config: WordGenConfig,
    language: Language,
}

impl WordGenerator {
    pub fn new(config: WordGenConfig, language: Language) -> Self {
        Self { config, language }
    }

    pub fn config(&self) -> &WordGenConfig {
        &self.config
    }

    /// Switch to generated text of `number_of_words` words, dropping any
    /// custom prompt.
    pub fn set_number_of_words(&mut self, number_of_words: usize) {
        self.config.number_of_words = number_of_words;
        self.config.custom_prompt = None;
    }

    /// Generate a prompt and the number of words in it.
    ///
    /// A custom prompt is returned verbatim; otherwise the configured number
    /// of words is drawn from the word list and joined with single spaces.
    pub fn generate_prompt<R: Rng + ?Sized>(&self, rng: &mut R) -> (String, usize) {
        if let Some(ref custom_prompt) = self.config.custom_prompt {
            return (custom_prompt.clone(), count_words(custom_prompt));
        }

        let words = self.language.get_random(self.config.number_of_words, rng);
        (words.join(" "), words.len())
    }
}

/// Number of space-separated words, the way the wpm formula counts them
pub fn count_words(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split(' ').count()
    }
}
