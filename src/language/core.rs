use anyhow::{anyhow, Context, Result};
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A fixed word list embedded in the binary
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn new(file_name: &str) -> Result<Self> {
        read_language_from_file(&format!("{file_name}.json"))?.validate()
    }

    pub fn english() -> Result<Self> {
        Self::new("english")
    }

    /// A usable list is non-empty and its declared size matches its words
    fn validate(self) -> Result<Self> {
        if self.words.is_empty() {
            return Err(anyhow!("word list `{}` is empty", self.name));
        }
        if self.size as usize != self.words.len() {
            return Err(anyhow!(
                "word list `{}` declares {} words but holds {}",
                self.name,
                self.size,
                self.words.len()
            ));
        }
        Ok(self)
    }

    /// Draws `num` words uniformly at random, with replacement.
    pub fn get_random<R: Rng + ?Sized>(&self, num: usize, rng: &mut R) -> Vec<&str> {
        (0..num)
            .filter_map(|_| self.words.choose(rng).map(String::as_str))
            .collect()
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| anyhow!("language file not found: {file_name}"))?;

    let file_as_str = file
        .contents_utf8()
        .with_context(|| format!("language file {file_name} is not valid utf-8"))?;

    from_str(file_as_str).with_context(|| format!("unable to deserialize language {file_name}"))
}
