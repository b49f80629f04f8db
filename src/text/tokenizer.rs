//! A word-level tokenizer compatible with the Keras `Tokenizer` artifact format

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::utils::files;

/// The class name recorded in serialized tokenizer artifacts
pub static CLASS_NAME: &str = "Tokenizer";

/// Characters stripped from text before splitting it into words
pub static DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Tokenizer settings, persisted alongside the word index
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Only words ranked below this index are kept when encoding
    pub num_words: Option<usize>,

    /// Characters replaced by the split string before splitting
    pub filters: String,

    /// Lowercase text before tokenizing
    pub lower: bool,

    /// Word separator
    pub split: String,

    /// Treat every character as a token
    pub char_level: bool,

    /// Token standing in for unknown words. Takes index 1 when set.
    pub oov_token: Option<String>,

    /// Number of texts the tokenizer was fit on
    pub document_count: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            num_words: None,
            filters: DEFAULT_FILTERS.to_string(),
            lower: true,
            split: " ".to_string(),
            char_level: false,
            oov_token: None,
            document_count: 0,
        }
    }
}

impl TokenizerConfig {
    /// Set the vocabulary cap
    pub fn with_num_words(mut self, num_words: usize) -> Self {
        self.num_words = Some(num_words);
        self
    }

    /// Set the out-of-vocabulary token
    pub fn with_oov_token(mut self, oov_token: impl Into<String>) -> Self {
        self.oov_token = Some(oov_token.into());
        self
    }

    /// Switch to character-level tokens
    pub fn with_char_level(mut self, char_level: bool) -> Self {
        self.char_level = char_level;
        self
    }
}

/// Word -> index vocabulary built from word frequencies
#[derive(Clone, Debug, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,

    /// 1-based word indices, most frequent words first
    word_index: HashMap<String, usize>,

    /// Word frequencies in order of first appearance
    word_counts: Vec<(String, usize)>,

    /// Position of each word in `word_counts`
    positions: HashMap<String, usize>,
}

/// The on-disk layout of a tokenizer
#[derive(Serialize)]
struct ArtifactRef<'a> {
    class_name: &'a str,
    config: &'a TokenizerConfig,
    #[serde(serialize_with = "ordered_by_index")]
    word_index: &'a HashMap<String, usize>,
}

#[derive(Deserialize)]
struct Artifact {
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    config: TokenizerConfig,
    word_index: HashMap<String, usize>,
}

fn ordered_by_index<S: Serializer>(
    word_index: &&HashMap<String, usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut entries: Vec<_> = word_index.iter().collect();
    entries.sort_by_key(|(_, index)| **index);

    serializer.collect_map(entries)
}

impl Tokenizer {
    /// Create an empty tokenizer
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// The tokenizer settings
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// The full word index
    pub fn word_index(&self) -> &HashMap<String, usize> {
        &self.word_index
    }

    /// Look up the index of a single word
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.word_index.get(word).copied()
    }

    /// The index used for unknown words, if an OOV token is configured
    pub fn oov_index(&self) -> Option<usize> {
        self.config
            .oov_token
            .as_ref()
            .and_then(|token| self.index_of(token))
    }

    /// The smallest embedding table size able to hold every index this tokenizer emits
    pub fn vocab_size(&self) -> usize {
        let indexed = self.word_index.len() + 1;

        match self.config.num_words {
            Some(num_words) => num_words.min(indexed),
            None => indexed,
        }
    }

    /// Lower the word cap so every emitted index stays below `num_words`
    pub fn limit_num_words(&mut self, num_words: usize) {
        let limit = match self.config.num_words {
            Some(current) => current.min(num_words),
            None => num_words,
        };

        self.config.num_words = Some(limit);
    }

    /// The top words with their indices, most frequent first
    pub fn top_words(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .word_index
            .iter()
            .map(|(word, index)| (word.as_str(), *index))
            .collect();
        entries.sort_by_key(|(_, index)| *index);
        entries.truncate(n);

        entries
    }

    /// Split a text into tokens according to the configuration
    pub fn text_to_word_sequence(&self, text: &str) -> Vec<String> {
        let text = if self.config.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.config.char_level {
            return text.chars().map(String::from).collect();
        }

        let split = if self.config.split.is_empty() {
            " "
        } else {
            self.config.split.as_str()
        };

        let translated: String = text
            .chars()
            .map(|c| {
                if self.config.filters.contains(c) {
                    split.to_string()
                } else {
                    c.to_string()
                }
            })
            .collect();

        translated
            .split(split)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Update word frequencies from the given texts and rebuild the word index
    pub fn fit_on_texts<S: AsRef<str>>(&mut self, texts: &[S]) {
        for text in texts {
            self.config.document_count += 1;

            for word in self.text_to_word_sequence(text.as_ref()) {
                match self.positions.get(&word) {
                    Some(&position) => self.word_counts[position].1 += 1,
                    None => {
                        self.positions.insert(word.clone(), self.word_counts.len());
                        self.word_counts.push((word, 1));
                    }
                }
            }
        }

        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        let mut ranked: Vec<_> = self.word_counts.iter().collect();

        // Stable sort keeps first-appearance order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let vocabulary = self
            .config
            .oov_token
            .iter()
            .chain(
                ranked
                    .into_iter()
                    .map(|(word, _)| word)
                    .filter(|word| Some(*word) != self.config.oov_token.as_ref()),
            )
            .cloned();

        self.word_index = vocabulary
            .enumerate()
            .map(|(i, word)| (word, i + 1))
            .collect();

        log::debug!("Tokenizer indexed {} words", self.word_index.len());
    }

    /// Encode one text as word indices
    pub fn text_to_sequence(&self, text: &str) -> Vec<usize> {
        let oov_index = self.oov_index();

        self.text_to_word_sequence(text)
            .iter()
            .filter_map(|word| match self.word_index.get(word) {
                Some(&index) => match self.config.num_words {
                    Some(num_words) if index >= num_words => oov_index,
                    _ => Some(index),
                },
                None => oov_index,
            })
            .collect()
    }

    /// Encode each text as word indices
    pub fn texts_to_sequences<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<usize>> {
        texts
            .iter()
            .map(|text| self.text_to_sequence(text.as_ref()))
            .collect()
    }

    /// Serialize the tokenizer in the artifact format
    pub fn to_json(&self) -> Result<String, TokenizerError> {
        let artifact = ArtifactRef {
            class_name: CLASS_NAME,
            config: &self.config,
            word_index: &self.word_index,
        };

        Ok(serde_json::to_string(&artifact)?)
    }

    /// Deserialize a tokenizer from the artifact format
    pub fn from_json(json: &str) -> Result<Self, TokenizerError> {
        let value: Value = serde_json::from_str(json)?;

        match value.get("word_index") {
            Some(Value::String(_)) => return Err(TokenizerError::EncodedWordIndex),
            Some(Value::Object(_)) => {}
            Some(_) | None => return Err(TokenizerError::MissingWordIndex),
        }

        let artifact: Artifact = serde_json::from_value(value)?;

        if let Some(class_name) = artifact.class_name {
            if class_name != CLASS_NAME {
                return Err(TokenizerError::UnexpectedClass(class_name));
            }
        }

        Ok(Self {
            config: artifact.config,
            word_index: artifact.word_index,
            ..Default::default()
        })
    }

    /// Write the tokenizer to a JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), TokenizerError> {
        files::write_string(path, &self.to_json()?).await?;

        Ok(())
    }

    /// Read a tokenizer from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TokenizerError> {
        let json = files::read_to_string(path).await?;

        Self::from_json(&json)
    }
}

/// Tokenizer Error
#[derive(thiserror::Error, Debug)]
pub enum TokenizerError {
    /// The artifact could not be read or written
    #[error("tokenizer file error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact is not valid JSON
    #[error("invalid tokenizer json: {0}")]
    Json(#[from] serde_json::Error),

    /// The word index is a JSON-encoded string instead of an object
    #[error("word_index is stored as an encoded string, repair the file with fix_tokenizer first")]
    EncodedWordIndex,

    /// The word index is absent or not an object
    #[error("the tokenizer json has no word_index object")]
    MissingWordIndex,

    /// The artifact describes something other than a tokenizer
    #[error("expected class_name Tokenizer, found {0}")]
    UnexpectedClass(String),
}
