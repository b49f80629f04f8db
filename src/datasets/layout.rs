use std::path::{Path, PathBuf};

use super::Source;

/// The merged output of the preparation step
pub static MERGED_FILE: &str = "multilang_sentiment_data.csv";

/// Default top-level data directory
pub static DEFAULT_DATA_DIR: &str = "data";

/// Default directory for the trained model, its config and tokenizer
pub static DEFAULT_ARTIFACT_DIR: &str = "models/multilang_sentiment_model";

/// Where each job reads and writes its files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    /// Raw and merged datasets
    pub data_dir: PathBuf,

    /// Trained model artifacts
    pub artifact_dir: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_ARTIFACT_DIR)
    }
}

impl DataLayout {
    /// Create a layout rooted at the given directories
    pub fn new(data_dir: impl AsRef<Path>, artifact_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            artifact_dir: artifact_dir.as_ref().to_path_buf(),
        }
    }

    /// Override the data directory, keeping the artifact directory
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Override the artifact directory, keeping the data directory
    pub fn with_artifact_dir(mut self, artifact_dir: impl AsRef<Path>) -> Self {
        self.artifact_dir = artifact_dir.as_ref().to_path_buf();
        self
    }

    /// The raw file for a source
    pub fn source(&self, source: Source) -> PathBuf {
        self.data_dir.join(source.file_name())
    }

    /// The merged, cleaned dataset
    pub fn merged(&self) -> PathBuf {
        self.data_dir.join(MERGED_FILE)
    }

    /// Saved training and model configuration
    pub fn config(&self) -> PathBuf {
        self.artifact_dir.join("config.json")
    }

    /// Model record, without the extension the recorder appends
    pub fn model(&self) -> PathBuf {
        self.artifact_dir.join("model")
    }

    /// Tokenizer written by training
    pub fn tokenizer(&self) -> PathBuf {
        self.artifact_dir.join("tokenizer.json")
    }

    /// Tokenizer written by the repair job
    pub fn tokenizer_fixed(&self) -> PathBuf {
        self.artifact_dir.join("tokenizer_fixed.json")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn resolves_default_file_names() {
        let layout = DataLayout::default().with_data_dir("/tmp/data");

        assert_eq!(
            layout.source(Source::ArabicPositive),
            PathBuf::from("/tmp/data/train_Arabic_tweets_positive_20190413.tsv")
        );
        assert_eq!(
            layout.merged(),
            PathBuf::from("/tmp/data/multilang_sentiment_data.csv")
        );
        assert_eq!(
            layout.tokenizer(),
            PathBuf::from("models/multilang_sentiment_model/tokenizer.json")
        );
    }
}
