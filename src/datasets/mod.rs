use std::{fmt::Display, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// Default file locations
pub mod layout;

/// The raw English, French and Arabic tweet files
pub mod sources;

/// Column inspection of the raw files
pub mod columns;

/// Cleaning, sampling and merging the raw files
pub mod prepare;

/// Label quality report for the merged file
pub mod quality;

/// The merged dataset used for training
pub mod merged;

pub use layout::DataLayout;
pub use merged::{Item, RawRecord, SentimentDataset};
pub use sources::Source;

/// Sentiment classes, written with their French labels
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    /// Class 0
    #[serde(rename = "négatif")]
    Negative,

    /// Class 1
    #[serde(rename = "positif")]
    Positive,
}

impl Sentiment {
    /// Number of sentiment classes
    pub const COUNT: usize = 2;

    /// The label written to the merged dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "négatif",
            Sentiment::Positive => "positif",
        }
    }

    /// The class index used for training
    pub fn class_id(&self) -> usize {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }
}

impl FromStr for Sentiment {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "négatif" => Ok(Sentiment::Negative),
            "positif" => Ok(Sentiment::Positive),
            _ => Err(DatasetError::UnknownSentiment(value.to_string())),
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tweet language
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English
    En,

    /// French
    Fr,

    /// Arabic
    Ar,
}

impl Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Lang::En => "en",
            Lang::Fr => "fr",
            Lang::Ar => "ar",
        };

        write!(f, "{}", name)
    }
}

/// One cleaned row of the merged dataset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Normalized tweet text
    pub cleaned_text: String,

    /// Sentiment label, absent when the source label was not recognized
    pub sentiment: Option<Sentiment>,

    /// Source language
    pub lang: Lang,
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Filesystem failure
    #[error("dataset file error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV/TSV
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not in the header
    #[error("column {column} not found in {}", .path.display())]
    MissingColumn {
        /// The missing column name
        column: String,

        /// The file that was read
        path: PathBuf,
    },

    /// Rows that cannot be used for training
    #[error("found {0} rows with a missing or invalid sentiment")]
    InvalidLabels(usize),

    /// Not one of the two sentiment labels
    #[error("unknown sentiment label {0}")]
    UnknownSentiment(String),

    /// A file with no rows
    #[error("no rows found in {}", .0.display())]
    Empty(PathBuf),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sentiment_labels_and_class_ids() {
        assert_eq!("positif".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::Negative.class_id(), 0);
        assert_eq!(Sentiment::Positive.class_id(), 1);
        assert!("neutre".parse::<Sentiment>().is_err());
    }
}
