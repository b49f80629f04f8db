use std::{fmt::Display, fs::File, path::Path};

use crate::text::clean_text;

use super::{DatasetError, Lang, Record, Sentiment};

/// Text encoding of a raw file
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Encoding {
    /// UTF-8, invalid sequences replaced
    Utf8,

    /// ISO-8859-1, every byte is one code point
    Latin1,
}

impl Encoding {
    /// Decode a raw field
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// The raw tweet files merged by the preparation step
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Source {
    /// Sentiment140, English
    Sentiment140,

    /// French tweets
    French,

    /// Arabic tweets labeled negative
    ArabicNegative,

    /// Arabic tweets labeled positive
    ArabicPositive,
}

impl Source {
    /// Every source, in merge order
    pub const ALL: [Source; 4] = [
        Source::Sentiment140,
        Source::French,
        Source::ArabicNegative,
        Source::ArabicPositive,
    ];

    /// The file name under the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Source::Sentiment140 => "training.1600000.processed.noemoticon.csv",
            Source::French => "french_tweets.csv",
            Source::ArabicNegative => "train_Arabic_tweets_negative_20190413.tsv",
            Source::ArabicPositive => "train_Arabic_tweets_positive_20190413.tsv",
        }
    }

    /// A human readable name for reports
    pub fn title(&self) -> &'static str {
        match self {
            Source::Sentiment140 => "Sentiment140",
            Source::French => "French Tweets",
            Source::ArabicNegative => "Arabic Negative",
            Source::ArabicPositive => "Arabic Positive",
        }
    }

    /// The language of every row in the file
    pub fn lang(&self) -> Lang {
        match self {
            Source::Sentiment140 => Lang::En,
            Source::French => Lang::Fr,
            Source::ArabicNegative | Source::ArabicPositive => Lang::Ar,
        }
    }

    /// The file's text encoding
    pub fn encoding(&self) -> Encoding {
        match self {
            Source::Sentiment140 => Encoding::Latin1,
            _ => Encoding::Utf8,
        }
    }

    /// Field separator
    pub fn delimiter(&self) -> u8 {
        match self {
            Source::ArabicNegative | Source::ArabicPositive => b'\t',
            _ => b',',
        }
    }

    /// Whether the first row names the columns
    pub fn has_headers(&self) -> bool {
        matches!(self, Source::French)
    }

    /// Open a reader over the raw rows. The header row, if any, is not skipped.
    pub fn reader(&self, path: &Path) -> Result<csv::Reader<File>, DatasetError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter())
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        Ok(reader)
    }

    /// Read one decoded row
    pub fn decode_row(&self, row: &csv::ByteRecord) -> Vec<String> {
        let encoding = self.encoding();

        row.iter().map(|field| encoding.decode(field)).collect()
    }

    /// Load and clean every row of the file
    pub fn load(&self, path: &Path) -> Result<Vec<Record>, DatasetError> {
        let mut reader = self.reader(path)?;
        let mut rows = reader.byte_records();

        let (label_column, text_column) = if self.has_headers() {
            let header = match rows.next() {
                Some(header) => self.decode_row(&header?),
                None => return Err(DatasetError::Empty(path.to_path_buf())),
            };

            (
                Some(find_column(&header, "label", path)?),
                find_column(&header, "text", path)?,
            )
        } else {
            match self {
                Source::Sentiment140 => (Some(0), 5),
                _ => (None, 1),
            }
        };

        let mut records = Vec::new();

        for row in rows {
            let row = self.decode_row(&row?);
            let text = row.get(text_column).map(String::as_str).unwrap_or_default();

            let sentiment = match label_column {
                Some(column) => row.get(column).and_then(|label| self.map_label(label)),
                None => self.fixed_sentiment(),
            };

            records.push(Record {
                cleaned_text: clean_text(text),
                sentiment,
                lang: self.lang(),
            });
        }

        log::info!(
            "Loaded {} rows from {} ({})",
            records.len(),
            self.title(),
            path.display()
        );

        Ok(records)
    }

    /// Translate a numeric source label. Unrecognized labels are left missing.
    pub fn map_label(&self, label: &str) -> Option<Sentiment> {
        match (self, label.trim()) {
            (Source::Sentiment140, "0") | (Source::French, "0") => Some(Sentiment::Negative),
            (Source::Sentiment140, "4") | (Source::French, "1") => Some(Sentiment::Positive),
            _ => None,
        }
    }

    /// The label implied by the file itself
    pub fn fixed_sentiment(&self) -> Option<Sentiment> {
        match self {
            Source::ArabicNegative => Some(Sentiment::Negative),
            Source::ArabicPositive => Some(Sentiment::Positive),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Source {
    type Error = SourceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "sentiment140" | "en" => Ok(Source::Sentiment140),
            "french" | "fr" => Ok(Source::French),
            "arabic-negative" => Ok(Source::ArabicNegative),
            "arabic-positive" => Ok(Source::ArabicPositive),
            _ => Err(SourceError::Unknown(value.to_string())),
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Source::Sentiment140 => "sentiment140",
            Source::French => "french",
            Source::ArabicNegative => "arabic-negative",
            Source::ArabicPositive => "arabic-positive",
        };

        write!(f, "{}", name)
    }
}

/// Source Error
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// No source found for the given string
    #[error("no source found for {0}")]
    Unknown(String),
}

fn find_column(header: &[String], column: &str, path: &Path) -> Result<usize, DatasetError> {
    header
        .iter()
        .position(|name| name.trim() == column)
        .ok_or_else(|| DatasetError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}
