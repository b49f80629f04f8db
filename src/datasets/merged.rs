use std::path::Path;

use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::pipelines::text_classification;

use super::{DatasetError, Sentiment};

/// A row of the merged file, read without assuming it is well formed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Normalized text
    pub cleaned_text: Option<String>,

    /// Sentiment label as written
    pub sentiment: Option<String>,

    /// Language code as written
    pub lang: Option<String>,
}

/// Cell values read as missing, on top of empty cells. Lowercased tweets such as `nan` or
/// `null` end up here too.
pub const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn not_na(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !NA_VALUES.contains(&value.as_str()))
}

impl RawRecord {
    fn without_na(self) -> Self {
        Self {
            cleaned_text: not_na(self.cleaned_text),
            sentiment: not_na(self.sentiment),
            lang: not_na(self.lang),
        }
    }
}

/// Read every row of the merged file. Empty cells and [`NA_VALUES`] are read as missing.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in ["cleaned_text", "sentiment"] {
        if !headers.iter().any(|name| name == column) {
            return Err(DatasetError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let mut records = Vec::new();
    for record in reader.deserialize::<RawRecord>() {
        records.push(record?.without_na());
    }

    Ok(records)
}

/// A labeled text ready for the classifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Item {
    /// The text for classification
    pub text: String,

    /// The sentiment of the text
    pub sentiment: Sentiment,
}

impl text_classification::Item for Item {
    fn input(&self) -> &str {
        &self.text
    }

    fn class_id(&self) -> usize {
        self.sentiment.class_id()
    }
}

/// The merged multilingual dataset
pub struct SentimentDataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

impl dataset::Dataset<Item> for SentimentDataset {
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl SentimentDataset {
    /// Wrap already labeled items
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// Build the dataset from merged rows. Missing text is read as empty; any row without a
    /// valid sentiment fails the whole load.
    pub fn from_records(records: Vec<RawRecord>) -> Result<Self, DatasetError> {
        let mut items = Vec::with_capacity(records.len());
        let mut invalid = 0;

        for record in records {
            let sentiment = record
                .sentiment
                .as_deref()
                .and_then(|label| label.parse::<Sentiment>().ok());

            match sentiment {
                Some(sentiment) => {
                    items.push(Item::new(record.cleaned_text.unwrap_or_default(), sentiment))
                }
                None => invalid += 1,
            }
        }

        if invalid > 0 {
            return Err(DatasetError::InvalidLabels(invalid));
        }

        Ok(Self::new(items))
    }

    /// Load the merged CSV file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let dataset = Self::from_records(read_records(path)?)?;

        if dataset.is_empty() {
            return Err(DatasetError::Empty(path.to_path_buf()));
        }

        log::info!("Loaded {} items from {}", dataset.len(), path.display());

        Ok(dataset)
    }

    /// Every item, in order
    pub fn items(&self) -> Vec<Item> {
        self.dataset.iter().collect()
    }

    /// Every text, in order
    pub fn texts(&self) -> Vec<String> {
        self.dataset.iter().map(|item| item.text).collect()
    }

    /// Count of (positive, negative) items
    pub fn class_balance(&self) -> (usize, usize) {
        self.dataset
            .iter()
            .fold((0, 0), |(positive, negative), item| match item.sentiment {
                Sentiment::Positive => (positive + 1, negative),
                Sentiment::Negative => (positive, negative + 1),
            })
    }

    /// Shuffle with a fixed seed and split off `ceil(test_ratio * len)` items for testing.
    /// Returns (train, test).
    pub fn split(self, test_ratio: f64, seed: u64) -> (Self, Self) {
        let mut items = self.items();
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);

        let n_test = ((items.len() as f64) * test_ratio.clamp(0.0, 1.0)).ceil() as usize;
        let train = items.split_off(n_test.min(items.len()));

        (Self::new(train), Self::new(items))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(text: Option<&str>, sentiment: Option<&str>) -> RawRecord {
        RawRecord {
            cleaned_text: text.map(str::to_string),
            sentiment: sentiment.map(str::to_string),
            lang: Some("fr".to_string()),
        }
    }

    #[test]
    fn missing_text_becomes_empty() {
        let dataset = SentimentDataset::from_records(vec![
            record(None, Some("positif")),
            record(Some("nul"), Some("négatif")),
        ])
        .unwrap();

        assert_eq!(
            dataset.items(),
            vec![
                Item::new(String::new(), Sentiment::Positive),
                Item::new("nul".to_string(), Sentiment::Negative),
            ]
        );
        assert_eq!(dataset.class_balance(), (1, 1));
    }

    #[test]
    fn na_cells_read_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        std::fs::write(
            &path,
            "cleaned_text,sentiment,lang\nnan,positif,en\nnull,négatif,en\nnone,NA,fr\n,positif,ar\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();

        assert_eq!(
            records.iter().map(|r| r.cleaned_text.as_deref()).collect::<Vec<_>>(),
            vec![None, None, Some("none"), None]
        );
        assert_eq!(records[2].sentiment, None);

        let dataset = SentimentDataset::from_records(records[..2].to_vec()).unwrap();
        assert_eq!(dataset.texts(), vec![String::new(), String::new()]);
    }

    #[test]
    fn invalid_labels_are_counted() {
        let result = SentimentDataset::from_records(vec![
            record(Some("a"), None),
            record(Some("b"), Some("neutre")),
            record(Some("c"), Some("positif")),
        ]);

        assert!(matches!(result, Err(DatasetError::InvalidLabels(2))));
    }

    #[test]
    fn split_is_seeded_and_sized_by_ceiling() {
        let items: Vec<_> = (0..11)
            .map(|i| Item::new(format!("text {i}"), Sentiment::Positive))
            .collect();

        let (train, test) = SentimentDataset::new(items.clone()).split(0.2, 42);
        let (train_again, test_again) = SentimentDataset::new(items).split(0.2, 42);

        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
        assert_eq!(test.items(), test_again.items());
        assert_eq!(train.items(), train_again.items());
    }
}
