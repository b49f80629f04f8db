use std::{collections::HashMap, fmt::Display, path::Path};

use super::{merged::read_records, DatasetError, RawRecord, Sentiment};

/// Number of rows with a missing label shown in the report
pub const EXAMPLE_ROWS: usize = 5;

/// Label quality of the merged dataset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualityReport {
    /// Rows read
    pub total: usize,

    /// Rows with an empty sentiment cell
    pub missing: usize,

    /// Rows whose sentiment is neither label
    pub invalid: usize,

    /// The first few rows with a missing sentiment, with their 0-based row numbers
    pub missing_examples: Vec<(usize, RawRecord)>,

    /// Distinct sentiment values, missing included, most frequent first
    pub value_counts: Vec<(Option<String>, usize)>,
}

impl QualityReport {
    /// Build the report from merged rows
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut missing = 0;
        let mut invalid = 0;
        let mut missing_examples = Vec::new();
        let mut value_counts: Vec<(Option<String>, usize)> = Vec::new();
        let mut positions: HashMap<Option<String>, usize> = HashMap::new();

        for (row, record) in records.iter().enumerate() {
            match record.sentiment.as_deref() {
                None => {
                    missing += 1;
                    if missing_examples.len() < EXAMPLE_ROWS {
                        missing_examples.push((row, record.clone()));
                    }
                }
                Some(label) if label.parse::<Sentiment>().is_err() => invalid += 1,
                Some(_) => {}
            }

            match positions.get(&record.sentiment) {
                Some(&position) => value_counts[position].1 += 1,
                None => {
                    positions.insert(record.sentiment.clone(), value_counts.len());
                    value_counts.push((record.sentiment.clone(), 1));
                }
            }
        }

        value_counts.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            total: records.len(),
            missing,
            invalid,
            missing_examples,
            value_counts,
        }
    }

    /// Whether every row can be used for training
    pub fn is_clean(&self) -> bool {
        self.missing == 0 && self.invalid == 0
    }
}

impl Display for QualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rows: {}", self.total)?;
        writeln!(f, "Rows with a missing sentiment: {}", self.missing)?;

        if !self.missing_examples.is_empty() {
            writeln!(f, "Examples of rows with a missing sentiment:")?;

            for (row, record) in &self.missing_examples {
                writeln!(
                    f,
                    "  {row}: cleaned_text={:?} lang={}",
                    record.cleaned_text.as_deref().unwrap_or_default(),
                    record.lang.as_deref().unwrap_or("<missing>")
                )?;
            }
        }

        writeln!(f, "Rows with an invalid sentiment: {}", self.invalid)?;
        writeln!(f)?;
        writeln!(f, "Sentiment values:")?;

        for (value, count) in &self.value_counts {
            writeln!(f, "  {:<12} {count}", value.as_deref().unwrap_or("<missing>"))?;
        }

        Ok(())
    }
}

/// Report missing and invalid labels in the merged file
pub fn check_quality(path: &Path) -> Result<QualityReport, DatasetError> {
    let records = read_records(path)?;

    Ok(QualityReport::from_records(&records))
}
