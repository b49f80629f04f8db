use std::{fmt::Display, path::Path};

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

use super::{DataLayout, DatasetError, Record, Source};

/// Settings for building the merged dataset
#[derive(burn::config::Config)]
pub struct PrepareConfig {
    /// Rows drawn from Sentiment140
    #[config(default = 500_000)]
    pub english_sample: usize,

    /// Seed for the English sample, random when absent
    pub seed: Option<u64>,
}

/// Per-language row counts of a merged dataset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepareSummary {
    /// Sampled English rows
    pub english: usize,

    /// French rows
    pub french: usize,

    /// Arabic rows, both files
    pub arabic: usize,
}

impl Display for PrepareSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Data ready: English ({}), French ({}), Arabic ({})",
            self.english, self.french, self.arabic
        )
    }
}

/// Draw `amount` items without replacement, in random order. Keeps every item, shuffled, when
/// there are not enough.
pub fn sample<T, R: Rng>(items: Vec<T>, amount: usize, rng: &mut R) -> Vec<T> {
    let len = items.len();

    if amount > len {
        log::warn!("Requested a sample of {amount} rows but only {len} are available");
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();

    index::sample(rng, len, amount.min(len))
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

/// Write merged records as `cleaned_text,sentiment,lang`
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Clean, label and concatenate the raw sources into the merged dataset
pub fn prepare(layout: &DataLayout, config: &PrepareConfig) -> Result<PrepareSummary, DatasetError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let english = Source::Sentiment140.load(&layout.source(Source::Sentiment140))?;
    let english = sample(english, config.english_sample, &mut rng);

    let french = Source::French.load(&layout.source(Source::French))?;

    let mut arabic = Source::ArabicNegative.load(&layout.source(Source::ArabicNegative))?;
    arabic.extend(Source::ArabicPositive.load(&layout.source(Source::ArabicPositive))?);

    let summary = PrepareSummary {
        english: english.len(),
        french: french.len(),
        arabic: arabic.len(),
    };

    let merged: Vec<Record> = english.into_iter().chain(french).chain(arabic).collect();

    let output = layout.merged();
    write_records(&output, &merged)?;

    log::info!("Wrote {} rows to {}", merged.len(), output.display());

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sample_draws_distinct_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = sample((0..100).collect(), 10, &mut rng);

        assert_eq!(drawn.len(), 10);
        assert_eq!(drawn.iter().collect::<HashSet<_>>().len(), 10);
        assert!(drawn.iter().all(|i| *i < 100));
    }

    #[test]
    fn small_inputs_are_kept_whole() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut drawn = sample(vec!["a", "b", "c"], 10, &mut rng);
        drawn.sort();

        assert_eq!(drawn, vec!["a", "b", "c"]);
    }

    #[test]
    fn summary_message() {
        let summary = PrepareSummary {
            english: 3,
            french: 2,
            arabic: 4,
        };

        assert_eq!(
            summary.to_string(),
            "Data ready: English (3), French (2), Arabic (4)"
        );
    }
}
