use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which end of a sequence padding or truncation applies to
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The start of the sequence
    Pre,

    /// The end of the sequence
    Post,
}

impl FromStr for Side {
    type Err = SideError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pre" => Ok(Side::Pre),
            "post" => Ok(Side::Post),
            _ => Err(SideError::Unknown(value.to_string())),
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::Pre => "pre",
            Side::Post => "post",
        };

        write!(f, "{}", name)
    }
}

/// Side Error
#[derive(thiserror::Error, Debug)]
pub enum SideError {
    /// Neither "pre" nor "post"
    #[error("unknown padding side {0}, expected 'pre' or 'post'")]
    Unknown(String),
}

/// Bring a single sequence to exactly `maxlen` tokens
pub fn pad_sequence(
    sequence: &[usize],
    maxlen: usize,
    padding: Side,
    truncating: Side,
    value: usize,
) -> Vec<usize> {
    let kept = if sequence.len() > maxlen {
        match truncating {
            Side::Pre => &sequence[sequence.len() - maxlen..],
            Side::Post => &sequence[..maxlen],
        }
    } else {
        sequence
    };

    let fill = std::iter::repeat(value).take(maxlen - kept.len());

    match padding {
        Side::Pre => fill.chain(kept.iter().copied()).collect(),
        Side::Post => kept.iter().copied().chain(fill).collect(),
    }
}

/// Bring every sequence to the same length. Without `maxlen`, the longest sequence sets it.
pub fn pad_sequences(
    sequences: &[Vec<usize>],
    maxlen: Option<usize>,
    padding: Side,
    truncating: Side,
    value: usize,
) -> Vec<Vec<usize>> {
    let maxlen =
        maxlen.unwrap_or_else(|| sequences.iter().map(Vec::len).max().unwrap_or_default());

    sequences
        .iter()
        .map(|sequence| pad_sequence(sequence, maxlen, padding, truncating, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pads_and_truncates_at_the_front() {
        let padded = pad_sequences(
            &[vec![1, 2, 3, 4, 5], vec![6, 7]],
            Some(3),
            Side::Pre,
            Side::Pre,
            0,
        );

        assert_eq!(padded, vec![vec![3, 4, 5], vec![0, 6, 7]]);
    }

    #[test]
    fn pads_and_truncates_at_the_back() {
        let padded = pad_sequences(
            &[vec![1, 2, 3, 4, 5], vec![6, 7]],
            Some(3),
            Side::Post,
            Side::Post,
            0,
        );

        assert_eq!(padded, vec![vec![1, 2, 3], vec![6, 7, 0]]);
    }

    #[test]
    fn longest_sequence_sets_the_length() {
        let padded = pad_sequences(&[vec![1], vec![2, 3, 4], vec![]], None, Side::Pre, Side::Pre, 9);

        assert_eq!(padded, vec![vec![9, 9, 1], vec![2, 3, 4], vec![9, 9, 9]]);
    }

    #[test]
    fn parses_sides() {
        assert_eq!("POST".parse::<Side>().unwrap(), Side::Post);
        assert_eq!("pre".parse::<Side>().unwrap(), Side::Pre);
        assert!("middle".parse::<Side>().is_err());
    }
}
