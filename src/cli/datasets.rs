use std::fmt::Display;

use crate::datasets::{sources::SourceError, Source};

/// The raw files a job should look at
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Selection {
    /// Every raw file
    All,

    /// A single raw file
    One(Source),
}

impl Selection {
    /// The selected sources, in merge order
    pub fn sources(&self) -> Vec<Source> {
        match self {
            Selection::All => Source::ALL.to_vec(),
            Selection::One(source) => vec![*source],
        }
    }
}

impl TryFrom<&str> for Selection {
    type Error = SourceError;

    /// Try to convert a string to a Selection
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.to_lowercase() == "all" {
            Ok(Selection::All)
        } else {
            Source::try_from(value).map(Selection::One)
        }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::One(source) => write!(f, "{}", source),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_selections() {
        assert_eq!(Selection::try_from("ALL").unwrap().sources().len(), 4);
        assert_eq!(
            Selection::try_from("arabic-negative").unwrap(),
            Selection::One(Source::ArabicNegative)
        );
        assert!(Selection::try_from("german").is_err());
    }
}
