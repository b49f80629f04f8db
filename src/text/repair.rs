//! Repair of tokenizer artifacts whose word index was written as an encoded JSON string

use std::{fmt::Display, path::Path};

use serde_json::Value;

use crate::utils::files;

/// What the repair did to the artifact
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RepairOutcome {
    /// The top-level `word_index` string was decoded into an object
    Repaired,

    /// An encoded `word_index` inside `config` was decoded and moved to the top level
    Hoisted,

    /// `word_index` was already an object
    AlreadyObject,
}

impl Display for RepairOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            RepairOutcome::Repaired => "word_index was a string, decoded it into an object",
            RepairOutcome::Hoisted => "word_index was encoded inside config, moved it to the top level",
            RepairOutcome::AlreadyObject => "word_index is already an object, nothing to repair",
        };

        write!(f, "{}", message)
    }
}

/// Repair Error
#[derive(thiserror::Error, Debug)]
pub enum RepairError {
    /// The artifact could not be read or written
    #[error("tokenizer file error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact, or the encoded word index, is not valid JSON
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not a JSON object
    #[error("the tokenizer json is not an object")]
    NotAnObject,

    /// No word index anywhere in the document
    #[error("the tokenizer json has no word_index")]
    MissingWordIndex,

    /// The word index is neither an object nor an encoded object
    #[error("word_index must be an object or a json-encoded object")]
    UnexpectedWordIndex,
}

fn decode_word_index(encoded: &str) -> Result<Value, RepairError> {
    match serde_json::from_str(encoded)? {
        Value::Object(map) => Ok(Value::Object(map)),
        _ => Err(RepairError::UnexpectedWordIndex),
    }
}

/// Normalize the word index of a parsed artifact in place
pub fn repair_value(document: &mut Value) -> Result<RepairOutcome, RepairError> {
    let root = document.as_object_mut().ok_or(RepairError::NotAnObject)?;

    match root.get("word_index") {
        Some(Value::Object(_)) => return Ok(RepairOutcome::AlreadyObject),
        Some(Value::String(encoded)) => {
            let word_index = decode_word_index(encoded)?;
            root.insert("word_index".to_string(), word_index);

            return Ok(RepairOutcome::Repaired);
        }
        Some(_) => return Err(RepairError::UnexpectedWordIndex),
        None => {}
    }

    let nested = root
        .get_mut("config")
        .and_then(Value::as_object_mut)
        .and_then(|config| config.remove("word_index"))
        .ok_or(RepairError::MissingWordIndex)?;

    let word_index = match nested {
        Value::String(encoded) => decode_word_index(&encoded)?,
        Value::Object(map) => Value::Object(map),
        _ => return Err(RepairError::UnexpectedWordIndex),
    };

    root.insert("word_index".to_string(), word_index);

    Ok(RepairOutcome::Hoisted)
}

/// Read a tokenizer artifact, repair its word index and write the result to `output`
pub async fn repair_tokenizer(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<RepairOutcome, RepairError> {
    let mut document: Value = serde_json::from_str(&files::read_to_string(input).await?)?;

    let outcome = repair_value(&mut document)?;

    files::write_string(output, &serde_json::to_string(&document)?).await?;

    Ok(outcome)
}
