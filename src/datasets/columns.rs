use std::{fmt::Display, path::Path};

use super::{DatasetError, Source};

/// The column names a header-inferring reader would assign to a raw file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Columns {
    /// The inspected source
    pub source: Source,

    /// The first row of the file
    pub names: Vec<String>,
}

impl Display for Columns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} columns: {:?}", self.source.title(), self.names)
    }
}

/// Read the first row of a raw file as its column names
pub fn inspect_columns(source: Source, path: &Path) -> Result<Columns, DatasetError> {
    let mut reader = source.reader(path)?;

    let names = match reader.byte_records().next() {
        Some(row) => source.decode_row(&row?),
        None => return Err(DatasetError::Empty(path.to_path_buf())),
    };

    log::debug!("Inspected {} ({})", source.title(), path.display());

    Ok(Columns { source, names })
}
