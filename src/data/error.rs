use std::path::PathBuf;

/// Errors that stop a page from rendering.
///
/// Anything softer (unparsable cells, empty selections) is absorbed by the
/// normalizer or reported as a "no data" notice instead.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{file} is missing columns: {missing:?}")]
    MissingColumns { file: String, missing: Vec<String> },
}

impl DataError {
    /// Names of the absent columns, empty for other error kinds.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            DataError::MissingColumns { missing, .. } => missing,
            DataError::Read { .. } => &[],
        }
    }
}
