use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use super::error::DataError;
use super::model::{CareerDataset, CareerRecord, ConferredDataset, ConferredRecord, Metric};
use super::normalize::{clean_code, clean_key, parse_number, parse_year};

/// Key columns of `outcome_data.csv`; the nine metric headers are also required.
pub const CAREER_KEY_COLUMNS: [&str; 3] = ["year", "CIP", "Degree Level"];

/// Required columns of `DegreeConferred.csv`.
pub const CONFERRED_COLUMNS: [&str; 4] = ["year", "cip", "level", "total"];

/// Optional column of `DegreeConferred.csv`.
pub const PCT_CHANGE_COLUMN: &str = "pct_change";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize the career outcome table.
pub fn load_career(path: &Path) -> Result<CareerDataset, DataError> {
    let table = RawTable::from_path(path)?;
    let dataset = career_from_table(&table)?;
    if dataset.is_empty() {
        log::warn!("{} has no rows with a usable year", path.display());
    }
    log::info!(
        "Loaded {} career outcome rows from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Same as [`load_career`] but reads from any byte source; `name` is used in errors.
#[cfg(test)]
pub fn load_career_from_reader<R: Read>(name: &str, reader: R) -> Result<CareerDataset, DataError> {
    career_from_table(&RawTable::from_reader(name, reader)?)
}

/// Load and normalize the degree conferral table.
pub fn load_conferred(path: &Path) -> Result<ConferredDataset, DataError> {
    let table = RawTable::from_path(path)?;
    let dataset = conferred_from_table(&table)?;
    if dataset.is_empty() {
        log::warn!("{} has no rows with a usable year", path.display());
    }
    log::info!(
        "Loaded {} degree conferral rows from {} (pct_change: {})",
        dataset.len(),
        path.display(),
        dataset.has_pct_change
    );
    Ok(dataset)
}

#[cfg(test)]
pub fn load_conferred_from_reader<R: Read>(
    name: &str,
    reader: R,
) -> Result<ConferredDataset, DataError> {
    conferred_from_table(&RawTable::from_reader(name, reader)?)
}

// ---------------------------------------------------------------------------
// Normalization per table
// ---------------------------------------------------------------------------

fn career_from_table(table: &RawTable) -> Result<CareerDataset, DataError> {
    let mut required: Vec<&str> = CAREER_KEY_COLUMNS.to_vec();
    required.extend(Metric::ALL.iter().map(|m| m.column()));
    let idx = table.require(&required)?;
    let (year_idx, cip_idx, level_idx) = (idx[0], idx[1], idx[2]);
    let metric_idx = &idx[CAREER_KEY_COLUMNS.len()..];
    let (extra_idx, extra_columns) = table.extra_columns(&idx);

    let mut dropped = 0usize;
    let records: Vec<CareerRecord> = table
        .rows
        .iter()
        .filter_map(|row| {
            let Some(year) = parse_year(cell(row, year_idx)) else {
                dropped += 1;
                return None;
            };
            let mut metrics = [None; Metric::COUNT];
            for (slot, &i) in metrics.iter_mut().zip(metric_idx) {
                *slot = parse_number(cell(row, i));
            }
            Some(CareerRecord {
                year,
                cip: clean_code(cell(row, cip_idx)),
                degree_level: clean_key(cell(row, level_idx)),
                metrics,
                extra: extra_idx.iter().map(|&i| cell(row, i).to_string()).collect(),
            })
        })
        .collect();

    if dropped > 0 {
        log::debug!("{}: dropped {dropped} rows with unparsable year", table.file);
    }
    Ok(CareerDataset::from_records(records, extra_columns))
}

fn conferred_from_table(table: &RawTable) -> Result<ConferredDataset, DataError> {
    let idx = table.require(&CONFERRED_COLUMNS)?;
    let (year_idx, cip_idx, level_idx, total_idx) = (idx[0], idx[1], idx[2], idx[3]);
    let pct_idx = table.position(PCT_CHANGE_COLUMN);

    let mut known = idx.clone();
    known.extend(pct_idx);
    let (extra_idx, extra_columns) = table.extra_columns(&known);

    let mut dropped = 0usize;
    let records: Vec<ConferredRecord> = table
        .rows
        .iter()
        .filter_map(|row| {
            let Some(year) = parse_year(cell(row, year_idx)) else {
                dropped += 1;
                return None;
            };
            Some(ConferredRecord {
                year,
                cip: clean_code(cell(row, cip_idx)),
                level: clean_key(cell(row, level_idx)),
                total: parse_number(cell(row, total_idx)),
                pct_change: pct_idx.and_then(|i| parse_number(cell(row, i))),
                extra: extra_idx.iter().map(|&i| cell(row, i).to_string()).collect(),
            })
        })
        .collect();

    if dropped > 0 {
        log::debug!("{}: dropped {dropped} rows with unparsable year", table.file);
    }
    Ok(ConferredDataset::from_records(
        records,
        extra_columns,
        pct_idx.is_some(),
    ))
}

// ---------------------------------------------------------------------------
// RawTable – header + string records straight from the csv reader
// ---------------------------------------------------------------------------

struct RawTable {
    /// File name used in error messages.
    file: String,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let reader = csv_builder()
            .from_path(path)
            .map_err(|source| DataError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::collect(file, path, reader)
    }

    #[cfg(test)]
    fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self, DataError> {
        Self::collect(name.to_string(), Path::new(name), csv_builder().from_reader(reader))
    }

    fn collect<R: Read>(
        file: String,
        path: &Path,
        mut reader: csv::Reader<R>,
    ) -> Result<Self, DataError> {
        let read_err = |source| DataError::Read {
            path: path.to_path_buf(),
            source,
        };
        let headers = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        Ok(Self {
            file,
            headers,
            rows,
        })
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Indices of `columns` in order, or an error naming every absent one.
    fn require(&self, columns: &[&str]) -> Result<Vec<usize>, DataError> {
        let mut missing: Vec<String> = columns
            .iter()
            .filter(|c| self.position(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            log::error!("{} is missing columns: {missing:?}", self.file);
            return Err(DataError::MissingColumns {
                file: self.file.clone(),
                missing,
            });
        }
        Ok(columns.iter().filter_map(|c| self.position(c)).collect())
    }

    /// Every header not listed in `known`, as (indices, names).
    fn extra_columns(&self, known: &[usize]) -> (Vec<usize>, Vec<String>) {
        self.headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !known.contains(i))
            .map(|(i, h)| (i, h.clone()))
            .unzip()
    }
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Short rows read as empty cells rather than failing the whole file.
    builder.flexible(true);
    builder
}

fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}
