use std::collections::BTreeMap;

use super::model::{CareerRecord, ConferredRecord, Metric};

/// Rate columns whose non-missing values all sit at or below this are treated
/// as 0–1 fractions. Above 1.0 so rounding past 100% still counts as a fraction.
pub const FRACTION_THRESHOLD: f64 = 1.5;

/// Joins code and level into a series key.
pub const SERIES_SEPARATOR: &str = " | ";

/// True when there is at least one value and none exceeds [`FRACTION_THRESHOLD`].
pub fn looks_fractional(values: impl IntoIterator<Item = Option<f64>>) -> bool {
    let mut seen = false;
    for v in values.into_iter().flatten() {
        if v > FRACTION_THRESHOLD {
            return false;
        }
        seen = true;
    }
    seen
}

/// Multiply `metric` by 100 in every row if the column looks fractional.
/// Returns whether rescaling happened.
pub fn rescale_to_percent(rows: &mut [CareerRecord], metric: Metric) -> bool {
    if !looks_fractional(rows.iter().map(|r| r.metric(metric))) {
        return false;
    }
    for row in rows.iter_mut() {
        let scaled = row.metric(metric).map(|v| v * 100.0);
        row.set_metric(metric, scaled);
    }
    log::debug!("Rescaled '{metric}' from fraction to percent");
    true
}

pub fn series_key(cip: &str, level: &str) -> String {
    format!("{cip}{SERIES_SEPARATOR}{level}")
}

/// Group rows by series key; keys ascending, years ascending within a key.
pub fn group_series(rows: Vec<ConferredRecord>) -> BTreeMap<String, Vec<ConferredRecord>> {
    let mut groups: BTreeMap<String, Vec<ConferredRecord>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(series_key(&row.cip, &row.level))
            .or_default()
            .push(row);
    }
    for rows in groups.values_mut() {
        rows.sort_by_key(|r| r.year);
    }
    groups
}
