//! Per-page pipelines.
//!
//! Each page turns (file contents, control values) into a [`PageView`] with no
//! memory of earlier renders: controls → request → filter → transform → view.

pub mod career;
pub mod conferred;

use crate::chart::ChartSpec;

/// Distinct key values actually present in the source, shown when a selection
/// comes back empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub code_label: &'static str,
    pub codes: Vec<String>,
    pub level_label: &'static str,
    pub levels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendOutcome {
    Chart(ChartSpec),
    NoData {
        message: &'static str,
        diagnostics: Diagnostics,
    },
}

/// Filtered rows rendered as text, every column included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }
}

/// Result of one page render.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub trend: TrendOutcome,
    pub table: TableView,
}

impl PageView {
    #[cfg(test)]
    pub fn chart(&self) -> Option<&ChartSpec> {
        match &self.trend {
            TrendOutcome::Chart(chart) => Some(chart),
            TrendOutcome::NoData { .. } => None,
        }
    }
}

/// Table text for a numeric cell: shortest text that reads back to the same
/// value, so integral values print without a decimal point.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        None => "<null>".to_string(),
        Some(v) => format!("{v}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_keep_full_precision() {
        assert_eq!(format_number(Some(2020.0)), "2020");
        assert_eq!(format_number(Some(52000.0)), "52000");
        assert_eq!(format_number(Some(0.42)), "0.42");
        assert_eq!(format_number(Some(0.123456)), "0.123456");
        assert_eq!(format_number(Some(-3.14159)), "-3.14159");
        assert_eq!(format_number(None), "<null>");
    }
}
