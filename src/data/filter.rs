use std::collections::BTreeSet;

use super::model::{CareerRecord, ConferredRecord, YearRange};

// ---------------------------------------------------------------------------
// KeyedRecord – what the filter needs to know about a row
// ---------------------------------------------------------------------------

/// A row addressable by (year, code, level).
pub trait KeyedRecord {
    fn year(&self) -> i32;
    fn code(&self) -> &str;
    fn level(&self) -> &str;
}

impl KeyedRecord for CareerRecord {
    fn year(&self) -> i32 {
        self.year
    }
    fn code(&self) -> &str {
        &self.cip
    }
    fn level(&self) -> &str {
        &self.degree_level
    }
}

impl KeyedRecord for ConferredRecord {
    fn year(&self) -> i32 {
        self.year
    }
    fn code(&self) -> &str {
        &self.cip
    }
    fn level(&self) -> &str {
        &self.level
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Constraint on one categorical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPredicate {
    /// Single-select control.
    Equals(String),
    /// Multi-select control. An empty set puts no constraint on the column.
    OneOf(BTreeSet<String>),
}

impl KeyPredicate {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            KeyPredicate::Equals(expected) => expected == value,
            KeyPredicate::OneOf(selected) => selected.is_empty() || selected.contains(value),
        }
    }
}

/// Conjunction of a code predicate, a level predicate and an inclusive year range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub code: KeyPredicate,
    pub level: KeyPredicate,
    pub years: YearRange,
}

impl RowFilter {
    pub fn matches<R: KeyedRecord>(&self, record: &R) -> bool {
        self.years.contains(record.year())
            && self.code.matches(record.code())
            && self.level.matches(record.level())
    }

    /// Return a fresh copy of the rows that pass, in source order.
    pub fn apply<R: KeyedRecord + Clone>(&self, records: &[R]) -> Vec<R> {
        records
            .iter()
            .filter(|r| self.matches(*r))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Metric;

    fn career(year: i32, cip: &str, level: &str) -> CareerRecord {
        CareerRecord {
            year,
            cip: cip.to_string(),
            degree_level: level.to_string(),
            metrics: [None; Metric::COUNT],
            extra: Vec::new(),
        }
    }

    fn conferred(year: i32, cip: &str, level: &str) -> ConferredRecord {
        ConferredRecord {
            year,
            cip: cip.to_string(),
            level: level.to_string(),
            total: Some(1.0),
            pct_change: None,
            extra: Vec::new(),
        }
    }

    #[test]
    fn year_range_filter_is_inclusive() {
        let mut rows: Vec<CareerRecord> = (2015..=2024).map(|y| career(y, "16", "Doctor's")).collect();
        rows.push(career(2020, "16", "Master's"));
        rows.push(career(2020, "13.13", "Doctor's"));

        let filter = RowFilter {
            code: KeyPredicate::Equals("16".to_string()),
            level: KeyPredicate::Equals("Doctor's".to_string()),
            years: YearRange::new(2019, 2024),
        };
        let years: Vec<i32> = filter.apply(&rows).iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023, 2024]);
    }

    #[test]
    fn membership_filter_keeps_any_selected_pair() {
        let rows = vec![
            conferred(2020, "16", "B.A."),
            conferred(2020, "16", "M.A."),
            conferred(2020, "30.52", "B.A."),
            conferred(2020, "42", "B.A."),
        ];
        let filter = RowFilter {
            code: KeyPredicate::OneOf(["16", "30.52"].iter().map(|s| s.to_string()).collect()),
            level: KeyPredicate::OneOf(["B.A."].iter().map(|s| s.to_string()).collect()),
            years: YearRange::new(2000, 2030),
        };
        let picked = filter.apply(&rows);
        assert_eq!(picked, vec![rows[0].clone(), rows[2].clone()]);
        assert!(!filter.matches(&rows[1]));
    }

    #[test]
    fn empty_selection_leaves_column_unfiltered() {
        let rows = vec![
            conferred(2020, "16", "B.A."),
            conferred(2020, "30.52", "B.A."),
            conferred(2020, "30.52", "M.A."),
            conferred(2021, "16", "B.A."),
        ];
        let filter = RowFilter {
            code: KeyPredicate::OneOf(BTreeSet::new()),
            level: KeyPredicate::OneOf(["B.A.".to_string()].into_iter().collect()),
            years: YearRange::new(2020, 2020),
        };
        assert_eq!(filter.apply(&rows), vec![rows[0].clone(), rows[1].clone()]);
    }
}
