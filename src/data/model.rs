use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// YearRange – inclusive span of years
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` year span. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Build a range from two endpoints in any order.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Clamp both endpoints into `bounds`.
    pub fn clamp_to(&self, bounds: &YearRange) -> YearRange {
        YearRange::new(
            self.start.clamp(bounds.start, bounds.end),
            self.end.clamp(bounds.start, bounds.end),
        )
    }

    /// Smallest range covering every year, or `None` for an empty iterator.
    pub fn spanning(years: impl IntoIterator<Item = i32>) -> Option<Self> {
        years.into_iter().fold(None, |acc, y| match acc {
            None => Some(YearRange { start: y, end: y }),
            Some(r) => Some(YearRange {
                start: r.start.min(y),
                end: r.end.max(y),
            }),
        })
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Metric – the nine career outcome measures
// ---------------------------------------------------------------------------

/// One of the nine published career outcome measures.
///
/// `TotalGraduate` is a head count, `MeanStartingSalary` is in dollars and the
/// rest are rates (either 0–1 fractions or 0–100 percentages, depending on the
/// export).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    TotalGraduate,
    MeanStartingSalary,
    CareerOutcomeRate,
    EmployedOverall,
    StandardEmploymentFullTime,
    ContinuingEducation,
    SeekingEmployment,
    SeekingContinuingEducation,
    TempContractEmployee,
}

impl Metric {
    pub const COUNT: usize = 9;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::TotalGraduate,
        Metric::MeanStartingSalary,
        Metric::CareerOutcomeRate,
        Metric::EmployedOverall,
        Metric::StandardEmploymentFullTime,
        Metric::ContinuingEducation,
        Metric::SeekingEmployment,
        Metric::SeekingContinuingEducation,
        Metric::TempContractEmployee,
    ];

    /// Exact CSV header for this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalGraduate => "Total Graduate",
            Metric::MeanStartingSalary => "Mean Starting Salary",
            Metric::CareerOutcomeRate => "Career Outcome Rate",
            Metric::EmployedOverall => "Employed Overall",
            Metric::StandardEmploymentFullTime => "Standard Employment Full-time",
            Metric::ContinuingEducation => "Continuing Education",
            Metric::SeekingEmployment => "Seeking Employment",
            Metric::SeekingContinuingEducation => "Seeking Continuing Education",
            Metric::TempContractEmployee => "Temp/Contract Employee",
        }
    }

    /// Position inside [`CareerRecord::metrics`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_percentage(self) -> bool {
        !matches!(self, Metric::TotalGraduate | Metric::MeanStartingSalary)
    }

    pub fn axis_label(self) -> String {
        match self {
            Metric::MeanStartingSalary => "Mean Starting Salary ($)".to_string(),
            m if m.is_percentage() => format!("{} (%)", m.column()),
            m => m.column().to_string(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// PlotMode – what the degree-conferred chart shows on its y-axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlotMode {
    #[default]
    Counts,
    PctChange,
}

impl PlotMode {
    pub fn label(self) -> &'static str {
        match self {
            PlotMode::Counts => "Counts",
            PlotMode::PctChange => "% Change",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            PlotMode::Counts => "Grand total",
            PlotMode::PctChange => "% change",
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of `outcome_data.csv` after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerRecord {
    pub year: i32,
    pub cip: String,
    pub degree_level: String,
    /// Indexed by [`Metric::index`]; `None` where the source cell was not numeric.
    pub metrics: [Option<f64>; Metric::COUNT],
    /// Source columns we do not interpret, in [`CareerDataset::extra_columns`] order.
    pub extra: Vec<String>,
}

impl CareerRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics[metric.index()]
    }

    pub fn set_metric(&mut self, metric: Metric, value: Option<f64>) {
        self.metrics[metric.index()] = value;
    }
}

/// One row of `DegreeConferred.csv` after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ConferredRecord {
    pub year: i32,
    pub cip: String,
    pub level: String,
    pub total: Option<f64>,
    pub pct_change: Option<f64>,
    pub extra: Vec<String>,
}

impl ConferredRecord {
    /// The value plotted for `mode`.
    pub fn value(&self, mode: PlotMode) -> Option<f64> {
        match mode {
            PlotMode::Counts => self.total,
            PlotMode::PctChange => self.pct_change,
        }
    }
}

// ---------------------------------------------------------------------------
// Datasets – records plus pre-computed key indices
// ---------------------------------------------------------------------------

/// Distinct key values and year bounds of a loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyIndex {
    pub codes: BTreeSet<String>,
    pub levels: BTreeSet<String>,
    pub years: Option<YearRange>,
}

impl KeyIndex {
    fn build<'a>(keys: impl Iterator<Item = (i32, &'a str, &'a str)>) -> Self {
        let mut index = KeyIndex::default();
        let mut years = Vec::new();
        for (year, code, level) in keys {
            years.push(year);
            index.codes.insert(code.to_string());
            index.levels.insert(level.to_string());
        }
        index.years = YearRange::spanning(years);
        index
    }
}

#[derive(Debug, Clone)]
pub struct CareerDataset {
    pub records: Vec<CareerRecord>,
    pub extra_columns: Vec<String>,
    pub keys: KeyIndex,
}

impl CareerDataset {
    pub fn from_records(records: Vec<CareerRecord>, extra_columns: Vec<String>) -> Self {
        let keys = KeyIndex::build(
            records
                .iter()
                .map(|r| (r.year, r.cip.as_str(), r.degree_level.as_str())),
        );
        Self {
            records,
            extra_columns,
            keys,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConferredDataset {
    pub records: Vec<ConferredRecord>,
    pub extra_columns: Vec<String>,
    /// Whether the source file carried a `pct_change` column at all.
    pub has_pct_change: bool,
    pub keys: KeyIndex,
}

impl ConferredDataset {
    pub fn from_records(
        records: Vec<ConferredRecord>,
        extra_columns: Vec<String>,
        has_pct_change: bool,
    ) -> Self {
        let keys = KeyIndex::build(
            records
                .iter()
                .map(|r| (r.year, r.cip.as_str(), r.level.as_str())),
        );
        Self {
            records,
            extra_columns,
            has_pct_change,
            keys,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_is_inclusive_and_ordered() {
        let r = YearRange::new(2024, 2019);
        assert_eq!(r.start, 2019);
        assert!(r.contains(2019));
        assert!(r.contains(2024));
        assert!(!r.contains(2025));
    }

    #[test]
    fn clamp_keeps_range_inside_bounds() {
        let bounds = YearRange::new(2015, 2022);
        assert_eq!(YearRange::new(2019, 2030).clamp_to(&bounds), YearRange::new(2019, 2022));
        assert_eq!(YearRange::new(2030, 2031).clamp_to(&bounds), YearRange::new(2022, 2022));
    }

    #[test]
    fn axis_labels_follow_metric_kind() {
        assert_eq!(Metric::MeanStartingSalary.axis_label(), "Mean Starting Salary ($)");
        assert_eq!(Metric::EmployedOverall.axis_label(), "Employed Overall (%)");
        assert_eq!(Metric::TotalGraduate.axis_label(), "Total Graduate");
    }

    #[test]
    fn key_index_collects_distinct_values() {
        let rec = |year, cip: &str| ConferredRecord {
            year,
            cip: cip.to_string(),
            level: "B.A.".to_string(),
            total: Some(1.0),
            pct_change: None,
            extra: Vec::new(),
        };
        let ds = ConferredDataset::from_records(
            vec![rec(2012, "16"), rec(2010, "16"), rec(2011, "30.52")],
            Vec::new(),
            false,
        );
        assert_eq!(ds.keys.codes.len(), 2);
        assert_eq!(ds.keys.levels.len(), 1);
        assert_eq!(ds.keys.years, Some(YearRange::new(2010, 2012)));
    }
}
