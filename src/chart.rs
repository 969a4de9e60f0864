use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Render-agnostic chart description
// ---------------------------------------------------------------------------

/// One labelled line, broken into runs of `[year, value]` points. A missing
/// value ends the current run so no segment is drawn across it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub name: String,
    pub segments: Vec<Vec<[f64; 2]>>,
}

impl SeriesLine {
    /// Build from `(year, value)` pairs in year order.
    pub fn from_values(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (i32, Option<f64>)>,
    ) -> Self {
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        for (year, value) in values {
            match value {
                Some(v) => current.push([year as f64, v]),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        Self {
            name: name.into(),
            segments,
        }
    }

    /// Every present point, across all segments.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.segments.iter().flatten().copied()
    }
}

/// Everything the plot widget needs to draw a trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub y_label: String,
    /// One tick per distinct year in the filtered rows, ascending.
    pub x_ticks: Vec<i32>,
    /// Fixed y bounds; `None` lets the plot fit the data.
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<SeriesLine>,
    pub markers: bool,
    /// Horizontal reference line at y = 0.
    pub zero_line: bool,
    /// Title of the legend drawn beside the plot; `None` hides the legend.
    pub legend_title: Option<String>,
}

// ---------------------------------------------------------------------------
// Axis heuristics
// ---------------------------------------------------------------------------

const MIN_PAD: f64 = 2.0;
const PAD_FRACTION: f64 = 0.10;
const MIN_SPAN: f64 = 8.0;

/// Y bounds for a percent series spanning `[min, max]`.
///
/// Pads by `max(2, 10% of span)`, clamps to `[0, 100]`, and widens anything
/// narrower than 8 points to exactly 8 around its midpoint.
pub fn percent_axis_range(min: f64, max: f64) -> (f64, f64) {
    let pad = (PAD_FRACTION * (max - min)).max(MIN_PAD);
    let mut lo = (min - pad).max(0.0);
    let mut hi = (max + pad).min(100.0);
    if hi - lo < MIN_SPAN {
        let mid = (lo + hi) / 2.0;
        lo = (mid - MIN_SPAN / 2.0).max(0.0);
        hi = (mid + MIN_SPAN / 2.0).min(100.0);
    }
    (lo, hi)
}

/// [`percent_axis_range`] over the y values of `series`, `None` if there are none.
pub fn percent_range_of(series: &[SeriesLine]) -> Option<(f64, f64)> {
    let values = series.iter().flat_map(|s| s.points().map(|p| p[1]));
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    Some(percent_axis_range(min, max))
}

pub fn year_ticks(years: impl IntoIterator<Item = i32>) -> Vec<i32> {
    years
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
