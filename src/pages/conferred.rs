use std::collections::BTreeSet;

use crate::chart::{year_ticks, ChartSpec, SeriesLine};
use crate::config::DashboardConfig;
use crate::data::error::DataError;
use crate::data::filter::{KeyPredicate, RowFilter};
use crate::data::loader::{load_conferred, CONFERRED_COLUMNS, PCT_CHANGE_COLUMN};
use crate::data::model::{ConferredDataset, ConferredRecord, PlotMode, YearRange};
use crate::data::rules::{OverrideRule, Restriction, CONFERRED_OVERRIDES};
use crate::data::transform::group_series;

use super::{format_number, Diagnostics, PageView, TableView, TrendOutcome};

const NO_DATA: &str = "No data for the selected filters.";
pub const LEGEND_TITLE: &str = "CIP | Degree";

// ---------------------------------------------------------------------------
// Controls → options → request
// ---------------------------------------------------------------------------

/// Raw widget values. `None` means "not touched yet, use the default".
///
/// `Some(empty set)` means the user cleared the list; that column is then unfiltered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConferredControls {
    pub cips: Option<BTreeSet<String>>,
    pub levels: Option<BTreeSet<String>>,
    pub years: Option<YearRange>,
    pub mode: PlotMode,
    pub show_markers: bool,
}

impl Default for ConferredControls {
    fn default() -> Self {
        Self {
            cips: None,
            levels: None,
            years: None,
            mode: PlotMode::Counts,
            show_markers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConferredOptions {
    pub cips: Vec<String>,
    /// Levels after any override rule has narrowed them.
    pub levels: Vec<String>,
    pub year_bounds: Option<YearRange>,
    pub modes: Vec<PlotMode>,
    /// An override rule pinned the mode; the selector is replaced by `notes`.
    pub mode_locked: bool,
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConferredRequest {
    pub cips: BTreeSet<String>,
    pub levels: BTreeSet<String>,
    pub years: YearRange,
    pub mode: PlotMode,
    pub show_markers: bool,
}

impl ConferredRequest {
    pub fn filter(&self) -> RowFilter {
        RowFilter {
            code: KeyPredicate::OneOf(self.cips.clone()),
            level: KeyPredicate::OneOf(self.levels.clone()),
            years: self.years,
        }
    }
}

/// Keep still-valid choices; fall back to the first option when nothing was
/// chosen yet or every earlier choice has disappeared.
fn select(chosen: &Option<BTreeSet<String>>, options: &[String]) -> BTreeSet<String> {
    let first = || -> BTreeSet<String> { options.iter().take(1).cloned().collect() };
    match chosen {
        Some(chosen) if chosen.is_empty() => BTreeSet::new(),
        Some(chosen) => {
            let kept: BTreeSet<String> = options
                .iter()
                .filter(|o| chosen.contains(*o))
                .cloned()
                .collect();
            if kept.is_empty() {
                first()
            } else {
                kept
            }
        }
        None => first(),
    }
}

/// Work out what the widgets offer and what this render will show.
pub fn resolve(
    controls: &ConferredControls,
    dataset: &ConferredDataset,
    rules: &[OverrideRule],
) -> (ConferredOptions, Option<ConferredRequest>) {
    let cip_options: Vec<String> = dataset.keys.codes.iter().cloned().collect();
    let cips = select(&controls.cips, &cip_options);

    let restriction = Restriction::resolve(rules, &cips);
    let level_options: Vec<String> = dataset
        .keys
        .levels
        .iter()
        .filter(|l| restriction.permits_level(l))
        .cloned()
        .collect();
    let levels = select(&controls.levels, &level_options);

    let (modes, mode) = match restriction.forced_mode {
        Some(forced) => (vec![forced], forced),
        None => {
            let mut modes = vec![PlotMode::Counts];
            if dataset.has_pct_change {
                modes.push(PlotMode::PctChange);
            }
            let mode = if modes.contains(&controls.mode) {
                controls.mode
            } else {
                PlotMode::Counts
            };
            (modes, mode)
        }
    };
    if restriction.is_active() {
        log::debug!("Override rules active for {cips:?}: {:?}", restriction.notes);
    }

    let year_bounds = dataset.keys.years;
    let request = year_bounds.map(|bounds| ConferredRequest {
        cips,
        levels,
        years: controls
            .years
            .map(|y| y.clamp_to(&bounds))
            .unwrap_or(bounds),
        mode,
        show_markers: controls.show_markers,
    });

    let options = ConferredOptions {
        cips: cip_options,
        levels: level_options,
        year_bounds,
        modes,
        mode_locked: restriction.forced_mode.is_some(),
        notes: restriction.notes,
    };
    (options, request)
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ConferredPage {
    pub options: ConferredOptions,
    pub request: Option<ConferredRequest>,
    pub view: PageView,
    pub source_rows: usize,
}

/// Load `DegreeConferred.csv` fresh and build the page for `controls`.
pub fn render(
    config: &DashboardConfig,
    controls: &ConferredControls,
) -> Result<ConferredPage, DataError> {
    let dataset = load_conferred(&config.conferred_path())?;
    Ok(build_page(&dataset, controls))
}

pub fn build_page(dataset: &ConferredDataset, controls: &ConferredControls) -> ConferredPage {
    let (options, request) = resolve(controls, dataset, CONFERRED_OVERRIDES);
    let view = match &request {
        Some(request) => build_view(dataset, request),
        None => PageView {
            trend: no_data(dataset),
            table: table(dataset, &[], None),
        },
    };
    ConferredPage {
        options,
        request,
        view,
        source_rows: dataset.len(),
    }
}

/// One line per `cip | level` pair on a shared year axis.
pub fn build_view(dataset: &ConferredDataset, request: &ConferredRequest) -> PageView {
    let rows = request.filter().apply(&dataset.records);
    let mode = request.mode;

    if rows.iter().all(|r| r.value(mode).is_none()) {
        return PageView {
            trend: no_data(dataset),
            table: table(dataset, &rows, None),
        };
    }

    let x_ticks = year_ticks(rows.iter().map(|r| r.year));
    let groups = group_series(rows);

    let series = groups
        .iter()
        .map(|(key, rows)| {
            SeriesLine::from_values(key.as_str(), rows.iter().map(|r| (r.year, r.value(mode))))
        })
        .collect();

    let mut ordered = Vec::new();
    let mut keys = Vec::new();
    for (key, rows) in groups {
        keys.extend(std::iter::repeat(key).take(rows.len()));
        ordered.extend(rows);
    }

    let chart = ChartSpec {
        y_label: mode.axis_label().to_string(),
        x_ticks,
        y_range: None,
        series,
        markers: request.show_markers,
        zero_line: mode == PlotMode::PctChange,
        legend_title: Some(LEGEND_TITLE.to_string()),
    };
    PageView {
        trend: TrendOutcome::Chart(chart),
        table: table(dataset, &ordered, Some(keys.as_slice())),
    }
}

fn no_data(dataset: &ConferredDataset) -> TrendOutcome {
    TrendOutcome::NoData {
        message: NO_DATA,
        diagnostics: Diagnostics {
            code_label: "Unique CIPs in file",
            codes: dataset.keys.codes.iter().cloned().collect(),
            level_label: "Unique levels in file",
            levels: dataset.keys.levels.iter().cloned().collect(),
        },
    }
}

/// `series_keys`, when given, adds a trailing `series` column aligned with `rows`.
fn table(
    dataset: &ConferredDataset,
    rows: &[ConferredRecord],
    series_keys: Option<&[String]>,
) -> TableView {
    let mut columns: Vec<String> = CONFERRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    if dataset.has_pct_change {
        columns.push(PCT_CHANGE_COLUMN.to_string());
    }
    columns.extend(dataset.extra_columns.iter().cloned());
    if series_keys.is_some() {
        columns.push("series".to_string());
    }

    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut cells = vec![
                r.year.to_string(),
                r.cip.clone(),
                r.level.clone(),
                format_number(r.total),
            ];
            if dataset.has_pct_change {
                cells.push(format_number(r.pct_change));
            }
            cells.extend(r.extra.iter().cloned());
            if let Some(keys) = series_keys {
                cells.push(keys[i].clone());
            }
            cells
        })
        .collect();
    TableView { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_conferred_from_reader;

    const CSV: &str = "year,cip,level,total,pct_change
2018,16,B.A.,100,
2019,16,B.A.,110,10
2020,16,B.A.,99,-10
2018,16,Ph.D.,20,
2019,16,Ph.D.,22,10
2018,30.52,B.A.,5,
2019,30.52,B.A.,8,60
2019,30.52,M.A.,3,
2020,30.52,Ph.D.,1,
";

    fn dataset() -> ConferredDataset {
        load_conferred_from_reader("DegreeConferred.csv", CSV.as_bytes()).unwrap()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn defaults_pick_first_options_and_full_years() {
        let (options, request) = resolve(&ConferredControls::default(), &dataset(), CONFERRED_OVERRIDES);
        let request = request.unwrap();
        assert_eq!(request.cips, set(&["16"]));
        assert_eq!(request.levels, set(&["B.A."]));
        assert_eq!(request.years, YearRange::new(2018, 2020));
        assert_eq!(options.modes, vec![PlotMode::Counts, PlotMode::PctChange]);
        assert!(!options.mode_locked);
    }

    #[test]
    fn reserved_cip_restricts_levels_and_forces_counts() {
        let controls = ConferredControls {
            cips: Some(set(&["30.52"])),
            levels: Some(set(&["Ph.D.", "M.A."])),
            mode: PlotMode::PctChange,
            ..ConferredControls::default()
        };
        let ds = dataset();
        assert!(ds.has_pct_change);
        let (options, request) = resolve(&controls, &ds, CONFERRED_OVERRIDES);
        let request = request.unwrap();
        assert_eq!(options.levels, vec!["B.A.", "M.A."]);
        assert_eq!(options.modes, vec![PlotMode::Counts]);
        assert!(options.mode_locked);
        assert_eq!(options.notes.len(), 1);
        assert_eq!(request.levels, set(&["M.A."]));
        assert_eq!(request.mode, PlotMode::Counts);

        let view = build_view(&ds, &request);
        let chart = view.chart().unwrap();
        assert!(!chart.zero_line);
        assert_eq!(chart.y_label, "Grand total");
    }

    #[test]
    fn pct_change_unavailable_without_column() {
        let ds = load_conferred_from_reader(
            "DegreeConferred.csv",
            "year,cip,level,total\n2019,16,B.A.,10\n".as_bytes(),
        )
        .unwrap();
        let controls = ConferredControls {
            mode: PlotMode::PctChange,
            ..ConferredControls::default()
        };
        let (options, request) = resolve(&controls, &ds, CONFERRED_OVERRIDES);
        assert_eq!(options.modes, vec![PlotMode::Counts]);
        assert_eq!(request.unwrap().mode, PlotMode::Counts);
    }

    #[test]
    fn multiple_pairs_become_sorted_series() {
        let request = ConferredRequest {
            cips: set(&["16", "30.52"]),
            levels: set(&["B.A.", "Ph.D."]),
            years: YearRange::new(2018, 2019),
            mode: PlotMode::Counts,
            show_markers: false,
        };
        let view = build_view(&dataset(), &request);
        let chart = view.chart().unwrap();
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["16 | B.A.", "16 | Ph.D.", "30.52 | B.A."]);
        assert_eq!(chart.series[0].segments, vec![vec![[2018.0, 100.0], [2019.0, 110.0]]]);
        assert_eq!(chart.x_ticks, vec![2018, 2019]);
        assert_eq!(chart.legend_title.as_deref(), Some(LEGEND_TITLE));
        assert!(!chart.markers);

        let series_col = view.table.column("series").unwrap();
        assert_eq!(series_col.first(), Some(&"16 | B.A."));
        assert_eq!(series_col.last(), Some(&"30.52 | B.A."));
        assert_eq!(view.table.rows.len(), 6);
    }

    #[test]
    fn pct_change_mode_draws_zero_line_and_skips_gaps() {
        let request = ConferredRequest {
            cips: set(&["16"]),
            levels: set(&["B.A."]),
            years: YearRange::new(2018, 2020),
            mode: PlotMode::PctChange,
            show_markers: true,
        };
        let view = build_view(&dataset(), &request);
        let chart = view.chart().unwrap();
        assert!(chart.zero_line);
        assert_eq!(chart.series[0].segments, vec![vec![[2019.0, 10.0], [2020.0, -10.0]]]);
        assert_eq!(chart.x_ticks, vec![2018, 2019, 2020]);
    }

    #[test]
    fn cleared_selection_applies_no_filter_on_that_column() {
        let controls = ConferredControls {
            cips: Some(BTreeSet::new()),
            ..ConferredControls::default()
        };
        let page = build_page(&dataset(), &controls);
        let chart = page.view.chart().unwrap();
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["16 | B.A.", "30.52 | B.A."]);
        assert_eq!(page.view.table.rows.len(), 5);
        assert!(!page.options.mode_locked);

        let controls = ConferredControls {
            cips: Some(BTreeSet::new()),
            levels: Some(BTreeSet::new()),
            ..ConferredControls::default()
        };
        let page = build_page(&dataset(), &controls);
        assert_eq!(page.view.table.rows.len(), page.source_rows);
    }

    #[test]
    fn missing_total_column_halts_render() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("DegreeConferred.csv"),
            "year,cip,level,pct_change\n2019,16,B.A.,3\n",
        )
        .unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let err = render(&config, &ConferredControls::default()).unwrap_err();
        assert_eq!(err.missing_columns(), ["total".to_string()]);
    }
}
