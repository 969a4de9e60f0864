use crate::chart::{percent_range_of, year_ticks, ChartSpec, SeriesLine};
use crate::config::{CipChoice, DashboardConfig};
use crate::data::error::DataError;
use crate::data::filter::{KeyPredicate, RowFilter};
use crate::data::loader::{load_career, CAREER_KEY_COLUMNS};
use crate::data::model::{CareerDataset, CareerRecord, Metric, YearRange};
use crate::data::transform::rescale_to_percent;

use super::{format_number, Diagnostics, PageView, TableView, TrendOutcome};

const NO_DATA: &str = "No data for this selection.";

// ---------------------------------------------------------------------------
// Controls → options → request
// ---------------------------------------------------------------------------

/// Raw widget values. `None` means "not touched yet, use the default".
#[derive(Debug, Clone, PartialEq)]
pub struct CareerControls {
    pub cip: Option<String>,
    pub degree_level: Option<String>,
    pub years: Option<YearRange>,
    pub metric: Metric,
}

impl Default for CareerControls {
    fn default() -> Self {
        Self {
            cip: None,
            degree_level: None,
            years: None,
            metric: Metric::TotalGraduate,
        }
    }
}

/// Choices offered by the widgets for the currently loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerOptions {
    pub cips: Vec<CipChoice>,
    pub degree_levels: Vec<String>,
    pub year_bounds: Option<YearRange>,
    pub default_years: Option<YearRange>,
}

impl CareerOptions {
    pub fn from_dataset(dataset: &CareerDataset, config: &DashboardConfig) -> Self {
        let year_bounds = dataset.keys.years;
        let default_years = year_bounds.map(|b| {
            YearRange::new(config.career_start_year.clamp(b.start, b.end), b.end)
        });
        Self {
            cips: config.cip_catalogue.clone(),
            degree_levels: dataset.keys.levels.iter().cloned().collect(),
            year_bounds,
            default_years,
        }
    }

    pub fn cip_label(&self, code: &str) -> Option<&str> {
        self.cips
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.label.as_str())
    }
}

/// Fully resolved, immutable selection for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerRequest {
    pub cip: String,
    pub degree_level: String,
    pub years: YearRange,
    pub metric: Metric,
}

impl CareerRequest {
    /// Fill unset or stale controls with defaults. `None` when the file offers
    /// nothing to select (no catalogue entries or no rows).
    pub fn resolve(controls: &CareerControls, options: &CareerOptions) -> Option<Self> {
        let cip = controls
            .cip
            .clone()
            .filter(|c| options.cips.iter().any(|o| &o.code == c))
            .or_else(|| options.cips.first().map(|c| c.code.clone()))?;
        let degree_level = controls
            .degree_level
            .clone()
            .filter(|l| options.degree_levels.contains(l))
            .or_else(|| options.degree_levels.first().cloned())?;
        let years = match (controls.years, options.year_bounds) {
            (Some(years), Some(bounds)) => years.clamp_to(&bounds),
            _ => options.default_years?,
        };
        Some(Self {
            cip,
            degree_level,
            years,
            metric: controls.metric,
        })
    }

    pub fn filter(&self) -> RowFilter {
        RowFilter {
            code: KeyPredicate::Equals(self.cip.clone()),
            level: KeyPredicate::Equals(self.degree_level.clone()),
            years: self.years,
        }
    }
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CareerPage {
    pub options: CareerOptions,
    pub request: Option<CareerRequest>,
    pub view: PageView,
    pub source_rows: usize,
}

/// Load `outcome_data.csv` fresh and build the page for `controls`.
pub fn render(config: &DashboardConfig, controls: &CareerControls) -> Result<CareerPage, DataError> {
    let dataset = load_career(&config.career_path())?;
    Ok(build_page(&dataset, config, controls))
}

pub fn build_page(
    dataset: &CareerDataset,
    config: &DashboardConfig,
    controls: &CareerControls,
) -> CareerPage {
    let options = CareerOptions::from_dataset(dataset, config);
    let request = CareerRequest::resolve(controls, &options);
    let view = match &request {
        Some(request) => build_view(dataset, request),
        None => PageView {
            trend: no_data(dataset),
            table: table(dataset, &[]),
        },
    };
    CareerPage {
        options,
        request,
        view,
        source_rows: dataset.len(),
    }
}

/// Filter, rescale and chart one metric for a single (CIP, level) pair.
pub fn build_view(dataset: &CareerDataset, request: &CareerRequest) -> PageView {
    let mut rows = request.filter().apply(&dataset.records);
    rows.sort_by_key(|r| r.year);
    let metric = request.metric;

    if rows.iter().all(|r| r.metric(metric).is_none()) {
        return PageView {
            trend: no_data(dataset),
            table: table(dataset, &rows),
        };
    }

    if metric.is_percentage() {
        rescale_to_percent(&mut rows, metric);
    }

    let series = vec![SeriesLine::from_values(
        metric.column(),
        rows.iter().map(|r| (r.year, r.metric(metric))),
    )];
    let y_range = if metric.is_percentage() {
        percent_range_of(&series)
    } else {
        None
    };

    let chart = ChartSpec {
        y_label: metric.axis_label(),
        x_ticks: year_ticks(rows.iter().map(|r| r.year)),
        y_range,
        series,
        markers: true,
        zero_line: false,
        legend_title: None,
    };
    PageView {
        trend: TrendOutcome::Chart(chart),
        table: table(dataset, &rows),
    }
}

fn no_data(dataset: &CareerDataset) -> TrendOutcome {
    TrendOutcome::NoData {
        message: NO_DATA,
        diagnostics: Diagnostics {
            code_label: "Unique CIPs in file",
            codes: dataset.keys.codes.iter().cloned().collect(),
            level_label: "Unique Degree Levels in file",
            levels: dataset.keys.levels.iter().cloned().collect(),
        },
    }
}

fn table(dataset: &CareerDataset, rows: &[CareerRecord]) -> TableView {
    let columns = CAREER_KEY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(Metric::ALL.iter().map(|m| m.column().to_string()))
        .chain(dataset.extra_columns.iter().cloned())
        .collect();
    let rows = rows
        .iter()
        .map(|r| {
            [r.year.to_string(), r.cip.clone(), r.degree_level.clone()]
                .into_iter()
                .chain(r.metrics.iter().map(|v| format_number(*v)))
                .chain(r.extra.iter().cloned())
                .collect()
        })
        .collect();
    TableView { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, cip: &str, level: &str, rate: Option<f64>) -> CareerRecord {
        let mut metrics = [None; Metric::COUNT];
        metrics[Metric::TotalGraduate.index()] = Some(100.0);
        metrics[Metric::EmployedOverall.index()] = rate;
        CareerRecord {
            year,
            cip: cip.to_string(),
            degree_level: level.to_string(),
            metrics,
            extra: Vec::new(),
        }
    }

    fn dataset() -> CareerDataset {
        let mut records: Vec<CareerRecord> = (2015..=2024)
            .map(|y| record(y, "16", "Doctor's", Some(0.40 + (y - 2015) as f64 * 0.01)))
            .collect();
        records.push(record(2020, "13.13", "Bachelor's", Some(55.0)));
        CareerDataset::from_records(records, Vec::new())
    }

    fn request(metric: Metric) -> CareerRequest {
        CareerRequest {
            cip: "16".to_string(),
            degree_level: "Doctor's".to_string(),
            years: YearRange::new(2019, 2024),
            metric,
        }
    }

    #[test]
    fn defaults_start_at_configured_year() {
        let config = DashboardConfig::default();
        let page = build_page(&dataset(), &config, &CareerControls::default());
        let request = page.request.unwrap();
        assert_eq!(request.cip, "13.13");
        assert_eq!(request.degree_level, "Bachelor's");
        assert_eq!(request.years, YearRange::new(2019, 2024));
        assert_eq!(request.metric, Metric::TotalGraduate);
    }

    #[test]
    fn stale_controls_fall_back_to_defaults() {
        let options = CareerOptions::from_dataset(&dataset(), &DashboardConfig::default());
        let controls = CareerControls {
            cip: Some("99".to_string()),
            degree_level: Some("Associate's".to_string()),
            years: Some(YearRange::new(1990, 2030)),
            metric: Metric::EmployedOverall,
        };
        let request = CareerRequest::resolve(&controls, &options).unwrap();
        assert_eq!(request.cip, "13.13");
        assert_eq!(request.degree_level, "Bachelor's");
        assert_eq!(request.years, YearRange::new(2015, 2024));
    }

    #[test]
    fn fraction_rates_are_charted_as_percent() {
        let view = build_view(&dataset(), &request(Metric::EmployedOverall));
        let chart = view.chart().expect("chart");
        assert_eq!(chart.x_ticks, (2019..=2024).collect::<Vec<_>>());
        assert_eq!(chart.y_label, "Employed Overall (%)");
        let first = chart.series[0].segments[0][0];
        assert_eq!(first[0], 2019.0);
        assert!((first[1] - 44.0).abs() < 1e-9);
        let (lo, hi) = chart.y_range.unwrap();
        assert!(lo >= 0.0 && hi <= 100.0 && hi - lo >= 8.0);
        assert_eq!(view.table.rows.len(), 6);
        let cell: f64 = view.table.column("Employed Overall").unwrap()[0].parse().unwrap();
        assert!((cell - 44.0).abs() < 1e-9);
    }

    #[test]
    fn missing_year_breaks_the_trend_line() {
        let records = vec![
            record(2019, "16", "Doctor's", Some(0.40)),
            record(2020, "16", "Doctor's", None),
            record(2021, "16", "Doctor's", Some(0.50)),
            record(2022, "16", "Doctor's", Some(0.55)),
        ];
        let ds = CareerDataset::from_records(records, Vec::new());
        let view = build_view(&ds, &request(Metric::EmployedOverall));
        let chart = view.chart().unwrap();
        let segments: Vec<Vec<f64>> = chart.series[0]
            .segments
            .iter()
            .map(|s| s.iter().map(|p| p[0]).collect())
            .collect();
        assert_eq!(segments, vec![vec![2019.0], vec![2021.0, 2022.0]]);
        assert_eq!(chart.x_ticks, vec![2019, 2020, 2021, 2022]);
        assert_eq!(view.table.column("Employed Overall").unwrap()[1], "<null>");
    }

    #[test]
    fn count_metrics_use_automatic_bounds() {
        let view = build_view(&dataset(), &request(Metric::TotalGraduate));
        let chart = view.chart().unwrap();
        assert_eq!(chart.y_range, None);
        assert_eq!(chart.y_label, "Total Graduate");
    }

    #[test]
    fn empty_selection_reports_available_keys() {
        let mut req = request(Metric::EmployedOverall);
        req.degree_level = "Master's".to_string();
        let view = build_view(&dataset(), &req);
        match view.trend {
            TrendOutcome::NoData {
                message,
                diagnostics,
            } => {
                assert_eq!(message, NO_DATA);
                assert_eq!(diagnostics.codes, vec!["13.13", "16"]);
                assert_eq!(diagnostics.levels, vec!["Bachelor's", "Doctor's"]);
            }
            TrendOutcome::Chart(_) => panic!("expected no-data notice"),
        }
        assert!(view.table.rows.is_empty());
    }

    #[test]
    fn all_missing_metric_is_no_data_but_rows_still_tabled() {
        let records = (2019..=2021)
            .map(|y| record(y, "16", "Doctor's", None))
            .collect();
        let ds = CareerDataset::from_records(records, Vec::new());
        let view = build_view(&ds, &request(Metric::EmployedOverall));
        assert!(view.chart().is_none());
        assert_eq!(view.table.rows.len(), 3);
    }

    #[test]
    fn renders_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("outcome_data.csv"),
            "year,CIP,Degree Level,Total Graduate,Mean Starting Salary,Career Outcome Rate,\
Employed Overall,Standard Employment Full-time,Continuing Education,Seeking Employment,\
Seeking Continuing Education,Temp/Contract Employee\n\
2020,'16.0',Bachelor's,10,50000,0.8,0.7,0.6,0.1,0.1,0.05,0.02\n",
        )
        .unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let controls = CareerControls {
            cip: Some("16".to_string()),
            ..CareerControls::default()
        };
        let page = render(&config, &controls).unwrap();
        assert_eq!(page.source_rows, 1);
        assert!(page.view.chart().is_some());
    }
}
