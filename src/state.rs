use std::path::PathBuf;

use crate::config::DashboardConfig;
use crate::data::error::DataError;
use crate::pages::career::{self, CareerControls, CareerPage};
use crate::pages::conferred::{self, ConferredControls, ConferredPage};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    CareerOutcome,
    DegreeConferred,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::CareerOutcome, Page::DegreeConferred];

    pub fn title(self) -> &'static str {
        match self {
            Page::CareerOutcome => "Career Outcome",
            Page::DegreeConferred => "Degree Conferred",
        }
    }

    /// (label, url) of the published data this page is built from.
    pub fn source(self) -> (&'static str, &'static str) {
        match self {
            Page::CareerOutcome => (
                "Career outcomes / salary: NACE first-destination dashboard",
                "https://www.naceweb.org/job-market/graduate-outcomes/first-destination/class-of-2024/first-destinations-for-the-college-class-of-2024-interactive-dashboard/",
            ),
            Page::DegreeConferred => (
                "IPEDS Completions (CIP): NCES IPEDS Data Center",
                "https://nces.ed.gov/ipeds/use-the-data",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Only control values persist between frames. A page's view is rebuilt from
/// disk whenever its controls change or the user reloads.
pub struct AppState {
    pub config: DashboardConfig,
    pub page: Page,

    pub career_controls: CareerControls,
    pub conferred_controls: ConferredControls,

    /// Last render of each page; `None` until the page is first shown.
    pub career: Option<Result<CareerPage, DataError>>,
    pub conferred: Option<Result<ConferredPage, DataError>>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            page: Page::default(),
            career_controls: CareerControls::default(),
            conferred_controls: ConferredControls::default(),
            career: None,
            conferred: None,
            status_message: None,
        }
    }

    /// Switch pages. The page being opened reads its file again on the next frame.
    pub fn select_page(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        self.page = page;
        match page {
            Page::CareerOutcome => self.career = None,
            Page::DegreeConferred => self.conferred = None,
        }
    }

    /// Render the current page if it has no view yet.
    pub fn ensure_rendered(&mut self) {
        match self.page {
            Page::CareerOutcome if self.career.is_none() => self.rerender_career(),
            Page::DegreeConferred if self.conferred.is_none() => self.rerender_conferred(),
            _ => {}
        }
    }

    pub fn rerender_career(&mut self) {
        let result = career::render(&self.config, &self.career_controls);
        if let Err(e) = &result {
            log::warn!("{} page halted: {e}", Page::CareerOutcome.title());
        }
        self.career = Some(result);
    }

    pub fn rerender_conferred(&mut self) {
        let result = conferred::render(&self.config, &self.conferred_controls);
        if let Err(e) = &result {
            log::warn!("{} page halted: {e}", Page::DegreeConferred.title());
        }
        self.conferred = Some(result);
    }

    /// Store new control values and re-run the pipeline if anything changed.
    pub fn set_career_controls(&mut self, controls: CareerControls) {
        if controls != self.career_controls {
            self.career_controls = controls;
            self.rerender_career();
        }
    }

    pub fn set_conferred_controls(&mut self, controls: ConferredControls) {
        if controls != self.conferred_controls {
            self.conferred_controls = controls;
            self.rerender_conferred();
        }
    }

    /// Drop both views so the next frame reads the files again.
    pub fn reload(&mut self) {
        self.career = None;
        self.conferred = None;
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Data folder set to {}", dir.display());
        self.config.data_dir = dir;
        self.status_message = None;
        self.reload();
    }

    /// (rows in file, rows in the filtered table) for the current page.
    pub fn row_counts(&self) -> Option<(usize, usize)> {
        match self.page {
            Page::CareerOutcome => match &self.career {
                Some(Ok(p)) => Some((p.source_rows, p.view.table.rows.len())),
                _ => None,
            },
            Page::DegreeConferred => match &self.conferred {
                Some(Ok(p)) => Some((p.source_rows, p.view.table.rows.len())),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PlotMode;

    fn state_with_files() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("DegreeConferred.csv"),
            "year,cip,level,total,pct_change\n2019,16,B.A.,10,\n2020,16,B.A.,12,20\n",
        )
        .unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        (dir, AppState::new(config))
    }

    #[test]
    fn pages_render_lazily_and_report_errors() {
        let (_dir, mut state) = state_with_files();
        state.ensure_rendered();
        assert!(matches!(state.career, Some(Err(DataError::Read { .. }))));
        assert!(state.conferred.is_none());

        state.page = Page::DegreeConferred;
        state.ensure_rendered();
        assert_eq!(state.row_counts(), Some((2, 2)));
    }

    #[test]
    fn changing_controls_rerenders() {
        let (_dir, mut state) = state_with_files();
        state.page = Page::DegreeConferred;
        state.ensure_rendered();

        let controls = ConferredControls {
            mode: PlotMode::PctChange,
            ..state.conferred_controls.clone()
        };
        state.set_conferred_controls(controls);
        let page = state.conferred.as_ref().unwrap().as_ref().unwrap();
        let chart = page.view.chart().unwrap();
        assert!(chart.zero_line);
        assert_eq!(chart.series[0].segments, vec![vec![[2020.0, 20.0]]]);

        state.reload();
        assert!(state.conferred.is_none());
    }

    #[test]
    fn switching_back_to_a_page_reads_the_file_again() {
        let (dir, mut state) = state_with_files();
        state.select_page(Page::DegreeConferred);
        state.ensure_rendered();
        assert_eq!(state.row_counts(), Some((2, 2)));

        std::fs::write(
            dir.path().join("DegreeConferred.csv"),
            "year,cip,level,total,pct_change\n2019,16,B.A.,10,\n2020,16,B.A.,12,20\n2021,16,B.A.,15,25\n",
        )
        .unwrap();

        state.select_page(Page::CareerOutcome);
        state.ensure_rendered();
        assert!(state.conferred.is_some());
        state.select_page(Page::DegreeConferred);
        assert!(state.conferred.is_none());
        state.ensure_rendered();
        assert_eq!(state.row_counts(), Some((3, 3)));

        // Selecting the page already shown keeps its view.
        state.select_page(Page::DegreeConferred);
        assert!(state.conferred.is_some());
    }
}
