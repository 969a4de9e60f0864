use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::error::DataError;
use crate::pages::{PageView, TrendOutcome};
use crate::state::{AppState, Page};
use crate::ui::{controls, plot, table};

const WARNING: Color32 = Color32::from_rgb(214, 140, 20);

// ---------------------------------------------------------------------------
// Left side panel – data source + filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel for the current page and apply any control changes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.page.title());
    ui.separator();

    ui.strong("Data source");
    let (label, url) = state.page.source();
    ui.hyperlink_to(label, url);
    ui.separator();

    ui.heading("Filters");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.page {
            Page::CareerOutcome => {
                let mut next = state.career_controls.clone();
                match &state.career {
                    Some(Ok(page)) => controls::career_controls(ui, page, &mut next),
                    _ => {
                        ui.label("Filters are unavailable until the data loads.");
                    }
                }
                state.set_career_controls(next);
            }
            Page::DegreeConferred => {
                let mut next = state.conferred_controls.clone();
                match &state.conferred {
                    Some(Ok(page)) => controls::conferred_controls(ui, page, &mut next),
                    _ => {
                        ui.label("Filters are unavailable until the data loads.");
                    }
                }
                state.set_conferred_controls(next);
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – trend chart + filtered table
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let page = state.page;
    let result = match page {
        Page::CareerOutcome => state.career.as_ref().map(|r| r.as_ref().map(|p| &p.view)),
        Page::DegreeConferred => state.conferred.as_ref().map(|r| r.as_ref().map(|p| &p.view)),
    };

    match result {
        None => {
            ui.spinner();
        }
        Some(Err(e)) => data_error(ui, e),
        Some(Ok(view)) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| page_view(ui, page, view));
        }
    }
}

fn page_view(ui: &mut Ui, page: Page, view: &PageView) {
    let id = page.title();

    ui.heading("Trend");
    match &view.trend {
        TrendOutcome::Chart(chart) => plot::trend_chart(ui, id, chart),
        TrendOutcome::NoData {
            message,
            diagnostics,
        } => {
            ui.colored_label(WARNING, *message);
            egui::CollapsingHeader::new("Available CIPs / Degrees")
                .id_salt((id, "diagnostics"))
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!(
                        "{}: {:?}",
                        diagnostics.code_label, diagnostics.codes
                    ));
                    ui.label(format!(
                        "{}: {:?}",
                        diagnostics.level_label, diagnostics.levels
                    ));
                });
        }
    }

    ui.separator();
    ui.heading("Filtered data");
    table::data_table(ui, id, &view.table);
}

/// Fatal page error: the message and nothing else.
fn data_error(ui: &mut Ui, error: &DataError) {
    ui.colored_label(Color32::RED, format!("Error: {error}"));
    for column in error.missing_columns() {
        ui.label(RichText::new(format!("• {column}")).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / page selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        for page in Page::ALL {
            if ui.selectable_label(state.page == page, page.title()).clicked() {
                state.select_page(page);
            }
        }

        ui.separator();

        if let Some((total, shown)) = state.row_counts() {
            ui.label(format!("{total} rows loaded, {shown} in table"));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Choose the folder holding the CSV files")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
    }
}
