use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui};

use crate::data::model::{Metric, YearRange};
use crate::pages::career::{CareerControls, CareerPage};
use crate::pages::conferred::{ConferredControls, ConferredPage};

// ---------------------------------------------------------------------------
// Career outcome page
// ---------------------------------------------------------------------------

/// Widgets for page 1. Writes the user's changes into `controls`.
pub fn career_controls(ui: &mut Ui, page: &CareerPage, controls: &mut CareerControls) {
    let Some(request) = &page.request else {
        ui.label("No rows to filter.");
        return;
    };
    let options = &page.options;

    ui.strong("CIP");
    let cip_text = options.cip_label(&request.cip).unwrap_or(&request.cip);
    egui::ComboBox::from_id_salt("career_cip")
        .selected_text(cip_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in &options.cips {
                if ui
                    .selectable_label(choice.code == request.cip, choice.label.as_str())
                    .clicked()
                {
                    controls.cip = Some(choice.code.clone());
                }
            }
        });

    ui.strong("Degree Level");
    egui::ComboBox::from_id_salt("career_degree")
        .selected_text(request.degree_level.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for level in &options.degree_levels {
                if ui
                    .selectable_label(*level == request.degree_level, level.as_str())
                    .clicked()
                {
                    controls.degree_level = Some(level.clone());
                }
            }
        });

    if let Some(years) = year_range(ui, options.year_bounds, request.years) {
        controls.years = Some(years);
    }

    ui.strong("Metric");
    egui::ComboBox::from_id_salt("career_metric")
        .selected_text(request.metric.column())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                ui.selectable_value(&mut controls.metric, metric, metric.column());
            }
        });
}

// ---------------------------------------------------------------------------
// Degree conferred page
// ---------------------------------------------------------------------------

/// Widgets for page 2. Writes the user's changes into `controls`.
pub fn conferred_controls(ui: &mut Ui, page: &ConferredPage, controls: &mut ConferredControls) {
    let Some(request) = &page.request else {
        ui.label("No rows to filter.");
        return;
    };
    let options = &page.options;

    if let Some(cips) = multi_select(ui, "CIP code(s)", &options.cips, &request.cips) {
        controls.cips = Some(cips);
    }
    if let Some(levels) = multi_select(ui, "Degree level(s)", &options.levels, &request.levels) {
        controls.levels = Some(levels);
    }

    if let Some(years) = year_range(ui, options.year_bounds, request.years) {
        controls.years = Some(years);
    }

    ui.strong("Plot");
    if !options.mode_locked {
        for &mode in &options.modes {
            if ui.radio(request.mode == mode, mode.label()).clicked() {
                controls.mode = mode;
            }
        }
    }
    for note in &options.notes {
        ui.label(RichText::new(*note).small().weak());
    }

    ui.checkbox(&mut controls.show_markers, "Show markers");
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// Two sliders over `bounds`. Returns the new range when either moved.
fn year_range(ui: &mut Ui, bounds: Option<YearRange>, current: YearRange) -> Option<YearRange> {
    let bounds = bounds?;
    ui.strong(format!("Year Range ({current})"));

    let (mut start, mut end) = (current.start, current.end);
    let mut changed = ui
        .add(egui::Slider::new(&mut start, bounds.start..=bounds.end).text("from"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut end, bounds.start..=bounds.end).text("to"))
        .changed();

    changed.then(|| YearRange::new(start, end))
}

/// Collapsible checkbox list with All / None buttons.
/// Returns the new selection when it differs from `selected`.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &BTreeSet<String>,
) -> Option<BTreeSet<String>> {
    let mut next = selected.clone();
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    next = options.iter().cloned().collect();
                }
                if ui.small_button("None").clicked() {
                    next.clear();
                }
            });

            for option in options {
                let mut checked = next.contains(option);
                if ui.checkbox(&mut checked, option.as_str()).changed() {
                    if checked {
                        next.insert(option.clone());
                    } else {
                        next.remove(option);
                    }
                }
            }
        });

    (next != *selected).then_some(next)
}
