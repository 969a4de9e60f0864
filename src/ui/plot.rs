use eframe::egui::{self, Color32, Ui};
use egui_plot::{GridMark, HLine, Line, MarkerShape, Plot, PlotBounds, PlotPoints, Points};

use crate::chart::ChartSpec;
use crate::color::SeriesColors;

const PLOT_HEIGHT: f32 = 360.0;
const LEGEND_WIDTH: f32 = 180.0;
const MIN_PLOT_WIDTH: f32 = 240.0;

// ---------------------------------------------------------------------------
// Trend chart (central panel)
// ---------------------------------------------------------------------------

/// Draw `chart` with its legend, if any, to the right of the plot area.
pub fn trend_chart(ui: &mut Ui, id: &str, chart: &ChartSpec) {
    let colors = SeriesColors::new(chart.series.iter().map(|s| s.name.as_str()));

    ui.horizontal_top(|ui: &mut Ui| {
        let legend_width = if chart.legend_title.is_some() {
            LEGEND_WIDTH
        } else {
            0.0
        };
        let width = (ui.available_width() - legend_width).max(MIN_PLOT_WIDTH);
        plot(ui, id, chart, &colors, width);

        if let Some(title) = &chart.legend_title {
            legend(ui, title, chart, &colors);
        }
    });
}

fn plot(ui: &mut Ui, id: &str, chart: &ChartSpec, colors: &SeriesColors, width: f32) {
    let ticks = chart.x_ticks.clone();
    let x_bounds = match (chart.x_ticks.first(), chart.x_ticks.last()) {
        (Some(&first), Some(&last)) => Some((first as f64 - 0.5, last as f64 + 0.5)),
        _ => None,
    };

    Plot::new(id)
        .width(width)
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(chart.y_label.clone())
        // One grid mark per year actually present, no automatic spacing.
        .x_grid_spacer(move |_input| {
            ticks
                .iter()
                .map(|&year| GridMark {
                    value: year as f64,
                    step_size: 1.0,
                })
                .collect()
        })
        .x_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            if let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (x_bounds, chart.y_range) {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_lo, y_lo], [x_hi, y_hi]));
            }

            if chart.zero_line {
                plot_ui.hline(HLine::new(0.0).color(Color32::from_gray(140)).width(1.0));
            }

            for series in &chart.series {
                let color = colors.color_for(&series.name);

                for segment in &series.segments {
                    let points: PlotPoints = segment.iter().copied().collect();
                    plot_ui.line(
                        Line::new(points)
                            .name(&series.name)
                            .color(color)
                            .width(1.5),
                    );
                }

                if chart.markers {
                    let markers: PlotPoints = series.points().collect();
                    plot_ui.points(
                        Points::new(markers)
                            .name(&series.name)
                            .color(color)
                            .radius(3.0)
                            .shape(MarkerShape::Circle),
                    );
                }
            }
        });
}

fn legend(ui: &mut Ui, title: &str, chart: &ChartSpec, colors: &SeriesColors) {
    ui.vertical(|ui: &mut Ui| {
        ui.strong(title);
        for series in &chart.series {
            ui.horizontal(|ui: &mut Ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 2.0, colors.color_for(&series.name));
                ui.label(series.name.as_str());
            });
        }
    });
}
