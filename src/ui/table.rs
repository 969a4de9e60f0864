use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::pages::TableView;

const MIN_TABLE_HEIGHT: f32 = 200.0;

/// Every column and every row of `table`, scrollable.
pub fn data_table(ui: &mut Ui, id: &str, table: &TableView) {
    ui.label(format!(
        "{} rows × {} columns",
        table.rows.len(),
        table.columns.len()
    ));

    // Each page gets its own id so column widths are not shared between them.
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .min_scrolled_height(MIN_TABLE_HEIGHT)
            .header(20.0, |mut header| {
                for name in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.rows.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.as_str());
                        });
                    }
                });
            });
    });
}
