use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::loader::{COL_CATEGORY, COL_COST, COL_RATIO, COL_REDUCTION, COL_SUPPLIER};
use crate::state::AppState;
use crate::ui::format::format_pct;

// ---------------------------------------------------------------------------
// Raw-data table (bottom panel): the filtered rows, all columns
// ---------------------------------------------------------------------------

pub fn raw_table(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        return;
    }
    let ds = &state.filtered;

    ui.strong(format!("Raw data  ({} rows)", ds.len()));
    ui.add_space(2.0);

    let mut columns: Vec<String> = [COL_CATEGORY, COL_SUPPLIER, COL_COST, COL_REDUCTION, COL_RATIO]
        .into_iter()
        .map(String::from)
        .collect();
    columns.extend(ds.extra_columns.iter().cloned());

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), columns.len())
        .header(20.0, |mut header| {
            for col in &columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, ds.len(), |mut row| {
                let rec = &ds.records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.category);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.supplier);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.annual_cost.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.reduction.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_pct(rec.reduction_ratio));
                });
                for col in &ds.extra_columns {
                    let text = rec
                        .extra
                        .get(col)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    row.col(|ui: &mut Ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
