use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export;
use crate::data::loader::{self, COL_CATEGORY, COL_SUPPLIER};
use crate::state::{AppState, FilterAxis};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one collapsible section per filterable
/// column, each with All/None buttons and per-value checkboxes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            filter_section(ui, state, FilterAxis::Category, COL_CATEGORY);
            filter_section(ui, state, FilterAxis::Supplier, COL_SUPPLIER);
        });
}

fn filter_section(ui: &mut Ui, state: &mut AppState, axis: FilterAxis, title: &str) {
    let values: Vec<String> = state.axis_values(axis).to_vec();

    let selected_of = |state: &AppState, axis: FilterAxis| match axis {
        FilterAxis::Category => state.filters.categories.len(),
        FilterAxis::Supplier => state.filters.suppliers.len(),
    };
    let header_text = format!("{title}  ({}/{})", selected_of(state, axis), values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(axis);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(axis);
                }
            });

            for val in &values {
                let is_selected = match axis {
                    FilterAxis::Category => state.filters.categories.contains(val),
                    FilterAxis::Supplier => state.filters.suppliers.contains(val),
                };

                // Category labels carry the chart colour swatch.
                let mut text = RichText::new(val);
                if axis == FilterAxis::Category {
                    if let Some(colors) = &state.colors {
                        text = text.color(colors.color_for(val));
                    }
                }

                let mut checked = is_selected;
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(axis, val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_rows = !state.filtered.is_empty();
            if ui
                .add_enabled(has_rows, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open cost table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows ({} categories, {} suppliers)",
                    dataset.len(),
                    dataset.categories.len(),
                    dataset.suppliers.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name("dados_filtrados.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::export_csv(&state.filtered, &path) {
            Ok(()) => {
                log::info!(
                    "Exported {} rows to {}",
                    state.filtered.len(),
                    path.display()
                );
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
