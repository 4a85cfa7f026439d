use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::data::aggregate;
use crate::state::{AppState, ChartTab};
use crate::ui::format::{format_brl, format_pct};

// ---------------------------------------------------------------------------
// Central panel: metric row + chart tabs
// ---------------------------------------------------------------------------

/// Render the metric row and the active chart tab.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    match &state.dataset {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a cost table to view the dashboard  (File → Open…)");
            });
            return;
        }
        Some(ds) if ds.is_empty() => {
            // Loaded, but cleaning dropped every row. Not the same as "no
            // file" or "filtered everything away".
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("The file loaded, but no row had all required fields filled in.");
            });
            return;
        }
        Some(_) => {}
    }

    metrics_row(ui, state);
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for tab in ChartTab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.label())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
    ui.add_space(4.0);

    if state.filtered.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No rows match the current filters.");
        });
        return;
    }

    match state.active_tab {
        ChartTab::CostByCategory => {
            let groups = aggregate::cost_by_category(&state.filtered);
            bar_chart(ui, "cost_by_category", groups, state, true, false);
        }
        ChartTab::RatioBySupplier => {
            let groups = aggregate::reduction_ratio_by_supplier(&state.filtered);
            bar_chart(ui, "ratio_by_supplier", groups, state, false, true);
        }
        ChartTab::RatioByCategory => {
            let groups = aggregate::reduction_ratio_by_category(&state.filtered);
            bar_chart(ui, "ratio_by_category", groups, state, true, true);
        }
        ChartTab::CostVsReduction => scatter_chart(ui, state),
    }
}

/// The three summary scalars, Streamlit-metric style.
fn metrics_row(ui: &mut Ui, state: &AppState) {
    let ds = &state.filtered;
    let cost = aggregate::total_cost(ds);
    let reduction = aggregate::total_reduction(ds);
    let ratio = aggregate::overall_reduction_ratio(ds);

    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Custo Total", format_brl(cost));
        metric(&mut cols[1], "Redução Total", format_brl(reduction));
        metric(&mut cols[2], "% Redução Média", format_pct(ratio));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.heading(value);
    });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One bar per group at integer x positions; group names label the axis.
fn bar_chart(
    ui: &mut Ui,
    id: &str,
    groups: Vec<(String, f64)>,
    state: &AppState,
    category_colors: bool,
    percent_axis: bool,
) {
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            let color = if category_colors {
                state
                    .colors
                    .as_ref()
                    .map(|c| c.color_for(key))
                    .unwrap_or(Color32::LIGHT_BLUE)
            } else {
                Color32::LIGHT_BLUE
            };
            Bar::new(i as f64, *value).width(0.6).name(key).fill(color)
        })
        .collect();

    let labels: Vec<String> = groups.into_iter().map(|(k, _)| k).collect();
    let mut plot = Plot::new(id.to_string())
        .x_axis_formatter(move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if percent_axis {
        plot = plot.y_axis_formatter(|mark, _range| format_pct(mark.value));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
    });
}

// ---------------------------------------------------------------------------
// Scatter chart: cost vs reduction, one series per category
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, state: &AppState) {
    let points = aggregate::scatter_points(&state.filtered);

    Plot::new("cost_vs_reduction")
        .legend(Legend::default())
        .x_axis_label("Custo Anual")
        .y_axis_label("Redução")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for cat in &state.filtered.categories {
                let series: PlotPoints = points
                    .iter()
                    .filter(|p| &p.category == cat)
                    .map(|p| [p.annual_cost, p.reduction])
                    .collect();

                let color = state
                    .colors
                    .as_ref()
                    .map(|c| c.color_for(cat))
                    .unwrap_or(Color32::LIGHT_BLUE);

                plot_ui.points(Points::new(series).name(cat).color(color).radius(4.0));
            }
        });
}
