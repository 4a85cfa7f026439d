use crate::color::CategoryColors;
use crate::data::filter::{resolve_filters, FilterSelection};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Chart tabs
// ---------------------------------------------------------------------------

/// The four chart views of the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    CostByCategory,
    RatioBySupplier,
    RatioByCategory,
    CostVsReduction,
}

impl ChartTab {
    pub const ALL: [ChartTab; 4] = [
        ChartTab::CostByCategory,
        ChartTab::RatioBySupplier,
        ChartTab::RatioByCategory,
        ChartTab::CostVsReduction,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartTab::CostByCategory => "Custo por Categoria",
            ChartTab::RatioBySupplier => "% Redução por Fornecedor",
            ChartTab::RatioByCategory => "% Redução por Categoria",
            ChartTab::CostVsReduction => "Custo vs Redução",
        }
    }
}

/// The two filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAxis {
    Category,
    Supplier,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The session-scoped context: everything the pipeline and the UI need,
/// passed explicitly instead of living in globals.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<Dataset>,

    /// Current category/supplier selection.
    pub filters: FilterSelection,

    /// Rows passing the current filters (cached, re-resolved on change).
    pub filtered: Dataset,

    /// Which chart tab is shown.
    pub active_tab: ChartTab,

    /// Category → colour mapping shared by charts and filter swatches.
    pub colors: Option<CategoryColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    /// Ingest a newly loaded dataset: identity filters, full visible view.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = FilterSelection::all(&dataset);
        self.filtered = dataset.clone();
        self.colors = Some(CategoryColors::new(&dataset.categories));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Re-resolve the cached filtered view after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filtered = resolve_filters(ds, &self.filters);
        }
    }

    fn selected_mut(&mut self, axis: FilterAxis) -> &mut std::collections::BTreeSet<String> {
        match axis {
            FilterAxis::Category => &mut self.filters.categories,
            FilterAxis::Supplier => &mut self.filters.suppliers,
        }
    }

    /// All distinct values of the loaded dataset for one axis.
    pub fn axis_values(&self, axis: FilterAxis) -> &[String] {
        match (&self.dataset, axis) {
            (Some(ds), FilterAxis::Category) => &ds.categories,
            (Some(ds), FilterAxis::Supplier) => &ds.suppliers,
            (None, _) => &[],
        }
    }

    /// Toggle a single value in an axis selection.
    pub fn toggle(&mut self, axis: FilterAxis, value: &str) {
        let selected = self.selected_mut(axis);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every value of an axis.
    pub fn select_all(&mut self, axis: FilterAxis) {
        let values: Vec<String> = self.axis_values(axis).to_vec();
        let selected = self.selected_mut(axis);
        *selected = values.into_iter().collect();
        self.refilter();
    }

    /// Deselect every value of an axis (hides all rows).
    pub fn select_none(&mut self, axis: FilterAxis) {
        self.selected_mut(axis).clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeMap;

    fn sample() -> Dataset {
        let rec = |cat: &str, sup: &str, cost: f64, red: f64| {
            Record::new(cat.to_string(), sup.to_string(), cost, red, BTreeMap::new())
        };
        Dataset::from_records(vec![
            rec("TI", "Alfa", 100.0, 10.0),
            rec("RH", "Beta", 50.0, 5.0),
        ])
    }

    #[test]
    fn set_dataset_starts_with_identity_filter() {
        let mut state = AppState::default();
        state.set_dataset(sample());
        assert_eq!(state.filtered.len(), 2);
        assert_eq!(state.filters.categories.len(), 2);
    }

    #[test]
    fn toggle_hides_and_restores_rows() {
        let mut state = AppState::default();
        state.set_dataset(sample());

        state.toggle(FilterAxis::Category, "TI");
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.filtered.records[0].category, "RH");

        state.toggle(FilterAxis::Category, "TI");
        assert_eq!(state.filtered.len(), 2);
    }

    #[test]
    fn select_none_then_all_round_trips() {
        let mut state = AppState::default();
        state.set_dataset(sample());

        state.select_none(FilterAxis::Supplier);
        assert!(state.filtered.is_empty());

        state.select_all(FilterAxis::Supplier);
        assert_eq!(state.filtered.len(), 2);
    }
}
