use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter selection: which categories and suppliers are shown
// ---------------------------------------------------------------------------

/// Caller-supplied subset constraint on the two filterable columns.
///
/// Semantics mirror a multiselect widget whose default is "everything
/// selected": the identity selection passes all rows, and an *empty* set on
/// either axis means nothing is selected there, so no row passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub suppliers: BTreeSet<String>,
}

impl FilterSelection {
    /// The identity selection: every distinct value of the dataset chosen.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            categories: dataset.categories.iter().cloned().collect(),
            suppliers: dataset.suppliers.iter().cloned().collect(),
        }
    }

    /// Whether a row passes the selection. Conjunctive: both the category
    /// and the supplier must be chosen.
    pub fn allows(&self, record: &Record) -> bool {
        self.categories.contains(&record.category) && self.suppliers.contains(&record.supplier)
    }
}

/// Resolve the selection into a new Dataset holding the surviving
/// subsequence. The source dataset is untouched; the result's distinct-value
/// indices are re-derived from the surviving rows.
pub fn resolve_filters(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    let records: Vec<Record> = dataset
        .records
        .iter()
        .filter(|rec| selection.allows(rec))
        .cloned()
        .collect();
    Dataset::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rec(category: &str, supplier: &str, cost: f64, red: f64) -> Record {
        Record::new(
            category.to_string(),
            supplier.to_string(),
            cost,
            red,
            BTreeMap::new(),
        )
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            rec("TI", "Alfa", 100.0, 10.0),
            rec("TI", "Beta", 200.0, 0.0),
            rec("RH", "Alfa", 50.0, 5.0),
        ])
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = sample();
        let all = FilterSelection::all(&ds);
        assert_eq!(resolve_filters(&ds, &all), ds);
    }

    #[test]
    fn empty_selection_yields_empty_dataset() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.categories.clear();
        assert!(resolve_filters(&ds, &sel).is_empty());
    }

    #[test]
    fn filter_is_conjunctive() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.categories.remove("RH");
        sel.suppliers.remove("Beta");
        // Only TI+Alfa passes both constraints.
        let out = resolve_filters(&ds, &sel);
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].supplier, "Alfa");
        assert_eq!(out.records[0].category, "TI");
    }

    #[test]
    fn resolve_is_idempotent() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.suppliers.remove("Alfa");

        let once = resolve_filters(&ds, &sel);
        let twice = resolve_filters(&once, &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn filtering_preserves_row_order() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.suppliers.remove("Beta");
        let out = resolve_filters(&ds, &sel);
        assert_eq!(out.records[0].category, "TI");
        assert_eq!(out.records[1].category, "RH");
    }
}
