use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Summary scalars
// ---------------------------------------------------------------------------

/// Sum of `Custo Anual` over all rows; 0 for an empty dataset.
pub fn total_cost(dataset: &Dataset) -> f64 {
    dataset.records.iter().map(|r| r.annual_cost).sum()
}

/// Sum of `Redução` over all rows; 0 for an empty dataset.
pub fn total_reduction(dataset: &Dataset) -> f64 {
    dataset.records.iter().map(|r| r.reduction).sum()
}

/// `total_reduction / total_cost`, guarded to 0 when the summed cost is
/// zero. Summary-level ratios never surface NaN or infinity.
pub fn overall_reduction_ratio(dataset: &Dataset) -> f64 {
    ratio_or_zero(total_reduction(dataset), total_cost(dataset))
}

fn ratio_or_zero(reduction: f64, cost: f64) -> f64 {
    if cost == 0.0 {
        0.0
    } else {
        reduction / cost
    }
}

// ---------------------------------------------------------------------------
// Grouped views
// ---------------------------------------------------------------------------

/// Summed cost and reduction for one group key.
struct GroupSums {
    key: String,
    cost: f64,
    reduction: f64,
}

/// Accumulate per-group sums, keeping groups in first-seen row order.
fn group_sums(dataset: &Dataset, key: impl Fn(&Record) -> &str) -> Vec<GroupSums> {
    let mut groups: Vec<GroupSums> = Vec::new();
    for rec in &dataset.records {
        let k = key(rec);
        let idx = match groups.iter().position(|g| g.key == k) {
            Some(i) => i,
            None => {
                groups.push(GroupSums {
                    key: k.to_string(),
                    cost: 0.0,
                    reduction: 0.0,
                });
                groups.len() - 1
            }
        };
        groups[idx].cost += rec.annual_cost;
        groups[idx].reduction += rec.reduction;
    }
    groups
}

/// Summed cost per category, one entry per distinct category, in first-seen
/// order.
pub fn cost_by_category(dataset: &Dataset) -> Vec<(String, f64)> {
    group_sums(dataset, |r| r.category.as_str())
        .into_iter()
        .map(|g| (g.key, g.cost))
        .collect()
}

/// Per-supplier `sum(reduction) / sum(cost)`, guarded to 0 for a zero-cost
/// group, in first-seen order.
pub fn reduction_ratio_by_supplier(dataset: &Dataset) -> Vec<(String, f64)> {
    group_sums(dataset, |r| r.supplier.as_str())
        .into_iter()
        .map(|g| (g.key, ratio_or_zero(g.reduction, g.cost)))
        .collect()
}

/// Per-category `sum(reduction) / sum(cost)`, guarded like the supplier view.
pub fn reduction_ratio_by_category(dataset: &Dataset) -> Vec<(String, f64)> {
    group_sums(dataset, |r| r.category.as_str())
        .into_iter()
        .map(|g| (g.key, ratio_or_zero(g.reduction, g.cost)))
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter view
// ---------------------------------------------------------------------------

/// One unaggregated point per row, for the cost-vs-reduction chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub annual_cost: f64,
    pub reduction: f64,
    pub category: String,
    pub supplier: String,
}

/// All rows as scatter points, in dataset order.
pub fn scatter_points(dataset: &Dataset) -> Vec<ScatterPoint> {
    dataset
        .records
        .iter()
        .map(|r| ScatterPoint {
            annual_cost: r.annual_cost,
            reduction: r.reduction,
            category: r.category.clone(),
            supplier: r.supplier.clone(),
        })
        .collect()
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

    /// The worked scenario: rows (A,X,100,10), (A,Y,200,0), (B,X,50,5).
    fn sample() -> Dataset {
        Dataset::from_records(vec![
            rec("A", "X", 100.0, 10.0),
            rec("A", "Y", 200.0, 0.0),
            rec("B", "X", 50.0, 5.0),
        ])
    }

    #[test]
    fn totals_match_row_sums() {
        let ds = sample();
        assert_eq!(total_cost(&ds), 350.0);
        assert_eq!(total_reduction(&ds), 15.0);
        assert!((overall_reduction_ratio(&ds) - 15.0 / 350.0).abs() < 1e-12);
    }

    #[test]
    fn empty_dataset_yields_zeros() {
        let ds = Dataset::default();
        assert_eq!(total_cost(&ds), 0.0);
        assert_eq!(total_reduction(&ds), 0.0);
        assert_eq!(overall_reduction_ratio(&ds), 0.0);
        assert!(cost_by_category(&ds).is_empty());
        assert!(scatter_points(&ds).is_empty());
    }

    #[test]
    fn zero_cost_ratios_are_guarded() {
        let ds = Dataset::from_records(vec![rec("A", "X", 0.0, 10.0)]);
        assert_eq!(overall_reduction_ratio(&ds), 0.0);
        assert_eq!(reduction_ratio_by_supplier(&ds), vec![("X".to_string(), 0.0)]);
        assert_eq!(reduction_ratio_by_category(&ds), vec![("A".to_string(), 0.0)]);
    }

    #[test]
    fn cost_groups_in_first_seen_order() {
        let ds = sample();
        assert_eq!(
            cost_by_category(&ds),
            vec![("A".to_string(), 300.0), ("B".to_string(), 50.0)]
        );
    }

    #[test]
    fn group_costs_partition_the_total() {
        let ds = sample();
        let by_cat: f64 = cost_by_category(&ds).iter().map(|(_, c)| c).sum();
        assert_eq!(by_cat, total_cost(&ds));

        let n_rows: usize = ds
            .categories
            .iter()
            .map(|cat| ds.records.iter().filter(|r| &r.category == cat).count())
            .sum();
        assert_eq!(n_rows, ds.len());
    }

    #[test]
    fn supplier_ratios_use_group_sums_not_row_means() {
        let ds = sample();
        // X: (10 + 5) / (100 + 50) = 0.1; Y: 0 / 200 = 0.
        assert_eq!(
            reduction_ratio_by_supplier(&ds),
            vec![("X".to_string(), 0.1), ("Y".to_string(), 0.0)]
        );
    }

    #[test]
    fn scatter_keeps_row_order_and_fields() {
        let ds = sample();
        let pts = scatter_points(&ds);
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[1].supplier, "Y");
        assert_eq!(pts[2].annual_cost, 50.0);
    }
}
