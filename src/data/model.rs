use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a passthrough cell from a non-core column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value for input columns outside the core schema.
/// Such columns are not interpreted by the pipeline; they ride along into the
/// raw-data table and the CSV export.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a textual cell (CSV input).
    pub fn guess(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Record – one cleaned row of the cost table
// ---------------------------------------------------------------------------

/// A single cost line item (one surviving row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: String,
    pub supplier: String,
    pub annual_cost: f64,
    pub reduction: f64,
    /// `reduction / annual_cost`, computed at load time. Plain IEEE division:
    /// infinite or NaN when `annual_cost` is zero. Aggregate-level ratios are
    /// guarded instead (see `data::aggregate`).
    pub reduction_ratio: f64,
    /// Cells from input columns outside the core schema: column name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(
        category: String,
        supplier: String,
        annual_cost: f64,
        reduction: f64,
        extra: BTreeMap<String, CellValue>,
    ) -> Self {
        Record {
            category,
            supplier,
            annual_cost,
            reduction,
            reduction_ratio: reduction / annual_cost,
            extra,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned table
// ---------------------------------------------------------------------------

/// The cleaned table with pre-computed distinct-value indices.
/// Immutable after construction; a new file replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// All surviving rows, in input order.
    pub records: Vec<Record>,
    /// Distinct categories, in first-seen row order.
    pub categories: Vec<String>,
    /// Distinct suppliers, in first-seen row order.
    pub suppliers: Vec<String>,
    /// Sorted union of passthrough column names.
    pub extra_columns: Vec<String>,
}

impl Dataset {
    /// Build the distinct-value indices from the cleaned rows.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        let mut suppliers: Vec<String> = Vec::new();
        let mut extra_columns: BTreeSet<String> = BTreeSet::new();

        for rec in &records {
            if !categories.contains(&rec.category) {
                categories.push(rec.category.clone());
            }
            if !suppliers.contains(&rec.supplier) {
                suppliers.push(rec.supplier.clone());
            }
            for col in rec.extra.keys() {
                extra_columns.insert(col.clone());
            }
        }

        Dataset {
            records,
            categories,
            suppliers,
            extra_columns: extra_columns.into_iter().collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
