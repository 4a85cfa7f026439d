use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Core schema
// ---------------------------------------------------------------------------

/// Required input columns, by their exact header names.
pub const COL_CATEGORY: &str = "Categoria";
pub const COL_SUPPLIER: &str = "Fornecedor";
pub const COL_COST: &str = "Custo Anual";
pub const COL_REDUCTION: &str = "Redução";

/// Derived-ratio column written by the CSV export. Ignored on input and
/// recomputed, so an exported file reloads to the same dataset.
pub const COL_RATIO: &str = "% Redução";

/// A structural problem with the input table, as opposed to per-row missing
/// values (which are silently dropped).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a cost table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required column names
/// * `.json`    – `[{ "Categoria": ..., "Fornecedor": ..., ... }, ...]`
/// * `.parquet` – flat scalar columns (pandas `df.to_parquet()` shape)
///
/// Rows with a missing, null, empty, or non-numeric required field are
/// dropped; surviving rows keep their input order.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Accumulates raw cells and applies the cleaning rule uniformly for all
/// three input formats.
struct RowBuilder {
    category: Option<String>,
    supplier: Option<String>,
    annual_cost: Option<f64>,
    reduction: Option<f64>,
    extra: BTreeMap<String, CellValue>,
}

impl RowBuilder {
    fn new() -> Self {
        RowBuilder {
            category: None,
            supplier: None,
            annual_cost: None,
            reduction: None,
            extra: BTreeMap::new(),
        }
    }

    /// Finish the row: `None` when any required field failed to materialise,
    /// which drops the row without repair.
    fn finish(self) -> Option<Record> {
        Some(Record::new(
            self.category?,
            self.supplier?,
            self.annual_cost?,
            self.reduction?,
            self.extra,
        ))
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn finish_rows(rows: Vec<RowBuilder>, source: &Path) -> Dataset {
    let total = rows.len();
    let records: Vec<Record> = rows.into_iter().filter_map(RowBuilder::finish).collect();
    let dropped = total - records.len();
    if dropped > 0 {
        log::debug!(
            "{}: dropped {dropped} of {total} rows with incomplete required fields",
            source.display()
        );
    }
    Dataset::from_records(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least the four required columns.
/// Every other column (except the derived-ratio name) is carried as a
/// passthrough cell.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col_idx = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let cat_idx = col_idx(COL_CATEGORY)?;
    let sup_idx = col_idx(COL_SUPPLIER)?;
    let cost_idx = col_idx(COL_COST)?;
    let red_idx = col_idx(COL_REDUCTION)?;
    let core = [cat_idx, sup_idx, cost_idx, red_idx];

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = RowBuilder::new();
        row.category = record.get(cat_idx).and_then(non_empty);
        row.supplier = record.get(sup_idx).and_then(non_empty);
        row.annual_cost = record.get(cost_idx).and_then(parse_number);
        row.reduction = record.get(red_idx).and_then(parse_number);

        for (idx, value) in record.iter().enumerate() {
            if core.contains(&idx) || headers[idx] == COL_RATIO {
                continue;
            }
            row.extra.insert(headers[idx].clone(), CellValue::guess(value));
        }

        rows.push(row);
    }

    Ok(finish_rows(rows, path))
}

/// A numeric cell that is present but unparseable counts as missing.
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Categoria": "TI",
///     "Fornecedor": "Alfa Ltda",
///     "Custo Anual": 120000.0,
///     "Redução": 8400.0,
///     "Contrato": "2024-011"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    // The header check works off the union of keys: a column that appears in
    // no record at all is structurally absent, not a per-row gap.
    for col in [COL_CATEGORY, COL_SUPPLIER, COL_COST, COL_REDUCTION] {
        if !records
            .iter()
            .filter_map(|r| r.as_object())
            .any(|obj| obj.contains_key(col))
        {
            return Err(LoadError::MissingColumn(col).into());
        }
    }

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = RowBuilder::new();
        row.category = obj
            .get(COL_CATEGORY)
            .and_then(|v| v.as_str())
            .and_then(non_empty);
        row.supplier = obj
            .get(COL_SUPPLIER)
            .and_then(|v| v.as_str())
            .and_then(non_empty);
        row.annual_cost = obj.get(COL_COST).and_then(|v| v.as_f64());
        row.reduction = obj.get(COL_REDUCTION).and_then(|v| v.as_f64());

        for (key, val) in obj {
            if key == COL_CATEGORY
                || key == COL_SUPPLIER
                || key == COL_COST
                || key == COL_REDUCTION
                || key == COL_RATIO
            {
                continue;
            }
            row.extra.insert(key.clone(), json_to_cell(val));
        }

        rows.push(row);
    }

    Ok(finish_rows(rows, path))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet cost table.
///
/// Expected schema: one scalar column per input column, with the four
/// required names present. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let col_idx = |name: &'static str| -> Result<usize, LoadError> {
            schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))
        };
        let cat_idx = col_idx(COL_CATEGORY)?;
        let sup_idx = col_idx(COL_SUPPLIER)?;
        let cost_idx = col_idx(COL_COST)?;
        let red_idx = col_idx(COL_REDUCTION)?;
        let core = [cat_idx, sup_idx, cost_idx, red_idx];

        let extra_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, f)| !core.contains(i) && f.name() != COL_RATIO)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for r in 0..batch.num_rows() {
            let mut row = RowBuilder::new();
            row.category = string_cell(batch.column(cat_idx), r).and_then(|s| non_empty(&s));
            row.supplier = string_cell(batch.column(sup_idx), r).and_then(|s| non_empty(&s));
            row.annual_cost = numeric_cell(batch.column(cost_idx), r);
            row.reduction = numeric_cell(batch.column(red_idx), r);

            for (idx, name) in &extra_cols {
                row.extra
                    .insert(name.clone(), extract_cell(batch.column(*idx), r));
            }

            rows.push(row);
        }
    }

    Ok(finish_rows(rows, path))
}

// -- Parquet / Arrow helpers --

/// Read a string cell from a Utf8 or LargeUtf8 column; `None` on null or on
/// a non-string column.
fn string_cell(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|arr| arr.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Read a numeric cell, widening any of the common numeric dtypes to `f64`;
/// `None` on null or on a non-numeric column.
fn numeric_cell(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|arr| arr.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|arr| arr.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|arr| arr.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| arr.value(row) as f64),
        _ => None,
    }
}

/// Extract a passthrough cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => match string_cell(col, row) {
            Some(s) => CellValue::String(s),
            None => CellValue::Null,
        },
        DataType::Int32 | DataType::Int64 => {
            let arr = if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
                arr.value(row)
            } else {
                col.as_any().downcast_ref::<Int32Array>().unwrap().value(row) as i64
            };
            CellValue::Integer(arr)
        }
        DataType::Float32 | DataType::Float64 => match numeric_cell(col, row) {
            Some(f) => CellValue::Float(f),
            None => CellValue::Null,
        },
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_cleans_rows_and_derives_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "custos.csv",
            "Categoria,Fornecedor,Custo Anual,Redução,Contrato\n\
             TI,Alfa,100,10,C-1\n\
             TI,Beta,200,,C-2\n\
             RH,Gama,abc,5,C-3\n\
             RH,Delta,50,5,C-4\n",
        );

        let ds = load_file(&path).unwrap();
        // Rows 2 (empty Redução) and 3 (non-numeric Custo Anual) are dropped.
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].category, "TI");
        assert_eq!(ds.records[0].reduction_ratio, 0.1);
        assert_eq!(ds.records[1].supplier, "Delta");
        assert_eq!(
            ds.records[0].extra.get("Contrato"),
            Some(&CellValue::String("C-1".to_string()))
        );
        assert_eq!(ds.categories, vec!["TI", "RH"]);
    }

    #[test]
    fn csv_missing_required_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "custos.csv",
            "Categoria,Custo Anual,Redução\nTI,100,10\n",
        );

        let err = load_file(&path).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::MissingColumn(col)) => assert_eq!(*col, COL_SUPPLIER),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_ignores_exported_ratio_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "custos.csv",
            "Categoria,Fornecedor,Custo Anual,Redução,% Redução\n\
             TI,Alfa,100,25,0.9\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        // The stale exported value is discarded and the ratio recomputed.
        assert_eq!(ds.records[0].reduction_ratio, 0.25);
        assert!(ds.extra_columns.is_empty());
    }

    #[test]
    fn json_drops_null_and_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "custos.json",
            r#"[
                {"Categoria": "TI", "Fornecedor": "Alfa", "Custo Anual": 100.0, "Redução": 10.0},
                {"Categoria": "TI", "Fornecedor": null, "Custo Anual": 200.0, "Redução": 20.0},
                {"Categoria": "RH", "Fornecedor": "Beta", "Custo Anual": 50.0}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].supplier, "Alfa");
    }

    #[test]
    fn json_missing_column_everywhere_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "custos.json",
            r#"[{"Categoria": "TI", "Fornecedor": "Alfa", "Custo Anual": 100.0}]"#,
        );

        let err = load_file(&path).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::MissingColumn(col)) => assert_eq!(*col, COL_REDUCTION),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_reads_scalar_columns_and_drops_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custos.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_CATEGORY, DataType::Utf8, false),
            Field::new(COL_SUPPLIER, DataType::Utf8, false),
            Field::new(COL_COST, DataType::Float64, true),
            Field::new(COL_REDUCTION, DataType::Float64, true),
            Field::new("Contrato", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["TI", "RH"])),
                Arc::new(StringArray::from(vec!["Alfa", "Beta"])),
                Arc::new(Float64Array::from(vec![Some(100.0), Some(50.0)])),
                Arc::new(Float64Array::from(vec![Some(10.0), None])),
                Arc::new(Int64Array::from(vec![Some(7), Some(8)])),
            ],
        )
        .unwrap();

        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].category, "TI");
        assert_eq!(
            ds.records[0].extra.get("Contrato"),
            Some(&CellValue::Integer(7))
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "custos.xls", "");
        assert!(load_file(&path).is_err());
    }
}
