use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::loader::{COL_CATEGORY, COL_COST, COL_RATIO, COL_REDUCTION, COL_SUPPLIER};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// CSV export of the (filtered) dataset
// ---------------------------------------------------------------------------

/// Render the dataset as UTF-8 CSV: header row, then one row per record in
/// dataset order. The derived ratio is written under its own column; floats
/// use the shortest round-trip form, so re-loading an export reproduces the
/// dataset.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = vec![
        COL_CATEGORY,
        COL_SUPPLIER,
        COL_COST,
        COL_REDUCTION,
        COL_RATIO,
    ];
    header.extend(dataset.extra_columns.iter().map(|s| s.as_str()));
    w.write_record(&header).context("writing CSV header")?;

    for rec in &dataset.records {
        let mut row: Vec<String> = vec![
            rec.category.clone(),
            rec.supplier.clone(),
            rec.annual_cost.to_string(),
            rec.reduction.to_string(),
            rec.reduction_ratio.to_string(),
        ];
        for col in &dataset.extra_columns {
            row.push(
                rec.extra
                    .get(col)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        w.write_record(&row).context("writing CSV row")?;
    }

    w.flush().context("flushing CSV")?;
    Ok(())
}

/// Write the dataset to a CSV file at `path`.
pub fn export_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::data::loader::load_file;
    use crate::data::model::{CellValue, Record};

    fn sample() -> Dataset {
        let mut extra = BTreeMap::new();
        extra.insert("Contrato".to_string(), CellValue::String("C-9".into()));
        Dataset::from_records(vec![
            Record::new("TI".into(), "Alfa".into(), 100.0, 10.0, extra.clone()),
            Record::new("RH".into(), "Beta".into(), 50.0, 5.0, extra),
        ])
    }

    #[test]
    fn header_and_row_order() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Categoria,Fornecedor,Custo Anual,Redução,% Redução,Contrato"
        );
        assert_eq!(lines.next().unwrap(), "TI,Alfa,100,10,0.1,C-9");
        assert_eq!(lines.next().unwrap(), "RH,Beta,50,5,0.1,C-9");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_then_load_round_trips() {
        let ds = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtrado.csv");

        export_csv(&ds, &path).unwrap();
        let reloaded = load_file(&path).unwrap();
        assert_eq!(reloaded, ds);
    }

    #[test]
    fn empty_dataset_exports_header_only() {
        let mut buf = Vec::new();
        write_csv(&Dataset::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
