use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    categoria: String,
    fornecedor: String,
    custo: f64,
    reducao: f64,
    contrato: String,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (category, typical annual cost) pairs; each category buys from a
    // subset of the supplier pool.
    let categories: [(&str, f64); 5] = [
        ("TI", 180_000.0),
        ("Logística", 320_000.0),
        ("Facilities", 90_000.0),
        ("Marketing", 140_000.0),
        ("RH", 60_000.0),
    ];
    let suppliers = [
        "Alfa Ltda",
        "Beta S.A.",
        "Gama Tech",
        "Delta Log",
        "Épsilon Serviços",
    ];

    let mut rows: Vec<Row> = Vec::new();
    let mut contract_no = 100;

    for (cat_idx, &(categoria, typical_cost)) in categories.iter().enumerate() {
        for (sup_idx, fornecedor) in suppliers.iter().enumerate() {
            // Skip some pairs so the filters have visibly different shapes.
            if (cat_idx + sup_idx) % 4 == 3 {
                continue;
            }
            let n_contracts = 1 + (rng.next_u64() % 3) as usize;
            for _ in 0..n_contracts {
                let custo = rng.gauss(typical_cost, typical_cost * 0.25).max(5_000.0);
                let ratio = rng.gauss(0.06, 0.03).clamp(0.0, 0.25);
                rows.push(Row {
                    categoria: categoria.to_string(),
                    fornecedor: fornecedor.to_string(),
                    custo: (custo / 100.0).round() * 100.0,
                    reducao: (custo * ratio / 100.0).round() * 100.0,
                    contrato: format!("C-2024-{contract_no}"),
                });
                contract_no += 1;
            }
        }
    }

    write_csv(&rows);
    write_json(&rows);
    write_parquet(&rows);

    println!(
        "Wrote {} complete rows (plus a few incomplete ones) to sample_data.{{csv,json,parquet}}",
        rows.len()
    );
}

/// CSV copy, with two incomplete rows the cleaner should drop.
fn write_csv(rows: &[Row]) {
    let mut w = csv::Writer::from_path("sample_data.csv").expect("Failed to create CSV file");
    w.write_record(["Categoria", "Fornecedor", "Custo Anual", "Redução", "Contrato"])
        .expect("Failed to write CSV header");

    for row in rows {
        let custo = row.custo.to_string();
        let reducao = row.reducao.to_string();
        w.write_record([
            row.categoria.as_str(),
            row.fornecedor.as_str(),
            custo.as_str(),
            reducao.as_str(),
            row.contrato.as_str(),
        ])
        .expect("Failed to write CSV row");
    }

    // Incomplete rows: missing reduction, missing supplier.
    w.write_record(["TI", "Alfa Ltda", "50000", "", "C-2024-900"])
        .expect("Failed to write CSV row");
    w.write_record(["RH", "", "20000", "1000", "C-2024-901"])
        .expect("Failed to write CSV row");

    w.flush().expect("Failed to flush CSV");
}

/// JSON copy (records orientation), with one null cost.
fn write_json(rows: &[Row]) {
    let mut records: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            json!({
                "Categoria": row.categoria,
                "Fornecedor": row.fornecedor,
                "Custo Anual": row.custo,
                "Redução": row.reducao,
                "Contrato": row.contrato,
            })
        })
        .collect();

    records.push(json!({
        "Categoria": "Marketing",
        "Fornecedor": "Beta S.A.",
        "Custo Anual": null,
        "Redução": 2000.0,
        "Contrato": "C-2024-902",
    }));

    let text = serde_json::to_string_pretty(&records).expect("Failed to serialise JSON");
    std::fs::write("sample_data.json", text).expect("Failed to write JSON file");
}

/// Parquet copy (flat scalar columns), with one null reduction.
fn write_parquet(rows: &[Row]) {
    let categoria: StringArray = rows
        .iter()
        .map(|r| r.categoria.as_str())
        .chain(std::iter::once("Facilities"))
        .collect::<Vec<_>>()
        .into();
    let fornecedor: StringArray = rows
        .iter()
        .map(|r| r.fornecedor.as_str())
        .chain(std::iter::once("Gama Tech"))
        .collect::<Vec<_>>()
        .into();
    let custo = Float64Array::from(
        rows.iter()
            .map(|r| Some(r.custo))
            .chain(std::iter::once(Some(30_000.0)))
            .collect::<Vec<_>>(),
    );
    let reducao = Float64Array::from(
        rows.iter()
            .map(|r| Some(r.reducao))
            .chain(std::iter::once(None))
            .collect::<Vec<_>>(),
    );
    let contrato = Int64Array::from(
        (0..rows.len() as i64 + 1)
            .map(|i| 100 + i)
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("Categoria", DataType::Utf8, false),
        Field::new("Fornecedor", DataType::Utf8, false),
        Field::new("Custo Anual", DataType::Float64, true),
        Field::new("Redução", DataType::Float64, true),
        Field::new("Contrato", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(categoria),
            Arc::new(fornecedor),
            Arc::new(custo),
            Arc::new(reducao),
            Arc::new(contrato),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create("sample_data.parquet").expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
