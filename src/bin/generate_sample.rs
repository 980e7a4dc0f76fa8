use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use parquet::arrow::ArrowWriter;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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

/// Write a synthetic Madrigal-style export: 24 quarter-hour records of a
/// vertical ion drift profile over 40 altitude bins.
fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    // Altitude grid: 100 → 490 km, step 10 — identical for every record.
    let altitudes: Vec<f64> = (0..40).map(|b| 100.0 + b as f64 * 10.0).collect();

    let first_scan: DateTime<Utc> = Utc
        .with_ymd_and_hms(2016, 1, 2, 14, 0, 0)
        .single()
        .context("start instant out of range")?;

    let n_records = 24;
    let mut columns: Vec<(&str, Vec<f64>)> = [
        "YEAR", "MONTH", "DAY", "HOUR", "MIN", "SEC", "RECNO", "GDALT", "VIPN2", "DVIPN2",
    ]
    .iter()
    .map(|&name| (name, Vec::with_capacity(n_records * altitudes.len())))
    .collect();

    for recno in 0..n_records {
        let scan = first_scan + Duration::minutes(15 * recno as i64);
        // Drift layer wanders upward over the day and slowly weakens.
        let layer_peak = 250.0 + 3.0 * recno as f64;
        let amplitude = 40.0 * (1.0 - recno as f64 / (2.0 * n_records as f64));

        for &alt in &altitudes {
            let drift = gaussian(alt, layer_peak, 60.0, amplitude) + rng.gauss(0.0, 1.5);
            let uncertainty = 1.5 + rng.next_f64();

            let row = [
                scan.year() as f64,
                scan.month() as f64,
                scan.day() as f64,
                scan.hour() as f64,
                scan.minute() as f64,
                scan.second() as f64,
                recno as f64,
                alt,
                drift,
                uncertainty,
            ];
            for (column, value) in columns.iter_mut().zip(row) {
                column.1.push(value);
            }
        }
    }

    // Build Arrow arrays in catalog order
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, values)| Arc::new(Float64Array::from(values.clone())) as ArrayRef)
        .collect();

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("failed to create RecordBatch")?;

    // Write Parquet
    let output_path = "sample_madrigal.parquet";
    let file = std::fs::File::create(output_path).context("failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("failed to create writer")?;
    writer.write(&batch).context("failed to write batch")?;
    writer.close().context("failed to close writer")?;

    println!(
        "Wrote {n_records} records ({} altitude bins each) to {output_path}",
        altitudes.len()
    );
    Ok(())
}
