use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use depthfold::data::model::{CellValue, Dataset};
use depthfold::data::writer;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Reflectance spectrum whose absorption features deepen with REE content.
fn generate_spectrum(
    wavelengths: &[f64],
    ree: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    let features = [(580.0, 15.0, 0.002), (740.0, 20.0, 0.0015), (800.0, 12.0, 0.003)];
    wavelengths
        .iter()
        .map(|&wl| {
            let absorption: f64 = features
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp * ree))
                .sum();
            0.6 - absorption + rng.gauss(0.0, noise_level)
        })
        .collect()
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

struct Samples {
    sample_id: Vec<i64>,
    depth: Vec<f64>,
    total_ree: Vec<f64>,
    spectra: Vec<Vec<f64>>,
}

fn generate(rng: &mut SimpleRng, wavelengths: &[f64]) -> Samples {
    let mut samples = Samples {
        sample_id: Vec::new(),
        depth: Vec::new(),
        total_ree: Vec::new(),
        spectra: Vec::new(),
    };

    // Core from 6 m to 95 m, one sample every 0.1–0.5 m.
    let mut depth: f64 = 6.0;
    let mut id = 0;
    while depth <= 95.0 {
        // REE content varies slowly with depth, plus sample noise.
        let ree = 150.0 + 80.0 * (depth / 9.0).sin() + rng.gauss(0.0, 12.0);
        let ree = ree.max(0.0);

        samples.spectra.push(generate_spectrum(wavelengths, ree, 0.004, rng));
        samples.sample_id.push(id);
        samples.depth.push((depth * 1000.0).round() / 1000.0);
        samples.total_ree.push((ree * 100.0).round() / 100.0);

        id += 1;
        depth += 0.1 + 0.4 * rng.next_f64();
    }
    samples
}

fn write_parquet(samples: &Samples, wavelengths: &[f64], path: &Path) -> Result<()> {
    let mut fields = vec![
        Field::new("sample_id", DataType::Int64, false),
        Field::new("Depth", DataType::Float64, false),
        Field::new("totalREE", DataType::Float64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(samples.sample_id.clone())),
        Arc::new(Float64Array::from(samples.depth.clone())),
        Arc::new(Float64Array::from(samples.total_ree.clone())),
    ];
    for (band, wl) in wavelengths.iter().enumerate() {
        fields.push(Field::new(wl.to_string(), DataType::Float64, false));
        let values: Vec<f64> = samples.spectra.iter().map(|sp| sp[band]).collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("creating RecordBatch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn to_dataset(samples: &Samples, wavelengths: &[f64]) -> Dataset {
    let mut column_names = vec![
        "sample_id".to_string(),
        "Depth".to_string(),
        "totalREE".to_string(),
    ];
    column_names.extend(wavelengths.iter().map(|wl| wl.to_string()));

    let rows = (0..samples.depth.len())
        .map(|i| {
            let mut row = vec![
                CellValue::Integer(samples.sample_id[i]),
                CellValue::Float(samples.depth[i]),
                CellValue::Float(samples.total_ree[i]),
            ];
            row.extend(samples.spectra[i].iter().map(|&v| CellValue::Float(v)));
            row
        })
        .collect();
    Dataset::new(column_names, rows)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Wavelengths: 400 → 1000 nm, step 10
    let wavelengths: Vec<f64> = (0..61).map(|i| 400.0 + i as f64 * 10.0).collect();
    let samples = generate(&mut rng, &wavelengths);

    let parquet_path = Path::new("sample_cores.parquet");
    write_parquet(&samples, &wavelengths, parquet_path)?;

    let csv_path = Path::new("sample_cores.csv");
    writer::write_csv(&to_dataset(&samples, &wavelengths), csv_path)?;

    println!(
        "Wrote {} samples ({} bands each) to {} and {}",
        samples.depth.len(),
        wavelengths.len(),
        parquet_path.display(),
        csv_path.display()
    );
    Ok(())
}
