use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::Dataset;

/// Write the table as CSV with a header row.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv_to(dataset, file).with_context(|| format!("writing CSV {}", path.display()))
}

/// Write the table as CSV into any writer.
pub fn write_csv_to<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&dataset.column_names)?;
    for row in &dataset.rows {
        writer.write_record(row.iter().map(|cell| cell.to_field()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize `value` as compact JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, value).context("serializing JSON")?;
    out.flush().context("flushing JSON output")?;
    Ok(())
}
