//! CSV catalog reading and writing.
//!
//! The file has a header row followed by four positional columns:
//! `package_id, weight, profit, deadline_offset`. Header names are not
//! checked, so localized exports load as long as the column order holds.

use crate::error::{FleetpackError, Result};
use crate::model::{Catalog, Item};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Header written by [`write_catalog`].
pub const HEADER: [&str; 4] = ["package_id", "weight", "profit", "deadline_offset"];

/// Reads a catalog from any CSV source.
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut items = Vec::new();
    for record in csv.records() {
        items.push(parse_item(&record?)?);
    }
    Catalog::new(items)
}

/// Reads a catalog from a file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let catalog = read_catalog(File::open(path)?)?;
    debug!(path = %path.display(), items = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Writes a catalog as CSV with the standard header.
pub fn write_catalog<W: Write>(writer: W, catalog: &Catalog) -> Result<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(HEADER)?;
    for item in catalog {
        csv.write_record(&[
            item.id.to_string(),
            item.weight.to_string(),
            item.profit.to_string(),
            item.deadline_offset.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes a catalog to a file, replacing any existing one.
pub fn save_catalog<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<()> {
    write_catalog(File::create(path)?, catalog)
}

fn parse_item(record: &StringRecord) -> Result<Item> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() < HEADER.len() {
        return Err(FleetpackError::InvalidRecord {
            line,
            reason: format!("expected {} columns, found {}", HEADER.len(), record.len()),
        });
    }

    let field = |index: usize| record.get(index).unwrap_or_default();
    let invalid = |index: usize| FleetpackError::InvalidRecord {
        line,
        reason: format!("cannot parse {} from {:?}", HEADER[index], field(index)),
    };

    let id = field(0).parse::<u64>().map_err(|_| invalid(0))?;
    let weight = field(1).parse::<f64>().map_err(|_| invalid(1))?;
    let profit = field(2).parse::<f64>().map_err(|_| invalid(2))?;
    let deadline_offset = field(3).parse::<i64>().map_err(|_| invalid(3))?;

    Ok(Item::new(id, weight, profit, deadline_offset))
}
