use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use indexmap::IndexMap;
use log::debug;

use super::connection::CsvConnection;
use crate::domain::models::BloodBag;

/// CSV-backed stock repository. Records are headerless lines of the form
/// `id,bloodGroup,collectionDate`.
#[derive(Debug, Clone)]
pub struct BagRepository {
    connection: CsvConnection,
}

impl BagRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read the whole stock table, preserving file order.
    pub fn read_all(&self) -> Result<IndexMap<u32, BloodBag>> {
        let path = self.connection.bags_path();
        let file = File::open(path)
            .with_context(|| format!("cannot open stock table {}", path.display()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(BufReader::new(file));

        let mut bags = IndexMap::new();
        for (index, record) in reader.deserialize::<BloodBag>().enumerate() {
            let bag = record.with_context(|| {
                format!("malformed stock record at {}:{}", path.display(), index + 1)
            })?;
            let id = bag.id;
            if bags.insert(id, bag).is_some() {
                bail!("duplicate bag id {} in {}", id, path.display());
            }
        }

        debug!("read {} bags from {}", bags.len(), path.display());
        Ok(bags)
    }

    /// Write the whole stock table to `path` in map order.
    pub fn write_to(&self, path: &Path, bags: &IndexMap<u32, BloodBag>) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("cannot create stock table {}", path.display()))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        for bag in bags.values() {
            writer.serialize(bag)?;
        }
        writer.flush()?;

        debug!("wrote {} bags to {}", bags.len(), path.display());
        Ok(())
    }
}
