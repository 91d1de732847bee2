use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use indexmap::IndexMap;
use log::debug;

use super::connection::CsvConnection;
use crate::domain::models::Donor;

/// CSV-backed donor repository. Records are headerless lines of the form
/// `id,name,phone,email,bloodGroup,lastDonationDate`.
#[derive(Debug, Clone)]
pub struct DonorRepository {
    connection: CsvConnection,
}

impl DonorRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read the whole donor table, preserving file order.
    pub fn read_all(&self) -> Result<IndexMap<u32, Donor>> {
        let path = self.connection.donors_path();
        let file = File::open(path)
            .with_context(|| format!("cannot open donor table {}", path.display()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(BufReader::new(file));

        let mut donors = IndexMap::new();
        for (index, record) in reader.deserialize::<Donor>().enumerate() {
            let donor = record.with_context(|| {
                format!("malformed donor record at {}:{}", path.display(), index + 1)
            })?;
            let id = donor.id;
            if donors.insert(id, donor).is_some() {
                bail!("duplicate donor id {} in {}", id, path.display());
            }
        }

        debug!("read {} donors from {}", donors.len(), path.display());
        Ok(donors)
    }

    /// Write the whole donor table to `path` in map order.
    pub fn write_to(&self, path: &Path, donors: &IndexMap<u32, Donor>) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("cannot create donor table {}", path.display()))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        for donor in donors.values() {
            writer.serialize(donor)?;
        }
        writer.flush()?;

        debug!("wrote {} donors to {}", donors.len(), path.display());
        Ok(())
    }
}
