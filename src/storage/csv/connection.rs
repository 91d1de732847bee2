use std::path::{Path, PathBuf};

/// Default basename of the donor table.
pub const DEFAULT_DONORS_TABLE: &str = "donors";
/// Default basename of the stock table.
pub const DEFAULT_BAGS_TABLE: &str = "bags";

/// CsvConnection resolves and holds the paths of the two table files.
#[derive(Debug, Clone)]
pub struct CsvConnection {
    donors_path: PathBuf,
    bags_path: PathBuf,
}

impl CsvConnection {
    /// Create a connection from user-supplied table names. Bare names
    /// (no extension) get `.txt` appended.
    pub fn new(donors: &str, bags: &str) -> Self {
        Self {
            donors_path: Self::resolve_table_path(donors),
            bags_path: Self::resolve_table_path(bags),
        }
    }

    /// Create a connection with the default table names, relative to `dir`.
    pub fn new_default_in(dir: &Path) -> Self {
        Self {
            donors_path: dir.join(format!("{DEFAULT_DONORS_TABLE}.txt")),
            bags_path: dir.join(format!("{DEFAULT_BAGS_TABLE}.txt")),
        }
    }

    /// Append `.txt` when the user supplies a bare name without extension.
    pub fn resolve_table_path(name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        if path.extension().is_none() {
            path.with_extension("txt")
        } else {
            path
        }
    }

    pub fn donors_path(&self) -> &Path {
        &self.donors_path
    }

    pub fn bags_path(&self) -> &Path {
        &self.bags_path
    }
}
