//! Stock chart collaborator. The ledger only hands over a label→count
//! mapping; how it gets drawn is this module's business.

use std::io::{self, Write};

use anyhow::Result;
use indexmap::IndexMap;

use crate::domain::models::BloodGroup;

/// Renders the per-group stock counts produced by the stock report.
pub trait ChartRenderer {
    fn render(&self, counts: &IndexMap<BloodGroup, usize>) -> Result<()>;
}

/// Horizontal text bar chart written to stdout, one row per group in stock.
#[derive(Debug, Default)]
pub struct TextBarChart;

impl TextBarChart {
    pub fn render_to<W: Write>(&self, mut out: W, counts: &IndexMap<BloodGroup, usize>) -> Result<()> {
        for (group, count) in counts {
            writeln!(out, "{:>4} | {} {}", group.as_str(), "#".repeat(*count), count)?;
        }
        Ok(())
    }
}

impl ChartRenderer for TextBarChart {
    fn render(&self, counts: &IndexMap<BloodGroup, usize>) -> Result<()> {
        self.render_to(io::stdout().lock(), counts)
    }
}
