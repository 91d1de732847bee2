//! Donor and stock ledger for the LifeServe Blood Institute, a small blood
//! donation centre. Two flat-file tables (donors and collected bags) are
//! loaded into in-memory ordered maps, four operations are exposed through
//! an interactive menu, and every successful mutation is flushed back to
//! disk before the menu returns.

pub mod chart;
pub mod cli;
pub mod demand;
pub mod domain;
pub mod storage;
