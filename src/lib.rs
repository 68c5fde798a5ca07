//! Shift Ledger
//!
//! This crate records worked shifts and computes their pay with a tiered
//! daily salary rule, splits records into past and upcoming work, and moves
//! monthly sheets in and out as CSV and XLSX. A companion expense tracker
//! keeps dated income and expenses with daily totals, JSON backups and
//! optional best-effort replication to a remote store.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod interchange;
pub mod ledger;
pub mod models;
pub mod storage;
pub mod sync;
