//! Ledger services.
//!
//! [`ShiftLedger`] and [`ExpenseLedger`] own a collection in a key-value
//! store and expose the mutating operations on it. Every mutation is a
//! read-modify-write of the whole stored collection; derived views come
//! from the stateless functions in [`crate::calculation`].

mod expenses;
mod shifts;

pub use expenses::ExpenseLedger;
pub use shifts::{LedgerView, ShiftLedger};
