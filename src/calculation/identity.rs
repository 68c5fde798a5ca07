//! Locating records in a collection.
//!
//! Records are addressed by id. The seven-field composite identity is kept
//! as a fallback for callers that only hold a snapshot of the field values;
//! it refuses to guess when duplicates make the match ambiguous.

use uuid::Uuid;

use crate::models::{RecordIdentity, ShiftRecord};

/// Outcome of a composite identity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMatch {
    /// Exactly one record matched, at this position.
    Unique(usize),
    /// No record matched.
    NotFound,
    /// Several records matched; none was chosen.
    Ambiguous(usize),
}

impl IdentityMatch {
    /// Returns the position for a unique match.
    pub fn position(self) -> Option<usize> {
        match self {
            IdentityMatch::Unique(index) => Some(index),
            IdentityMatch::NotFound | IdentityMatch::Ambiguous(_) => None,
        }
    }
}

/// Finds the record whose composite identity equals `candidate`.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::{resolve_identity, IdentityMatch};
/// use shift_ledger::models::{ShiftKind, ShiftRecord};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let records = vec![
///     ShiftRecord::new(date, ShiftKind::Morning, "A"),
///     ShiftRecord::new(date, ShiftKind::Morning, "A"),
/// ];
///
/// // Identical values in every field: the lookup refuses to pick one.
/// assert_eq!(resolve_identity(&records[0].identity(), &records), IdentityMatch::Ambiguous(2));
/// ```
pub fn resolve_identity(candidate: &RecordIdentity, collection: &[ShiftRecord]) -> IdentityMatch {
    let mut matches = collection
        .iter()
        .enumerate()
        .filter(|(_, record)| &record.identity() == candidate)
        .map(|(index, _)| index);

    match (matches.next(), matches.count()) {
        (None, _) => IdentityMatch::NotFound,
        (Some(index), 0) => IdentityMatch::Unique(index),
        (Some(_), rest) => IdentityMatch::Ambiguous(rest + 1),
    }
}

/// Finds the position of the record with the given id.
pub fn resolve_id(id: Uuid, collection: &[ShiftRecord]) -> Option<usize> {
    collection.iter().position(|record| record.id == id)
}
