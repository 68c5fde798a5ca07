//! The shift recorder service.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{
    IdentityMatch, MonthlyStats, Period, ShiftRow, ShiftSheet, aggregate_by_month,
    available_periods, export_rows, import_rows, partition, resolve_id, resolve_identity,
    select_period,
};
use crate::config::{LedgerConfig, PayRules};
use crate::error::{LedgerError, LedgerResult};
use crate::interchange::{read_sheet_csv, read_sheet_xlsx, write_sheet_csv, write_sheet_xlsx};
use crate::models::{RecordIdentity, ShiftEntry, ShiftRecord};
use crate::storage::{KeyValueStore, Repository};

/// Everything needed to show the shift recorder for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    /// Selected month, `None` when there are no records at all.
    pub period: Option<Period>,
    /// Years with records, each with its months.
    pub periods: BTreeMap<i32, Vec<u32>>,
    /// Records dated today or earlier in the selected month, newest first.
    pub past: Vec<ShiftRecord>,
    /// Every record dated after today, soonest first.
    pub future: Vec<ShiftRecord>,
    /// Statistics over `past`.
    pub stats: Option<MonthlyStats>,
}

/// Records worked shifts and computes their pay.
///
/// # Example
///
/// ```
/// use shift_ledger::config::LedgerConfig;
/// use shift_ledger::ledger::ShiftLedger;
/// use shift_ledger::models::ShiftEntry;
/// use shift_ledger::storage::MemoryStore;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let ledger = ShiftLedger::new(MemoryStore::new(), &LedgerConfig::default());
/// let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
///
/// ledger.add(ShiftEntry::new(day, "Morning", "A"))?;
/// ledger.add(ShiftEntry::new(day, "Evening", "A"))?;
///
/// let view = ledger.view(day, None);
/// assert_eq!(view.stats.unwrap().monthly_salary, Decimal::new(4100, 0));
/// # Ok::<(), shift_ledger::error::LedgerError>(())
/// ```
#[derive(Debug)]
pub struct ShiftLedger<S> {
    repo: Repository<ShiftRecord, S>,
    rules: PayRules,
}

impl<S: KeyValueStore> ShiftLedger<S> {
    /// Creates a ledger over `store` using the configured key and pay rules.
    pub fn new(store: S, config: &LedgerConfig) -> Self {
        Self {
            repo: Repository::new(store, config.storage().shift_history.clone()),
            rules: config.pay_rules().clone(),
        }
    }

    /// The pay rules in use.
    pub fn rules(&self) -> &PayRules {
        &self.rules
    }

    /// All stored records in stored order.
    pub fn records(&self) -> Vec<ShiftRecord> {
        self.repo.load()
    }

    /// Records a new shift at the front of the collection.
    ///
    /// Returns `Ok(None)` without writing when the date, shift or
    /// workstation is missing.
    pub fn add(&self, entry: ShiftEntry) -> LedgerResult<Option<ShiftRecord>> {
        let Some(record) = entry.into_record(Uuid::new_v4(), None) else {
            debug!("Ignoring incomplete shift entry");
            return Ok(None);
        };

        self.repo.mutate(|records| {
            records.insert(0, record.clone());
            Ok(())
        })?;
        info!(id = %record.id, date = %record.date, shift = %record.shift, "Shift recorded");
        Ok(Some(record))
    }

    /// Replaces the fields of the record `id`, keeping its id and salary.
    ///
    /// Returns `Ok(None)` without writing when the entry is incomplete.
    pub fn edit(&self, id: Uuid, entry: ShiftEntry) -> LedgerResult<Option<ShiftRecord>> {
        if !entry.is_complete() {
            debug!(id = %id, "Ignoring incomplete shift edit");
            return Ok(None);
        }

        let updated = self.repo.mutate(|records| {
            let index = find(records, id)?;
            let record = entry
                .into_record(id, records[index].salary)
                .ok_or_else(|| not_found(id))?;
            records[index] = record.clone();
            Ok(record)
        })?;
        info!(id = %id, date = %updated.date, "Shift updated");
        Ok(Some(updated))
    }

    /// Removes the record `id` and returns it.
    pub fn delete(&self, id: Uuid) -> LedgerResult<ShiftRecord> {
        let removed = self.repo.mutate(|records| {
            let index = find(records, id)?;
            Ok(records.remove(index))
        })?;
        info!(id = %id, date = %removed.date, "Shift deleted");
        Ok(removed)
    }

    /// Reschedules the record `id` to `new_date`, which must be after `today`.
    pub fn move_to_future(
        &self,
        id: Uuid,
        new_date: NaiveDate,
        today: NaiveDate,
    ) -> LedgerResult<ShiftRecord> {
        if new_date <= today {
            return Err(LedgerError::InvalidRecord {
                field: "date".to_string(),
                message: format!("{} is not after {}", new_date, today),
            });
        }
        let moved = self.set_date(id, new_date)?;
        info!(id = %id, date = %new_date, "Shift moved to future");
        Ok(moved)
    }

    /// Marks the record `id` as worked by dating it `today`.
    pub fn mark_done(&self, id: Uuid, today: NaiveDate) -> LedgerResult<ShiftRecord> {
        let done = self.set_date(id, today)?;
        info!(id = %id, date = %today, "Shift marked done");
        Ok(done)
    }

    /// Finds the single record matching a composite identity.
    pub fn locate(&self, identity: &RecordIdentity) -> LedgerResult<ShiftRecord> {
        let records = self.repo.try_load()?;
        match resolve_identity(identity, &records) {
            IdentityMatch::Unique(index) => Ok(records[index].clone()),
            IdentityMatch::NotFound => Err(LedgerError::RecordNotFound {
                reference: identity.to_string(),
            }),
            IdentityMatch::Ambiguous(matches) => Err(LedgerError::AmbiguousRecord {
                reference: identity.to_string(),
                matches,
            }),
        }
    }

    /// Builds the view for `today`.
    ///
    /// `selected` is the previously shown month; it is kept while it still
    /// has records.
    pub fn view(&self, today: NaiveDate, selected: Option<Period>) -> LedgerView {
        let records = self.repo.load();
        let period = select_period(&records, selected);
        let split = partition(&records, today);

        let past: Vec<ShiftRecord> = match period {
            Some(p) => split
                .past
                .into_iter()
                .filter(|record| record.is_in_month(p.month, p.year))
                .collect(),
            None => Vec::new(),
        };
        let stats = period.map(|p| aggregate_by_month(&past, p.month, p.year, &self.rules));

        LedgerView {
            period,
            periods: available_periods(&records),
            past,
            future: split.future,
            stats,
        }
    }

    /// Builds the export sheet of one month.
    pub fn export_sheet(&self, month: u32, year: i32) -> ShiftSheet {
        export_rows(&self.repo.load(), month, year, &self.rules)
    }

    /// Replaces the whole collection, returning how many records were stored.
    pub fn replace_all(&self, records: Vec<ShiftRecord>) -> LedgerResult<usize> {
        let count = records.len();
        self.repo.save(&records)?;
        info!(count, "Shift history replaced");
        Ok(count)
    }

    /// Writes the month as `<stem>.csv` into `dir` and returns the path.
    pub fn export_csv(&self, month: u32, year: i32, dir: &Path) -> LedgerResult<PathBuf> {
        let sheet = self.export_sheet(month, year);
        let path = dir.join(format!("{}.csv", sheet.file_stem()));
        write_sheet_csv(&sheet, &path)?;
        Ok(path)
    }

    /// Writes the month as `<stem>.xlsx` into `dir` and returns the path.
    pub fn export_xlsx(&self, month: u32, year: i32, dir: &Path) -> LedgerResult<PathBuf> {
        let sheet = self.export_sheet(month, year);
        let path = dir.join(format!("{}.xlsx", sheet.file_stem()));
        write_sheet_xlsx(&sheet, &self.rules.currency, &path)?;
        Ok(path)
    }

    /// Replaces the collection with the usable rows of a CSV sheet.
    ///
    /// A file that cannot be read as CSV leaves the stored records untouched.
    pub fn import_csv(&self, path: &Path) -> LedgerResult<usize> {
        let rows = read_sheet_csv(path)?;
        self.import_sheet_rows(path, &rows)
    }

    /// Replaces the collection with the usable rows of a workbook.
    ///
    /// Rows come from the `Shifts` worksheet written by
    /// [`ShiftLedger::export_xlsx`]. A file that is not a readable workbook
    /// leaves the stored records untouched.
    pub fn import_xlsx(&self, path: &Path) -> LedgerResult<usize> {
        let rows = read_sheet_xlsx(path)?;
        self.import_sheet_rows(path, &rows)
    }

    fn import_sheet_rows(&self, path: &Path, rows: &[ShiftRow]) -> LedgerResult<usize> {
        let records = import_rows(rows);
        info!(
            path = %path.display(),
            rows = rows.len(),
            kept = records.len(),
            "Importing shift sheet"
        );
        self.replace_all(records)
    }

    fn set_date(&self, id: Uuid, date: NaiveDate) -> LedgerResult<ShiftRecord> {
        self.repo.mutate(|records| {
            let index = find(records, id)?;
            records[index].date = date;
            Ok(records[index].clone())
        })
    }
}

fn find(records: &[ShiftRecord], id: Uuid) -> LedgerResult<usize> {
    resolve_id(id, records).ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> LedgerError {
    LedgerError::RecordNotFound {
        reference: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtraTime, ShiftKind};
    use crate::storage::MemoryStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> ShiftLedger<MemoryStore> {
        ShiftLedger::new(MemoryStore::new(), &LedgerConfig::default())
    }

    fn add(ledger: &ShiftLedger<MemoryStore>, entry: ShiftEntry) -> ShiftRecord {
        ledger.add(entry).unwrap().unwrap()
    }

    #[test]
    fn test_add_inserts_at_front() {
        let ledger = ledger();
        let first = add(&ledger, ShiftEntry::new(make_date(2024, 1, 1), "Morning", "A"));
        let second = add(&ledger, ShiftEntry::new(make_date(2024, 1, 2), "Night", "B"));

        let ids: Vec<Uuid> = ledger.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_incomplete_entry_is_ignored() {
        let ledger = ledger();
        let mut entry = ShiftEntry::new(make_date(2024, 1, 1), "Morning", "");
        assert_eq!(ledger.add(entry.clone()).unwrap(), None);

        entry.workstation = "A".to_string();
        entry.date = None;
        assert_eq!(ledger.add(entry).unwrap(), None);
        assert!(ledger.records().is_empty());
    }

    #[test]
    fn test_edit_keeps_id_and_salary() {
        let ledger = ledger();
        let record = add(&ledger, ShiftEntry::new(make_date(2024, 1, 1), "Morning", "A"));

        let mut stored = ledger.records();
        stored[0].salary = Some(dec("2300"));
        ledger.replace_all(stored).unwrap();

        let edited = ledger
            .edit(
                record.id,
                ShiftEntry::new(make_date(2024, 1, 3), "Evening", "C")
                    .with_extra(ExtraTime::Manual { hours: dec("2") }),
            )
            .unwrap()
            .unwrap();

        assert_eq!(edited.id, record.id);
        assert_eq!(edited.salary, Some(dec("2300")));
        assert_eq!(edited.shift, ShiftKind::Evening);
        assert_eq!(ledger.records(), vec![edited]);
    }

    #[test]
    fn test_edit_unknown_id_fails() {
        let ledger = ledger();
        let entry = ShiftEntry::new(make_date(2024, 1, 1), "Morning", "A");
        let result = ledger.edit(Uuid::new_v4(), entry);
        assert!(matches!(result, Err(LedgerError::RecordNotFound { .. })));
    }

    #[test]
    fn test_delete_addresses_one_of_identical_records() {
        let ledger = ledger();
        let entry = ShiftEntry::new(make_date(2024, 1, 5), "Morning", "A");
        let first = add(&ledger, entry.clone());
        let second = add(&ledger, entry);

        let removed = ledger.delete(first.id).unwrap();
        assert_eq!(removed.id, first.id);

        let remaining = ledger.records();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[test]
    fn test_move_to_future_requires_later_date() {
        let ledger = ledger();
        let today = make_date(2024, 1, 10);
        let record = add(&ledger, ShiftEntry::new(today, "Night", "A"));

        let result = ledger.move_to_future(record.id, today, today);
        assert!(matches!(result, Err(LedgerError::InvalidRecord { .. })));
        assert_eq!(ledger.records()[0].date, today);

        let moved = ledger
            .move_to_future(record.id, make_date(2024, 1, 12), today)
            .unwrap();
        assert_eq!(moved.date, make_date(2024, 1, 12));
    }

    #[test]
    fn test_mark_done_dates_record_today() {
        let ledger = ledger();
        let today = make_date(2024, 1, 10);
        let record = add(&ledger, ShiftEntry::new(make_date(2024, 2, 1), "Night", "A"));

        assert_eq!(ledger.view(today, None).future.len(), 1);
        ledger.mark_done(record.id, today).unwrap();

        let view = ledger.view(today, None);
        assert!(view.future.is_empty());
        assert_eq!(view.past.len(), 1);
        assert_eq!(view.past[0].date, today);
    }

    #[test]
    fn test_locate_refuses_ambiguous_identity() {
        let ledger = ledger();
        let entry = ShiftEntry::new(make_date(2024, 1, 5), "Morning", "A");
        let record = add(&ledger, entry.clone());

        assert_eq!(ledger.locate(&record.identity()).unwrap().id, record.id);

        add(&ledger, entry);
        let result = ledger.locate(&record.identity());
        assert!(matches!(
            result,
            Err(LedgerError::AmbiguousRecord { matches: 2, .. })
        ));
    }

    #[test]
    fn test_view_filters_past_to_selected_month() {
        let ledger = ledger();
        let today = make_date(2024, 2, 15);
        add(&ledger, ShiftEntry::new(make_date(2024, 1, 20), "Morning", "A"));
        add(&ledger, ShiftEntry::new(make_date(2024, 2, 1), "Morning", "A"));
        add(&ledger, ShiftEntry::new(make_date(2024, 2, 1), "Night", "A"));
        add(&ledger, ShiftEntry::new(make_date(2024, 2, 20), "Evening", "B"));

        let view = ledger.view(today, None);
        assert_eq!(view.period, Some(Period::new(2024, 2)));
        assert_eq!(view.past.len(), 2);
        assert_eq!(view.future.len(), 1);

        let stats = view.stats.unwrap();
        assert_eq!(stats.covered_shift_count, 2);
        assert_eq!(stats.monthly_salary, dec("4100"));

        let january = ledger.view(today, Some(Period::new(2024, 1)));
        assert_eq!(january.past.len(), 1);
        assert_eq!(january.stats.unwrap().monthly_salary, dec("2300"));
    }

    #[test]
    fn test_view_of_empty_ledger() {
        let view = ledger().view(make_date(2024, 1, 1), None);
        assert_eq!(view.period, None);
        assert!(view.stats.is_none());
        assert!(view.periods.is_empty());
    }

    #[test]
    fn test_csv_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let source = ledger();
        add(
            &source,
            ShiftEntry::new(make_date(2024, 1, 5), "Night", "A")
                .with_extra(ExtraTime::Manual { hours: dec("1.5") })
                .covering("Sam"),
        );
        add(&source, ShiftEntry::new(make_date(2024, 1, 5), "Morning", "A"));
        add(&source, ShiftEntry::new(make_date(2024, 2, 1), "Morning", "A"));

        let path = source.export_csv(1, 2024, dir.path()).unwrap();
        assert!(path.ends_with("shift_records_January_2024.csv"));

        let target = ledger();
        assert_eq!(target.import_csv(&path).unwrap(), 2);

        let imported = target.records();
        assert_eq!(imported[0].shift, ShiftKind::Morning);
        assert_eq!(imported[1].shift, ShiftKind::Night);
        assert_eq!(imported[1].extra_hours(), Some(dec("1.5")));
        assert_eq!(imported[1].covered_for.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_xlsx_export_names_file_by_month() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger();
        add(&ledger, ShiftEntry::new(make_date(2024, 3, 5), "Morning", "A"));

        let path = ledger.export_xlsx(3, 2024, dir.path()).unwrap();
        assert!(path.ends_with("shift_records_March_2024.xlsx"));
        assert!(path.exists());
    }

    #[test]
    fn test_xlsx_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let source = ledger();
        add(
            &source,
            ShiftEntry::new(make_date(2024, 3, 9), "Night", "C")
                .with_extra(ExtraTime::Manual { hours: dec("2.5") })
                .covering("Sam"),
        );
        add(&source, ShiftEntry::new(make_date(2024, 3, 5), "Evening", "A"));
        add(&source, ShiftEntry::new(make_date(2024, 4, 1), "Morning", "A"));

        let path = source.export_xlsx(3, 2024, dir.path()).unwrap();

        let target = ledger();
        add(&target, ShiftEntry::new(make_date(2023, 1, 1), "Morning", "Z"));
        assert_eq!(target.import_xlsx(&path).unwrap(), 2);

        let imported = target.records();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].date, make_date(2024, 3, 5));
        assert_eq!(imported[0].shift, ShiftKind::Evening);
        assert_eq!(imported[1].extra_hours(), Some(dec("2.5")));
        assert_eq!(imported[1].covered_for.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_xlsx_import_of_non_workbook_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_workbook.xlsx");
        std::fs::write(&path, "Date,Shift\n").unwrap();

        let ledger = ledger();
        add(&ledger, ShiftEntry::new(make_date(2024, 1, 1), "Morning", "A"));

        let result = ledger.import_xlsx(&path);
        assert!(matches!(result, Err(LedgerError::InvalidImport { .. })));
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn test_unreadable_storage_is_not_overwritten() {
        let store = MemoryStore::with_value("shiftHistory", "{broken");
        let ledger = ShiftLedger::new(store, &LedgerConfig::default());

        assert!(ledger.records().is_empty());
        let result = ledger.add(ShiftEntry::new(make_date(2024, 1, 1), "Morning", "A"));
        assert!(matches!(result, Err(LedgerError::Storage { .. })));
    }
}
