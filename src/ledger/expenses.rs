//! The expense tracker service.

use std::path::Path;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    DailyTotal, EntrySuggestions, ExpenseSummary, daily_totals, entry_suggestions, expense_summary,
};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::interchange::{read_expenses_json, write_expenses_json};
use crate::models::{ExpenseDraft, ExpenseEntry, ExpenseInput};
use crate::storage::{DraftSlot, KeyValueStore, Repository};
use crate::sync::{Replicator, SyncStatus};

/// Tracks dated income and expenses.
///
/// Changes are saved locally first. With a [`Replicator`] attached, each
/// saved collection is then pushed to the remote in the background; the
/// push outcome never changes the result of the local operation.
#[derive(Debug)]
pub struct ExpenseLedger<S> {
    repo: Repository<ExpenseEntry, S>,
    draft: DraftSlot<ExpenseDraft, S>,
    replicator: Option<Replicator<ExpenseEntry>>,
}

impl<S: KeyValueStore + Clone> ExpenseLedger<S> {
    /// Creates a ledger over `store` using the configured keys.
    pub fn new(store: S, config: &LedgerConfig) -> Self {
        let keys = config.storage();
        Self {
            repo: Repository::new(store.clone(), keys.expenses.clone()),
            draft: DraftSlot::new(store, keys.expense_draft.clone()),
            replicator: None,
        }
    }
}

impl<S: KeyValueStore> ExpenseLedger<S> {
    /// Pushes every future change through `replicator`.
    pub fn attach_replicator(&mut self, replicator: Replicator<ExpenseEntry>) {
        info!(identity = %replicator.identity(), "Remote replication attached");
        self.replicator = Some(replicator);
    }

    /// Stops replicating.
    pub fn detach_replicator(&mut self) -> Option<Replicator<ExpenseEntry>> {
        self.replicator.take()
    }

    /// All stored entries in stored order.
    pub fn entries(&self) -> Vec<ExpenseEntry> {
        self.repo.load()
    }

    /// Appends a new entry and clears the form draft.
    ///
    /// Returns `Ok(None)` without writing when the date, description or
    /// amount is missing.
    pub fn add(&self, input: ExpenseInput) -> LedgerResult<Option<ExpenseEntry>> {
        let Some(entry) = input.into_entry(Uuid::new_v4()) else {
            debug!("Ignoring incomplete expense entry");
            return Ok(None);
        };

        let snapshot = self.repo.mutate(|entries| {
            entries.push(entry.clone());
            Ok(entries.clone())
        })?;
        info!(id = %entry.id, date = %entry.date, amount = %entry.amount, "Expense recorded");

        self.forget_draft();
        self.replicate(snapshot);
        Ok(Some(entry))
    }

    /// Replaces the fields of the entry `id`, keeping its id.
    pub fn edit(&self, id: Uuid, input: ExpenseInput) -> LedgerResult<Option<ExpenseEntry>> {
        let Some(entry) = input.into_entry(id) else {
            debug!(id = %id, "Ignoring incomplete expense edit");
            return Ok(None);
        };

        let snapshot = self.repo.mutate(|entries| {
            let index = find(entries, id)?;
            entries[index] = entry.clone();
            Ok(entries.clone())
        })?;
        info!(id = %id, "Expense updated");

        self.forget_draft();
        self.replicate(snapshot);
        Ok(Some(entry))
    }

    /// Removes the entry `id` and returns it.
    pub fn delete(&self, id: Uuid) -> LedgerResult<ExpenseEntry> {
        let (removed, snapshot) = self.repo.mutate(|entries| {
            let index = find(entries, id)?;
            let removed = entries.remove(index);
            Ok((removed, entries.clone()))
        })?;
        info!(id = %id, "Expense deleted");

        self.replicate(snapshot);
        Ok(removed)
    }

    /// Total income, total expense and net balance.
    pub fn summary(&self) -> ExpenseSummary {
        expense_summary(&self.entries())
    }

    /// Income and expense per date, newest date first.
    pub fn daily_totals(&self) -> Vec<DailyTotal> {
        daily_totals(&self.entries())
    }

    /// Autocomplete values for the entry form.
    pub fn suggestions(&self) -> EntrySuggestions {
        entry_suggestions(&self.entries())
    }

    /// Saves the unsubmitted form fields.
    pub fn save_draft(&self, draft: &ExpenseDraft) -> LedgerResult<()> {
        self.draft.save(draft)
    }

    /// The saved form fields, if any.
    pub fn load_draft(&self) -> Option<ExpenseDraft> {
        self.draft.load()
    }

    /// Discards the saved form fields.
    pub fn clear_draft(&self) -> LedgerResult<()> {
        self.draft.clear()
    }

    /// Writes every entry as a JSON backup to `path`.
    pub fn export_json(&self, path: &Path) -> LedgerResult<()> {
        write_expenses_json(&self.entries(), path)
    }

    /// Replaces every entry with the contents of a JSON backup.
    ///
    /// The backup is rejected as a whole when any entry is incomplete;
    /// nothing is written in that case.
    pub fn import_json(&self, path: &Path) -> LedgerResult<usize> {
        let imported = read_expenses_json(path)?;
        let count = imported.len();
        self.repo.save(&imported)?;
        info!(path = %path.display(), count, "Expenses imported");

        self.replicate(imported);
        Ok(count)
    }

    /// Fetches the remote collection and stores it locally.
    ///
    /// When the remote holds nothing the local entries are kept and
    /// [`SyncStatus::NoRemoteData`] is returned.
    pub async fn pull_remote(&self) -> LedgerResult<SyncStatus> {
        let replicator = self.replicator.as_ref().ok_or_else(|| LedgerError::Sync {
            message: "no remote store attached".to_string(),
        })?;

        match replicator.pull().await? {
            Some(entries) => {
                let count = entries.len();
                self.repo.save(&entries)?;
                info!(count, "Local expenses replaced from remote");
                Ok(SyncStatus::Pulled { count })
            }
            None => Ok(SyncStatus::NoRemoteData),
        }
    }

    fn forget_draft(&self) {
        if let Err(e) = self.draft.clear() {
            warn!(error = %e, "Could not clear expense draft");
        }
    }

    fn replicate(&self, snapshot: Vec<ExpenseEntry>) {
        if let Some(replicator) = &self.replicator {
            replicator.replicate(snapshot);
        }
    }
}

fn find(entries: &[ExpenseEntry], id: Uuid) -> LedgerResult<usize> {
    entries
        .iter()
        .position(|entry| entry.id == id)
        .ok_or_else(|| LedgerError::RecordNotFound {
            reference: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use crate::storage::MemoryStore;
    use crate::sync::{MemoryRemote, RemoteStore};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn ledger() -> ExpenseLedger<Arc<MemoryStore>> {
        ExpenseLedger::new(Arc::new(MemoryStore::new()), &LedgerConfig::default())
    }

    fn input(date: &str, description: &str, amount: &str, entry_type: EntryType) -> ExpenseInput {
        ExpenseInput::new(make_date(date), description, dec(amount), entry_type)
    }

    #[test]
    fn test_add_appends_and_summarizes() {
        let ledger = ledger();
        ledger.add(input("2024-03-01", "Salary", "1000", EntryType::Income)).unwrap();
        ledger.add(input("2024-03-02", "Rent", "400", EntryType::Expense)).unwrap();
        ledger.add(input("2024-03-02", "Tea", "2.5", EntryType::Expense)).unwrap();

        let descriptions: Vec<String> =
            ledger.entries().into_iter().map(|e| e.description).collect();
        assert_eq!(descriptions, vec!["Salary", "Rent", "Tea"]);

        let summary = ledger.summary();
        assert_eq!(summary.total_income, dec("1000"));
        assert_eq!(summary.total_expense, dec("402.5"));
        assert_eq!(summary.net_balance, dec("597.5"));

        let days = ledger.daily_totals();
        assert_eq!(days[0].date, make_date("2024-03-02"));
        assert_eq!(days[0].expense, dec("402.5"));
    }

    #[test]
    fn test_incomplete_input_is_ignored() {
        let ledger = ledger();
        let mut incomplete = input("2024-03-01", "Tea", "2", EntryType::Expense);
        incomplete.amount = None;

        assert_eq!(ledger.add(incomplete).unwrap(), None);
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn test_submit_clears_draft() {
        let ledger = ledger();
        let draft = ExpenseDraft {
            description: "Te".to_string(),
            ..ExpenseDraft::default()
        };
        ledger.save_draft(&draft).unwrap();
        assert_eq!(ledger.load_draft(), Some(draft));

        ledger.add(input("2024-03-01", "Tea", "2", EntryType::Expense)).unwrap();
        assert_eq!(ledger.load_draft(), None);
    }

    #[test]
    fn test_edit_and_delete_by_id() {
        let ledger = ledger();
        let first = ledger
            .add(input("2024-03-01", "Tea", "2", EntryType::Expense))
            .unwrap()
            .unwrap();
        let second = ledger
            .add(input("2024-03-01", "Tea", "2", EntryType::Expense))
            .unwrap()
            .unwrap();

        let edited = ledger
            .edit(second.id, input("2024-03-01", "Coffee", "3", EntryType::Expense))
            .unwrap()
            .unwrap();
        assert_eq!(edited.id, second.id);

        ledger.delete(first.id).unwrap();
        assert_eq!(ledger.entries(), vec![edited]);

        assert!(matches!(
            ledger.delete(first.id),
            Err(LedgerError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_backup_leaves_entries_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(
            &path,
            r#"[{"date":"2024-03-05","description":"Gift","amount":"50","type":"income"},{"date":"2024-03-06"}]"#,
        )
        .unwrap();

        let ledger = ledger();
        ledger.add(input("2024-03-01", "Tea", "2", EntryType::Expense)).unwrap();

        assert!(matches!(
            ledger.import_json(&path),
            Err(LedgerError::InvalidImport { .. })
        ));
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_backup_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let source = ledger();
        source.add(input("2024-03-01", "Salary", "1000", EntryType::Income)).unwrap();
        source.export_json(&path).unwrap();

        let target = ledger();
        assert_eq!(target.import_json(&path).unwrap(), 1);
        assert_eq!(target.entries(), source.entries());
    }

    #[tokio::test]
    async fn test_failing_remote_does_not_fail_local_save() {
        let remote = Arc::new(MemoryRemote::<ExpenseEntry>::new());
        remote.set_failing(true);
        let (replicator, mut status) = Replicator::new(remote.clone(), "user-1");

        let mut ledger = ledger();
        ledger.attach_replicator(replicator);

        let entry = ledger.add(input("2024-03-01", "Tea", "2", EntryType::Expense)).unwrap();
        assert!(entry.is_some());
        assert_eq!(ledger.entries().len(), 1);
        assert!(matches!(status.recv().await, Some(SyncStatus::Failed { .. })));
    }

    #[tokio::test]
    async fn test_changes_are_pushed() {
        let remote = Arc::new(MemoryRemote::<ExpenseEntry>::new());
        let (replicator, mut status) = Replicator::new(remote.clone(), "user-1");

        let mut ledger = ledger();
        ledger.attach_replicator(replicator);
        ledger.add(input("2024-03-01", "Tea", "2", EntryType::Expense)).unwrap();

        assert_eq!(status.recv().await, Some(SyncStatus::Pushed { count: 1 }));
        assert_eq!(remote.document("user-1").unwrap(), ledger.entries());
    }

    #[tokio::test]
    async fn test_pull_replaces_local_or_keeps_it() {
        let remote_entry =
            ExpenseEntry::new(make_date("2024-01-01"), "Remote", dec("9"), EntryType::Income);
        let remote = Arc::new(MemoryRemote::<ExpenseEntry>::new());
        let (replicator, _status) = Replicator::new(remote.clone(), "user-1");

        let mut ledger = ledger();
        ledger.add(input("2024-03-01", "Local", "2", EntryType::Expense)).unwrap();
        ledger.attach_replicator(replicator);

        assert_eq!(ledger.pull_remote().await.unwrap(), SyncStatus::NoRemoteData);
        assert_eq!(ledger.entries()[0].description, "Local");

        remote.push("user-1", &[remote_entry.clone()]).await.unwrap();
        assert_eq!(ledger.pull_remote().await.unwrap(), SyncStatus::Pulled { count: 1 });
        assert_eq!(ledger.entries(), vec![remote_entry]);
    }

    #[tokio::test]
    async fn test_pull_without_replicator_fails() {
        assert!(matches!(
            ledger().pull_remote().await,
            Err(LedgerError::Sync { .. })
        ));
    }
}
