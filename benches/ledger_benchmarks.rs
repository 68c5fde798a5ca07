//! Performance benchmarks for the shift ledger engine.
//!
//! Measures the stateless calculations over a record set of a few hundred
//! shifts spread across a year, plus a full read-modify-write through the
//! in-memory store.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use shift_ledger::calculation::{aggregate_by_month, export_rows, partition};
use shift_ledger::config::{LedgerConfig, PayRules};
use shift_ledger::ledger::ShiftLedger;
use shift_ledger::models::{ExtraTime, ShiftEntry, ShiftKind, ShiftRecord};
use shift_ledger::storage::MemoryStore;

const SHIFT_KINDS: [&str; 4] = ["Morning", "Evening", "Night", "Split"];

/// Creates `count` records, two or three per day starting 2024-01-01.
fn create_records(count: usize) -> Vec<ShiftRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    (0..count)
        .map(|i| {
            let date = start + Days::new((i / 3) as u64);
            let record = ShiftRecord::new(date, ShiftKind::from(SHIFT_KINDS[i % 4]), "A");
            if i % 5 == 0 {
                record.with_extra(ExtraTime::Manual {
                    hours: Decimal::new(15, 1),
                })
            } else {
                record
            }
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let rules = PayRules::default();
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");

    let mut group = c.benchmark_group("engine");
    for size in [100usize, 500, 1000] {
        let records = create_records(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("partition", size), &records, |b, records| {
            b.iter(|| black_box(partition(records, today)))
        });
        group.bench_with_input(
            BenchmarkId::new("aggregate_by_month", size),
            &records,
            |b, records| b.iter(|| black_box(aggregate_by_month(records, 2, 2024, &rules))),
        );
        group.bench_with_input(BenchmarkId::new("export_rows", size), &records, |b, records| {
            b.iter(|| black_box(export_rows(records, 2, 2024, &rules)))
        });
    }
    group.finish();
}

fn bench_ledger_add(c: &mut Criterion) {
    let config = LedgerConfig::default();
    let ledger = ShiftLedger::new(MemoryStore::new(), &config);
    ledger
        .replace_all(create_records(300))
        .expect("seed records");
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");

    c.bench_function("ledger_add_300", |b| {
        b.iter(|| {
            let added = ledger
                .add(ShiftEntry::new(date, "Morning", "B"))
                .expect("add succeeds");
            if let Some(record) = added {
                ledger.delete(record.id).expect("delete succeeds");
            }
        })
    });
}

criterion_group!(benches, bench_engine, bench_ledger_add);
criterion_main!(benches);
