//! Journal entry writer integration tests.
//!
//! Verifies that header and lines commit together, that a failing line
//! leaves no header behind, and that an update replaces the whole line set.

#![allow(clippy::uninlined_format_args)]

mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use std::time::Duration;
use uuid::Uuid;

use common::Fixture;
use kontor_db::entities::{accounts, journal_entries, journal_entry_lines};
use kontor_db::repositories::{
    CreateJournalEntryInput, JournalEntryRepository, JournalError, JournalLineInput,
    UpdateJournalEntryInput,
};

fn line(
    account_id: Uuid,
    description: &str,
    debit: Decimal,
    credit: Decimal,
) -> JournalLineInput {
    JournalLineInput {
        account_id,
        description: description.to_string(),
        debit,
        credit,
    }
}

fn opening_entry(fixture: &Fixture, lines: Vec<JournalLineInput>) -> CreateJournalEntryInput {
    CreateJournalEntryInput {
        tenant_id: fixture.tenant_id,
        entry_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        reference: "JV-1".to_string(),
        description: "Opening capital".to_string(),
        created_by: fixture.user_id,
        lines,
    }
}

async fn count_rows(db: &DatabaseConnection, tenant_id: Uuid) -> (u64, u64) {
    let headers = journal_entries::Entity::find()
        .filter(journal_entries::Column::TenantId.eq(tenant_id))
        .count(db)
        .await
        .unwrap();
    let lines = journal_entry_lines::Entity::find()
        .filter(journal_entry_lines::Column::TenantId.eq(tenant_id))
        .count(db)
        .await
        .unwrap();
    (headers, lines)
}

#[tokio::test]
async fn test_two_line_entry_reads_back_in_order() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = JournalEntryRepository::new(db.clone());
    let created = repo
        .create(opening_entry(
            &fixture,
            vec![
                line(fixture.cash_account_id, "Cash in", dec!(100), dec!(0)),
                line(fixture.capital_account_id, "Capital", dec!(0), dec!(100)),
            ],
        ))
        .await
        .expect("create should succeed");

    assert_eq!(created.lines.len(), 2);
    assert!(created.lines.iter().all(|l| l.journal_entry_id == created.entry.id));

    let fetched = repo
        .get(fixture.tenant_id, created.entry.id)
        .await
        .expect("get should succeed")
        .expect("entry should exist");

    assert_eq!(fetched.entry.reference, "JV-1");
    assert_eq!(fetched.lines.len(), 2);
    assert_eq!(fetched.lines[0].account_id, fixture.cash_account_id);
    assert_eq!(fetched.lines[0].debit, dec!(100));
    assert_eq!(fetched.lines[1].account_id, fixture.capital_account_id);
    assert_eq!(fetched.lines[1].credit, dec!(100));

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_failing_line_leaves_no_header() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = JournalEntryRepository::new(db.clone());
    let result = repo
        .create(opening_entry(
            &fixture,
            vec![
                line(fixture.cash_account_id, "Cash in", dec!(100), dec!(0)),
                // No such account: the foreign key rejects this line.
                line(Uuid::new_v4(), "Ghost", dec!(0), dec!(100)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(JournalError::Database(_))));

    let (headers, lines) = count_rows(&db, fixture.tenant_id).await;
    assert_eq!(headers, 0, "header must not survive a failed line insert");
    assert_eq!(lines, 0);

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_update_replaces_every_line() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = JournalEntryRepository::new(db.clone());
    let created = repo
        .create(opening_entry(
            &fixture,
            vec![
                line(fixture.cash_account_id, "A", dec!(10), dec!(0)),
                line(fixture.capital_account_id, "B", dec!(0), dec!(10)),
            ],
        ))
        .await
        .unwrap();
    let old_ids: Vec<Uuid> = created.lines.iter().map(|l| l.id).collect();

    let updated = repo
        .update(UpdateJournalEntryInput {
            tenant_id: fixture.tenant_id,
            id: created.entry.id,
            entry_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            reference: "JV-1a".to_string(),
            description: "Restated".to_string(),
            lines: vec![
                line(fixture.cash_account_id, "C", dec!(25.5), dec!(0)),
                line(fixture.capital_account_id, "D", dec!(0), dec!(20)),
                line(fixture.capital_account_id, "E", dec!(0), dec!(5.5)),
            ],
        })
        .await
        .expect("update should succeed");

    assert_eq!(updated.entry.reference, "JV-1a");

    let fetched = repo
        .get(fixture.tenant_id, created.entry.id)
        .await
        .unwrap()
        .unwrap();
    let descriptions: Vec<&str> = fetched.lines.iter().map(|l| l.description.as_str()).collect();
    assert_eq!(descriptions, ["C", "D", "E"]);
    assert!(fetched.lines.iter().all(|l| !old_ids.contains(&l.id)));
    assert_eq!(
        fetched.entry.entry_date,
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    );

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_update_of_missing_entry_is_not_found() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = JournalEntryRepository::new(db.clone());
    let missing = Uuid::new_v4();
    let result = repo
        .update(UpdateJournalEntryInput {
            tenant_id: fixture.tenant_id,
            id: missing,
            entry_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            reference: String::new(),
            description: String::new(),
            lines: vec![line(fixture.cash_account_id, "X", dec!(1), dec!(0))],
        })
        .await;

    assert!(matches!(result, Err(JournalError::NotFound(id)) if id == missing));

    assert_eq!(count_rows(&db, fixture.tenant_id).await, (0, 0));

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_delete_removes_header_and_lines() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = JournalEntryRepository::new(db.clone());
    let created = repo
        .create(opening_entry(
            &fixture,
            vec![line(fixture.cash_account_id, "Only", dec!(1), dec!(0))],
        ))
        .await
        .unwrap();

    repo.delete(fixture.tenant_id, created.entry.id).await.unwrap();

    assert!(
        repo.get(fixture.tenant_id, created.entry.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(matches!(
        repo.delete(fixture.tenant_id, created.entry.id).await,
        Err(JournalError::NotFound(_))
    ));

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_timed_out_create_leaves_no_header() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };
    let Some(writer_db) = common::connect().await else {
        return;
    };

    // The header goes in, then the first line blocks on the locked account.
    let holder = db.begin().await.unwrap();
    accounts::Entity::find_by_id(fixture.cash_account_id)
        .lock_exclusive()
        .one(&holder)
        .await
        .unwrap();

    let repo =
        JournalEntryRepository::new(writer_db.clone()).with_timeout(Duration::from_millis(200));
    let result = repo
        .create(opening_entry(
            &fixture,
            vec![
                line(fixture.cash_account_id, "Cash in", dec!(100), dec!(0)),
                line(fixture.capital_account_id, "Capital", dec!(0), dec!(100)),
            ],
        ))
        .await;
    assert!(
        matches!(result, Err(JournalError::Timeout(_))),
        "unexpected result: {:?}",
        result
    );

    holder.rollback().await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(5), writer_db.close()).await;

    assert_eq!(count_rows(&db, fixture.tenant_id).await, (0, 0));

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_timed_out_update_keeps_previous_lines() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 0).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };
    let Some(writer_db) = common::connect().await else {
        return;
    };

    let created = JournalEntryRepository::new(db.clone())
        .create(opening_entry(
            &fixture,
            vec![
                line(fixture.cash_account_id, "A", dec!(10), dec!(0)),
                line(fixture.capital_account_id, "B", dec!(0), dec!(10)),
            ],
        ))
        .await
        .unwrap();

    let holder = db.begin().await.unwrap();
    journal_entries::Entity::find_by_id(created.entry.id)
        .lock_exclusive()
        .one(&holder)
        .await
        .unwrap();

    let repo =
        JournalEntryRepository::new(writer_db.clone()).with_timeout(Duration::from_millis(200));
    let result = repo
        .update(UpdateJournalEntryInput {
            tenant_id: fixture.tenant_id,
            id: created.entry.id,
            entry_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            reference: "JV-late".to_string(),
            description: "Never lands".to_string(),
            lines: vec![line(fixture.cash_account_id, "C", dec!(1), dec!(0))],
        })
        .await;
    assert!(
        matches!(result, Err(JournalError::Timeout(_))),
        "unexpected result: {:?}",
        result
    );

    holder.rollback().await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(5), writer_db.close()).await;

    let fetched = JournalEntryRepository::new(db.clone())
        .get(fixture.tenant_id, created.entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.entry.reference, "JV-1");
    assert_eq!(fetched.lines, created.lines);

    common::cleanup(&db, &fixture).await.ok();
}
