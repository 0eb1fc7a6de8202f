//! Inventory writer integration tests.
//!
//! Verifies the relative stock adjustment: IN adds, OUT subtracts, other
//! types leave stock alone, and concurrent movements never lose updates.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_wrap)]

mod common;

use futures::future::join_all;
use sea_orm::{EntityTrait, QuerySelect, TransactionTrait};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use uuid::Uuid;

use common::Fixture;
use kontor_db::entities::products;
use kontor_db::repositories::{
    CreateInventoryTransactionInput, InventoryError, InventoryTransactionRepository,
};

fn movement(fixture: &Fixture, kind: &str, quantity: i32) -> CreateInventoryTransactionInput {
    CreateInventoryTransactionInput {
        tenant_id: fixture.tenant_id,
        product_id: fixture.product_id,
        transaction_type: kind.to_string(),
        quantity,
        reference: format!("{kind}-{quantity}"),
        notes: String::new(),
        created_by: fixture.user_id,
    }
}

#[tokio::test]
async fn test_out_then_in_adjusts_stock_and_lists_newest_first() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 100).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = InventoryTransactionRepository::new(db.clone());

    let out = repo.create(movement(&fixture, "OUT", 30)).await.unwrap();
    assert_eq!(out.quantity, 30);
    assert_eq!(common::stock_of(&db, fixture.product_id).await.unwrap(), 70);

    let incoming = repo.create(movement(&fixture, "IN", 10)).await.unwrap();
    assert_eq!(common::stock_of(&db, fixture.product_id).await.unwrap(), 80);

    let history = repo
        .list_by_product(fixture.tenant_id, fixture.product_id)
        .await
        .unwrap();
    let ids: Vec<Uuid> = history.iter().map(|t| t.id).collect();
    assert_eq!(ids, [incoming.id, out.id]);

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_other_types_leave_stock_alone() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 40).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = InventoryTransactionRepository::new(db.clone());
    for kind in ["ADJUST", "in", "Out"] {
        repo.create(movement(&fixture, kind, 7)).await.unwrap();
    }

    assert_eq!(common::stock_of(&db, fixture.product_id).await.unwrap(), 40);
    assert_eq!(repo.list(fixture.tenant_id).await.unwrap().len(), 3);

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_out_may_drive_stock_negative() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 5).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };

    let repo = InventoryTransactionRepository::new(db.clone());
    repo.create(movement(&fixture, "OUT", 8)).await.unwrap();

    assert_eq!(common::stock_of(&db, fixture.product_id).await.unwrap(), -3);

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test]
async fn test_product_of_another_tenant_persists_nothing() {
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
    let other = match common::setup(&db, 25).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            common::cleanup(&db, &fixture).await.ok();
            return;
        }
    };

    // The product row exists, so the record insert succeeds; the
    // tenant-scoped stock update then matches nothing.
    let repo = InventoryTransactionRepository::new(db.clone());
    let mut input = movement(&fixture, "IN", 3);
    input.product_id = other.product_id;

    let result = repo.create(input).await;
    assert!(
        matches!(result, Err(InventoryError::ProductNotFound(id)) if id == other.product_id),
        "unexpected result: {:?}",
        result
    );

    assert!(repo.list(fixture.tenant_id).await.unwrap().is_empty());
    assert!(
        repo.list_by_product(other.tenant_id, other.product_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(common::stock_of(&db, other.product_id).await.unwrap(), 25);

    common::cleanup(&db, &fixture).await.ok();
    common::cleanup(&db, &other).await.ok();
}

#[tokio::test]
async fn test_timed_out_movement_leaves_no_trace() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = match common::setup(&db, 50).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Skipping test - setup failed: {}", e);
            return;
        }
    };
    // The writer gets its own pool so its abandoned session can be closed.
    let Some(writer_db) = common::connect().await else {
        return;
    };

    // Holding the product row blocks the record's foreign key check.
    let holder = db.begin().await.unwrap();
    products::Entity::find_by_id(fixture.product_id)
        .lock_exclusive()
        .one(&holder)
        .await
        .unwrap();

    let repo = InventoryTransactionRepository::new(writer_db.clone())
        .with_timeout(Duration::from_millis(200));
    let result = repo.create(movement(&fixture, "IN", 5)).await;
    assert!(
        matches!(result, Err(InventoryError::Timeout(_))),
        "unexpected result: {:?}",
        result
    );

    holder.rollback().await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(5), writer_db.close()).await;

    let reader = InventoryTransactionRepository::new(db.clone());
    assert!(
        reader
            .list_by_product(fixture.tenant_id, fixture.product_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(common::stock_of(&db, fixture.product_id).await.unwrap(), 50);

    common::cleanup(&db, &fixture).await.ok();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_movements_lose_no_updates() {
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
    let fixture = Arc::new(fixture);

    const WRITERS: usize = 20;
    let barrier = Arc::new(Barrier::new(WRITERS));
    let repo = InventoryTransactionRepository::new(db.clone());

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let repo = repo.clone();
            let barrier = Arc::clone(&barrier);
            let fixture = Arc::clone(&fixture);
            tokio::spawn(async move {
                barrier.wait().await;
                repo.create(movement(&fixture, "IN", 1)).await
            })
        })
        .collect();

    for joined in join_all(handles).await {
        joined.expect("task panicked").expect("movement failed");
    }

    assert_eq!(
        common::stock_of(&db, fixture.product_id).await.unwrap(),
        WRITERS as i32
    );
    assert_eq!(
        repo.list_by_product(fixture.tenant_id, fixture.product_id)
            .await
            .unwrap()
            .len(),
        WRITERS
    );

    common::cleanup(&db, &fixture).await.ok();
}
