//! End-to-end coverage of the stock-transition engine against a real
//! Postgres instance. Each test gets a fresh, migrated database courtesy of
//! `sqlx::test` — no manual `DATABASE_URL` gating required, but a reachable
//! Postgres is still a precondition for running this file.

use std::sync::Arc;

use sqlx::PgPool;

use inventory_core::dto::inventory_item::CreateInventoryItemRequest;
use inventory_core::dto::transition::TransitionContext;
use inventory_core::repositories::InventoryRepository;
use inventory_core::services::InventoryService;
use inventory_core::AppError;
use inventory_infra::repositories::PgInventoryRepository;
use inventory_infra::services::InventoryServiceImpl;
use shared_events::LoggingEventSink;

fn create_request(sku: &str, location: &str, on_hand: i64) -> CreateInventoryItemRequest {
    CreateInventoryItemRequest {
        sku: sku.to_string(),
        location: location.to_string(),
        quantity_on_hand: on_hand,
        reorder_point: None,
        reorder_quantity: None,
        backorderable: false,
        metadata: None,
    }
}

fn service(pool: Arc<PgPool>) -> (InventoryServiceImpl, Arc<dyn InventoryRepository>) {
    let inventory_repo: Arc<dyn InventoryRepository> = Arc::new(PgInventoryRepository::new(pool.clone()));
    let service = InventoryServiceImpl::new(pool, inventory_repo.clone(), Arc::new(LoggingEventSink));
    (service, inventory_repo)
}

#[sqlx::test(migrations = "../migrations")]
async fn receive_increases_on_hand_and_logs_a_receipt(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-1", "default", 5)).await.unwrap();

    let (item, movement) = service
        .receive("WIDGET-1", "default", 10, TransitionContext::default())
        .await
        .unwrap();

    assert_eq!(item.quantity_on_hand, 15);
    assert_eq!(movement.quantity, 10);
    assert_eq!(movement.quantity_before, 5);
    assert_eq!(movement.quantity_after, 15);
}

#[sqlx::test(migrations = "../migrations")]
async fn reserve_then_commit_reduces_on_hand_and_clears_reservation(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-2", "default", 10)).await.unwrap();

    let (item, movement, reservation_id) = service
        .reserve("WIDGET-2", "default", 4, TransitionContext::default())
        .await
        .unwrap();
    assert_eq!(item.quantity_on_hand, 10);
    assert_eq!(item.quantity_reserved, 4);
    assert_eq!(movement.quantity, -4);
    assert!(reservation_id.starts_with("RES-"));

    let (item, movement) = service
        .commit("WIDGET-2", "default", 4, TransitionContext::default())
        .await
        .unwrap();
    assert_eq!(item.quantity_on_hand, 6);
    assert_eq!(item.quantity_reserved, 0);
    assert_eq!(movement.quantity, -4);
}

#[sqlx::test(migrations = "../migrations")]
async fn reserve_then_release_restores_pre_reservation_state(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-3", "default", 10)).await.unwrap();

    service
        .reserve("WIDGET-3", "default", 4, TransitionContext::default())
        .await
        .unwrap();
    let (item, _movement) = service
        .release("WIDGET-3", "default", 4, TransitionContext::default())
        .await
        .unwrap();

    assert_eq!(item.quantity_on_hand, 10);
    assert_eq!(item.quantity_reserved, 0);
}

#[sqlx::test(migrations = "../migrations")]
async fn reserve_beyond_available_fails_insufficient_stock(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-4", "default", 2)).await.unwrap();

    let result = service
        .reserve("WIDGET-4", "default", 3, TransitionContext::default())
        .await;

    assert!(matches!(result, Err(AppError::InsufficientStock(_))));
}

#[sqlx::test(migrations = "../migrations")]
async fn commit_beyond_reserved_fails_insufficient_reservation(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-5", "default", 10)).await.unwrap();
    service
        .reserve("WIDGET-5", "default", 2, TransitionContext::default())
        .await
        .unwrap();

    let result = service
        .commit("WIDGET-5", "default", 5, TransitionContext::default())
        .await;

    assert!(matches!(result, Err(AppError::InsufficientReservation(_))));
}

#[sqlx::test(migrations = "../migrations")]
async fn transfer_preserves_total_on_hand_across_locations(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-6", "east", 10)).await.unwrap();
    repo.create(&create_request("WIDGET-6", "west", 3)).await.unwrap();

    let (source, destination, out_movement, in_movement, transfer_id) = service
        .transfer("WIDGET-6", "east", "west", 4, TransitionContext::default())
        .await
        .unwrap();

    assert_eq!(source.quantity_on_hand, 6);
    assert_eq!(destination.quantity_on_hand, 7);
    assert_eq!(out_movement.quantity, -4);
    assert_eq!(in_movement.quantity, 4);
    assert_ne!(transfer_id, uuid::Uuid::nil());
}

#[sqlx::test(migrations = "../migrations")]
async fn count_adjustment_with_no_difference_emits_no_movement(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-7", "default", 8)).await.unwrap();

    let (item, movement, difference) = service
        .count_adjustment("WIDGET-7", "default", 8)
        .await
        .unwrap();

    assert_eq!(item.quantity_on_hand, 8);
    assert!(movement.is_none());
    assert_eq!(difference, 0);
}

#[sqlx::test(migrations = "../migrations")]
async fn count_adjustment_with_a_difference_reconciles_on_hand(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool);
    repo.create(&create_request("WIDGET-8", "default", 8)).await.unwrap();

    let (item, movement, difference) = service
        .count_adjustment("WIDGET-8", "default", 5)
        .await
        .unwrap();

    assert_eq!(item.quantity_on_hand, 5);
    assert_eq!(difference, -3);
    let movement = movement.unwrap();
    assert_eq!(movement.quantity, -3);
    assert_eq!(movement.metadata["expected"], 8);
    assert_eq!(movement.metadata["actual"], 5);
}

#[sqlx::test(migrations = "../migrations")]
async fn concurrent_reserve_admits_only_as_many_as_available(pool: PgPool) {
    let pool = Arc::new(pool);
    let (service, repo) = service(pool.clone());
    repo.create(&create_request("WIDGET-9", "default", 1)).await.unwrap();

    let service = Arc::new(service);
    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .reserve("WIDGET-9", "default", 1, TransitionContext::default())
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
}
