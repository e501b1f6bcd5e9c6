//! Admin service tests: authorization, history, cancellation, verification.

use artifact_store::{ArtifactStore, InMemoryArtifactStore};
use common::OrderNumber;
use order_store::{InMemoryOrderStore, OrderStore};
use ticketing::{
    AdminSecret, AdminService, PurchaseOrchestrator, PurchaseRequest, QrCodeGenerator,
    TicketPayload, TicketingError, ValidationError,
};

const SECRET: &str = "taquilla-2025";

struct TestHarness {
    orders: InMemoryOrderStore,
    artifacts: InMemoryArtifactStore,
    orchestrator: PurchaseOrchestrator<InMemoryOrderStore, InMemoryArtifactStore, QrCodeGenerator>,
    admin: AdminService<InMemoryOrderStore, InMemoryArtifactStore>,
}

impl TestHarness {
    fn with_secret(secret: &str) -> Self {
        let orders = InMemoryOrderStore::new();
        let artifacts = InMemoryArtifactStore::new();
        Self {
            orchestrator: PurchaseOrchestrator::new(
                orders.clone(),
                artifacts.clone(),
                QrCodeGenerator::new(),
            ),
            admin: AdminService::new(orders.clone(), artifacts.clone(), AdminSecret::new(secret)),
            orders,
            artifacts,
        }
    }

    fn new() -> Self {
        Self::with_secret(SECRET)
    }

    async fn buy(&self, buyer: &str) -> OrderNumber {
        self.orchestrator
            .purchase(&PurchaseRequest::new(buyer, "Concierto", 50.0, 2))
            .await
            .unwrap()
            .order_number
    }
}

fn order(n: u64) -> OrderNumber {
    OrderNumber::new(n).unwrap()
}

#[tokio::test]
async fn wrong_secret_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    harness.buy("Ana").await;

    let listed = harness.admin.list_history("nope").await;
    assert!(matches!(listed, Err(TicketingError::Unauthorized)));

    let cancelled = harness.admin.cancel("nope", order(1)).await;
    assert!(matches!(cancelled, Err(TicketingError::Unauthorized)));

    let found = harness.admin.find("", order(1)).await;
    assert!(matches!(found, Err(TicketingError::Unauthorized)));

    assert_eq!(harness.orders.count().await.unwrap(), 1);
    assert_eq!(harness.artifacts.artifact_count().await, 1);
}

#[tokio::test]
async fn unconfigured_secret_disables_admin() {
    let harness = TestHarness::with_secret("");
    harness.buy("Ana").await;

    let result = harness.admin.list_history("").await;
    assert!(matches!(result, Err(TicketingError::Unauthorized)));
}

#[tokio::test]
async fn history_is_listed_highest_order_first() {
    let harness = TestHarness::new();
    for buyer in ["Ana", "Luis", "Marta"] {
        harness.buy(buyer).await;
    }

    let history = harness.admin.list_history(SECRET).await.unwrap();
    let numbers: Vec<u64> = history.iter().map(|r| r.order_number.get()).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
    assert_eq!(history[0].buyer_name, "Marta");
}

#[tokio::test]
async fn empty_history_is_empty_list() {
    let harness = TestHarness::new();
    assert!(harness.admin.list_history(SECRET).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_returns_record_or_not_found() {
    let harness = TestHarness::new();
    let number = harness.buy("Ana").await;

    let record = harness.admin.find(SECRET, number).await.unwrap();
    assert_eq!(record.buyer_name, "Ana");

    let missing = harness.admin.find(SECRET, order(99)).await;
    assert!(matches!(missing, Err(TicketingError::NotFound(n)) if n == order(99)));
}

#[tokio::test]
async fn cancel_removes_record_and_artifact() {
    let harness = TestHarness::new();
    harness.buy("Ana").await;
    let number = harness.buy("Luis").await;
    let record = harness.admin.find(SECRET, number).await.unwrap();

    let confirmation = harness.admin.cancel(SECRET, number).await.unwrap();
    assert_eq!(confirmation.order_number, number);

    assert_eq!(harness.orders.count().await.unwrap(), 1);
    let path = record.artifact_path.parse().unwrap();
    assert!(!harness.artifacts.exists(&path).await.unwrap());

    let history = harness.admin.list_history(SECRET).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].buyer_name, "Ana");
}

#[tokio::test]
async fn cancelling_twice_reports_not_found() {
    let harness = TestHarness::new();
    let number = harness.buy("Ana").await;

    harness.admin.cancel(SECRET, number).await.unwrap();
    let again = harness.admin.cancel(SECRET, number).await;
    assert!(matches!(again, Err(TicketingError::NotFound(_))));
}

#[tokio::test]
async fn cancel_keeps_record_when_artifact_removal_fails() {
    let harness = TestHarness::new();
    let number = harness.buy("Ana").await;
    harness.artifacts.set_fail_on_delete(true);

    let result = harness.admin.cancel(SECRET, number).await;
    assert!(matches!(result, Err(TicketingError::StorageUnavailable(_))));
    assert!(harness.orders.find_by_order_number(number).await.unwrap().is_some());

    harness.artifacts.set_fail_on_delete(false);
    harness.admin.cancel(SECRET, number).await.unwrap();
    assert_eq!(harness.orders.count().await.unwrap(), 0);
    assert_eq!(harness.artifacts.artifact_count().await, 0);
}

#[tokio::test]
async fn numbering_continues_after_cancelling_latest() {
    let harness = TestHarness::new();
    harness.buy("Ana").await;
    let latest = harness.buy("Luis").await;

    harness.admin.cancel(SECRET, latest).await.unwrap();
    assert_eq!(harness.buy("Marta").await, order(2));
}

#[tokio::test]
async fn verify_ticket_accepts_matching_payload() {
    let harness = TestHarness::new();
    let number = harness.buy("Ana").await;
    let record = harness.admin.find(SECRET, number).await.unwrap();
    let payload = TicketPayload::from_record(&record).encode();

    let verified = harness.admin.verify_ticket(SECRET, &payload).await.unwrap();
    assert_eq!(verified.order_number, number);
}

#[tokio::test]
async fn verify_ticket_rejects_tampered_payload() {
    let harness = TestHarness::new();
    harness.buy("Ana").await;

    let tampered = "ORDER:1\nBUYER:Ana\nEVENT:Concierto\nPRICE:50.00\nQTY:20";
    let result = harness.admin.verify_ticket(SECRET, tampered).await;
    assert!(matches!(result, Err(TicketingError::TicketMismatch(n)) if n == order(1)));
}

#[tokio::test]
async fn verify_ticket_reports_unknown_and_malformed_payloads() {
    let harness = TestHarness::new();

    let unknown = "ORDER:7\nBUYER:Ana\nEVENT:Concierto\nPRICE:50.00\nQTY:2";
    let result = harness.admin.verify_ticket(SECRET, unknown).await;
    assert!(matches!(result, Err(TicketingError::NotFound(_))));

    let result = harness.admin.verify_ticket(SECRET, "not a ticket").await;
    assert!(matches!(
        result,
        Err(TicketingError::Validation(ValidationError::MalformedPayload(_)))
    ));
}
