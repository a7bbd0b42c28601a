//! HTTP surface tests

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use claims_pipeline::{
    ActionDispatcher, CachedPolicyStore, ClaimsPipeline, DuplicateClaimDetector,
    InMemoryDuplicateIndex, InMemoryOutcomeLedger, DEFAULT_POLICY_TTL,
};
use domain_claims::PolicySnapshot;
use interface_api::{config::ApiConfig, create_router};
use risk_engine::{default_registry, EnsembleEngine, ScoringOrchestrator};
use test_utils::{
    PolicyBuilder, RecordingAdjusterQueue, RecordingAuditSink, RecordingNotificationSender,
    RecordingPayoutExecutor, StaticPolicyPort,
};

struct TestApi {
    server: TestServer,
    policy: PolicySnapshot,
    payouts: Arc<RecordingPayoutExecutor>,
}

fn api() -> TestApi {
    let policy = PolicyBuilder::new().build();
    let port = Arc::new(StaticPolicyPort::new().with_policy(policy.clone()));
    let payouts = Arc::new(RecordingPayoutExecutor::new());

    let pipeline = Arc::new(ClaimsPipeline::new(
        CachedPolicyStore::new(port, DEFAULT_POLICY_TTL),
        DuplicateClaimDetector::new(Arc::new(InMemoryDuplicateIndex::default())),
        ScoringOrchestrator::new(Arc::new(default_registry())),
        EnsembleEngine::default(),
        ActionDispatcher::new(
            payouts.clone(),
            Arc::new(RecordingAdjusterQueue::new()),
            Arc::new(RecordingNotificationSender::new()),
            Arc::new(RecordingAuditSink::new()),
        ),
        Arc::new(InMemoryOutcomeLedger::new()),
    ));

    let server = TestServer::new(create_router(pipeline, ApiConfig::default()))
        .expect("router should start");
    TestApi {
        server,
        policy,
        payouts,
    }
}

fn submission(policy_id: Uuid) -> Value {
    json!({
        "policy_id": policy_id,
        "claimant_id": Uuid::now_v7(),
        "claim_type": "water_damage",
        "incident_date": "2026-08-29T10:00:00Z",
        "description": "Pipe burst in kitchen causing floor damage",
        "estimated_amount": "2000",
        "location": { "lat": 40.7128, "lng": -74.0060 },
        "photos": ["s3://claims-photos/kitchen.jpg"],
        "video_evidence_url": "s3://claims-videos/kitchen.mp4"
    })
}

#[tokio::test]
async fn clean_claim_is_approved_over_http() {
    let api = api();

    let response = api
        .server
        .post("/api/v1/claims")
        .json(&submission(*api.policy.id.as_uuid()))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "instant_approved");
    assert_eq!(body["payout_amount"], "1500");
    assert_eq!(
        body["next_steps"],
        "Funds transferred to your account (2-3 business days)"
    );
    assert_eq!(api.payouts.payouts().len(), 1);
}

#[tokio::test]
async fn submitted_claim_can_be_looked_up() {
    let api = api();

    let claim_id = Uuid::now_v7();
    let mut body = submission(*api.policy.id.as_uuid());
    body["claim_id"] = json!(claim_id);

    api.server.post("/api/v1/claims").json(&body).await.assert_status_ok();

    let response = api.server.get(&format!("/api/v1/claims/{claim_id}")).await;
    response.assert_status_ok();
    let stored: Value = response.json();
    assert_eq!(stored["claim_id"], json!(claim_id));
    assert_eq!(stored["status"], "instant_approved");
}

#[tokio::test]
async fn unknown_claim_lookup_is_not_found() {
    let api = api();
    let response = api
        .server
        .get(&format!("/api/v1/claims/{}", Uuid::now_v7()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resubmission_returns_the_same_outcome_without_double_payout() {
    let api = api();

    let mut body = submission(*api.policy.id.as_uuid());
    body["claim_id"] = json!(Uuid::now_v7());

    let first = api.server.post("/api/v1/claims").json(&body).await;
    let second = api.server.post("/api/v1/claims").json(&body).await;
    first.assert_status_ok();
    second.assert_status_ok();

    let first: Value = first.json();
    let second: Value = second.json();
    assert_eq!(first["status"], second["status"]);
    assert_eq!(api.payouts.payouts().len(), 1);
}

#[tokio::test]
async fn duplicate_submission_is_flagged() {
    let api = api();
    let claimant_id = Uuid::now_v7();

    let mut body = submission(*api.policy.id.as_uuid());
    body["claimant_id"] = json!(claimant_id);

    api.server.post("/api/v1/claims").json(&body).await.assert_status_ok();

    // Same content, different claim id
    let response = api.server.post("/api/v1/claims").json(&body).await;
    response.assert_status_ok();
    let outcome: Value = response.json();
    assert_eq!(outcome["status"], "flagged");
    assert_eq!(api.payouts.payouts().len(), 1);
}

#[tokio::test]
async fn zero_amount_claim_is_a_validation_error() {
    let api = api();

    let mut body = submission(*api.policy.id.as_uuid());
    body["estimated_amount"] = json!("0");

    let response = api.server.post("/api/v1/claims").json(&body).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = response.json();
    assert_eq!(error["error"], "validation_error");
}

#[tokio::test]
async fn unknown_policy_is_a_bad_request() {
    let api = api();
    let response = api
        .server
        .post("/api/v1/claims")
        .json(&submission(Uuid::now_v7()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let api = api();

    api.server.get("/health").await.assert_status_ok();
    api.server.get("/health/ready").await.assert_status_ok();
}
