use crate::support::{init_logging, STUB};
use api_contract::{
    CallLog, ClientConfiguration, HttpClient, HyperHttpClient, RequestOptions, TrackedHttpClient,
};
use platform_contracts::shapes::{common, importer, search, teams};
use serde_json::json;
use std::sync::Arc;

fn client() -> TrackedHttpClient<HyperHttpClient, Arc<CallLog>> {
    init_logging();
    let mut configuration = ClientConfiguration::new();
    configuration.set_base_url(STUB.base_url());

    TrackedHttpClient::new(
        HyperHttpClient::with_configuration(configuration),
        Arc::new(CallLog::new()),
    )
}

#[tokio::test]
async fn team_endpoints_honour_their_contracts() {
    let client = client();

    let list = client.get("/v1/teams", RequestOptions::new()).await.unwrap();
    list.expect_status(200);
    list.expect_schema(&teams::TEAM_LIST);

    let created = client
        .post("/v1/teams", RequestOptions::new().json(json!({"name": "Green"})))
        .await
        .unwrap();
    created.expect_status(201);
    created.expect_schema(&teams::TEAM);

    let deleted = client
        .delete("/v1/teams/2d5e8a10-7c3b-4f6e-9a1d-5b8c2e4f6a70", RequestOptions::new())
        .await
        .unwrap();
    deleted.expect_status(204);
    deleted.expect_schema(&common::EMPTY_BODY);

    assert_eq!(client.sink().len(), 3);
}

#[tokio::test]
async fn search_results_honour_their_contract() {
    let response = client()
        .get("/v1/search?q=harbour", RequestOptions::new())
        .await
        .unwrap();

    response.expect_schema(&search::SEARCH_RESULTS);
}

#[tokio::test]
async fn rejected_imports_answer_with_an_error_body() {
    let response = client()
        .post("/v1/imports", RequestOptions::new().bytes(Vec::<u8>::new()))
        .await
        .unwrap();

    response.expect_status_in(&[400, 422]);
    response.expect_schema(&common::ERROR_BODY);
    assert!(!response.validate_body(&importer::IMPORT_JOB).is_valid());
}

#[tokio::test]
#[should_panic(expected = "value: expected object, got array")]
async fn a_team_is_not_a_search_page() {
    let response = client().get("/v1/teams", RequestOptions::new()).await.unwrap();

    response.expect_schema(&search::SEARCH_RESULTS);
}

#[tokio::test]
#[should_panic(expected = "to respond with one of [200, 201], got 422")]
async fn unexpected_statuses_fail_loudly() {
    let response = client()
        .post("/v1/imports", RequestOptions::new())
        .await
        .unwrap();

    response.expect_status_in(&[200, 201]);
}
