use crate::{
    stub_server::TEAM_ID,
    support::{init_logging, STUB},
};
use api_contract::{
    baseline_compare_test, baseline_record_test, BaselineMode, ContractConfiguration, Error,
    HttpClient, RequestOptions, TestSession,
};
use platform_contracts::shapes::{search, teams};
use serde_json::json;

fn against_stub(configuration: &mut ContractConfiguration) {
    init_logging();
    configuration.set_base_url(STUB.base_url());
    configuration.add_response_mutations(|m| m.remove_headers(["date", "content-length"]));
}

#[baseline_record_test("baselines/recorded/teams.md", against_stub)]
async fn team_lifecycle_is_recorded(session: &TestSession) {
    let client = session.client();

    let list = client.get("/v1/teams", RequestOptions::new()).await.unwrap();
    list.expect_schema(&teams::TEAM_LIST);
    client
        .post("/v1/teams", RequestOptions::new().json(json!({"name": "Green"})))
        .await
        .unwrap()
        .expect_status(201);
    client
        .delete(&format!("/v1/teams/{}", TEAM_ID), RequestOptions::new())
        .await
        .unwrap()
        .expect_status(204);

    assert_eq!(session.call_log().len(), 3);
}

#[baseline_compare_test("baselines/search.md", against_stub)]
async fn search_matches_its_baseline(session: &TestSession) -> Result<(), Error> {
    let response = session
        .client()
        .get("/v1/search?q=harbour", RequestOptions::new())
        .await?;
    response.expect_schema(&search::SEARCH_RESULTS);

    Ok(())
}

#[baseline_compare_test("baselines/health_changed.md", against_stub)]
#[should_panic(expected = "contract baseline error")]
async fn drift_from_the_baseline_fails_the_test(session: &TestSession) {
    session
        .client()
        .get("/health", RequestOptions::new())
        .await
        .unwrap()
        .expect_status(200);
}

#[tokio::test]
async fn masked_secrets_never_reach_the_baseline() {
    init_logging();
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("teams.md");

    let configure = |mode| {
        let mut configuration = ContractConfiguration::new(mode, &path);
        against_stub(&mut configuration);
        configuration.add_request_mutations(|m| m.mask_headers(["authorization"], "<token>"));
        configuration.add_response_mutations(|m| m.mask_json_fields(["/created_at"], "<date>"));
        configuration
    };

    for (mode, token) in [(BaselineMode::Record, "first"), (BaselineMode::Compare, "second")] {
        let session = TestSession::start(configure(mode));
        session
            .client()
            .post(
                "/v1/teams",
                RequestOptions::new().bearer(token).json(json!({"name": "Green"})),
            )
            .await
            .unwrap();
        session.finish().await.unwrap();
    }

    let stored = std::fs::read_to_string(&path).unwrap();
    assert!(stored.contains("authorization: <token>"));
    assert!(stored.contains("\"created_at\": \"<date>\""));
    assert!(!stored.contains("first"));
}
