use crate::{
    stub_server::TEAM_ID,
    support::{init_logging, STUB},
};
use api_contract::{
    CallLog, CapturedBody, ClientConfiguration, DirectorySink, Error, HttpClient,
    HyperHttpClient, MultipartForm, RequestOptions, TrackedHttpClient,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

fn real_client() -> HyperHttpClient {
    let mut configuration = ClientConfiguration::new();
    configuration.set_base_url(STUB.base_url());
    configuration.set_timeout(Duration::from_secs(5));

    HyperHttpClient::with_configuration(configuration)
}

fn tracked() -> (TrackedHttpClient<HyperHttpClient, Arc<CallLog>>, Arc<CallLog>) {
    init_logging();
    let log = Arc::new(CallLog::new());

    (TrackedHttpClient::new(real_client(), log.clone()), log)
}

#[tokio::test]
async fn json_get_produces_one_record_and_a_readable_body() {
    let (client, log) = tracked();

    let response = client.get("/v1/teams", RequestOptions::new()).await.unwrap();

    let teams: Value = response.json().unwrap();
    assert_eq!(teams[0]["name"], "Blue");

    let records = log.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, "GET");
    assert_eq!(records[0].url, STUB.url("/v1/teams"));
    assert_eq!(records[0].response_status, 200);
    assert_eq!(records[0].response_body, CapturedBody::Json(teams));
    assert!(records[0].response_headers.contains_key("content-length"));
}

#[tokio::test]
async fn tracking_does_not_change_what_the_caller_reads() {
    let (client, _log) = tracked();
    let direct = real_client();

    let tracked = client.get("/v1/search?q=harbour", RequestOptions::new()).await.unwrap();
    let untracked = direct.get("/v1/search?q=harbour", RequestOptions::new()).await.unwrap();

    assert_eq!(tracked.text().unwrap(), untracked.text().unwrap());
    assert_eq!(
        tracked.json::<Value>().unwrap(),
        untracked.json::<Value>().unwrap()
    );
    assert_eq!(tracked.status(), untracked.status());
}

#[tokio::test]
async fn rejected_imports_are_recorded_once() {
    let (client, log) = tracked();

    let response = client
        .post("/v1/imports", RequestOptions::new().text(""))
        .await
        .unwrap();

    response.expect_status_in(&[400, 401, 422]);
    assert_eq!(log.len(), 1);
    assert_eq!(log.records().unwrap()[0].response_status, 422);
}

#[tokio::test]
async fn posted_json_and_auth_headers_are_recorded() {
    let (client, log) = tracked();

    let response = client
        .post(
            "/v1/teams",
            RequestOptions::new()
                .bearer("staging-token")
                .json(json!({"name": "Green"})),
        )
        .await
        .unwrap();

    response.expect_status(201);
    assert_eq!(response.json::<Value>().unwrap()["name"], "Green");

    let record = log.records().unwrap().remove(0);
    assert_eq!(record.request_headers["authorization"], "Bearer staging-token");
    assert_eq!(record.request_body, Some(CapturedBody::Json(json!({"name": "Green"}))));
}

#[tokio::test]
async fn deletes_record_an_empty_body() {
    let (client, log) = tracked();

    let response = client
        .delete(&format!("/v1/teams/{}", TEAM_ID), RequestOptions::new())
        .await
        .unwrap();

    response.expect_status(204);
    assert_eq!(response.text().unwrap(), "");
    assert_eq!(log.records().unwrap()[0].response_body, CapturedBody::Empty);
}

#[tokio::test]
async fn binary_and_malformed_bodies_are_captured_safely() {
    let (client, log) = tracked();

    let pdf = client
        .get("/v1/exports/report.pdf", RequestOptions::new())
        .await
        .unwrap();
    let broken = client.get("/v1/broken", RequestOptions::new()).await.unwrap();

    assert_eq!(pdf.body(), b"%PDF-1.7 stub");
    assert_eq!(broken.text().unwrap(), "{\"results\": [");

    let records = log.records().unwrap();
    assert_eq!(
        records[0].response_body,
        CapturedBody::Binary {
            content_type: "application/pdf".into(),
            size: 13
        }
    );
    assert_eq!(records[1].response_body, CapturedBody::Text("{\"results\": [".into()));
}

#[tokio::test]
async fn timeouts_surface_as_errors_without_a_record() {
    init_logging();
    let mut configuration = ClientConfiguration::new();
    configuration.set_base_url(STUB.base_url());
    configuration.set_timeout(Duration::from_millis(50));
    let log = Arc::new(CallLog::new());
    let client = TrackedHttpClient::new(HyperHttpClient::with_configuration(configuration), log.clone());

    let result = client.get("/v1/slow", RequestOptions::new()).await;

    assert!(matches!(result, Err(Error::Timeout { .. })));
    assert!(log.is_empty());
}

#[tokio::test]
async fn default_headers_and_payloads_reach_the_server() {
    init_logging();
    let mut configuration = ClientConfiguration::new();
    configuration.set_base_url(STUB.base_url());
    configuration.add_default_header("X-Api-Key", "key-1");
    configuration.add_default_header("Accept", "*/*");
    let client = HyperHttpClient::with_configuration(configuration);

    let form = client
        .post(
            "/v1/echo",
            RequestOptions::new()
                .header("Accept", "application/json")
                .form([("name", "Blue Team"), ("size", "3")]),
        )
        .await
        .unwrap()
        .json::<Value>()
        .unwrap();

    assert_eq!(form["headers"]["x-api-key"], "key-1");
    assert_eq!(form["headers"]["accept"], "application/json");
    assert_eq!(form["headers"]["content-type"], "application/x-www-form-urlencoded");
    assert_eq!(form["body"], "name=Blue+Team&size=3");

    let upload = MultipartForm::new()
        .text("kind", "owners")
        .file("file", "owners.csv", "text/csv", "name\nJane\n");
    let boundary = upload.boundary().to_string();
    let multipart = client
        .put("/v1/echo", RequestOptions::new().multipart(upload))
        .await
        .unwrap()
        .json::<Value>()
        .unwrap();

    assert_eq!(multipart["method"], "PUT");
    assert_eq!(
        multipart["headers"]["content-type"],
        format!("multipart/form-data; boundary={}", boundary)
    );
    assert!(multipart["body"]
        .as_str()
        .unwrap()
        .contains("filename=\"owners.csv\""));
}

#[tokio::test]
async fn directory_sink_keeps_a_report_of_real_calls() {
    init_logging();
    let directory = tempfile::tempdir().unwrap();
    let client = TrackedHttpClient::new(real_client(), DirectorySink::new(directory.path()));

    client.get("/health", RequestOptions::new()).await.unwrap();
    client.get("/v1/teams", RequestOptions::new()).await.unwrap();

    let mut files = std::fs::read_dir(directory.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    files.sort();

    assert_eq!(files.len(), 2);
    assert!(files[0].starts_with("000-api-call-000_GET_http___127_0_0_1_"));
    assert!(files[1].ends_with("_v1_teams.json"));

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(directory.path().join(&files[1])).unwrap())
            .unwrap();
    assert_eq!(report["response_status"], 200);
    assert_eq!(report["response_body"]["kind"], "json");
}
