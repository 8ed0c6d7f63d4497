use crate::{
    baseline::{self, BaselineEntry},
    configuration::{BaselineMode, ContractConfiguration},
    error::Error,
    http_client::HttpClient,
    sink::CallLog,
    tracked_client::TrackedHttpClient,
};
use log::info;
use std::sync::Arc;

pub type SessionClient = TrackedHttpClient<Arc<dyn HttpClient>, Arc<CallLog>>;

/// Everything one contract test needs: a tracked client and the log its
/// calls land in. Each test owns its own session.
#[derive(Debug)]
pub struct TestSession {
    configuration: ContractConfiguration,
    call_log: Arc<CallLog>,
    client: SessionClient,
}

impl TestSession {
    pub fn start(configuration: ContractConfiguration) -> Self {
        let call_log = Arc::new(CallLog::new());
        let client = TrackedHttpClient::new(configuration.http_client(), call_log.clone());

        Self {
            configuration,
            call_log,
            client,
        }
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    pub fn call_log(&self) -> &CallLog {
        &self.call_log
    }

    pub fn configuration(&self) -> &ContractConfiguration {
        &self.configuration
    }

    /// The calls made so far, normalized the way they will be stored.
    pub fn entries(&self) -> Result<Vec<BaselineEntry>, Error> {
        let mut entries = self
            .call_log
            .records()?
            .iter()
            .map(BaselineEntry::from_record)
            .collect::<Vec<_>>();

        for entry in &mut entries {
            for mutation in self.configuration.request_mutations() {
                mutation.mutate(entry);
            }
            for mutation in self.configuration.response_mutations() {
                mutation.mutate(entry);
            }
        }

        Ok(entries)
    }

    /// Records the calls of this session or checks them against the stored
    /// baseline, depending on the configured mode.
    pub async fn finish(self) -> Result<(), Error> {
        let entries = self.entries()?;
        let store = self.configuration.baseline();

        match self.configuration.mode() {
            BaselineMode::Record => {
                store.save(&entries)?;
                info!("Recorded {} call(s) to {:?}", entries.len(), store);
                Ok(())
            }
            BaselineMode::Compare => {
                let differences = baseline::compare(&store.load()?, &entries);
                if differences.is_empty() {
                    info!("{} call(s) match {:?}", entries.len(), store);
                    Ok(())
                } else {
                    info!(
                        "{} difference(s) against {:?}",
                        differences.len(),
                        store
                    );
                    Err(Error::BaselineChanged(differences))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        request::{RequestData, RequestOptions},
        response::HttpResponse,
    };
    use async_trait::async_trait;
    use hyper::{header, HeaderMap, StatusCode};

    #[derive(Debug)]
    struct EchoClient;

    #[async_trait]
    impl HttpClient for EchoClient {
        async fn send(&self, request: RequestData) -> Result<HttpResponse, Error> {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
            headers.insert(header::DATE, "Sat, 17 Oct 2026 10:00:00 GMT".parse()?);
            let body = format!("{{\"path\":\"{}\"}}", request.url);

            Ok(HttpResponse::new(
                format!("http://stub.local{}", request.url),
                StatusCode::OK,
                headers,
                body,
            ))
        }
    }

    fn configuration(mode: BaselineMode, path: &std::path::Path) -> ContractConfiguration {
        let mut configuration = ContractConfiguration::new(mode, path);
        configuration.set_http_client(Arc::new(EchoClient));
        configuration.add_response_mutations(|m| m.remove_headers(["date"]));
        configuration
    }

    #[tokio::test]
    async fn record_then_compare_passes() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("echo.md");

        let session = TestSession::start(configuration(BaselineMode::Record, &path));
        session.client().get("/a", RequestOptions::new()).await.unwrap();
        session.finish().await.unwrap();

        let stored = std::fs::read_to_string(&path).unwrap();
        assert!(stored.contains("## Interaction 0: GET /a"));
        assert!(!stored.contains("date:"));

        let session = TestSession::start(configuration(BaselineMode::Compare, &path));
        session.client().get("/a", RequestOptions::new()).await.unwrap();
        session.finish().await.unwrap();
    }

    #[tokio::test]
    async fn compare_reports_changed_calls() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("echo.md");

        let session = TestSession::start(configuration(BaselineMode::Record, &path));
        session.client().get("/a", RequestOptions::new()).await.unwrap();
        session.finish().await.unwrap();

        let session = TestSession::start(configuration(BaselineMode::Compare, &path));
        session.client().get("/b", RequestOptions::new()).await.unwrap();
        session.client().get("/c", RequestOptions::new()).await.unwrap();

        match session.finish().await {
            Err(Error::BaselineChanged(differences)) => {
                let messages = differences.iter().map(|d| d.to_string()).collect::<Vec<_>>();
                assert_eq!(messages[0], "Number of interactions differs. old - 1, new - 2");
                assert_eq!(messages[1], "Interaction 0: request differs. old - GET /a, new - GET /b");
            }
            other => panic!("expected a baseline change, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn compare_without_a_baseline_fails() {
        let directory = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(
            BaselineMode::Compare,
            &directory.path().join("missing.md"),
        ));

        assert!(matches!(
            session.finish().await,
            Err(Error::BaselineError(
                crate::baseline::error::BaselineError::MissingBaseline(_)
            ))
        ));
    }

    #[tokio::test]
    async fn sessions_do_not_share_call_logs() {
        let directory = tempfile::tempdir().unwrap();
        let first = TestSession::start(configuration(
            BaselineMode::Record,
            &directory.path().join("first.md"),
        ));
        let second = TestSession::start(configuration(
            BaselineMode::Record,
            &directory.path().join("second.md"),
        ));

        first.client().get("/only-first", RequestOptions::new()).await.unwrap();

        assert_eq!(first.call_log().len(), 1);
        assert!(second.call_log().is_empty());
        assert_eq!(first.entries().unwrap()[0].url, "/only-first");
    }
}
