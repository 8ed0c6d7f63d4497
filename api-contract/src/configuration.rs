use crate::{
    baseline::{BaselineStore, MarkdownBaseline},
    http_client::{ClientConfiguration, HttpClient, HyperHttpClient},
    mutations::{MutationsBuilder, RequestMutation, ResponseMutation},
};
use std::{path::Path, sync::Arc, time::Duration};

/// What a finished test session does with the calls it saw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BaselineMode {
    /// Overwrite the baseline with the calls of this run.
    Record,
    /// Fail if the calls of this run differ from the stored baseline.
    Compare,
}

#[derive(Debug)]
pub struct ContractConfiguration {
    mode: BaselineMode,
    baseline: Arc<dyn BaselineStore>,
    client_configuration: ClientConfiguration,
    http_client: Option<Arc<dyn HttpClient>>,
    request_mutations: Vec<RequestMutation>,
    response_mutations: Vec<ResponseMutation>,
}

impl ContractConfiguration {
    /// A configuration backed by a markdown baseline at `baseline_path`.
    pub fn new<P: AsRef<Path>>(mode: BaselineMode, baseline_path: P) -> Self {
        Self::with_store(mode, Arc::new(MarkdownBaseline::new(baseline_path)))
    }

    pub fn with_store(mode: BaselineMode, baseline: Arc<dyn BaselineStore>) -> Self {
        Self {
            mode,
            baseline,
            client_configuration: ClientConfiguration::new(),
            http_client: None,
            request_mutations: Vec::new(),
            response_mutations: Vec::new(),
        }
    }

    pub fn mode(&self) -> BaselineMode {
        self.mode
    }

    pub fn baseline(&self) -> Arc<dyn BaselineStore> {
        self.baseline.clone()
    }

    pub fn set_base_url<S: Into<String>>(&mut self, base_url: S) {
        self.client_configuration.set_base_url(base_url);
    }

    pub fn add_default_header<K: AsRef<str>, V: Into<String>>(&mut self, name: K, value: V) {
        self.client_configuration.add_default_header(name, value);
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.client_configuration.set_timeout(timeout);
    }

    pub fn client_configuration(&self) -> &ClientConfiguration {
        &self.client_configuration
    }

    /// Replaces the real client. Client settings on this configuration are
    /// ignored once a client is injected.
    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient>) {
        self.http_client = Some(http_client);
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        self.http_client.clone().unwrap_or_else(|| {
            Arc::new(HyperHttpClient::with_configuration(
                self.client_configuration.clone(),
            ))
        })
    }

    pub fn add_request_mutations<F: FnOnce(&mut MutationsBuilder) -> &mut MutationsBuilder>(
        &mut self,
        func: F,
    ) {
        let mut mutations = MutationsBuilder::new();
        let _ = func(&mut mutations);
        self.request_mutations
            .extend(mutations.into_request_mutations());
    }

    pub fn add_response_mutations<F: FnOnce(&mut MutationsBuilder) -> &mut MutationsBuilder>(
        &mut self,
        func: F,
    ) {
        let mut mutations = MutationsBuilder::new();
        let _ = func(&mut mutations);
        self.response_mutations
            .extend(mutations.into_response_mutations());
    }

    pub fn request_mutations(&self) -> &[RequestMutation] {
        &self.request_mutations
    }

    pub fn response_mutations(&self) -> &[ResponseMutation] {
        &self.response_mutations
    }
}
