use crate::{
    error::Error,
    request::{RequestData, RequestOptions},
    response::HttpResponse,
    util,
};
use async_trait::async_trait;
use hyper::{body, client::HttpConnector, header, Body, Method, Request};
use hyper_tls::HttpsConnector;
use std::{collections::BTreeMap, fmt::Debug, sync::Arc, time::Duration};

/// The request-issuing capability everything else is built on.
///
/// Implementors only provide [`HttpClient::send`]; the verb methods are
/// expressed in terms of it, so a decorator that wraps `send` sees every
/// call made through any verb.
#[async_trait]
pub trait HttpClient: Debug + Send + Sync {
    async fn send(&self, request: RequestData) -> Result<HttpResponse, Error>;

    async fn get(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::GET, url)).await
    }

    async fn post(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::POST, url)).await
    }

    async fn put(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::PUT, url)).await
    }

    async fn patch(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::PATCH, url)).await
    }

    async fn delete(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::DELETE, url)).await
    }

    async fn head(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::HEAD, url)).await
    }

    /// Generic call, GET unless the options override the method.
    async fn fetch(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.send(options.into_request(Method::GET, url)).await
    }
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn send(&self, request: RequestData) -> Result<HttpResponse, Error> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Box<T> {
    async fn send(&self, request: RequestData) -> Result<HttpResponse, Error> {
        (**self).send(request).await
    }
}

/// Settings a real client is built with. Relative request URLs are joined
/// onto `base_url`; per-request headers override `default_headers`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfiguration {
    base_url: Option<String>,
    default_headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl ClientConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base_url<S: Into<String>>(&mut self, base_url: S) {
        self.base_url = Some(base_url.into());
    }

    pub fn base_url(&self) -> Option<&String> {
        self.base_url.as_ref()
    }

    pub fn add_default_header<K: AsRef<str>, V: Into<String>>(&mut self, name: K, value: V) {
        self.default_headers
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.into();
        }

        match &self.base_url {
            Some(base_url) => format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            ),
            None => url.into(),
        }
    }
}

#[derive(Debug)]
pub struct HyperHttpClient {
    client: hyper::Client<HttpsConnector<HttpConnector>>,
    configuration: ClientConfiguration,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self::with_configuration(ClientConfiguration::new())
    }

    pub fn with_configuration(configuration: ClientConfiguration) -> Self {
        Self {
            client: hyper::Client::builder().build(HttpsConnector::new()),
            configuration,
        }
    }

    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    fn build_request(&self, url: &str, request_data: &RequestData) -> Result<Request<Body>, Error> {
        let uri: hyper::Uri = url
            .parse()
            .map_err(|_| Error::InvalidUrl(url.into()))?;
        let mut request_builder = Request::builder().uri(uri).method(request_data.method.clone());

        let headers_mut = request_builder
            .headers_mut()
            .ok_or_else(|| Error::InvalidUrl(url.into()))?;
        util::put_headers(
            headers_mut,
            self.configuration
                .default_headers
                .iter()
                .chain(request_data.headers.iter()),
        )?;

        let body = match &request_data.body {
            Some(request_body) => {
                if !headers_mut.contains_key(header::CONTENT_TYPE) {
                    headers_mut.insert(
                        header::CONTENT_TYPE,
                        header::HeaderValue::from_str(&request_body.content_type())?,
                    );
                }
                Body::from(request_body.encode())
            }
            None => Body::empty(),
        };

        Ok(request_builder.body(body)?)
    }

    async fn execute(&self, url: String, request: Request<Body>) -> Result<HttpResponse, Error> {
        let response = self.client.request(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = body::to_bytes(response.into_body()).await?;

        Ok(HttpResponse::new(url, status, headers, body))
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request_data: RequestData) -> Result<HttpResponse, Error> {
        let url = self.configuration.resolve_url(&request_data.url);
        let request = self.build_request(&url, &request_data)?;

        match self.configuration.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.execute(url.clone(), request))
                .await
                .map_err(|_| Error::Timeout { url, timeout })?,
            None => self.execute(url, request).await,
        }
    }
}
