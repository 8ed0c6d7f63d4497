use crate::{
    error::Error,
    http_client::HttpClient,
    record::{attachment_name, CapturedBody, RequestSnapshot},
    request::RequestData,
    response::HttpResponse,
    sink::RecordSink,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

/// Wraps a client and reports every completed call to a [`RecordSink`].
///
/// The response handed back is the one produced by the wrapped client.
/// Transport errors pass through untouched. Anything that goes wrong while
/// building or delivering the record is logged and dropped.
#[derive(Debug)]
pub struct TrackedHttpClient<C, S> {
    inner: C,
    sink: S,
    sequence: AtomicUsize,
}

impl<C: HttpClient, S: RecordSink> TrackedHttpClient<C, S> {
    pub fn new(inner: C, sink: S) -> Self {
        Self {
            inner,
            sink,
            sequence: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    async fn capture(
        &self,
        snapshot: RequestSnapshot,
        response: &HttpResponse,
        elapsed: Duration,
        timestamp: DateTime<Utc>,
    ) {
        let (response_body, parse_error) =
            CapturedBody::from_bytes(response.content_type(), response.body());
        if let Some(e) = parse_error {
            warn!(
                "{} {} declared a JSON body that doesn't parse ({}), capturing it as text",
                snapshot.method, snapshot.url, e
            );
        }

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let record = snapshot.complete(response, response_body, duration_ms, timestamp);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let name = attachment_name(sequence, &record.method, &record.url);

        debug!(
            "{} -> {} in {}ms",
            name, record.response_status, record.duration_ms
        );

        let attachment = match record.to_attachment() {
            Ok(attachment) => attachment,
            Err(e) => {
                warn!("Couldn't serialize the record for {}: {}", name, e);
                return;
            }
        };

        if let Err(e) = self.sink.attach(&name, attachment).await {
            warn!("Couldn't attach the record for {}: {}", name, e);
        }
    }
}

#[async_trait]
impl<C: HttpClient, S: RecordSink> HttpClient for TrackedHttpClient<C, S> {
    async fn send(&self, request: RequestData) -> Result<HttpResponse, Error> {
        let snapshot = RequestSnapshot::of(&request);
        let timestamp = Utc::now();
        let started = Instant::now();

        let response = self.inner.send(request).await?;
        let elapsed = started.elapsed();

        self.capture(snapshot, &response, elapsed, timestamp).await;

        Ok(response)
    }
}
