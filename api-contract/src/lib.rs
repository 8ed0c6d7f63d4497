//! Contract testing for HTTP APIs: declarative response shapes, a client
//! decorator that records every call, and regression baselines built from
//! those records.

mod configuration;
mod error;
mod http_client;
mod record;
mod request;
mod response;
mod sink;
mod test_session;
mod tracked_client;
mod util;

pub mod baseline;
pub mod mutations;
pub mod schema;

pub use api_contract_codegen::{baseline_compare_test, baseline_record_test};
pub use configuration::{BaselineMode, ContractConfiguration};
pub use error::Error;
pub use http_client::{ClientConfiguration, HttpClient, HyperHttpClient};
pub use record::{ApiCallRecord, Attachment, CapturedBody, RECORD_CONTENT_TYPE};
pub use request::{MultipartForm, MultipartPart, RequestBody, RequestData, RequestOptions};
pub use response::HttpResponse;
pub use schema::{assert_valid, validate, validate_text, Shape, ValidationResult};
pub use sink::{CallLog, DirectorySink, RecordSink, SinkError};
pub use test_session::{SessionClient, TestSession};
pub use tracked_client::TrackedHttpClient;

#[doc(hidden)]
pub mod __private {
    pub use futures::FutureExt;
}
