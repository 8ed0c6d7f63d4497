use hyper::{
    body,
    header::{self, HeaderValue},
    http,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use log::error;
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    io,
    net::SocketAddr,
    sync::mpsc,
    thread,
    time::Duration,
};
use tokio::runtime::Runtime;

pub const TEAM_ID: &str = "2d5e8a10-7c3b-4f6e-9a1d-5b8c2e4f6a70";
pub const HIT_ID: &str = "0b6f3c1e-0000-4000-8000-000000000001";

/// A canned imitation of the platform API, served from its own thread and
/// runtime on an ephemeral local port.
#[derive(Debug)]
pub struct StubServer {
    address: SocketAddr,
}

impl StubServer {
    pub fn start() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = sender.send(Err(e));
                    return;
                }
            };

            runtime.block_on(async move {
                let builder = match Server::try_bind(&SocketAddr::from(([127, 0, 0, 1], 0))) {
                    Ok(builder) => builder,
                    Err(e) => {
                        let _ = sender.send(Err(io::Error::new(io::ErrorKind::Other, e)));
                        return;
                    }
                };

                let server = builder.serve(make_service_fn(|_| async {
                    Ok::<_, Infallible>(service_fn(handle_request))
                }));
                let _ = sender.send(Ok(server.local_addr()));

                if let Err(e) = server.await {
                    error!("Stub server error: {}", e);
                }
            });
        });

        let address = receiver
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        Ok(Self { address })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

async fn handle_request(request: Request<Body>) -> Result<Response<Body>, http::Error> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();

    match (method, path.as_str()) {
        (Method::GET, "/health") => text(StatusCode::OK, "ok"),
        (Method::GET, "/v1/teams") => json_response(
            StatusCode::OK,
            json!([{
                "id": TEAM_ID,
                "name": "Blue",
                "created_at": "2026-03-01T09:30:00Z",
                "member_count": 4
            }]),
        ),
        (Method::POST, "/v1/teams") => {
            let body = body::to_bytes(request.into_body()).await.unwrap_or_default();
            let name = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|value| value.get("name").cloned())
                .unwrap_or(Value::Null);

            json_response(
                StatusCode::CREATED,
                json!({
                    "id": TEAM_ID,
                    "name": name,
                    "created_at": "2026-10-18T08:00:00Z",
                    "member_count": 0
                }),
            )
        }
        (Method::DELETE, path) if path.starts_with("/v1/teams/") => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Body::empty()),
        (Method::GET, "/v1/search") => json_response(
            StatusCode::OK,
            json!({
                "query": query.trim_start_matches("q="),
                "total": 1,
                "page": 1,
                "results": [{
                    "id": HIT_ID,
                    "type": "property",
                    "title": "Harbour View",
                    "score": 0.82
                }]
            }),
        ),
        (Method::POST, "/v1/imports") => json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"error": "invalid_file", "message": "the upload has no rows"}),
        ),
        (Method::GET, "/v1/exports/report.pdf") => Response::builder()
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"))
            .body(Body::from(&b"%PDF-1.7 stub"[..])),
        (Method::GET, "/v1/broken") => Response::builder()
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(Body::from("{\"results\": [")),
        (Method::GET, "/v1/slow") => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            text(StatusCode::OK, "finally")
        }
        (_, "/v1/echo") => {
            let method = request.method().to_string();
            let headers = request
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
                    )
                })
                .collect::<serde_json::Map<_, _>>();
            let body = body::to_bytes(request.into_body()).await.unwrap_or_default();

            json_response(
                StatusCode::OK,
                json!({
                    "method": method,
                    "headers": headers,
                    "body": String::from_utf8_lossy(&body),
                }),
            )
        }
        _ => json_response(StatusCode::NOT_FOUND, json!({"error": "not_found"})),
    }
}

fn text(status: StatusCode, body: &'static str) -> Result<Response<Body>, http::Error> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .body(Body::from(body))
}

fn json_response(status: StatusCode, body: Value) -> Result<Response<Body>, http::Error> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(Body::from(body.to_string()))
}
