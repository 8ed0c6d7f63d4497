use hyper::{body::Bytes, Method};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----api-contract-{}", uuid::Uuid::new_v4().simple()),
            parts: Vec::new(),
        }
    }

    pub fn text<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            filename: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    pub fn file<N: Into<String>, F: Into<String>, C: Into<String>, D: Into<Bytes>>(
        mut self,
        name: N,
        filename: F,
        content_type: C,
        data: D,
    ) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    pub fn encode(&self) -> Bytes {
        let mut body = Vec::new();

        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match &part.filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                ),
            }
            if let Some(content_type) = &part.content_type {
                body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        body.into()
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(MultipartForm),
    Text(String),
    Bytes(Bytes),
}

impl RequestBody {
    pub fn content_type(&self) -> String {
        match self {
            RequestBody::Json(_) => "application/json".into(),
            RequestBody::Form(_) => "application/x-www-form-urlencoded".into(),
            RequestBody::Multipart(form) => {
                format!("multipart/form-data; boundary={}", form.boundary())
            }
            RequestBody::Text(_) => "text/plain; charset=utf-8".into(),
            RequestBody::Bytes(_) => "application/octet-stream".into(),
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            RequestBody::Json(value) => Bytes::from(value.to_string()),
            RequestBody::Form(pairs) => Bytes::from(encode_form(pairs)),
            RequestBody::Multipart(form) => form.encode(),
            RequestBody::Text(text) => Bytes::from(text.clone()),
            RequestBody::Bytes(bytes) => bytes.clone(),
        }
    }
}

pub(crate) fn encode_form(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// A fully described request as handed to [`crate::HttpClient::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestData {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
}

impl RequestData {
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

/// Per-call options accepted by the verb methods of [`crate::HttpClient`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    method: Option<Method>,
    headers: BTreeMap<String, String>,
    body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header names are stored lowercase, a later value replaces an earlier one.
    pub fn header<K: AsRef<str>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers
            .insert(name.as_ref().to_lowercase(), value.into());
        self
    }

    pub fn headers<K: AsRef<str>, V: Into<String>, I: IntoIterator<Item = (K, V)>>(
        self,
        headers: I,
    ) -> Self {
        headers
            .into_iter()
            .fold(self, |options, (name, value)| options.header(name, value))
    }

    pub fn bearer<T: AsRef<str>>(self, token: T) -> Self {
        self.header("authorization", format!("Bearer {}", token.as_ref()))
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    pub fn form<K: Into<String>, V: Into<String>, I: IntoIterator<Item = (K, V)>>(
        mut self,
        pairs: I,
    ) -> Self {
        self.body = Some(RequestBody::Form(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ));
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.body = Some(RequestBody::Text(text.into()));
        self
    }

    pub fn bytes<B: Into<Bytes>>(mut self, bytes: B) -> Self {
        self.body = Some(RequestBody::Bytes(bytes.into()));
        self
    }

    /// The method override set on the options wins over `default_method`.
    pub fn into_request<S: Into<String>>(self, default_method: Method, url: S) -> RequestData {
        RequestData {
            method: self.method.unwrap_or(default_method),
            url: url.into(),
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_build_request_with_lowercase_headers() {
        let request = RequestOptions::new()
            .header("X-Request-Id", "abc")
            .bearer("t0k3n")
            .json(json!({"query": "shoes"}))
            .into_request(Method::POST, "/v1/search");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "/v1/search");
        assert_eq!(request.headers["x-request-id"], "abc");
        assert_eq!(request.headers["authorization"], "Bearer t0k3n");
        assert_eq!(
            request.body,
            Some(RequestBody::Json(json!({"query": "shoes"})))
        );
    }

    #[test]
    fn method_override_wins() {
        let request = RequestOptions::new()
            .method(Method::PATCH)
            .into_request(Method::GET, "/teams/1");

        assert_eq!(request.method, Method::PATCH);
    }

    #[test]
    fn form_bodies_are_url_encoded() {
        let body = RequestBody::Form(vec![
            ("grant_type".into(), "password".into()),
            ("username".into(), "jane doe&co".into()),
        ]);

        assert_eq!(body.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(
            body.encode(),
            Bytes::from("grant_type=password&username=jane+doe%26co")
        );
    }

    #[test]
    fn multipart_bodies_carry_boundary_and_parts() {
        let form = MultipartForm::new()
            .text("kind", "contacts")
            .file("file", "contacts.csv", "text/csv", "name\njane\n");
        let boundary = form.boundary().to_owned();
        let body = RequestBody::Multipart(form);

        assert_eq!(
            body.content_type(),
            format!("multipart/form-data; boundary={}", boundary)
        );

        let encoded = String::from_utf8(body.encode().to_vec()).unwrap();
        assert!(encoded.starts_with(&format!("--{}\r\n", boundary)));
        assert!(encoded.contains("Content-Disposition: form-data; name=\"kind\"\r\n\r\ncontacts\r\n"));
        assert!(encoded.contains("filename=\"contacts.csv\"\r\nContent-Type: text/csv\r\n\r\nname\njane\n\r\n"));
        assert!(encoded.ends_with(&format!("--{}--\r\n", boundary)));
    }
}
