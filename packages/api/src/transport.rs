//! HTTP transport seam.
//!
//! [`ApiClient`](crate::ApiClient) builds an [`HttpRequest`] and hands it to a
//! [`Transport`]. Production uses [`ReqwestTransport`]; tests script responses
//! without a network. Requests own their body (multipart parts included), so
//! the client can re-send the same request after a token refresh.

use async_trait::async_trait;
use serde_json::Value;

use crate::endpoint::Method;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// A multipart form that can be rebuilt any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, FilePart)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a text field only when a value is present.
    pub fn text_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn file(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.files.push((name.into(), part));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn to_reqwest(&self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for (name, file) in &self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)
                .map_err(|e| ApiError::Network(e.to_string()))?;
            form = form.part(name.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever came back. Transport failures map
/// to [`ApiError::Network`]; any received status, 4xx and 5xx included, is an
/// `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// The per-request deadline is enforced by [`ApiClient`](crate::ApiClient),
    /// so the HTTP client itself has none.
    pub fn new() -> Result<Self, ApiError> {
        use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

        // Request-level headers win, so multipart bodies keep their boundary.
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_reqwest()?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for client and query tests.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;

    /// Answers from a queue of canned responses (falling back to a handler),
    /// records every request, and can delay each reply.
    #[derive(Clone)]
    pub struct ScriptedTransport {
        inner: Arc<Inner>,
    }

    struct Inner {
        queue: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        fallback: Mutex<Option<Handler>>,
        requests: Mutex<Vec<HttpRequest>>,
        delay: Mutex<Duration>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self {
                inner: Arc::new(Inner {
                    queue: Mutex::new(VecDeque::new()),
                    fallback: Mutex::new(None),
                    requests: Mutex::new(Vec::new()),
                    delay: Mutex::new(Duration::ZERO),
                }),
            }
        }

        pub fn push(&self, status: u16, body: impl Into<String>) -> &Self {
            self.inner.queue.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                body: body.into(),
            }));
            self
        }

        pub fn push_json(&self, status: u16, body: Value) -> &Self {
            self.push(status, body.to_string())
        }

        pub fn push_err(&self, error: ApiError) -> &Self {
            self.inner.queue.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn fallback(
            &self,
            handler: impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
        ) -> &Self {
            *self.inner.fallback.lock().unwrap() = Some(Box::new(handler));
            self
        }

        pub fn delay(&self, delay: Duration) -> &Self {
            *self.inner.delay.lock().unwrap() = delay;
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.inner.requests.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.inner.requests.lock().unwrap().len()
        }

        pub fn count_path(&self, suffix: &str) -> usize {
            self.requests()
                .iter()
                .filter(|r| r.url.ends_with(suffix))
                .count()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.inner.requests.lock().unwrap().push(request.clone());
            let delay = *self.inner.delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(next) = self.inner.queue.lock().unwrap().pop_front() {
                return next;
            }
            match self.inner.fallback.lock().unwrap().as_ref() {
                Some(handler) => handler(&request),
                None => Err(ApiError::Network("no scripted response".into())),
            }
        }
    }

    pub fn ok(data: Value) -> Value {
        serde_json::json!({ "success": true, "message": "", "data": data, "errors": null })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_fields() {
        let form = MultipartForm::new()
            .text("Email", "a@b.co")
            .text_opt("Avatar", None::<String>)
            .file("File", FilePart::new("paper.pdf", "application/pdf", vec![1, 2]));
        assert_eq!(form.field("Email"), Some("a@b.co"));
        assert_eq!(form.field("Avatar"), None);
        assert_eq!(form.files.len(), 1);
        assert!(form.to_reqwest().is_ok());
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse { status: 204, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 401, body: String::new() }.is_success());
    }
}
