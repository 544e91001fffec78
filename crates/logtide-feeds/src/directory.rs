//! HTTP client for the application inventory service.
//!
//! `GET <directory_url>/apps/<app>/sources` returns the selectable sources
//! as a JSON array of `{ "sourceId", "name", "state" }`. The core only calls
//! this on initial open and on an explicit refresh.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{header, Method, Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use logtide_core::{DirectoryError, SourceDirectory, SourceInfo};
use url::Url;

#[derive(Clone)]
pub struct HttpSourceDirectory {
    base_url: Url,
    token: Option<String>,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpSourceDirectory {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(base_url).map_err(|e| DirectoryError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            token,
            client: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    /// Endpoint listing the sources of `app_id`.
    pub fn sources_url(&self, app_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["apps", app_id, "sources"]);
        }
        url
    }

    fn request(&self, app_id: &str) -> Result<Request<Empty<Bytes>>, DirectoryError> {
        let uri: Uri = self
            .sources_url(app_id)
            .as_str()
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| DirectoryError::InvalidUrl(e.to_string()))?;
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
            .body(Empty::new())
            .map_err(|e| DirectoryError::Request(e.to_string()))
    }
}

impl std::fmt::Debug for HttpSourceDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSourceDirectory")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl SourceDirectory for HttpSourceDirectory {
    async fn list_sources(&self, app_id: &str) -> Result<Vec<SourceInfo>, DirectoryError> {
        let request = self.request(app_id)?;
        tracing::debug!(uri = %request.uri(), "directory: listing sources");

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?
            .to_bytes();

        let sources: Vec<SourceInfo> =
            serde_json::from_slice(&body).map_err(|e| DirectoryError::Decode(e.to_string()))?;
        tracing::debug!(app = app_id, count = sources.len(), "directory: sources listed");
        Ok(sources)
    }
}
