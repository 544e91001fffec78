//! WebSocket log transport.
//!
//! Connects to `<stream_url>?source=<id>&tail=<n>[&server=<hint>]` with a
//! bearer `Authorization` header. Text and binary frames are forwarded as
//! opaque chunks; a close frame or the end of the stream is a normal close.
//! Nothing is ever sent upstream.
//!
//! The connection runs on its own task so [`Transport::open`] returns
//! immediately. Closing the returned handle aborts that task; anything it was
//! about to deliver is simply never sent.

use futures_util::StreamExt;
use logtide_core::transport::{EventSink, Transport, TransportEvent, TransportHandle};
use logtide_core::{SessionConfig, TransportError};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    stream_url: Url,
    token: Option<String>,
}

impl WebSocketTransport {
    pub fn new(stream_url: &str, token: Option<String>) -> Result<Self, TransportError> {
        let stream_url =
            Url::parse(stream_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        match stream_url.scheme() {
            "ws" | "wss" => Ok(Self { stream_url, token }),
            other => Err(TransportError::InvalidUrl(format!(
                "unsupported scheme {other:?}, expected ws or wss"
            ))),
        }
    }

    /// The URL a session with `config` connects to.
    pub fn session_url(&self, config: &SessionConfig) -> Url {
        let mut url = self.stream_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("source", &config.source_id)
                .append_pair("tail", &config.tail_depth.to_string());
            if let Some(hint) = &config.server_hint {
                query.append_pair("server", hint);
            }
        }
        url
    }

    fn request(&self, config: &SessionConfig) -> Result<Request, TransportError> {
        let mut request = self
            .session_url(config)
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| TransportError::InvalidAuthHeader)?;
            request.headers_mut().insert(header::AUTHORIZATION, value);
        }
        Ok(request)
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, config: &SessionConfig, sink: EventSink) -> TransportHandle {
        tracing::debug!(
            generation = sink.generation(),
            url = %self.session_url(config),
            "websocket: opening"
        );
        let request = self.request(config);
        TransportHandle::from_task(tokio::spawn(pump(request, sink)))
    }
}

/// Connect and forward frames until the stream ends.
async fn pump(request: Result<Request, TransportError>, sink: EventSink) {
    let outcome = match request {
        Ok(request) => forward(request, &sink).await,
        Err(e) => Err(e),
    };
    let event = match outcome {
        Ok(()) => TransportEvent::Closed,
        Err(e) => {
            tracing::warn!(generation = sink.generation(), error = %e, "websocket: failed");
            TransportEvent::Error(e.to_string())
        }
    };
    sink.send(event);
}

async fn forward(request: Request, sink: &EventSink) -> Result<(), TransportError> {
    let (mut socket, _) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|e| TransportError::Connect(e.to_string()))?;

    if !sink.send(TransportEvent::Opened) {
        return Ok(());
    }

    while let Some(frame) = socket.next().await {
        match frame.map_err(|e| TransportError::Stream(e.to_string()))? {
            Message::Close(_) => break,
            msg @ (Message::Text(_) | Message::Binary(_)) => {
                if !sink.send(TransportEvent::Chunk(msg.into_data().to_vec())) {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
    tracing::debug!(generation = sink.generation(), "websocket: stream ended");
    Ok(())
}
