//! One-shot HTTP/1 GETs against a node's engine API.
//!
//! Each call opens a fresh TCP connection (optionally wrapped in TLS),
//! performs a single request, and is bounded end to end by the
//! transport's timeout.

use std::time::Duration;

use bytes::Bytes;
use http::header::{HOST, USER_AGENT};
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

#[derive(Clone)]
pub struct Transport {
    port: u16,
    timeout: Duration,
    tls: Option<TlsConnector>,
    user_agent: String,
}

impl Transport {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            port,
            timeout,
            tls: None,
            user_agent: "swarmgrid/0.1".to_string(),
        }
    }

    pub fn with_tls(mut self, connector: TlsConnector) -> Self {
        self.tls = Some(connector);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn authority(&self, host: &str) -> String {
        if host.contains(':') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        }
    }

    /// Full URL of `path` on `host`, for logs and errors.
    pub fn url(&self, host: &str, path: &str) -> String {
        let scheme = if self.tls.is_some() { "https" } else { "http" };
        format!("{scheme}://{}{path}", self.authority(host))
    }

    /// GET `path` on `host` and return the body of a 2xx response.
    pub async fn get(&self, host: &str, path: &str) -> EngineResult<Bytes> {
        let uri = self.url(host, path);
        match tokio::time::timeout(self.timeout, self.fetch(host, path, &uri)).await {
            Ok(result) => {
                if let Err(e) = &result {
                    debug!(error = %e, %uri, "engine request failed");
                }
                result
            }
            Err(_) => {
                debug!(%uri, "engine request timed out");
                Err(EngineError::Timeout {
                    uri,
                    timeout_ms: self.timeout.as_millis(),
                })
            }
        }
    }

    /// GET `path` on `host` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, host: &str, path: &str) -> EngineResult<T> {
        let body = self.get(host, path).await?;
        serde_json::from_slice(&body).map_err(|e| EngineError::Decode {
            uri: self.url(host, path),
            reason: e.to_string(),
        })
    }

    async fn fetch(&self, host: &str, path: &str, uri: &str) -> EngineResult<Bytes> {
        let stream = TcpStream::connect((host, self.port))
            .await
            .map_err(|e| EngineError::Connect {
                address: self.authority(host),
                reason: e.to_string(),
            })?;

        match &self.tls {
            Some(connector) => {
                let server_name = rustls::pki_types::ServerName::try_from(host)
                    .map_err(|e| EngineError::Tls(format!("invalid server name {host}: {e}")))?
                    .to_owned();
                let stream = connector
                    .connect(server_name, stream)
                    .await
                    .map_err(|e| EngineError::Tls(format!("handshake with {host} failed: {e}")))?;
                self.send(stream, host, path, uri).await
            }
            None => self.send(stream, host, path, uri).await,
        }
    }

    async fn send<S>(&self, stream: S, host: &str, path: &str, uri: &str) -> EngineResult<Bytes>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let request_err = |reason: String| EngineError::Request {
            uri: uri.to_string(),
            reason,
        };

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake::<_, Empty<Bytes>>(io)
            .await
            .map_err(|e| request_err(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("GET")
            .uri(path)
            .header(HOST, self.authority(host))
            .header(USER_AGENT, self.user_agent.as_str())
            .body(Empty::<Bytes>::new())
            .map_err(|e| request_err(e.to_string()))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| request_err(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| request_err(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            return Err(EngineError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(body)
    }
}
