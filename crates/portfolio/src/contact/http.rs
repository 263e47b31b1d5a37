use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use super::form::FormInput;
use super::relay::{RelayError, RelayTransport};
use crate::config::RelayConfig;

/// HTTPS transport posting the form as JSON to `{endpoint}/{form_id}`.
pub struct HttpRelay {
    client: Client,
    url: String,
}

impl HttpRelay {
    pub fn new(config: &RelayConfig) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        // ohne Accept-Header antwortet der Provider mit einer HTML-Weiterleitung
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: config.url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RelayTransport for HttpRelay {
    fn deliver(&self, payload: FormInput) -> BoxFuture<'static, Result<(), RelayError>> {
        let client = self.client.clone();
        let url = self.url.clone();
        async move {
            let response = client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(classify)?;

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            let body = response.text().await.map_err(classify)?;
            Err(RelayError::provider(status.as_u16(), &body))
        }
        .boxed()
    }
}

fn classify(err: reqwest::Error) -> RelayError {
    if err.is_timeout() {
        RelayError::timeout(err.to_string())
    } else {
        RelayError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::contact::relay::TransportKind;

    fn config_for(endpoint: String, timeout_ms: u64) -> RelayConfig {
        RelayConfig {
            endpoint,
            form_id: "testform".into(),
            timeout_ms,
        }
    }

    /// Accept one connection, capture the raw request and answer with `response`
    /// (or never answer when `response` is None).
    async fn serve_once(response: Option<String>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/f", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            match response {
                Some(resp) => {
                    socket.write_all(resp.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                }
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }
            request
        });
        (endpoint, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn url_joins_endpoint_and_form_id() {
        let relay = HttpRelay::new(&config_for("https://formspree.io/f/".into(), 1000)).unwrap();
        assert_eq!(relay.url(), "https://formspree.io/f/testform");
    }

    #[tokio::test]
    async fn success_status_resolves_ok_and_posts_json() {
        let (endpoint, server) = serve_once(Some(http_response("200 OK", r#"{"ok":true}"#))).await;
        let relay = HttpRelay::new(&config_for(endpoint, 2000)).unwrap();

        let result = relay
            .deliver(FormInput::new("Ada", "ada@x.io", "Hi", "Hello"))
            .await;
        assert_eq!(result, Ok(()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /f/testform "));
        assert!(request.to_ascii_lowercase().contains("accept: application/json"));
        assert!(request.contains(r#""email":"ada@x.io""#));
    }

    #[tokio::test]
    async fn rejection_surfaces_provider_payload() {
        let body = r#"{"errors":[{"code":"TYPE_EMAIL","message":"should be an email"}]}"#;
        let (endpoint, _server) =
            serve_once(Some(http_response("422 Unprocessable Entity", body))).await;
        let relay = HttpRelay::new(&config_for(endpoint, 2000)).unwrap();

        let err = relay.deliver(FormInput::default()).await.unwrap_err();
        match err {
            RelayError::Provider { status, payload } => {
                assert_eq!(status, 422);
                assert_eq!(payload["errors"][0]["code"], "TYPE_EMAIL");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let relay = HttpRelay::new(&config_for(format!("http://{addr}/f"), 2000)).unwrap();

        let err = relay.deliver(FormInput::default()).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Transport {
                kind: TransportKind::Network,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let (endpoint, _server) = serve_once(None).await;
        let relay = HttpRelay::new(&config_for(endpoint, 150)).unwrap();

        let err = relay.deliver(FormInput::default()).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Transport {
                kind: TransportKind::Timeout,
                ..
            }
        ));
    }
}
