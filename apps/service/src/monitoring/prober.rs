use anyhow::Result;
use std::time::{Duration, Instant};

use super::types::ProbeOutcome;

/// Performs single reachability checks over a shared HTTP client.
///
/// A probe is a bare GET with no custom headers and the client's default
/// redirect handling. Only an exact 200 counts as up; every other status
/// and every transport error becomes a `Down` outcome. Retry policy, if
/// any, belongs to the scheduler.
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }

    /// Probe one URL. Never returns an error; all failure modes are
    /// captured in the outcome.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();

        match self.client.get(url).send().await {
            Ok(response) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let status = response.status().as_u16();
                if status == 200 {
                    ProbeOutcome::Up { status_code: status, latency_ms }
                } else {
                    ProbeOutcome::Down { error: format!("HTTP {}", status) }
                }
            }
            Err(e) => ProbeOutcome::Down { error: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Spawn a one-shot HTTP server answering every request with `status`.
    async fn serve_status(status: u16) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else { break };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;
                    let body = format!(
                        "HTTP/1.1 {} X\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status
                    );
                    let _ = stream.write_all(body.as_bytes()).await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_probe_200_is_up() {
        let url = serve_status(200).await;
        let prober = Prober::new(5).unwrap();

        let outcome = prober.probe(&url).await;
        assert!(outcome.is_up());
    }

    #[tokio::test]
    async fn test_probe_non_200_is_down() {
        // Redirects and server errors alike count as down
        for status in [301, 404, 503] {
            let url = serve_status(status).await;
            let prober = Prober::new(5).unwrap();

            let outcome = prober.probe(&url).await;
            assert_eq!(outcome.error(), Some(format!("HTTP {}", status).as_str()));
        }
    }

    #[tokio::test]
    async fn test_probe_connection_error_is_down() {
        // Bind then drop so the port is very likely unused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let prober = Prober::new(1).unwrap();
        let outcome = prober.probe(&format!("http://{}", addr)).await;
        assert!(!outcome.is_up());
        assert!(outcome.error().is_some());
    }
}
