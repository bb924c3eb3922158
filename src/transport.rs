use std::time::Duration;

use crate::{DocQaError, Result};

/// Sends `request` and waits at most `timeout` for the response head.
///
/// The returned response is untouched: status codes are not interpreted here.
/// Deadline expiry yields [`DocQaError::Timeout`]; any other failure yields
/// [`DocQaError::Network`] carrying the `reqwest` error.
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_with_timeout(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<reqwest::Response> {
    // The deadline timer lives inside the `Timeout` future and is dropped with
    // it on every exit path.
    match tokio::time::timeout(timeout, request.send()).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(err)) => Err(classify_send_error(err, timeout)),
        Err(_elapsed) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "request timed out");
            Err(DocQaError::Timeout { timeout })
        }
    }
}

/// Sends `request` and waits at most `timeout` for the response head.
///
/// On WASM, reqwest aborts the underlying `fetch` through an
/// `AbortController` when the request timeout fires.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_with_timeout(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<reqwest::Response> {
    request
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| classify_send_error(err, timeout))
}

fn classify_send_error(err: reqwest::Error, timeout: Duration) -> DocQaError {
    if err.is_timeout() {
        DocQaError::Timeout { timeout }
    } else {
        DocQaError::Network(err)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::time::Duration;

    use super::fetch_with_timeout;
    use crate::DocQaError;

    async fn unused_local_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("must bind throwaway listener");
        let address = listener.local_addr().expect("must have local addr");
        drop(listener);
        format!("http://{address}/health")
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let url = unused_local_url().await;
        let request = reqwest::Client::new().get(url);

        let err = fetch_with_timeout(request, Duration::from_secs(5))
            .await
            .expect_err("nothing listens on the port");

        assert!(matches!(err, DocQaError::Network(_)), "got {err:?}");
    }
}
