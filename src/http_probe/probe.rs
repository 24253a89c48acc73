use std::time::Instant;

use reqwest::{Client, Response};

use super::prelude::*;
use super::report;
use crate::config::EndpointDescriptor;

/// Probe one endpoint once.
///
/// Latency covers sending the request and reading the full response body, bounded by the
/// client timeout. Transport errors (DNS, connect, TLS, timeout) are absorbed here and
/// turned into a DOWN result; this function never fails.
pub async fn probe_endpoint(client: &Client, endpoint: &EndpointDescriptor) -> ProbeResult {
    let mut request = client
        .request(endpoint.method.clone(), endpoint.url.clone())
        .headers(endpoint.headers.clone());
    if let Some(body) = &endpoint.body {
        request = request.body(body.clone());
    }

    let start = Instant::now();
    let response = request.send().await;
    let (http_status, error) = match response {
        Ok(resp) => {
            let code = resp.status().as_u16();
            match drain(resp).await {
                Ok(()) => (Some(code), None),
                Err(e) => (Some(code), Some(report(&e))),
            }
        }
        Err(e) => (None, Some(report(&e))),
    };
    let latency = start.elapsed();

    let status = if error.is_some() {
        Status::Down
    } else {
        Status::classify(http_status, latency)
    };

    ProbeResult {
        url: endpoint.raw_url.clone(),
        domain: endpoint.domain().to_string(),
        http_status,
        latency,
        status,
        error,
    }
}

/// Read the body chunk by chunk so the latency includes the transfer without buffering it.
async fn drain(mut resp: Response) -> reqwest::Result<()> {
    while resp.chunk().await?.is_some() {}
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::endpoint_config::EndpointConfig;
    use crate::config::setup_client;

    fn endpoint(url: String) -> EndpointDescriptor {
        EndpointDescriptor::from_config(
            1,
            EndpointConfig {
                name: None,
                url,
                method: "GET".to_string(),
                headers: HashMap::new(),
                body: None,
            },
        )
        .expect("valid endpoint")
    }

    #[tokio::test]
    async fn test_probe_fast_2xx_is_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = setup_client().expect("client");
        let result = probe_endpoint(&client, &endpoint(format!("{}/health", server.uri()))).await;

        assert_eq!(result.status, Status::Up);
        assert_eq!(result.http_status, Some(200));
        assert_eq!(result.domain, "127.0.0.1");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_large_body_is_read_and_url_kept_as_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 4 * 1024 * 1024]))
            .expect(1)
            .mount(&server)
            .await;

        // No trailing slash: the display URL must not be normalized.
        let url = server.uri();
        let client = setup_client().expect("client");
        let result = probe_endpoint(&client, &endpoint(url.clone())).await;

        assert_eq!(result.http_status, Some(200));
        assert!(result.error.is_none());
        assert_eq!(result.url, url);
    }

    #[tokio::test]
    async fn test_probe_non_2xx_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = setup_client().expect("client");
        let result = probe_endpoint(&client, &endpoint(format!("{}/", server.uri()))).await;

        assert_eq!(result.status, Status::Down);
        assert_eq!(result.http_status, Some(503));
    }

    #[tokio::test]
    async fn test_probe_slow_2xx_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
            .mount(&server)
            .await;

        let client = setup_client().expect("client");
        let result = probe_endpoint(&client, &endpoint(format!("{}/", server.uri()))).await;

        assert_eq!(result.status, Status::Down);
        assert_eq!(result.http_status, Some(200));
        assert!(result.latency_ms() >= 500.0);
    }

    #[tokio::test]
    async fn test_probe_connection_refused_is_down() {
        // Bind then drop a listener to get a port nothing listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };

        let client = setup_client().expect("client");
        let result = probe_endpoint(&client, &endpoint(format!("http://127.0.0.1:{port}/"))).await;

        assert_eq!(result.status, Status::Down);
        assert_eq!(result.http_status, None);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_probe_sends_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header("x-probe", "yes"))
            .and(body_string(r#"{"foo":"bar"}"#))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let config = EndpointConfig {
            name: Some("submit".to_string()),
            url: format!("{}/submit", server.uri()),
            method: "POST".to_string(),
            headers: HashMap::from([("x-probe".to_string(), "yes".to_string())]),
            body: Some(r#"{"foo":"bar"}"#.to_string()),
        };
        let endpoint = EndpointDescriptor::from_config(1, config).expect("valid endpoint");

        let client = setup_client().expect("client");
        let result = probe_endpoint(&client, &endpoint).await;

        assert_eq!(result.status, Status::Up);
        assert_eq!(result.http_status, Some(201));
    }
}
