//! HTTP submitter with bounded retry

use super::ledger::FailureLedger;
use super::response::ApiResponse;
use super::retry::RetryPolicy;
use crate::config::{ApiConfig, SecretString};
use crate::core::classify::HttpMethod;
use crate::core::payload::OutboundPayload;
use crate::domain::{ApiError, PersonId, Result, SyncError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Sends payloads to the healthcare API
///
/// Each call to [`Submitter::submit`] makes up to `max_attempts` attempts.
/// Non-success statuses and transport failures are retried after an
/// exponential backoff; once the attempts are exhausted the payload is
/// written to the failure ledger and `None` is returned. Every successful
/// call is followed by a short fixed pause to throttle the downstream API.
///
/// # Example
///
/// ```no_run
/// use benesync::config::{secret_string, ApiConfig};
/// use benesync::core::classify::HttpMethod;
/// use benesync::core::submit::{FailureLedger, Submitter};
/// use benesync::domain::PersonId;
///
/// # async fn example() -> benesync::domain::Result<()> {
/// let config: ApiConfig = toml::from_str(r#"
///     base_url = "https://api.example.com"
///     token = "secret-token"
/// "#).unwrap();
/// let submitter = Submitter::new(&config, FailureLedger::new("logs/falhas.csv"))?;
///
/// let payload = serde_json::Map::new();
/// let response = submitter
///     .submit(
///         "https://api.example.com/Contatos/PessoaFisica/Post",
///         &payload,
///         HttpMethod::Post,
///         &PersonId::new("123"),
///     )
///     .await;
/// # Ok(())
/// # }
/// ```
pub struct Submitter {
    /// HTTP client with the configured timeout
    client: Client,

    /// Token sent verbatim in the `Authorization` header
    token: SecretString,

    policy: RetryPolicy,

    ledger: FailureLedger,
}

impl Submitter {
    /// Creates a submitter from the `[api]` section
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, ledger: FailureLedger) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: config.token.clone(),
            policy: RetryPolicy::from_config(&config.retry),
            ledger,
        })
    }

    /// Submits a payload, retrying on failure
    ///
    /// Returns the response of the first successful attempt, or `None` when
    /// every attempt failed. A `None` result always leaves one ledger line,
    /// keyed by `person_id` when the payload carries no `Cpf`.
    pub async fn submit(
        &self,
        url: &str,
        payload: &OutboundPayload,
        method: HttpMethod,
        person_id: &PersonId,
    ) -> Option<ApiResponse> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<ApiError> = None;

        for attempt in 1..=max_attempts {
            match self.send_once(url, payload, method, attempt).await {
                Ok(response) => {
                    tokio::time::sleep(self.policy.pause_after_success()).await;
                    return Some(response);
                }
                Err(e) => {
                    tracing::error!(
                        url = %url,
                        method = %method,
                        attempt,
                        max_attempts,
                        error = %e,
                        "API request failed"
                    );

                    if attempt < max_attempts {
                        let delay = self.policy.backoff_delay(attempt);
                        crate::log_retry_attempt!(attempt, max_attempts, delay, e.to_string());
                        tokio::time::sleep(delay).await;
                    }

                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "request failed".to_string());

        tracing::error!(
            url = %url,
            max_attempts,
            error = %message,
            "Giving up after exhausting retries"
        );

        if let Err(e) = self.ledger.append(payload, person_id, &message) {
            tracing::error!(
                ledger = %self.ledger.path().display(),
                error = %e,
                "Failed to write failure ledger"
            );
        }

        None
    }

    async fn send_once(
        &self,
        url: &str,
        payload: &OutboundPayload,
        method: HttpMethod,
        attempt: u32,
    ) -> std::result::Result<ApiResponse, ApiError> {
        let pretty = serde_json::to_string_pretty(payload)
            .map_err(|e| ApiError::InvalidResponse(format!("Unserializable payload: {e}")))?;

        tracing::info!(
            url = %url,
            method = %method,
            attempt,
            payload = %pretty,
            "Sending request to API"
        );

        let request = match method {
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
        };

        let response = request
            .header(AUTHORIZATION, self.token.expose_secret().as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            url = %url,
            status = status.as_u16(),
            body = %body,
            "Received API response"
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, RetryConfig};
    use crate::core::submit::ResponseBody;
    use serde_json::json;
    use tempfile::TempDir;

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            token: secret_string("token-123".to_string()),
            timeout_seconds: 5,
            contract_number: "0228-000001".to_string(),
            tls_verify: true,
            retry: RetryConfig {
                time_unit_ms: 0,
                ..RetryConfig::default()
            },
        }
    }

    fn record_id() -> PersonId {
        PersonId::new("123")
    }

    fn payload() -> OutboundPayload {
        match json!({ "Cpf": "00000000123", "Carteiras": [{ "Numero": "0228000100" }] }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_submit_success_first_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/Contatos/PessoaFisica/Post")
            .match_header("authorization", "token-123")
            .match_header("content-type", "application/json")
            .with_status(201)
            .with_body(r#"{"Sucesso": true}"#)
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let ledger = FailureLedger::new(dir.path().join("falhas.csv"));
        let submitter = Submitter::new(&api_config(&server.url()), ledger).unwrap();

        let url = format!("{}/Contatos/PessoaFisica/Post", server.url());
        let response = submitter
            .submit(&url, &payload(), HttpMethod::Post, &record_id())
            .await;

        mock.assert_async().await;
        let response = response.expect("expected a response");
        assert_eq!(response.status, 201);
        assert_eq!(response.body, ResponseBody::Json(json!({ "Sucesso": true })));
        assert!(!dir.path().join("falhas.csv").exists());
    }

    #[tokio::test]
    async fn test_submit_retries_then_records_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/Contatos/InativarBeneficiario/Put")
            .with_status(500)
            .with_body("internal error")
            .expect(3)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let ledger_path = dir.path().join("falhas.csv");
        let submitter =
            Submitter::new(&api_config(&server.url()), FailureLedger::new(&ledger_path)).unwrap();

        let url = format!("{}/Contatos/InativarBeneficiario/Put", server.url());
        let response = submitter
            .submit(&url, &payload(), HttpMethod::Put, &record_id())
            .await;

        mock.assert_async().await;
        assert!(response.is_none());

        let ledger = std::fs::read_to_string(&ledger_path).unwrap();
        assert_eq!(ledger.lines().count(), 1);
        assert!(ledger.starts_with("00000000123,0228000100,"));
        assert!(ledger.contains("HTTP 500: internal error"));
    }

    #[tokio::test]
    async fn test_submit_keeps_text_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/Contatos/PessoaFisica/Post")
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let submitter = Submitter::new(
            &api_config(&server.url()),
            FailureLedger::new(dir.path().join("falhas.csv")),
        )
        .unwrap();

        let url = format!("{}/Contatos/PessoaFisica/Post", server.url());
        let response = submitter
            .submit(&url, &payload(), HttpMethod::Post, &record_id())
            .await
            .unwrap();

        assert_eq!(response.body, ResponseBody::Text("OK".to_string()));
    }

    #[tokio::test]
    async fn test_submit_network_failure_returns_none() {
        let dir = TempDir::new().unwrap();
        let ledger_path = dir.path().join("falhas.csv");
        let mut config = api_config("http://127.0.0.1:1");
        config.retry.max_attempts = 2;
        let submitter = Submitter::new(&config, FailureLedger::new(&ledger_path)).unwrap();

        let response = submitter
            .submit(
                "http://127.0.0.1:1/Contatos/PessoaFisica/Post",
                &payload(),
                HttpMethod::Post,
                &record_id(),
            )
            .await;

        assert!(response.is_none());
        let ledger = std::fs::read_to_string(&ledger_path).unwrap();
        assert_eq!(ledger.lines().count(), 1);
    }
}
