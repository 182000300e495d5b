//! Salary service client.
//!
//! Two calls: the refresh-token exchange, authorized with the static API
//! token, and the per-employee salary lookup, authorized with the access
//! token it returns. Neither is retried.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, SalarySource};

use super::config::SalaryApiConfig;

const PROVIDER_NAME: &str = "salary";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SalaryResponse {
    salary: Option<Value>,
}

/// HTTP client for the salary service.
#[derive(Debug)]
pub struct SalaryClient {
    config: SalaryApiConfig,
    http_client: reqwest::Client,
}

impl SalaryClient {
    pub fn new(config: SalaryApiConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::configuration(e).with_provider(PROVIDER_NAME))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Exchanges the refresh token for an access token.
    ///
    /// Every failure is reported as an authentication error.
    pub async fn refresh_access_token(&self) -> ProviderResult<String> {
        info!("requesting access token");
        self.exchange_refresh_token().await.map_err(|e| {
            ProviderError::authentication(format!(
                "failed to refresh access token: {}",
                e.message()
            ))
            .with_provider(PROVIDER_NAME)
            .with_source(e)
        })
    }

    async fn exchange_refresh_token(&self) -> ProviderResult<String> {
        let response = self
            .refresh_request()
            .send()
            .await
            .map_err(|e| ProviderError::from_request("token refresh", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status, &body));
        }

        parse_access_token(&body)
    }

    /// Fetches the salary of one employee.
    pub async fn fetch_salary(&self, access_token: &str, employee_id: &str) -> ProviderResult<Value> {
        let response = self
            .salary_request(access_token, employee_id)
            .send()
            .await
            .map_err(|e| ProviderError::from_request("salary lookup", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status, &body).with_provider(PROVIDER_NAME));
        }

        let salary = parse_salary(&body)?;
        debug!(employee_id, %salary, "salary lookup succeeded");
        Ok(salary)
    }

    fn refresh_request(&self) -> reqwest::RequestBuilder {
        self.http_client
            .post(&self.config.token_url)
            .bearer_auth(&self.config.auth_token)
            .json(&RefreshRequest {
                refresh_token: &self.config.refresh_token,
            })
    }

    fn salary_request(&self, access_token: &str, employee_id: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(&self.config.salary_url)
            .query(&[("empid", employee_id)])
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }
}

fn parse_access_token(body: &str) -> ProviderResult<String> {
    let parsed: RefreshResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))?;

    parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::invalid_response("token response has no accessToken"))
}

fn parse_salary(body: &str) -> ProviderResult<Value> {
    let parsed: SalaryResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid_response(format!("invalid salary response: {}", e)))?;

    match parsed.salary {
        Some(Value::Null) | None => Err(ProviderError::invalid_response(
            "salary response has no salary field",
        )),
        Some(salary) => Ok(salary),
    }
}

impl SalarySource for SalaryClient {
    fn access_token(&self) -> BoxFuture<'_, ProviderResult<String>> {
        Box::pin(self.refresh_access_token())
    }

    fn salary<'a>(
        &'a self,
        access_token: &'a str,
        employee_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Value>> {
        Box::pin(self.fetch_salary(access_token, employee_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorCode;
    use serde_json::json;

    #[test]
    fn refresh_request_wire_format() {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: "r-123",
        })
        .unwrap();
        assert_eq!(body, json!({"refreshToken": "r-123"}));
    }

    #[test]
    fn parse_token_response() {
        assert_eq!(
            parse_access_token(r#"{"accessToken": "abc", "expiresIn": 600}"#).unwrap(),
            "abc"
        );
    }

    #[test]
    fn token_response_without_token_is_invalid() {
        for body in [r#"{}"#, r#"{"accessToken": ""}"#, "<html>"] {
            let err = parse_access_token(body).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidResponse, "{body}");
        }
    }

    #[test]
    fn salary_is_kept_verbatim() {
        assert_eq!(parse_salary(r#"{"salary": 4200}"#).unwrap(), json!(4200));
        assert_eq!(parse_salary(r#"{"salary": "4,200"}"#).unwrap(), json!("4,200"));
    }

    #[test]
    fn missing_salary_is_invalid() {
        assert!(parse_salary(r#"{"empid": "E1"}"#).is_err());
        assert!(parse_salary(r#"{"salary": null}"#).is_err());
    }

    #[test]
    fn client_rejects_invalid_config() {
        let config = SalaryApiConfig::new("nope", "https://x.example/s", "r", "a");
        let err = SalaryClient::new(config).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
    }

    fn client() -> SalaryClient {
        SalaryClient::new(SalaryApiConfig::new(
            "https://payroll.example.com/welcome/refreshToken/request",
            "https://payroll.example.com/welcome/salaryData",
            "refresh-abc",
            "static-xyz",
        ))
        .unwrap()
    }

    fn header<'a>(request: &'a reqwest::Request, name: reqwest::header::HeaderName) -> &'a str {
        request.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn salary_request_uses_access_token_and_empid() {
        let request = client().salary_request("access-123", "E 7").build().unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/welcome/salaryData");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("empid".to_string(), "E 7".to_string())]);
        assert_eq!(
            header(&request, reqwest::header::AUTHORIZATION),
            "Bearer access-123"
        );
        assert_eq!(
            header(&request, reqwest::header::CONTENT_TYPE),
            "application/json"
        );
    }

    #[test]
    fn refresh_request_uses_static_token() {
        let request = client().refresh_request().build().unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/welcome/refreshToken/request");
        assert_eq!(
            header(&request, reqwest::header::AUTHORIZATION),
            "Bearer static-xyz"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(body).unwrap(),
            json!({"refreshToken": "refresh-abc"})
        );
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_is_authentication_error() {
        // Port 9 (discard) on loopback refuses connections on typical hosts.
        let config = SalaryApiConfig::new(
            "http://127.0.0.1:9/refresh",
            "http://127.0.0.1:9/salary",
            "r",
            "a",
        )
        .with_timeout(std::time::Duration::from_secs(2));
        let client = SalaryClient::new(config).unwrap();

        let err = client.access_token().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert!(err.message().starts_with("failed to refresh access token"));
    }
}
