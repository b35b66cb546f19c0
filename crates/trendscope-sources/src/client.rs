//! Shared HTTP client for all source adapters.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::retry::retry_with_backoff;

/// Thin wrapper around `reqwest::Client` carrying the adapter-wide
/// timeout, user agent, and retry policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpClient {
    /// Build a client with the given request timeout and user agent.
    ///
    /// `max_retries`/`backoff_base_secs` control the retry policy for
    /// transient failures (timeouts, connection errors, HTTP 429).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying client cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// GET `url` and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] on 404, [`SourceError::RateLimited`]
    /// on 429, [`SourceError::UnexpectedStatus`] on any other non-success
    /// status, and [`SourceError::Http`] on network failure. Transient
    /// errors are retried per the client's retry policy.
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let response = self.checked_get(url, None).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// GET `url` and deserialize the JSON response body.
    ///
    /// `context` names the call site in deserialization errors.
    ///
    /// # Errors
    ///
    /// As [`Self::get_text`], plus [`SourceError::Deserialize`] when the
    /// body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, SourceError> {
        self.get_json_inner(url, None, context).await
    }

    /// GET `url` with a bearer token and deserialize the JSON response body.
    ///
    /// # Errors
    ///
    /// As [`Self::get_json`].
    pub async fn get_json_with_bearer<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        context: &str,
    ) -> Result<T, SourceError> {
        self.get_json_inner(url, Some(token), context).await
    }

    async fn get_json_inner<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
        context: &str,
    ) -> Result<T, SourceError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let response = self.checked_get(url, bearer).await?;
            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|e| SourceError::Deserialize {
                context: context.to_string(),
                source: e,
            })
        })
        .await
    }

    async fn checked_get(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, SourceError> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                url: url.to_string(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
