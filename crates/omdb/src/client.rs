use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::OmdbError;
use crate::models::ResponseStatus;

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    /// Create an OmdbClient on top of a shared reqwest Client.
    /// The caller is responsible for configuring its timeout; there is no retry.
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into().trim().to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Issue a GET with the common parameters and decode the body as `T`.
    ///
    /// A `"Response": "False"` envelope is turned into the matching
    /// [`OmdbError`] before `T` is decoded.
    pub(crate) async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> crate::Result<T> {
        if !self.has_api_key() {
            return Err(OmdbError::MissingApiKey);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("r", "json")])
            .query(params)
            .send()
            .await?;

        let body = self.handle_response(response).await?;
        decode::<ResponseStatus>(&body)?.into_result()?;
        decode(&body)
    }

    async fn handle_response(&self, response: reqwest::Response) -> crate::Result<String> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(OmdbError::InvalidKey);
        }
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!("OMDb responded with {}: {}", status, body);
            return Err(OmdbError::Status {
                status_code: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> crate::Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| OmdbError::Json {
        path: e.path().to_string(),
        source: e.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let client = OmdbClient::with_client(Client::new(), "   ")
            .with_base_url("http://127.0.0.1:9/");
        assert!(!client.has_api_key());

        let result = client.get::<serde_json::Value>(&[("t", "Dark")]).await;
        assert!(matches!(result, Err(OmdbError::MissingApiKey)));
    }

    #[test]
    fn test_decode_reports_path() {
        let err = decode::<crate::Title>(r#"{"Title": 42, "imdbID": "tt1"}"#).unwrap_err();
        match err {
            OmdbError::Json { path, .. } => assert_eq!(path, "Title"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
