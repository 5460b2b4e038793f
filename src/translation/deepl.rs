//! DeepL v2 REST client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::api::{
    ApiError, Formality, Language, LanguageKind, TranslateRequest, Translation, TranslationApi,
};

pub const FREE_ENDPOINT: &str = "https://api-free.deepl.com";
pub const PRO_ENDPOINT: &str = "https://api.deepl.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Picks the API host for a key: free-plan keys end in `:fx`.
pub fn endpoint_for_key(api_key: &str) -> &'static str {
    if api_key.ends_with(":fx") {
        FREE_ENDPOINT
    } else {
        PRO_ENDPOINT
    }
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    text: &'a [String],
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality: Option<Formality>,
    preserve_formatting: bool,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct DeeplClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DeeplClient {
    /// Creates a client. `endpoint` overrides the host derived from the key.
    pub fn new(api_key: String, endpoint: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        let endpoint = endpoint
            .unwrap_or_else(|| endpoint_for_key(&api_key).to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        log::debug!("sending request to {url}");

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        Err(ApiError::Status {
            status: status.as_u16(),
            message: if message.is_empty() {
                status.canonical_reason().unwrap_or("no details").to_string()
            } else {
                message
            },
        })
    }
}

impl TranslationApi for DeeplClient {
    async fn translate(
        &self,
        request: TranslateRequest<'_>,
    ) -> Result<Vec<Translation>, ApiError> {
        let url = format!("{}/v2/translate", self.endpoint);
        let body = TranslateBody {
            text: request.texts,
            target_lang: request.target,
            source_lang: request.source,
            formality: request.formality,
            preserve_formatting: true,
        };

        let response = self.send(self.client.post(&url).json(&body), &url).await?;
        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("translate response: {e}")))?;

        Ok(parsed.translations)
    }

    async fn languages(&self, kind: LanguageKind) -> Result<Vec<Language>, ApiError> {
        let url = format!("{}/v2/languages?type={kind}", self.endpoint);

        let response = self.send(self.client.get(&url), &url).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("languages response: {e}")))
    }
}
