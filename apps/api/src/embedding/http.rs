//! Embedder backed by an OpenAI-compatible `/embeddings` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Embedder, EmbeddingError};
use crate::retry::{is_retryable, with_backoff, Attempt};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
        dimension: usize,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            model,
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &'static str {
        "http"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Retries on 429 and 5xx with exponential backoff (1s, 2s).
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let body = &body;

        let vector = with_backoff("Embedding call", move || self.attempt(body)).await?;
        debug!(dimension = vector.len(), "Embedding call succeeded");
        Ok(vector)
    }
}

impl HttpEmbedder {
    async fn attempt(&self, body: &EmbeddingRequest<'_>) -> Attempt<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return Attempt::Retry(EmbeddingError::Http(e)),
        };

        let status = response.status();
        if is_retryable(status) {
            let body = response.text().await.unwrap_or_default();
            warn!("Embedding API returned {}: {}", status, body);
            return Attempt::Retry(EmbeddingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Attempt::Fatal(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => return Attempt::Fatal(EmbeddingError::Http(e)),
        };
        let Some(vector) = parsed.data.into_iter().next().map(|d| d.embedding) else {
            return Attempt::Fatal(EmbeddingError::EmptyResponse);
        };

        if vector.len() != self.dimension {
            return Attempt::Fatal(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        Attempt::Done(vector)
    }
}
