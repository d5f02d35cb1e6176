//! Minimal GraphQL-over-HTTP client used by the jobs

use super::error::{JobError, JobResult};
use crate::config::JobsConfig;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Posts GraphQL documents to one endpoint
///
/// Transport failures and 5xx responses are retried up to `retries` extra
/// times. GraphQL-level errors are returned at once.
#[derive(Debug, Clone)]
pub struct GraphQLClient {
    http: Client,
    endpoint: String,
    retries: u32,
}

impl GraphQLClient {
    pub fn new(endpoint: impl Into<String>, retries: u32) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            retries,
        }
    }

    pub fn from_config(config: &JobsConfig) -> Self {
        Self::new(config.graphql_url.clone(), config.retries)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query or mutation and decode its `data`
    pub async fn execute<T>(&self, query: &str, variables: Value) -> JobResult<T>
    where
        T: DeserializeOwned,
    {
        let mut body = json!({ "query": query });
        if !variables.is_null() {
            body["variables"] = variables;
        }

        let mut attempt = 0;
        let envelope: Envelope<T> = loop {
            match self.post(&body).await {
                Ok(envelope) => break envelope,
                Err(e) if attempt < self.retries && is_transient(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        attempt,
                        "GraphQL request failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e),
            }
        };

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(JobError::GraphQL(messages.join("; ")));
        }

        envelope.data.ok_or(JobError::MissingData)
    }

    async fn post<T>(&self, body: &Value) -> JobResult<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.http.post(&self.endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobError::Status(status.as_u16()));
        }

        Ok(response.json::<Envelope<T>>().await?)
    }
}

fn is_transient(err: &JobError) -> bool {
    match err {
        JobError::Http(e) => !e.is_decode(),
        JobError::Status(code) => *code >= 500,
        _ => false,
    }
}
