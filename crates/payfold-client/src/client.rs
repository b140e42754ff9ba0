//! Provider API client implementation.

use std::time::Duration;

use reqwest::Client;

use payfold_core::{Config, Event};

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, ApiList, Customer, CustomerParams};

/// Typed client for the provider API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
    api_key: String,
    api_version: Option<String>,
}

impl StripeClient {
    /// Create a client from a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] for an empty API key, or
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::Configuration("API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    pub async fn create_customer(&self, params: CustomerParams) -> Result<Customer, ClientError> {
        let mut form: Vec<(String, String)> = Vec::new();

        if let Some(email) = params.email {
            form.push(("email".into(), email));
        }
        if let Some(name) = params.name {
            form.push(("name".into(), name));
        }
        if let Some(description) = params.description {
            form.push(("description".into(), description));
        }
        for (key, value) in params.metadata {
            form.push((format!("metadata[{key}]"), value));
        }

        let response = self
            .request(reqwest::Method::POST, "/customers")
            .form(&form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a customer by ID, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    pub async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/customers/{customer_id}"))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.handle_response(response).await.map(Some)
    }

    /// Retrieve a single event by ID.
    ///
    /// Handlers can use this to confirm a delivery against the API before
    /// acting on it (at-least-once delivery means the same event may arrive
    /// more than once).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    pub async fn get_event(&self, event_id: &str) -> Result<Event, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/events/{event_id}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List recent events.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    pub async fn list_events(&self, limit: Option<u32>) -> Result<ApiList<Event>, ClientError> {
        let limit = limit.unwrap_or(10).min(100);

        let response = self
            .request(reqwest::Method::GET, "/events")
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Build a request with auth and the pinned API version.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.api_base))
            .basic_auth(&self.api_key, Option::<&str>::None);

        if let Some(version) = &self.api_version {
            builder = builder.header("Stripe-Version", version);
        }

        builder
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse the provider's error envelope.
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                tracing::debug!(
                    error_type = %api_error.error.error_type,
                    status = %status,
                    "Provider API error"
                );
                Err(ClientError::Api {
                    error_type: api_error.error.error_type,
                    message: api_error.error.message,
                    code: api_error.error.code,
                    status: status.as_u16(),
                })
            }
            Err(_) => Err(ClientError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
                status: status.as_u16(),
            }),
        }
    }
}
