//! Client layer: performs single send calls against the gateway and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::domain::{
    ApiId, ApiPassword, GatewayResponse, MessageText, MobileNumber, SendOptions, StatusCode,
    ValidationError,
};

/// Default gateway endpoint.
pub const DEFAULT_API_URL: &str = "https://www.sms-console.jp/api/";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

#[derive(Clone, Copy)]
pub(crate) struct BasicAuth<'a> {
    pub(crate) user: &'a str,
    pub(crate) password: &'a str,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: BasicAuth<'a>,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: BasicAuth<'a>,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .basic_auth(auth.user, Some(auth.password))
                .form(&params)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Gateway endpoint and Basic-auth credential pair.
///
/// All three parts are required; `api_url` must be an absolute URL.
pub struct Credentials {
    api_url: Url,
    api_id: ApiId,
    api_password: ApiPassword,
}

impl Credentials {
    /// Configuration key for the endpoint URL.
    pub const API_URL_FIELD: &'static str = "api_url";

    pub fn new(
        api_url: impl AsRef<str>,
        api_id: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw_url = api_url.as_ref().trim();
        if raw_url.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::API_URL_FIELD,
            });
        }
        let api_url = Url::parse(raw_url).map_err(|_| ValidationError::InvalidUrl {
            field: Self::API_URL_FIELD,
            input: raw_url.to_owned(),
        })?;

        Ok(Self {
            api_url,
            api_id: ApiId::new(api_id)?,
            api_password: ApiPassword::new(api_password)?,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn api_id(&self) -> &ApiId {
        &self.api_id
    }

    fn basic_auth(&self) -> BasicAuth<'_> {
        BasicAuth {
            user: self.api_id.as_str(),
            password: self.api_password.expose(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`GatewayClient`].
///
/// Gateway status codes are not errors at this layer: every HTTP reply, including non-2xx,
/// comes back as a [`GatewayResponse`] for the caller to classify.
pub enum GatewayError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`GatewayClient`].
///
/// Use this when you need to customize the endpoint, timeout, or user-agent.
pub struct GatewayClientBuilder {
    credentials: Credentials,
    endpoint: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl GatewayClientBuilder {
    /// Create a builder using the credentials' URL and the default 15 s timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Send to this URL instead of `Credentials::api_url`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`GatewayClient`].
    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| self.credentials.api_url().as_str().to_owned());

        Ok(GatewayClient {
            credentials: self.credentials,
            endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Single-shot SMS gateway client.
///
/// Each [`GatewayClient::attempt_send`] makes exactly one HTTP call. Retrying, with or without
/// a different number form, is the dispatch layer's decision.
pub struct GatewayClient {
    credentials: Credentials,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl GatewayClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`GatewayClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, GatewayError> {
        GatewayClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> GatewayClientBuilder {
        GatewayClientBuilder::new(credentials)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(credentials: Credentials, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint: credentials.api_url().as_str().to_owned(),
            credentials,
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post one message to one number.
    ///
    /// Errors:
    /// - Returns [`GatewayError::Transport`] when no HTTP reply was received. Any reply,
    ///   whatever its status, is returned as `Ok`.
    pub async fn attempt_send(
        &self,
        number: &MobileNumber,
        text: &MessageText,
        options: &SendOptions,
    ) -> Result<GatewayResponse, GatewayError> {
        let params = crate::transport::encode_send_sms_form(number, text, options);

        debug!(
            endpoint = %self.endpoint,
            mobilenumber = %number,
            form = ?number.form(),
            text_chars = text.as_str().chars().count(),
            delivery_report = options.delivery_report.is_some(),
            "posting SMS to gateway"
        );

        let response = self
            .http
            .post_form(&self.endpoint, self.credentials.basic_auth(), params)
            .await
            .map_err(GatewayError::Transport)?;

        Ok(GatewayResponse {
            status: StatusCode::new(response.status),
            body: response.body,
        })
    }
}
