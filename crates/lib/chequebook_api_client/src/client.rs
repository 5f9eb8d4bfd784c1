//! Cheque book reorder API client.
//!
//! Every endpoint answers with the same envelope; the client unwraps `data` on
//! success and turns failures into [`ClientError::Api`].

use chequebook_core::envelope::Envelope;
use chequebook_core::models::{Account, Flag, LoginResponse, Subscription, User};
use chequebook_core::pagination::PageRequest;
use chequebook_core::store::Upserted;
use chequebook_core::subscriptions::{SubscribeRequest, SubscriptionPage, UpdateSubscriptionRequest};
use chequebook_core::validation::FieldErrors;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::session::{SessionError, SessionStore};

/// Message the session guard uses for an expired token.
const TOKEN_EXPIRED: &str = "Token has expired";

/// API client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("base URL cannot carry a path: {0}")]
    BaseUrl(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    #[error("response carried no data")]
    EmptyResponse,

    #[error("response data did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not logged in")]
    NotLoggedIn,

    /// The server rejected the stored token as expired; the session has been cleared.
    #[error("session expired, please log in again")]
    SessionExpired,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// HTTP client bound to one API base URL and one session store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Log in and persist the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        #[derive(Serialize)]
        struct Body<'a> {
            username: &'a str,
            password: &'a str,
        }

        let req = self
            .http
            .post(self.endpoint(&["api", "v1", "auth", "login"])?)
            .json(&Body { username, password });
        let (_, login): (_, LoginResponse) = self.send(req).await?;
        self.session.save(&login)?;
        Ok(login)
    }

    /// Drop the stored session. The server keeps no session state.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        Ok(())
    }

    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        let req = self.authed(self.http.get(self.endpoint(&["api", "v1", "users"])?))?;
        Ok(self.send(req).await?.1)
    }

    /// Eligibility lookup for one account.
    pub async fn customer(&self, account_number: &str) -> Result<Account, ClientError> {
        let url = self.endpoint(&["api", "v1", "customers", account_number])?;
        let req = self.authed(self.http.get(url))?;
        Ok(self.send(req).await?.1)
    }

    /// Create or overwrite a subscription. `created` is true on a 201.
    pub async fn subscribe(&self, request: &SubscribeRequest) -> Result<Upserted, ClientError> {
        let url = self.endpoint(&["api", "v1", "subscriptions", "subscribe"])?;
        let req = self.authed(self.http.post(url).json(request))?;
        let (status, subscription) = self.send(req).await?;
        Ok(Upserted {
            subscription,
            created: status == StatusCode::CREATED,
        })
    }

    /// Partial update. An expired session is cleared and reported as
    /// [`ClientError::SessionExpired`].
    pub async fn update_subscription(
        &self,
        cust_ac_no: &str,
        request: &UpdateSubscriptionRequest,
    ) -> Result<Subscription, ClientError> {
        let url = self.endpoint(&["api", "v1", "subscriptions", cust_ac_no])?;
        let req = self.authed(self.http.put(url).json(request))?;
        match self.send(req).await {
            Err(ClientError::Api { status, message, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16() && message == TOKEN_EXPIRED =>
            {
                warn!("session token expired; clearing stored session");
                self.session.clear()?;
                Err(ClientError::SessionExpired)
            }
            other => other.map(|(_, s)| s),
        }
    }

    pub async fn unsubscribe(&self, cust_ac_no: &str) -> Result<Subscription, ClientError> {
        let url = self.endpoint(&["api", "v1", "subscriptions", "unsubscribe", cust_ac_no])?;
        let req = self.authed(self.http.put(url))?;
        Ok(self.send(req).await?.1)
    }

    pub async fn subscriptions(&self, page: PageRequest) -> Result<SubscriptionPage, ClientError> {
        let url = self.endpoint(&["api", "v1", "subscriptions"])?;
        let req = self.authed(self.http.get(url).query(&page_query(page)))?;
        Ok(self.send(req).await?.1)
    }

    pub async fn subscriptions_by_status(
        &self,
        status: Flag,
        page: PageRequest,
    ) -> Result<SubscriptionPage, ClientError> {
        let url = self.endpoint(&["api", "v1", "subscriptions", "filter", status.as_str()])?;
        let req = self.authed(self.http.get(url).query(&page_query(page)))?;
        Ok(self.send(req).await?.1)
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.session.token()?.ok_or(ClientError::NotLoggedIn)?;
        Ok(req.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<(StatusCode, T), ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        let envelope: Envelope<Value> = resp.json().await?;
        debug!(status = status.as_u16(), message = %envelope.message, "API response");

        if !envelope.success || !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.message,
                errors: envelope.errors,
            });
        }
        let data = envelope.data.ok_or(ClientError::EmptyResponse)?;
        Ok((status, serde_json::from_value(data)?))
    }
}

fn page_query(page: PageRequest) -> [(&'static str, u32); 2] {
    [("page", page.page()), ("limit", page.limit())]
}
