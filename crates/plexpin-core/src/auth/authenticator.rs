//! PIN authenticator: mints PINs, polls them, and keeps the resulting token.
//!
//! A single PIN moves through these states, one status check at a time:
//!
//! ```text
//!            +---------+
//!            | waiting | <-- every check until the user acts
//!            +---------+
//!             /       \
//!   token present     404
//!           /           \
//! +------------+     +---------+
//! | authorized |     | invalid |
//! +------------+     +---------+
//! ```
//!
//! Polling cadence and expiry are up to the caller.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::api::{build_headers, ClientOptions, PinClient, PinError, Result};
use crate::config::Config;
use crate::models::{Pin, PinId, PinStatus};
use crate::parser;

use super::Session;

/// Contract a host client library uses to obtain a token from a plugged-in authenticator.
pub trait Authenticator {
    /// Record the client context used to identify outgoing requests.
    fn initialize(&mut self, context: ClientOptions);

    /// Current token, or [`PinError::NotAuthenticated`] if none has been obtained.
    fn token(&self) -> Result<String>;

    /// Hand the current token to `callback`. Read-only.
    fn authenticate(&self, _context: &ClientOptions, callback: TokenCallback<'_>) {
        callback(self.token());
    }
}

/// Receives the outcome of [`Authenticator::authenticate`].
pub type TokenCallback<'a> = Box<dyn FnOnce(Result<String>) + 'a>;

pub struct PinAuthenticator {
    client: PinClient,
    context: ClientOptions,
    session: RwLock<Session>,
}

impl PinAuthenticator {
    /// Requests are identified with `config.client` until [`Authenticator::initialize`]
    /// supplies another context.
    pub fn new(config: Config) -> Result<Self> {
        let context = config.client.clone();
        Ok(Self {
            client: PinClient::new(config)?,
            context,
            session: RwLock::new(Session::new()),
        })
    }

    /// Authenticator that already holds a token, e.g. one the host stored earlier.
    pub fn with_token(config: Config, token: impl Into<String>) -> Result<Self> {
        let authenticator = Self::new(config)?;
        *authenticator.session_mut() = Session::with_token(token);
        Ok(authenticator)
    }

    pub fn context(&self) -> &ClientOptions {
        &self.context
    }

    /// Snapshot of the session
    pub fn session(&self) -> Session {
        self.session_ref().clone()
    }

    /// Forget the current token
    pub fn sign_out(&self) {
        self.session_mut().clear();
        info!("Session cleared");
    }

    /// Ask plex.tv for a new PIN. Expects `201 Created`.
    pub async fn request_pin(&self) -> Result<Pin> {
        let headers = self.headers()?;
        let response = self.client.post_pin(headers).await?;

        if response.status != StatusCode::CREATED {
            warn!(status = response.status.as_u16(), "Unexpected status creating PIN");
            return Err(PinError::unexpected_status(response.status, &response.body));
        }

        let pin = parser::parse_pin_creation(&response.body)?;
        info!(pin_id = %pin.id, expires_at = ?pin.expires_at, "PIN created");
        Ok(pin)
    }

    /// Host-facing name for [`request_pin`](Self::request_pin).
    pub async fn get_new_pin(&self) -> Result<Pin> {
        self.request_pin().await
    }

    /// Check a PIN once and classify the answer.
    ///
    /// Takes a bare id or a [`Pin`]. On `Authorized` the token is stored in
    /// the session. A 404 means the PIN expired or never existed.
    pub async fn check_pin_status(&self, pin: impl Into<PinId>) -> Result<PinStatus> {
        let id = pin.into().validated()?;
        self.check_validated_pin(&id).await
    }

    /// Callback form of [`check_pin_status`](Self::check_pin_status).
    ///
    /// A malformed id is refused here, before any request, and `callback` is
    /// not invoked. Everything after that is reported through `callback`.
    pub async fn check_pin_for_auth<F>(&self, pin: impl Into<PinId>, callback: F) -> Result<()>
    where
        F: FnOnce(Result<PinStatus>),
    {
        let id = pin.into().validated()?;
        callback(self.check_validated_pin(&id).await);
        Ok(())
    }

    async fn check_validated_pin(&self, id: &PinId) -> Result<PinStatus> {
        let headers = self.headers()?;
        let response = self.client.get_pin(id, headers).await?;

        let status = match response.status {
            StatusCode::NOT_FOUND => PinStatus::Invalid,
            StatusCode::OK => match parser::parse_auth_token(&response.body)? {
                Some(token) => {
                    self.session_mut().authorize(token, id);
                    info!(pin_id = %id, "PIN authorized");
                    PinStatus::Authorized
                }
                None => PinStatus::Waiting,
            },
            other => {
                warn!(pin_id = %id, status = other.as_u16(), "Unexpected status checking PIN");
                return Err(PinError::unexpected_status(other, &response.body));
            }
        };

        debug!(pin_id = %id, %status, "PIN checked");
        Ok(status)
    }

    fn headers(&self) -> Result<HeaderMap> {
        build_headers(&self.context)
    }

    fn session_ref(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Authenticator for PinAuthenticator {
    fn initialize(&mut self, context: ClientOptions) {
        debug!(identifier = %context.identifier, "Authenticator initialized");
        self.context = context;
    }

    fn token(&self) -> Result<String> {
        self.session_ref()
            .token()
            .map(str::to_string)
            .ok_or(PinError::NotAuthenticated)
    }
}
