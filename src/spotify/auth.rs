use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Result, SpotifyError},
    management::TokenManager,
    spotify::{AuthApi, send_with_retry},
    types::{Session, SessionConfig, Token},
};

#[derive(Debug, Deserialize)]
struct TokenServiceResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenServiceResponse {
    /// The refresh endpoint may omit the refresh token or scope; the previous
    /// values stay valid in that case.
    fn into_token(self, previous: Option<&Token>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous.map(|t| t.refresh_token.clone()))
                .unwrap_or_default(),
            scope: self
                .scope
                .or_else(|| previous.map(|t| t.scope.clone()))
                .unwrap_or_default(),
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Auth backend built on the local token cache and a token swap service.
///
/// `authorize` renews the cached session through the service's `/refresh`
/// endpoint. There is no interactive login here; a first token is seeded with
/// [`TokenAuth::import_code`].
#[derive(Debug)]
pub struct TokenAuth {
    client: Client,
    store: TokenManager,
}

impl TokenAuth {
    pub fn new(store: TokenManager) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, store })
    }

    /// Exchanges an authorization code at the swap endpoint and caches the
    /// resulting token. An empty code means the user backed out of the
    /// authorization page.
    pub async fn import_code(&self, config: &SessionConfig, code: &str) -> Result<Session> {
        if code.trim().is_empty() {
            return Err(SpotifyError::AuthCancelled);
        }

        let response = send_with_retry(|| {
            self.client
                .post(&config.token_swap_url)
                .form(&[("code", code)])
        })
        .await?;

        let token = response
            .json::<TokenServiceResponse>()
            .await?
            .into_token(None);
        self.store.persist(&token).await?;
        Ok(token.to_session())
    }

    async fn refresh(&self, config: &SessionConfig, previous: &Token) -> Result<Token> {
        let response = send_with_retry(|| {
            self.client
                .post(&config.token_refresh_url)
                .form(&[("refresh_token", previous.refresh_token.as_str())])
        })
        .await?;

        Ok(response
            .json::<TokenServiceResponse>()
            .await?
            .into_token(Some(previous)))
    }
}

#[async_trait]
impl AuthApi for TokenAuth {
    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.store.load().await?.map(|t| t.to_session()))
    }

    async fn authorize(&self, config: &SessionConfig) -> Result<Option<Session>> {
        let Some(previous) = self.store.load().await? else {
            return Ok(None);
        };
        if previous.refresh_token.is_empty() {
            return Ok(None);
        }

        let token = self.refresh(config, &previous).await?;
        self.store.persist(&token).await?;
        Ok(Some(token.to_session()))
    }

    async fn end_session(&self) -> Result<()> {
        self.store.clear().await
    }
}
