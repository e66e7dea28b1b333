use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::{
    error::{Result, SpotifyError},
    spotify::{WebApi, send_with_retry},
    types::{PaginationOptions, PlaylistPage},
};

/// Web API client for `GET /me/playlists`.
///
/// The access token lives in a credential slot that is written only by the
/// session guard.
#[derive(Debug)]
pub struct HttpWebApi {
    client: Client,
    api_url: String,
    access_token: RwLock<Option<String>>,
}

impl HttpWebApi {
    /// Creates a client for the Web API at `api_url` with an empty credential
    /// slot.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: RwLock::new(None),
        })
    }

    /// The credential currently used for requests.
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }
}

#[async_trait]
impl WebApi for HttpWebApi {
    async fn set_access_token(&self, access_token: &str) {
        *self.access_token.write().await = Some(access_token.to_string());
    }

    async fn reset_access_token(&self) {
        *self.access_token.write().await = None;
    }

    async fn get_user_playlists(&self, pagination: PaginationOptions) -> Result<PlaylistPage> {
        let token = self.access_token().await.ok_or(SpotifyError::NoSession)?;

        let mut query: Vec<(&str, u32)> = Vec::new();
        if let Some(limit) = pagination.limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = pagination.offset {
            query.push(("offset", offset));
        }

        let url = format!("{uri}/me/playlists", uri = self.api_url);
        let response = send_with_retry(|| {
            self.client
                .get(&url)
                .query(&query)
                .bearer_auth(&token)
        })
        .await?;

        Ok(response.json::<PlaylistPage>().await?)
    }
}
