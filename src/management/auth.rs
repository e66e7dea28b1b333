use std::path::PathBuf;

use crate::{config, error::Result, types::Token};

/// Persists the token handed out by the token service between runs.
#[derive(Debug, Clone)]
pub struct TokenManager {
    path: PathBuf,
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new(Self::token_path())
    }
}

impl TokenManager {
    pub fn new(path: PathBuf) -> Self {
        TokenManager { path }
    }

    /// Reads the cached token. A missing file means there is no session.
    pub async fn load(&self) -> Result<Option<Token>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token: Token = serde_json::from_str(&content)?;
        Ok(Some(token))
    }

    pub async fn persist(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
