use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use tokio::sync::{Mutex, Notify};

use crate::{error::Result, types::PlaylistPage, warning};

#[derive(Debug, Clone)]
struct CachedPage {
    version: u64,
    page: PlaylistPage,
}

#[derive(Debug, Default)]
struct Slot {
    cached: Option<CachedPage>,
    disk_checked: bool,
}

/// Single-slot cache of the current user's playlist listing.
///
/// Each fetch reserves a version before it starts. A result is only stored
/// when its version is newer than the one already in the slot, so a slow
/// fetch can never overwrite a fresher page. At most one background refresh
/// runs at a time.
///
/// A cache built with [`PlaylistCache::persisted`] also writes every stored
/// page to a JSON file and seeds an empty slot from it, so the listing
/// survives between runs of the binary. A page read from disk is older than
/// any fetch made by this process.
#[derive(Debug, Default)]
pub struct PlaylistCache {
    slot: Mutex<Slot>,
    path: Option<PathBuf>,
    next_version: AtomicU64,
    refreshing: AtomicBool,
    refresh_done: Notify,
}

/// Held by the single background refresh in flight. Dropping it lets the
/// next refresh start.
#[derive(Debug)]
pub struct RefreshPermit {
    cache: Arc<PlaylistCache>,
    version: u64,
}

impl PlaylistCache {
    /// Creates an in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache backed by the JSON file at `path`.
    ///
    /// # Example
    ///
    /// ```rust
    /// let cache = PlaylistCache::persisted(config::data_dir().join("cache/playlists.json"));
    /// ```
    pub fn persisted(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    /// Returns the cached page, reading the cache file the first time the
    /// slot is found empty.
    pub async fn get(&self) -> Option<PlaylistPage> {
        let mut slot = self.slot.lock().await;
        if slot.cached.is_none() && !slot.disk_checked {
            slot.disk_checked = true;
            if let Some(page) = self.read_from_disk().await {
                slot.cached = Some(CachedPage { version: 0, page });
            }
        }
        slot.cached.as_ref().map(|c| c.page.clone())
    }

    /// Reserves the version a fetch starting now will be stored under.
    pub fn reserve_version(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Stores `page` unless a newer page is already cached.
    ///
    /// Returns whether the slot was replaced. A failed write to the cache
    /// file is logged; the in-memory slot is updated regardless.
    pub async fn store(&self, version: u64, page: PlaylistPage) -> bool {
        let mut slot = self.slot.lock().await;
        if let Some(current) = &slot.cached {
            if current.version > version {
                return false;
            }
        }

        if let Err(e) = self.write_to_disk(&page).await {
            warning!("Could not persist playlist cache: {}", e);
        }
        slot.cached = Some(CachedPage { version, page });
        slot.disk_checked = true;
        true
    }

    /// Empties the slot and removes the cache file.
    pub async fn clear(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        slot.cached = None;
        slot.disk_checked = true;

        let Some(path) = &self.path else {
            return Ok(());
        };
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Starts a background refresh unless one is already pending.
    pub fn try_begin_refresh(self: &Arc<Self>) -> Option<RefreshPermit> {
        if self.refreshing.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(RefreshPermit {
            cache: Arc::clone(self),
            version: self.reserve_version(),
        })
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Resolves once no background refresh is pending.
    pub async fn refresh_finished(&self) {
        let done = self.refresh_done.notified();
        if !self.is_refreshing() {
            return;
        }
        done.await;
    }

    async fn read_from_disk(&self) -> Option<PlaylistPage> {
        let path = self.path.as_ref()?;
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warning!("Could not read playlist cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(page) => Some(page),
            Err(e) => {
                warning!("Ignoring unreadable playlist cache: {}", e);
                None
            }
        }
    }

    async fn write_to_disk(&self, page: &PlaylistPage) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(page)?;
        async_fs::write(path, json).await?;
        Ok(())
    }
}

impl RefreshPermit {
    /// Stores the refreshed page under the version reserved when the refresh
    /// began.
    pub async fn complete(self, page: PlaylistPage) -> bool {
        self.cache.store(self.version, page).await
    }
}

impl Drop for RefreshPermit {
    fn drop(&mut self) {
        self.cache.refreshing.store(false, Ordering::SeqCst);
        self.cache.refresh_done.notify_waiters();
    }
}
