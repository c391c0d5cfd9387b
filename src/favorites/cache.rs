// src/favorites/cache.rs
// DOCUMENTATION: Optimistic favorites cache
// PURPOSE: Immediate local add/remove with rollback, reconciled by refetching

use crate::errors::{GuideError, GuideResult};
use crate::favorites::{AddOutcome, FavoritesState, RemoveTicket};
use crate::models::{Favorite, FavoriteEntry, FavoriteKey, NewFavorite};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::time::Instant;

/// Favorites endpoints consumed by the cache
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    async fn list_favorites(&self, user_id: i64) -> GuideResult<Vec<Favorite>>;

    async fn create_favorite(&self, favorite: &NewFavorite) -> GuideResult<Favorite>;

    async fn delete_favorite(&self, favorite_id: i64) -> GuideResult<()>;
}

/// Load phase of one user's favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never fetched (or the first fetch failed)
    Unloaded,
    /// First fetch in flight
    Loading,
    /// At least one fetch applied
    Ready,
}

/// Per-user cache slot
struct UserFavorites {
    state: FavoritesState,
    phase: LoadState,
    fetched_at: Option<Instant>,
    /// Fetches issued so far; each fetch carries its sequence number
    issued_fetches: u64,
    /// Sequence number of the newest applied fetch
    applied_fetch: u64,
    in_flight: u32,
}

impl Default for UserFavorites {
    fn default() -> Self {
        Self {
            state: FavoritesState::new(),
            phase: LoadState::Unloaded,
            fetched_at: None,
            issued_fetches: 0,
            applied_fetch: 0,
            in_flight: 0,
        }
    }
}

impl UserFavorites {
    fn is_stale(&self, stale_after: Duration) -> bool {
        match self.fetched_at {
            Some(at) => at.elapsed() >= stale_after,
            None => true,
        }
    }

    fn begin_fetch(&mut self) -> u64 {
        self.issued_fetches += 1;
        self.in_flight += 1;
        if self.phase == LoadState::Unloaded {
            self.phase = LoadState::Loading;
        }
        self.issued_fetches
    }

    /// A fetch finished, failed or was abandoned
    fn end_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.phase == LoadState::Loading && self.in_flight == 0 {
            self.phase = LoadState::Unloaded;
        }
    }
}

type Users = HashMap<i64, UserFavorites>;
type Undo = Box<dyn FnOnce(&mut Users) + Send>;

/// Undoes a slot change when the future that owns it is dropped before settling
struct SettleGuard {
    cache: FavoritesCache,
    undo: Option<Undo>,
}

impl SettleGuard {
    fn new(cache: &FavoritesCache, undo: impl FnOnce(&mut Users) + Send + 'static) -> Self {
        Self {
            cache: cache.clone(),
            undo: Some(Box::new(undo)),
        }
    }

    /// The change settled normally; nothing to undo
    fn disarm(mut self) {
        self.undo = None;
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.cache.undo_detached(undo);
        }
    }
}

struct Inner {
    api: Arc<dyn FavoritesApi>,
    users: RwLock<Users>,
    stale_after: Duration,
    revision: watch::Sender<u64>,
}

/// Optimistic cache of favorites, keyed by user
/// DOCUMENTATION: Cheap to clone; clones share state. Every view change bumps the
/// revision published through `subscribe()`. Dropping an `add`, `remove` or
/// `refresh` future cancels its request and rolls its local change back
#[derive(Clone)]
pub struct FavoritesCache {
    inner: Arc<Inner>,
}

impl FavoritesCache {
    /// Default staleness window
    pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

    pub fn new(api: Arc<dyn FavoritesApi>, stale_after: Duration) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                api,
                users: RwLock::new(HashMap::new()),
                stale_after,
                revision,
            }),
        }
    }

    /// Receiver bumped whenever any user's view changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Current view of a user's favorites
    /// DOCUMENTATION: Spawns a background fetch when the set is absent or stale and
    /// none is already running; returns immediately (empty while loading)
    pub async fn list(&self, user_id: i64) -> Vec<FavoriteEntry> {
        let (view, fetch) = {
            let mut users = self.inner.users.write().await;
            let slot = users.entry(user_id).or_default();
            let fetch = if slot.in_flight == 0 && slot.is_stale(self.inner.stale_after) {
                Some(self.fetch_ticket(slot, user_id))
            } else {
                None
            };
            (slot.state.view(), fetch)
        };

        if let Some((seq, guard)) = fetch {
            log::debug!("Favorites for user {} absent or stale; fetching", user_id);
            let cache = self.clone();
            tokio::spawn(async move {
                // Failure already logged; the next list() retries
                let _ = cache.run_fetch(user_id, seq, guard).await;
            });
        }

        view
    }

    /// Fetch the authoritative list now and return the resulting view
    pub async fn refresh(&self, user_id: i64) -> GuideResult<Vec<FavoriteEntry>> {
        let (seq, guard) = {
            let mut users = self.inner.users.write().await;
            let slot = users.entry(user_id).or_default();
            self.fetch_ticket(slot, user_id)
        };
        self.run_fetch(user_id, seq, guard).await?;
        Ok(self.view(user_id).await)
    }

    /// Current view without triggering a fetch
    pub async fn view(&self, user_id: i64) -> Vec<FavoriteEntry> {
        let users = self.inner.users.read().await;
        users
            .get(&user_id)
            .map(|slot| slot.state.view())
            .unwrap_or_default()
    }

    pub async fn state(&self, user_id: i64) -> LoadState {
        let users = self.inner.users.read().await;
        users
            .get(&user_id)
            .map(|slot| slot.phase)
            .unwrap_or(LoadState::Unloaded)
    }

    /// Mark a user's favorites stale so the next `list` refetches
    pub async fn invalidate(&self, user_id: i64) {
        let mut users = self.inner.users.write().await;
        if let Some(slot) = users.get_mut(&user_id) {
            slot.fetched_at = None;
        }
    }

    /// Forget every user (logout teardown)
    pub async fn clear(&self) {
        self.inner.users.write().await.clear();
        self.bump();
    }

    /// Optimistically add a favorite
    /// DOCUMENTATION: The placeholder is visible before the create request is sent.
    /// On failure the placeholder is rolled back and the error returned
    pub async fn add(&self, favorite: NewFavorite) -> GuideResult<Favorite> {
        let location = favorite.validate()?;
        let user_id = favorite.user_id;

        let (mutation, temp_id) = {
            let mut users = self.inner.users.write().await;
            users
                .entry(user_id)
                .or_default()
                .state
                .begin_add(user_id, location)
        };
        self.bump();
        log::debug!("Favorite {} added optimistically as {}", location, temp_id);

        // The create may already have reached the server, so a rollback also marks stale
        let guard = SettleGuard::new(self, move |users| {
            if let Some(slot) = users.get_mut(&user_id) {
                slot.state.revert(mutation);
                slot.fetched_at = None;
            }
            log::debug!("Abandoned add of {} rolled back", temp_id);
        });

        let result = self.inner.api.create_favorite(&favorite).await;

        let outcome = {
            let mut users = self.inner.users.write().await;
            guard.disarm();
            let slot = users.entry(user_id).or_default();
            match &result {
                Ok(created) => Some(slot.state.confirm_add(mutation, created.clone())),
                Err(_) => {
                    slot.state.revert(mutation);
                    None
                }
            }
        };
        self.bump();

        match (&result, outcome) {
            (Ok(created), Some(AddOutcome::Cancelled)) => {
                log::info!(
                    "Favorite {} was removed while being created; deleting it",
                    created.id
                );
                if let Err(e) = self.inner.api.delete_favorite(created.id).await {
                    log::warn!("Failed to delete cancelled favorite {}: {}", created.id, e);
                }
            }
            (Ok(created), _) => {
                log::info!("Favorite {} confirmed as {}", temp_id, created.id);
            }
            (Err(e), _) => {
                log::warn!("Adding favorite {} failed, rolled back: {}", location, e);
            }
        }

        self.settle(user_id).await;
        result
    }

    /// Optimistically remove a favorite (confirmed id or pending placeholder)
    /// DOCUMENTATION: Fails with NotFound for unknown keys. On failure the entry
    /// reappears and the error is returned
    pub async fn remove(&self, key: impl Into<FavoriteKey>) -> GuideResult<()> {
        let key = key.into();

        let (user_id, ticket) = {
            let mut users = self.inner.users.write().await;
            let (owner, slot) = users
                .iter_mut()
                .find(|(_, slot)| slot.state.owns(key))
                .ok_or_else(|| GuideError::NotFound(format!("favorite {}", key)))?;
            (*owner, slot.state.begin_remove(key)?)
        };
        self.bump();

        let (mutation, favorite_id) = match ticket {
            RemoveTicket::Server {
                mutation,
                favorite_id,
            } => (mutation, favorite_id),
            RemoveTicket::Deferred { .. } => {
                log::debug!("Placeholder {} removed before its create settled", key);
                return Ok(());
            }
        };

        let guard = SettleGuard::new(self, move |users| {
            if let Some(slot) = users.get_mut(&user_id) {
                slot.state.revert(mutation);
                slot.fetched_at = None;
            }
            log::debug!("Abandoned removal of favorite {} rolled back", favorite_id);
        });

        let result = self.inner.api.delete_favorite(favorite_id).await;

        {
            let mut users = self.inner.users.write().await;
            guard.disarm();
            let slot = users.entry(user_id).or_default();
            match &result {
                Ok(()) => slot.state.confirm_remove(mutation),
                Err(_) => {
                    slot.state.revert(mutation);
                }
            }
        }
        self.bump();

        match &result {
            Ok(()) => log::info!("Favorite {} removed", favorite_id),
            Err(e) => log::warn!("Removing favorite {} failed, rolled back: {}", favorite_id, e),
        }

        self.settle(user_id).await;
        result
    }

    /// Refetch after a mutation settles; errors are logged only
    async fn settle(&self, user_id: i64) {
        let (seq, guard) = {
            let mut users = self.inner.users.write().await;
            let slot = users.entry(user_id).or_default();
            self.fetch_ticket(slot, user_id)
        };
        if let Err(e) = self.run_fetch(user_id, seq, guard).await {
            log::warn!("Refetching favorites for user {} failed: {}", user_id, e);
        }
    }

    /// Issue a fetch sequence number plus the guard that releases it if abandoned
    fn fetch_ticket(&self, slot: &mut UserFavorites, user_id: i64) -> (u64, SettleGuard) {
        let seq = slot.begin_fetch();
        let guard = SettleGuard::new(self, move |users| {
            if let Some(slot) = users.get_mut(&user_id) {
                slot.end_fetch();
            }
            log::debug!("Favorites fetch {} for user {} abandoned", seq, user_id);
        });
        (seq, guard)
    }

    /// Run fetch `seq` and apply it unless a newer fetch was applied first
    async fn run_fetch(&self, user_id: i64, seq: u64, guard: SettleGuard) -> GuideResult<()> {
        let result = self.inner.api.list_favorites(user_id).await;

        let mut users = self.inner.users.write().await;
        guard.disarm();
        let slot = users.entry(user_id).or_default();
        slot.end_fetch();

        match result {
            Ok(favorites) => {
                if seq > slot.applied_fetch {
                    log::debug!(
                        "Applying {} favorites for user {} (fetch {})",
                        favorites.len(),
                        user_id,
                        seq
                    );
                    slot.applied_fetch = seq;
                    slot.state.replace_confirmed(favorites);
                    slot.phase = LoadState::Ready;
                    slot.fetched_at = Some(Instant::now());
                    drop(users);
                    self.bump();
                } else {
                    log::debug!(
                        "Discarding favorites fetch {} for user {}; {} already applied",
                        seq,
                        user_id,
                        slot.applied_fetch
                    );
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("Fetching favorites for user {} failed: {}", user_id, e);
                Err(e)
            }
        }
    }

    /// Apply `undo` outside any async context (from a Drop)
    /// Falls back to a spawned task while the lock is held elsewhere
    fn undo_detached(&self, undo: Undo) {
        if let Ok(mut users) = self.inner.users.try_write() {
            undo(&mut *users);
            drop(users);
            self.bump();
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let cache = self.clone();
                handle.spawn(async move {
                    undo(&mut *cache.inner.users.write().await);
                    cache.bump();
                });
            }
            Err(_) => log::warn!("No runtime left to roll back an abandoned favorites change"),
        }
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }
}
