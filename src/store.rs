//! The to-do list state holder.
//!
//! `TodoStore` owns the committed list, the search query and the theme, and is
//! the only thing that talks to the persistence gateway. Every mutation is a
//! transaction: build the next list, write it, and only then swap it in. A
//! failed write leaves the store exactly as it was.

use tokio::sync::watch;

use crate::core::item::{Item, ItemId, filter_for_display, next_free_id};
use crate::core::theme::{Theme, ThemeState};
use crate::storage::{KeyValueStore, StorageError, THEME_KEY, TODO_BACKUP_KEY, TODO_KEY};

/// Immutable copy of the store state. `revision` increases with every change
/// the store publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub revision: u64,
    pub items: Vec<Item>,
    pub query: String,
    pub theme: ThemeState,
}

impl Snapshot {
    /// Items to show, newest first, restricted to the current query.
    pub fn visible(&self) -> Vec<&Item> {
        filter_for_display(&self.items, &self.query).collect()
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.is_empty()
    }

    /// Whether this snapshot may replace `current`. Snapshots can arrive out
    /// of order; an older revision never wins.
    pub fn supersedes(&self, current: &Snapshot) -> bool {
        self.revision >= current.revision
    }
}

pub struct TodoStore<S> {
    gateway: S,
    device_theme: Theme,
    items: Vec<Item>,
    query: String,
    theme: ThemeState,
    next_id: ItemId,
    loaded: bool,
    revision: u64,
    events: watch::Sender<Snapshot>,
}

impl<S: KeyValueStore> TodoStore<S> {
    pub fn new(gateway: S, device_theme: Theme) -> Self {
        let (events, _) = watch::channel(Snapshot::default());
        Self {
            gateway,
            device_theme,
            items: Vec::new(),
            query: String::new(),
            theme: ThemeState::Unresolved,
            next_id: ItemId::from(1),
            loaded: false,
            revision: 0,
            events,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn theme_state(&self) -> ThemeState {
        self.theme
    }

    /// Theme to render with right now.
    pub fn theme(&self) -> Theme {
        self.theme.effective(self.device_theme)
    }

    /// True once the stored list has been read (or found missing, or backed
    /// up after failing to parse). Until then every list mutation is refused.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            items: self.items.clone(),
            query: self.query.clone(),
            theme: self.theme,
        }
    }

    /// Receiver that sees every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.events.subscribe()
    }

    /// Read the list and the theme preference from the gateway.
    ///
    /// Never fails. A list that cannot be read leaves the store empty and
    /// not loaded, so mutations keep retrying the read instead of writing
    /// over it. A list that cannot be parsed is copied to `TODO_BACKUP_KEY`
    /// first and the store starts empty. An unreadable or unknown theme falls
    /// back to the device scheme.
    pub async fn load(&mut self) -> Snapshot {
        match self.load_items().await {
            Ok(items) => {
                self.items = items;
                self.next_id = next_free_id(&self.items);
                self.loaded = true;
            }
            Err(e) => log::error!("Failed to load to-do list, changes are blocked: {}", e),
        }

        let theme = self.load_theme().await;
        if !self.theme.resolve(theme) {
            log::debug!("Theme already resolved, ignoring stored {:?}", theme);
        }

        self.publish();
        self.snapshot()
    }

    async fn load_items(&self) -> Result<Vec<Item>, StorageError> {
        let Some(raw) = self.gateway.get(TODO_KEY).await? else {
            log::debug!("No stored to-do list, starting empty");
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Item>>(&raw) {
            Ok(items) => {
                log::info!("Loaded {} to-dos", items.len());
                Ok(items)
            }
            Err(e) => {
                log::error!("Failed to parse to-do list: {}", StorageError::malformed(TODO_KEY, e));
                self.gateway.set(TODO_BACKUP_KEY, &raw).await?;
                log::warn!("Kept the unreadable to-do list under `{}`", TODO_BACKUP_KEY);
                Ok(Vec::new())
            }
        }
    }

    async fn load_theme(&self) -> Theme {
        match self.gateway.get(THEME_KEY).await {
            Ok(Some(value)) => Theme::from_keyword(value.trim()).unwrap_or_else(|| {
                log::warn!("Unknown theme preference {:?}, using device scheme", value);
                self.device_theme
            }),
            Ok(None) => self.device_theme,
            Err(e) => {
                log::error!("Failed to load theme preference: {}", e);
                self.device_theme
            }
        }
    }

    async fn ensure_loaded(&mut self) -> Result<(), StorageError> {
        if !self.loaded {
            self.load().await;
        }
        if self.loaded {
            Ok(())
        } else {
            Err(StorageError::Unavailable(format!(
                "stored `{}` could not be read, refusing to overwrite it",
                TODO_KEY
            )))
        }
    }

    /// Append a new open item. No title validation is applied.
    pub async fn add(&mut self, title: impl Into<String>) -> Result<ItemId, StorageError> {
        self.ensure_loaded().await?;
        let id = self.next_id.clone();
        let mut next = self.items.clone();
        next.push(Item::new(id.clone(), title));
        self.commit(next).await?;
        self.next_id = next_free_id(&self.items);
        log::debug!("Added to-do {}", id);
        Ok(id)
    }

    /// Flip `done` on the matching item. Returns false, without writing, if
    /// no item has this id.
    pub async fn toggle(&mut self, id: &ItemId) -> Result<bool, StorageError> {
        self.ensure_loaded().await?;
        let Some(pos) = self.items.iter().position(|i| &i.id == id) else {
            return Ok(false);
        };
        let mut next = self.items.clone();
        next[pos].done = !next[pos].done;
        self.commit(next).await?;
        Ok(true)
    }

    /// Remove the matching item and return it. Returns `None`, without
    /// writing, if no item has this id.
    pub async fn delete(&mut self, id: &ItemId) -> Result<Option<Item>, StorageError> {
        self.ensure_loaded().await?;
        let Some(pos) = self.items.iter().position(|i| &i.id == id) else {
            return Ok(None);
        };
        let mut next = self.items.clone();
        let removed = next.remove(pos);
        self.commit(next).await?;
        log::debug!("Deleted to-do {}", id);
        Ok(Some(removed))
    }

    /// Set the search query and return the visible items, newest first.
    pub fn search(&mut self, query: impl Into<String>) -> Vec<Item> {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.publish();
        }
        filter_for_display(&self.items, &self.query).cloned().collect()
    }

    /// Flip between light and dark and persist the choice. The switch stands
    /// even if the write fails.
    pub async fn toggle_theme(&mut self) -> Theme {
        if !self.theme.is_resolved() {
            self.load().await;
        }
        let next = self.theme().toggled();
        self.theme = ThemeState::Resolved(next);
        self.publish();
        if let Err(e) = self.gateway.set(THEME_KEY, next.as_keyword()).await {
            log::error!("Failed to save theme preference: {}", e);
        }
        next
    }

    async fn commit(&mut self, next: Vec<Item>) -> Result<(), StorageError> {
        let payload =
            serde_json::to_string(&next).map_err(|e| StorageError::malformed(TODO_KEY, e))?;
        self.gateway.set(TODO_KEY, &payload).await?;
        self.items = next;
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.events.send_replace(self.snapshot());
    }
}
