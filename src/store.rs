// List store: in-memory planner state mirrored to a key-value slot

use crate::id::{Clock, IdGenerator, SystemClock, UuidIds};
use crate::kv::KvStore;
use crate::models::{Category, Item, PlannerState, REVIEW_ID_PREFIX, REVIEW_LABELS};
use crate::reducer::{self, Action};
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

/// Key of the slot holding the planner snapshot
pub const DEFAULT_STORAGE_KEY: &str = "2026_planner_data";

/// Owns the planner state and persists it after every mutation
///
/// The in-memory state is authoritative for the running session. Persistence
/// is best-effort: a failed write is logged and the mutation stands.
pub struct ListStore<K: KvStore> {
    kv: K,
    key: String,
    state: PlannerState,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl<K: KvStore> ListStore<K> {
    /// Open a store over `kv` using the default key, UUID ids and wall-clock time
    pub fn open(kv: K) -> Self {
        Self::open_with(kv, DEFAULT_STORAGE_KEY, Box::new(UuidIds), Box::new(SystemClock))
    }

    /// Open a store with explicit key, id source and clock
    pub fn open_with(kv: K, key: impl Into<String>, ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        let key = key.into();
        let state = load(&kv, &key, clock.as_ref());
        Self {
            kv,
            key,
            state,
            ids,
            clock,
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored (unsorted) items of a category
    pub fn items(&self, category: Category) -> &[Item] {
        self.state.items(category)
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add an empty item at the head of `category`, returning its id
    pub fn add_item(&mut self, category: Category) -> String {
        let id = self.ids.next_id();
        let timestamp = self.clock.now_ms();
        self.apply(Action::AddItem {
            category,
            id: id.clone(),
            timestamp,
        });
        id
    }

    pub fn toggle_item(&mut self, category: Category, id: &str) {
        self.apply(Action::ToggleItem {
            category,
            id: id.to_string(),
        });
    }

    pub fn update_text(&mut self, category: Category, id: &str, text: impl Into<String>) {
        self.apply(Action::UpdateText {
            category,
            id: id.to_string(),
            text: text.into(),
        });
    }

    pub fn delete_item(&mut self, category: Category, id: &str) {
        self.apply(Action::DeleteItem {
            category,
            id: id.to_string(),
        });
    }

    /// Replace the review list with a fresh copy of the seed labels
    pub fn reset_review(&mut self) {
        let timestamp = self.clock.now_ms();
        let ids = REVIEW_LABELS
            .iter()
            .map(|_| format!("{}-{}-{}", REVIEW_ID_PREFIX, timestamp, self.ids.next_id()))
            .collect();
        self.apply(Action::ResetReview { ids, timestamp });
    }

    /// Run an action through the reducer, then persist the result
    pub(crate) fn apply(&mut self, action: Action) {
        debug!(?action, "apply");
        let state = std::mem::replace(&mut self.state, PlannerState::empty());
        self.state = reducer::reduce(state, action);
        self.persist();
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Display order for `category`; see [`reducer::sorted_view`]
    pub fn sorted_view(&self, category: Category) -> Vec<Item> {
        reducer::sorted_view(&self.state, category)
    }

    /// (completed, total) for `category`
    pub fn progress(&self, category: Category) -> (usize, usize) {
        let items = self.state.items(category);
        (items.iter().filter(|i| i.completed).count(), items.len())
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the full state to the slot, logging any failure
    pub fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            warn!(key = %self.key, error = ?e, "Failed to save planner state");
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.state).context("Failed to serialize planner state")?;
        self.kv.write(&self.key, &blob)
    }
}

/// Load the planner state stored under `key`
///
/// Missing, unreadable or malformed snapshots yield the seeded default state.
pub fn load<K: KvStore + ?Sized>(kv: &K, key: &str, clock: &dyn Clock) -> PlannerState {
    match try_load(kv, key) {
        Ok(Some(state)) => {
            info!(key, "Loaded planner state");
            state
        }
        Ok(None) => {
            info!(key, "No saved planner state, using defaults");
            PlannerState::seeded(clock.now_ms())
        }
        Err(e) => {
            warn!(key, error = ?e, "Failed to load planner state, using defaults");
            PlannerState::seeded(clock.now_ms())
        }
    }
}

fn try_load<K: KvStore + ?Sized>(kv: &K, key: &str) -> Result<Option<PlannerState>> {
    let Some(blob) = kv.read(key)? else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(&blob).context("Failed to parse saved planner state")?;
    if !value.is_object() {
        return Err(eyre!("Saved planner state is not a JSON object"));
    }
    let state = serde_json::from_value(value).context("Saved planner state has the wrong shape")?;
    Ok(Some(state))
}
