// Pure state transitions and the derived display order

use crate::models::{Category, Item, PlannerState, REVIEW_ID_PREFIX, REVIEW_LABELS};
use tracing::debug;

/// A single mutation of the planner state
///
/// Ids and timestamps are resolved before an action is built, so applying
/// the same action to the same state always yields the same result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddItem { category: Category, id: String, timestamp: i64 },
    ToggleItem { category: Category, id: String },
    UpdateText { category: Category, id: String, text: String },
    DeleteItem { category: Category, id: String },
    /// One id per review label, in label order. Missing ids are derived
    /// from the timestamp; extra ids are ignored.
    ResetReview { ids: Vec<String>, timestamp: i64 },
}

/// Apply an action, returning the next state
///
/// Actions naming an id that is not in the category leave the state unchanged.
pub fn reduce(mut state: PlannerState, action: Action) -> PlannerState {
    match action {
        Action::AddItem { category, id, timestamp } => {
            state.items_mut(category).insert(0, Item::new(id, timestamp));
        }
        Action::ToggleItem { category, id } => match find_mut(&mut state, category, &id) {
            Some(item) => item.completed = !item.completed,
            None => debug!(%category, id = %id, "toggle: no such item"),
        },
        Action::UpdateText { category, id, text } => match find_mut(&mut state, category, &id) {
            Some(item) => item.text = text,
            None => debug!(%category, id = %id, "update_text: no such item"),
        },
        Action::DeleteItem { category, id } => {
            let items = state.items_mut(category);
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                debug!(%category, id = %id, "delete: no such item");
            }
        }
        Action::ResetReview { ids, timestamp } => {
            let mut ids = ids.into_iter();
            state.review = REVIEW_LABELS
                .iter()
                .enumerate()
                .map(|(idx, label)| Item {
                    id: ids
                        .next()
                        .unwrap_or_else(|| format!("{}-{}-{}", REVIEW_ID_PREFIX, timestamp, idx)),
                    text: label.to_string(),
                    completed: false,
                    timestamp,
                })
                .collect();
        }
    }

    state
}

fn find_mut<'a>(state: &'a mut PlannerState, category: Category, id: &str) -> Option<&'a mut Item> {
    state.items_mut(category).iter_mut().find(|item| item.id == id)
}

/// Display order for a category: open items first, then completed ones,
/// each group newest first. Ties keep their stored order.
pub fn sorted_view(state: &PlannerState, category: Category) -> Vec<Item> {
    let mut items = state.items(category).to_vec();
    items.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    items
}
