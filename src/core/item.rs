use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Largest id handed out by counting up. Beyond it an `f64` reader can no
/// longer tell neighbouring ids apart.
const MAX_SEQUENTIAL_ID: u64 = (1 << 53) - 1;

/// Identifier of a to-do entry.
///
/// Any JSON number is accepted on read (older lists carry fractional or
/// negative ids) and written back exactly as it was read. Ids this app
/// creates are positive integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Number);

impl ItemId {
    fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(Number::from(n))
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "isDone")]
    pub done: bool,
}

impl Item {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    /// Case-insensitive substring match on the title. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// First id that does not collide with anything in `items`: the next integer
/// above the largest id, or the smallest unused positive integer once the
/// largest id is out of counting range.
pub fn next_free_id(items: &[Item]) -> ItemId {
    let ceiling = items
        .iter()
        .filter_map(|i| i.id.as_f64())
        .fold(0.0_f64, f64::max);
    if ceiling < MAX_SEQUENTIAL_ID as f64 {
        return ItemId::from(ceiling.floor() as u64 + 1);
    }

    let taken: HashSet<&ItemId> = items.iter().map(|i| &i.id).collect();
    (1..=MAX_SEQUENTIAL_ID)
        .map(ItemId::from)
        .find(|id| !taken.contains(id))
        .unwrap_or_else(|| ItemId::from(1))
}

/// Items in display order (newest first) that match `query`.
pub fn filter_for_display<'a>(items: &'a [Item], query: &'a str) -> impl Iterator<Item = &'a Item> {
    items.iter().rev().filter(move |i| i.matches(query))
}
