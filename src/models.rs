// Data models for the planner

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Labels seeded into the review list, in display order
pub const REVIEW_LABELS: [&str; 9] = [
    "育膚堂帳單",
    "賣貨便帳款",
    "蝦皮帳款R",
    "蝦皮帳款U",
    "廠商帳單",
    "他牌帳單",
    "台幣帳單",
    "內地帳單",
    "簽約帳單",
];

/// Prefix for review item ids
pub const REVIEW_ID_PREFIX: &str = "fixed";

/// A single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Creation (or reset) time in milliseconds since epoch
    pub timestamp: i64,
}

impl Item {
    /// A fresh, empty, uncompleted item
    pub fn new(id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            completed: false,
            timestamp,
        }
    }
}

/// One of the four fixed task lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Daily,
    Monthly,
    Review,
    Yearly,
}

impl Category {
    /// All categories in tab order
    pub const ALL: [Category; 4] = [Category::Daily, Category::Monthly, Category::Review, Category::Yearly];

    /// Identifier used in the persisted snapshot
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Monthly => "monthly",
            Category::Review => "review",
            Category::Yearly => "yearly",
        }
    }

    /// Human-facing tab label
    pub fn label(self) -> &'static str {
        match self {
            Category::Daily => "每日待辦",
            Category::Monthly => "每月計畫",
            Category::Review => "每月固定",
            Category::Yearly => "每年總計",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| eyre!("Unknown category: {} (expected daily, monthly, review or yearly)", s))
    }
}

/// Full state of all four lists
///
/// Each list defaults to empty when missing from a persisted snapshot, so an
/// older or partial blob still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerState {
    #[serde(default)]
    pub daily: Vec<Item>,
    #[serde(default)]
    pub monthly: Vec<Item>,
    #[serde(default)]
    pub review: Vec<Item>,
    #[serde(default)]
    pub yearly: Vec<Item>,
}

impl PlannerState {
    /// All four lists empty
    pub fn empty() -> Self {
        Self {
            daily: Vec::new(),
            monthly: Vec::new(),
            review: Vec::new(),
            yearly: Vec::new(),
        }
    }

    /// First-run state: empty lists plus the seeded review list
    pub fn seeded(timestamp: i64) -> Self {
        let review = REVIEW_LABELS
            .iter()
            .enumerate()
            .map(|(idx, label)| Item {
                id: format!("{}-{}", REVIEW_ID_PREFIX, idx),
                text: label.to_string(),
                completed: false,
                timestamp,
            })
            .collect();

        Self { review, ..Self::empty() }
    }

    pub fn items(&self, category: Category) -> &[Item] {
        match category {
            Category::Daily => &self.daily,
            Category::Monthly => &self.monthly,
            Category::Review => &self.review,
            Category::Yearly => &self.yearly,
        }
    }

    pub fn items_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::Daily => &mut self.daily,
            Category::Monthly => &mut self.monthly,
            Category::Review => &mut self.review,
            Category::Yearly => &mut self.yearly,
        }
    }

    /// Find an item by id within a category
    pub fn find(&self, category: Category, id: &str) -> Option<&Item> {
        self.items(category).iter().find(|item| item.id == id)
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        assert!(ts > 0);
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::Review).unwrap();
        assert_eq!(json, "\"review\"");

        let parsed: Category = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(parsed, Category::Yearly);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("daily".parse::<Category>().unwrap(), Category::Daily);
        assert_eq!(" Monthly ".parse::<Category>().unwrap(), Category::Monthly);
        assert!("weekly".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_labels() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["每日待辦", "每月計畫", "每月固定", "每年總計"]);
    }

    #[test]
    fn test_seeded_state() {
        let state = PlannerState::seeded(1000);
        assert!(state.daily.is_empty());
        assert!(state.monthly.is_empty());
        assert!(state.yearly.is_empty());
        assert_eq!(state.review.len(), 9);

        let texts: Vec<&str> = state.review.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, REVIEW_LABELS.to_vec());
        assert_eq!(state.review[0].id, "fixed-0");
        assert_eq!(state.review[8].id, "fixed-8");
        assert!(state.review.iter().all(|i| !i.completed && i.timestamp == 1000));
    }

    #[test]
    fn test_item_serialization() {
        let item = Item {
            id: "abc".to_string(),
            text: "Buy milk".to_string(),
            completed: true,
            timestamp: 42,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"abc","text":"Buy milk","completed":true,"timestamp":42}"#);
    }

    #[test]
    fn test_missing_category_defaults_to_empty() {
        let json = r#"{"daily":[{"id":"a","text":"","completed":false,"timestamp":1}]}"#;
        let state: PlannerState = serde_json::from_str(json).unwrap();
        assert_eq!(state.daily.len(), 1);
        assert!(state.monthly.is_empty());
        assert!(state.review.is_empty());
        assert!(state.yearly.is_empty());
    }
}
