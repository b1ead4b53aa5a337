use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single time-bounded block on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Id of the [`Category`] lane this item belongs to.
    #[serde(default, alias = "type")]
    pub category: Option<String>,
}

impl Item {
    /// Create an item. An inverted range is swapped so that `end >= start`.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start,
            end,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Restore `end >= start` after deserializing untrusted input.
    pub fn normalize(&mut self) {
        if self.end < self.start {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }
}

/// A labelled horizontal lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Proposal sent to the owner of the items when a drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMoved {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ItemMoved {
    /// Apply this move to the matching item in `items`. Returns the item if found.
    pub fn apply<'a>(&self, items: &'a mut [Item]) -> Option<&'a Item> {
        let item = items.iter_mut().find(|i| i.id == self.id)?;
        item.start = self.start;
        item.end = self.end;
        Some(item)
    }
}
