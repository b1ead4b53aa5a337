use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::item::{Category, Item};
use super::window::TimeWindow;
use crate::error::AppError;

/// Everything the timeline is fed with: the items, optional lanes and the
/// initially visible window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default = "default_name")]
    pub name: String,
    /// Initial window; derived from the items when absent.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
}

fn default_name() -> String {
    "Untitled Timeline".to_string()
}

impl Dataset {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
            categories: Vec::new(),
            items,
        }
    }

    /// Fix up inverted items after loading.
    pub fn normalize(&mut self) {
        for item in &mut self.items {
            item.normalize();
        }
    }

    /// The window to show first: the explicit one if set, otherwise the item
    /// range padded by a day, otherwise `initial_span` centred on now (also
    /// used when the padding would leave the representable date range).
    pub fn initial_window(&self, initial_span: TimeDelta) -> Result<TimeWindow, AppError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            return TimeWindow::new(start, end);
        }
        let min = self.items.iter().map(|i| i.start).min();
        let max = self.items.iter().map(|i| i.end).max();
        let padded = min.zip(max).and_then(|(min, max)| {
            Some((
                min.checked_sub_signed(TimeDelta::days(1))?,
                max.checked_add_signed(TimeDelta::days(1))?,
            ))
        });
        match padded {
            Some((start, end)) => TimeWindow::new(start, end),
            None => Ok(TimeWindow::centered(Utc::now(), initial_span)),
        }
    }

    /// Create lanes for category tags that have no matching [`Category`],
    /// in order of first appearance.
    pub fn derive_categories(&mut self) {
        for tag in self.items.iter().filter_map(|i| i.category.as_deref()) {
            if !self.categories.iter().any(|c| c.id == tag) {
                self.categories.push(Category::new(tag, tag));
            }
        }
    }

    /// A small demo dataset around the current date.
    pub fn sample() -> Self {
        let today = Utc::now();
        let day = |d: i64| today + TimeDelta::days(d);

        let items = vec![
            Item::new("Kickoff", day(-6), day(-5)).with_category("plan"),
            Item::new("Requirements", day(-5), day(2)).with_category("plan"),
            Item::new("Architecture review", day(1), day(4)).with_category("plan"),
            Item::new("UI design", day(2), day(12)).with_category("build"),
            Item::new("Backend", day(3), day(20)).with_category("build"),
            Item::new("Integration", day(15), day(24)).with_category("build"),
            Item::new("Staging deploy", day(22), day(23)).with_category("ship"),
            Item::new("QA", day(23), day(30)).with_category("ship"),
            Item::new("Launch", day(31), day(32)).with_category("ship"),
            Item::new("Retro", day(34), day(34) + TimeDelta::hours(2)),
        ];

        Self {
            name: "Sample Timeline".to_string(),
            start: Some(day(-10)),
            end: Some(day(35)),
            categories: vec![
                Category::new("plan", "Planning"),
                Category::new("build", "Build"),
                Category::new("ship", "Release"),
            ],
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_initial_window_from_items() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let ds = Dataset::new(
            "x",
            vec![
                Item::new("a", t, t + TimeDelta::days(2)),
                Item::new("b", t + TimeDelta::days(5), t + TimeDelta::days(6)),
            ],
        );
        let w = ds.initial_window(TimeDelta::days(30)).unwrap();
        assert_eq!(w.start(), t - TimeDelta::days(1));
        assert_eq!(w.end(), t + TimeDelta::days(7));
    }

    #[test]
    fn test_explicit_window_wins_and_is_validated() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut ds = Dataset::new("x", vec![]);
        ds.start = Some(t);
        ds.end = Some(t);
        assert!(matches!(
            ds.initial_window(TimeDelta::days(30)),
            Err(AppError::InvalidWindow { .. })
        ));
        ds.end = Some(t + TimeDelta::days(3));
        assert_eq!(ds.initial_window(TimeDelta::days(30)).unwrap().span(), TimeDelta::days(3));
    }

    #[test]
    fn test_empty_dataset_uses_default_span() {
        let ds = Dataset::new("x", vec![]);
        let w = ds.initial_window(TimeDelta::days(30)).unwrap();
        assert_eq!(w.span(), TimeDelta::days(30));
    }

    #[test]
    fn test_items_at_date_limits_fall_back_to_default_span() {
        for edge in [DateTime::<Utc>::MAX_UTC, DateTime::<Utc>::MIN_UTC] {
            let ds = Dataset::new("x", vec![Item::new("edge", edge, edge)]);
            let w = ds.initial_window(TimeDelta::days(30)).unwrap();
            assert_eq!(w.span(), TimeDelta::days(30));
        }
    }

    #[test]
    fn test_derive_categories_keeps_first_appearance_order() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut ds = Dataset::new(
            "x",
            vec![
                Item::new("a", t, t).with_category("ops"),
                Item::new("b", t, t),
                Item::new("c", t, t).with_category("dev"),
                Item::new("d", t, t).with_category("ops"),
            ],
        );
        ds.categories.push(Category::new("dev", "Development"));
        ds.derive_categories();
        let ids: Vec<&str> = ds.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["dev", "ops"]);
        assert_eq!(ds.categories[0].title, "Development");
    }

    #[test]
    fn test_sample_items_use_known_categories() {
        let ds = Dataset::sample();
        for item in ds.items.iter().filter_map(|i| i.category.as_deref()) {
            assert!(ds.categories.iter().any(|c| c.id == item));
        }
    }
}
