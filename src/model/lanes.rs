use super::item::{Category, Item};

/// A horizontal band of rows. `category` is `None` for the lane holding
/// items without a known category.
#[derive(Debug)]
pub struct Lane<'a> {
    pub category: Option<&'a Category>,
    /// Each row holds items that do not overlap in time.
    pub rows: Vec<Vec<&'a Item>>,
}

impl Lane<'_> {
    pub fn row_count(&self) -> usize {
        self.rows.len().max(1)
    }
}

/// Group items into one lane per category, in category order, then pack each
/// lane's items into rows greedily by start time.
pub fn pack_lanes<'a>(items: &'a [Item], categories: &'a [Category]) -> Vec<Lane<'a>> {
    let mut lanes: Vec<Lane<'a>> = categories
        .iter()
        .map(|c| Lane {
            category: Some(c),
            rows: Vec::new(),
        })
        .collect();
    let mut buckets: Vec<Vec<&'a Item>> = vec![Vec::new(); categories.len()];
    let mut loose: Vec<&'a Item> = Vec::new();

    for item in items {
        let lane = item
            .category
            .as_deref()
            .and_then(|id| categories.iter().position(|c| c.id == id));
        match lane {
            Some(idx) => buckets[idx].push(item),
            None => loose.push(item),
        }
    }

    for (lane, bucket) in lanes.iter_mut().zip(buckets) {
        lane.rows = pack_rows(bucket);
    }
    if !loose.is_empty() || categories.is_empty() {
        lanes.push(Lane {
            category: None,
            rows: pack_rows(loose),
        });
    }
    lanes
}

fn pack_rows(mut items: Vec<&Item>) -> Vec<Vec<&Item>> {
    items.sort_by_key(|i| (i.start, i.end));
    let mut rows: Vec<Vec<&Item>> = Vec::new();
    for item in items {
        let free = rows
            .iter()
            .position(|row| row.last().is_some_and(|last| last.end <= item.start));
        match free {
            Some(idx) => rows[idx].push(item),
            None => rows.push(vec![item]),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use proptest::prelude::*;

    fn h(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::hours(hours)
    }

    #[test]
    fn test_items_grouped_by_category_in_order() {
        let categories = vec![Category::new("dev", "Development"), Category::new("ops", "Operations")];
        let items = vec![
            Item::new("deploy", h(5), h(6)).with_category("ops"),
            Item::new("code", h(0), h(4)).with_category("dev"),
            Item::new("misc", h(0), h(1)).with_category("unknown"),
        ];
        let lanes = pack_lanes(&items, &categories);
        assert_eq!(lanes.len(), 3);
        assert_eq!(lanes[0].category.map(|c| c.id.as_str()), Some("dev"));
        assert_eq!(lanes[0].rows[0][0].title, "code");
        assert_eq!(lanes[1].rows[0][0].title, "deploy");
        assert!(lanes[2].category.is_none());
        assert_eq!(lanes[2].rows[0][0].title, "misc");
    }

    #[test]
    fn test_no_categories_gives_single_lane() {
        let lanes = pack_lanes(&[], &[]);
        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].row_count(), 1);
    }

    #[test]
    fn test_overlapping_items_get_separate_rows() {
        let items = vec![
            Item::new("a", h(0), h(4)),
            Item::new("b", h(2), h(6)),
            Item::new("c", h(4), h(8)),
        ];
        let lanes = pack_lanes(&items, &[]);
        let rows = &lanes[0].rows;
        assert_eq!(rows.len(), 2);
        let titles: Vec<&str> = rows[0].iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    proptest! {
        #[test]
        fn rows_never_overlap(spans in proptest::collection::vec((0i64..500, 0i64..50), 0..60)) {
            let items: Vec<Item> = spans
                .iter()
                .map(|(s, len)| Item::new("x", h(*s), h(*s + *len)))
                .collect();
            let lanes = pack_lanes(&items, &[]);
            let placed: usize = lanes[0].rows.iter().map(Vec::len).sum();
            prop_assert_eq!(placed, items.len());
            for row in &lanes[0].rows {
                for pair in row.windows(2) {
                    prop_assert!(pair[0].end <= pair[1].start);
                }
            }
        }
    }
}
