//! View-state controller for the timeline.
//!
//! Holds the visible window, the canvas width and the pointer drag state, and
//! turns pointer, wheel and resize signals into either a new window (pan/zoom)
//! or an [`ItemMoved`] proposal for the owner of the items.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use super::item::{Item, ItemMoved};
use super::timeline::{TimelineViewport, UnitThresholds};
use super::unit::TimeUnit;
use super::window::{TimeWindow, ZoomBounds};
use crate::config::TimelineOptions;

/// How wheel deltas translate into zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSettings {
    /// Wheel delta that doubles the span (at speed 1).
    pub divisor: f64,
    /// Speed multiplier while ctrl is held.
    pub fast_multiplier: f64,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            divisor: 500.0,
            fast_multiplier: 4.0,
        }
    }
}

/// The item being dragged, captured when the drag began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveItem {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub dragging: bool,
    pub start_x: f32,
    /// Cumulative pointer offset since the drag began.
    pub offset_x: f32,
    pub active_item: Option<ActiveItem>,
    /// Window start at drag begin, used to pan when no item is active.
    origin: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TimelineController {
    pub viewport: TimelineViewport,
    bounds: ZoomBounds,
    thresholds: UnitThresholds,
    wheel: WheelSettings,
    unit_override: Option<TimeUnit>,
    drag: DragState,
    initial_window: TimeWindow,
}

impl TimelineController {
    pub fn new(window: TimeWindow, options: &TimelineOptions) -> Self {
        let bounds = options.zoom_bounds();
        let mut window = window;
        window.clamp_to(bounds);
        Self {
            viewport: TimelineViewport::new(window),
            bounds,
            thresholds: options.unit_thresholds(),
            wheel: options.wheel_settings(),
            unit_override: None,
            drag: DragState::default(),
            initial_window: window,
        }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.viewport.window
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn is_active(&self, id: Uuid) -> bool {
        self.drag.active_item.is_some_and(|a| a.id == id)
    }

    /// The granularity used for ticks and snapping.
    pub fn unit(&self) -> TimeUnit {
        self.unit_override
            .unwrap_or_else(|| self.viewport.compute_unit(&self.thresholds))
    }

    pub fn unit_override(&self) -> Option<TimeUnit> {
        self.unit_override
    }

    /// Force a unit, or `None` to pick one from the zoom level.
    pub fn set_unit_override(&mut self, unit: Option<TimeUnit>) {
        log::debug!("unit override set to {:?}", unit);
        self.unit_override = unit;
    }

    // --- Platform signals ---

    pub fn on_resize(&mut self, width: f32) {
        if self.viewport.set_width(width) {
            log::debug!("canvas width now {:.1}", self.viewport.width());
        }
    }

    /// Wheel over the canvas. Deltas follow the browser convention: positive
    /// `delta_y` zooms out, positive `delta_x` moves the window later.
    pub fn on_wheel(&mut self, pointer_x: f32, delta_x: f32, delta_y: f32, fast: bool) {
        let width = self.viewport.width() as f64;
        if width <= 0.0 || (delta_x == 0.0 && delta_y == 0.0) {
            return;
        }
        let speed = if fast { self.wheel.fast_multiplier } else { 1.0 };
        let scale = 1.0 + speed * delta_y as f64 / self.wheel.divisor;
        let anchor = (pointer_x as f64 / width).clamp(0.0, 1.0);
        let move_offset = delta_x as f64 / width;
        self.zoom_and_move(scale, anchor, move_offset);
    }

    /// Zoom around the centre of the canvas.
    pub fn zoom_by(&mut self, scale: f64) {
        self.zoom_and_move(scale, 0.5, 0.0);
    }

    fn zoom_and_move(&mut self, scale: f64, anchor: f64, move_offset: f64) {
        self.viewport
            .window
            .zoom_and_move(scale, anchor, move_offset, self.bounds);
        log::debug!(
            "window {} .. {} ({}s)",
            self.viewport.window.start(),
            self.viewport.window.end(),
            self.viewport.window.span().num_seconds()
        );
    }

    pub fn on_pointer_down(&mut self, x: f32) {
        self.drag = DragState {
            dragging: true,
            start_x: x,
            offset_x: 0.0,
            active_item: self.drag.active_item,
            origin: Some(self.viewport.window.start()),
        };
    }

    /// The pointer went down on `item`; it becomes the active item.
    pub fn on_item_interact(&mut self, item: &Item) {
        self.drag.active_item = Some(ActiveItem {
            id: item.id,
            start: item.start,
            end: item.end,
        });
    }

    /// Returns true if the view or the drag preview changed.
    pub fn on_pointer_move(&mut self, x: f32) -> bool {
        if !self.drag.dragging {
            return false;
        }
        self.drag.offset_x = x - self.drag.start_x;

        if self.drag.active_item.is_none() {
            if let Some(origin) = self.drag.origin {
                let shift = self.viewport.x_to_duration(self.drag.offset_x);
                self.viewport.window.set_start(origin - shift);
            }
        }
        true
    }

    /// Finish the drag. If an item was being dragged, returns its new position.
    pub fn on_pointer_up(&mut self) -> Option<ItemMoved> {
        let moved = self.drag.active_item.map(|active| {
            let start = self.snapped_start(&active);
            ItemMoved {
                id: active.id,
                start,
                end: start + (active.end - active.start),
            }
        });
        if let Some(m) = &moved {
            log::debug!("item {} proposed at {} .. {}", m.id, m.start, m.end);
        }
        self.drag = DragState::default();
        moved
    }

    fn snapped_start(&self, active: &ActiveItem) -> DateTime<Utc> {
        let shift = self.viewport.x_to_duration(self.drag.offset_x);
        self.unit().start_of(active.start + shift)
    }

    /// Start of `item` as it should be drawn, including the drag preview.
    pub fn display_start(&self, item: &Item) -> DateTime<Utc> {
        match self.drag.active_item {
            Some(active) if active.id == item.id && self.drag.dragging => {
                self.snapped_start(&active)
            }
            _ => item.start,
        }
    }

    // --- Toolbar commands ---

    /// Shift the window by a fraction of its span (negative = earlier).
    pub fn pan_by_fraction(&mut self, fraction: f64) {
        let ms = (self.viewport.window.span_millis() * fraction).round() as i64;
        self.viewport.window.pan_by(TimeDelta::milliseconds(ms));
    }

    pub fn reset_view(&mut self) {
        self.viewport.window = self.initial_window;
    }

    /// Centre the window on `t`, keeping the span.
    pub fn go_to(&mut self, t: DateTime<Utc>) {
        let half = TimeDelta::milliseconds(self.viewport.window.span().num_milliseconds() / 2);
        self.viewport.window.set_start(t - half);
    }

    /// Fit the window to all items with a small margin on both sides.
    pub fn fit_to(&mut self, items: &[Item]) {
        let (Some(min), Some(max)) = (
            items.iter().map(|i| i.start).min(),
            items.iter().map(|i| i.end).max(),
        ) else {
            return;
        };
        let span = (max - min).max(TimeDelta::hours(1));
        let margin = span / 20;
        if let Ok(mut window) = TimeWindow::new(min - margin, max + margin) {
            window.clamp_to(self.bounds);
            self.viewport.window = window;
        }
    }

    /// Items intersecting the visible window.
    pub fn visible_items<'a>(&self, items: &'a [Item]) -> impl Iterator<Item = &'a Item> + 'a {
        let window = self.viewport.window;
        items.iter().filter(move |i| window.overlaps(i.start, i.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
    }

    /// 10 day window over 1000 px: 100 px per day, day unit.
    fn controller() -> TimelineController {
        let window = TimeWindow::new(t0(), t0() + TimeDelta::days(10)).unwrap();
        let mut c = TimelineController::new(window, &TimelineOptions::default());
        c.on_resize(1000.0);
        c
    }

    fn item() -> Item {
        Item::new(
            "Build",
            t0() + TimeDelta::days(2) + TimeDelta::hours(3),
            t0() + TimeDelta::days(4),
        )
    }

    #[test]
    fn test_drag_item_proposes_snapped_move() {
        let mut c = controller();
        let item = item();
        assert_eq!(c.unit(), TimeUnit::Day);

        c.on_pointer_down(300.0);
        c.on_item_interact(&item);
        assert!(c.on_pointer_move(450.0));

        // +150 px = 1.5 days, then floored to the day
        let expected_start = t0() + TimeDelta::days(3);
        assert_eq!(c.display_start(&item), expected_start);
        // window is not panned while an item is active
        assert_eq!(c.window().start(), t0());

        let moved = c.on_pointer_up().unwrap();
        assert_eq!(moved.id, item.id);
        assert_eq!(moved.start, expected_start);
        assert_eq!(moved.end - moved.start, item.duration());
        assert!(!c.is_dragging());
        assert!(!c.is_active(item.id));
        assert_eq!(c.display_start(&item), item.start);
    }

    #[test]
    fn test_background_drag_pans() {
        let mut c = controller();
        c.on_pointer_down(500.0);
        c.on_pointer_move(400.0);
        assert_eq!(c.window().start(), t0() + TimeDelta::days(1));
        c.on_pointer_move(700.0);
        assert_eq!(c.window().start(), t0() - TimeDelta::days(2));
        assert!(c.on_pointer_up().is_none());
        assert_eq!(c.window().span(), TimeDelta::days(10));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut c = controller();
        assert!(!c.on_pointer_move(200.0));
        assert_eq!(c.window().start(), t0());
        assert!(c.on_pointer_up().is_none());
    }

    #[test]
    fn test_wheel_zoom_anchors_on_pointer() {
        let mut c = controller();
        // pointer at the left edge: start stays put, span grows by 20%
        c.on_wheel(0.0, 0.0, 100.0, false);
        assert_eq!(c.window().start(), t0());
        assert_eq!(c.window().span(), TimeDelta::days(12));

        let mut c = controller();
        // ctrl = 4x speed, zoom in around the right edge
        c.on_wheel(1000.0, 0.0, -50.0, true);
        assert_eq!(c.window().span(), TimeDelta::days(6));
        assert_eq!(c.window().end(), t0() + TimeDelta::days(10));
    }

    #[test]
    fn test_wheel_ignored_without_width() {
        let window = TimeWindow::new(t0(), t0() + TimeDelta::days(10)).unwrap();
        let mut c = TimelineController::new(window, &TimelineOptions::default());
        c.on_wheel(10.0, 5.0, 100.0, false);
        assert_eq!(c.window(), &window);
    }

    #[test]
    fn test_horizontal_wheel_pans() {
        let mut c = controller();
        c.on_wheel(500.0, 100.0, 0.0, false);
        assert_eq!(c.window().start(), t0() + TimeDelta::days(1));
    }

    #[test]
    fn test_unit_override() {
        let mut c = controller();
        c.set_unit_override(Some(TimeUnit::Month));
        assert_eq!(c.unit(), TimeUnit::Month);
        c.set_unit_override(None);
        assert_eq!(c.unit(), TimeUnit::Day);
    }

    #[test]
    fn test_fit_and_reset() {
        let mut c = controller();
        let items = vec![
            Item::new("a", t0() + TimeDelta::days(40), t0() + TimeDelta::days(50)),
            Item::new("b", t0() + TimeDelta::days(45), t0() + TimeDelta::days(60)),
        ];
        c.fit_to(&items);
        assert!(c.window().start() < items[0].start);
        assert!(c.window().end() > items[1].end);
        assert_eq!(c.visible_items(&items).count(), 2);

        c.reset_view();
        assert_eq!(c.window().start(), t0());
        assert_eq!(c.visible_items(&items).count(), 0);
    }

    #[test]
    fn test_pan_by_fraction() {
        let mut c = controller();
        c.pan_by_fraction(0.1);
        assert_eq!(c.window().start(), t0() + TimeDelta::days(1));
        c.pan_by_fraction(-0.2);
        assert_eq!(c.window().start(), t0() - TimeDelta::days(1));
    }

    #[test]
    fn test_go_to_centres() {
        let mut c = controller();
        let target = t0() + TimeDelta::days(100);
        c.go_to(target);
        assert_eq!(c.window().start(), target - TimeDelta::days(5));
    }

    proptest! {
        #[test]
        fn drag_preserves_duration(
            start_hours in 0i64..2000,
            len_minutes in 0i64..100_000,
            down in 0.0f32..1000.0,
            dx in -2000.0f32..2000.0,
        ) {
            let mut c = controller();
            let start = t0() + TimeDelta::hours(start_hours);
            let item = Item::new("p", start, start + TimeDelta::minutes(len_minutes));
            c.on_pointer_down(down);
            c.on_item_interact(&item);
            c.on_pointer_move(down + dx);
            let moved = c.on_pointer_up().unwrap();
            prop_assert_eq!(moved.end - moved.start, item.duration());
            prop_assert_eq!(c.unit().start_of(moved.start), moved.start);
        }

        #[test]
        fn wheel_zoom_stays_in_bounds(
            events in proptest::collection::vec((0.0f32..1000.0, -300.0f32..300.0, -400.0f32..400.0, any::<bool>()), 1..30),
        ) {
            let mut c = controller();
            let bounds = c.bounds();
            for (x, dx, dy, fast) in events {
                c.on_wheel(x, dx, dy, fast);
                prop_assert!(c.window().span() >= bounds.min);
                prop_assert!(c.window().span() <= bounds.max);
            }
        }
    }
}
