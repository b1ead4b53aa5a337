use chrono::{DateTime, TimeDelta, Utc};

use crate::error::AppError;

/// Limits on the visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomBounds {
    pub min: TimeDelta,
    pub max: TimeDelta,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: TimeDelta::hours(1),
            max: TimeDelta::days(365),
        }
    }
}

impl ZoomBounds {
    /// Clamp a span in milliseconds. Max wins if the bounds are inverted.
    fn clamp_millis(&self, span_ms: i64) -> i64 {
        span_ms
            .max(self.min.num_milliseconds())
            .min(self.max.num_milliseconds())
    }
}

/// The visible time range. `span` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    span: TimeDelta,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::InvalidWindow { start, end });
        }
        Ok(Self {
            start,
            span: end - start,
        })
    }

    /// A window of `span` centred on `t`. Non-positive spans become one hour.
    pub fn centered(t: DateTime<Utc>, span: TimeDelta) -> Self {
        let span = if span > TimeDelta::zero() {
            span
        } else {
            TimeDelta::hours(1)
        };
        Self {
            start: t - span / 2,
            span,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.span
    }

    pub fn span(&self) -> TimeDelta {
        self.span
    }

    pub fn span_millis(&self) -> f64 {
        self.span.num_milliseconds() as f64
    }

    /// True if `[start, end)` intersects the window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end() && end > self.start
    }

    /// Move the window so it begins at `start`, keeping the span.
    pub fn set_start(&mut self, start: DateTime<Utc>) {
        self.start = start;
    }

    pub fn pan_by(&mut self, delta: TimeDelta) {
        self.start += delta;
    }

    /// Re-apply `bounds` to the current span, keeping the centre fixed.
    pub fn clamp_to(&mut self, bounds: ZoomBounds) {
        self.zoom_and_move(1.0, 0.5, 0.0, bounds);
    }

    /// Rescale the span by `scale` around the fractional position `anchor`
    /// (0 = left edge, 1 = right edge), then shift by `move_offset` spans.
    ///
    /// The resulting span is clamped to `bounds` and all arithmetic is rounded
    /// to whole milliseconds.
    pub fn zoom_and_move(&mut self, scale: f64, anchor: f64, move_offset: f64, bounds: ZoomBounds) {
        if !scale.is_finite() || !anchor.is_finite() || !move_offset.is_finite() {
            return;
        }
        let span_ms = self.span_millis();
        let new_span_ms = bounds.clamp_millis((span_ms * scale).round() as i64);
        if new_span_ms <= 0 {
            return;
        }
        let new_span = new_span_ms as f64;
        let start_ms = (self.start.timestamp_millis() as f64
            + (span_ms - new_span) * anchor
            + new_span * move_offset)
            .round() as i64;

        if let Some(start) = DateTime::from_timestamp_millis(start_ms) {
            self.start = start;
            self.span = TimeDelta::milliseconds(new_span_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn window(days: i64) -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeWindow::new(start, start + TimeDelta::days(days)).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_window() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(t, t).is_err());
        assert!(TimeWindow::new(t, t - TimeDelta::hours(1)).is_err());
    }

    #[test]
    fn test_centered_window() {
        let t = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let w = TimeWindow::centered(t, TimeDelta::days(4));
        assert_eq!(w.start(), t - TimeDelta::days(2));
        assert_eq!(w.end(), t + TimeDelta::days(2));
        assert_eq!(TimeWindow::centered(t, TimeDelta::zero()).span(), TimeDelta::hours(1));
    }

    #[test]
    fn test_zoom_in_around_left_edge_keeps_start() {
        let mut w = window(10);
        let start = w.start();
        w.zoom_and_move(0.5, 0.0, 0.0, ZoomBounds::default());
        assert_eq!(w.start(), start);
        assert_eq!(w.span(), TimeDelta::days(5));
    }

    #[test]
    fn test_zoom_around_centre_keeps_centre() {
        let mut w = window(10);
        let centre = w.start() + TimeDelta::days(5);
        w.zoom_and_move(2.0, 0.5, 0.0, ZoomBounds::default());
        assert_eq!(w.span(), TimeDelta::days(20));
        assert_eq!(w.start() + TimeDelta::days(10), centre);
    }

    #[test]
    fn test_move_offset_pans_by_fraction_of_new_span() {
        let mut w = window(10);
        let start = w.start();
        w.zoom_and_move(1.0, 0.3, 0.1, ZoomBounds::default());
        assert_eq!(w.start(), start + TimeDelta::days(1));
        assert_eq!(w.span(), TimeDelta::days(10));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut w = window(10);
        w.zoom_and_move(1e-9, 0.5, 0.0, ZoomBounds::default());
        assert_eq!(w.span(), TimeDelta::hours(1));
        w.zoom_and_move(1e9, 0.5, 0.0, ZoomBounds::default());
        assert_eq!(w.span(), TimeDelta::days(365));
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut w = window(10);
        let before = w;
        w.zoom_and_move(f64::NAN, 0.5, 0.0, ZoomBounds::default());
        w.zoom_and_move(2.0, f64::INFINITY, 0.0, ZoomBounds::default());
        assert_eq!(w, before);
    }

    #[test]
    fn test_negative_scale_collapses_to_min() {
        let mut w = window(10);
        w.zoom_and_move(-2.0, 0.5, 0.0, ZoomBounds::default());
        assert_eq!(w.span(), TimeDelta::hours(1));
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let w = window(1);
        let end = w.end();
        assert!(!w.overlaps(end, end + TimeDelta::hours(1)));
        assert!(!w.overlaps(w.start() - TimeDelta::hours(1), w.start()));
        assert!(w.overlaps(end - TimeDelta::hours(1), end + TimeDelta::hours(1)));
    }

    proptest! {
        #[test]
        fn zoom_never_leaves_bounds(
            days in 1i64..2000,
            steps in proptest::collection::vec((0.01f64..10.0, 0.0f64..1.0, -1.0f64..1.0), 1..20),
        ) {
            let bounds = ZoomBounds::default();
            let mut w = window(days);
            for (scale, anchor, offset) in steps {
                w.zoom_and_move(scale, anchor, offset, bounds);
                prop_assert!(w.span() >= bounds.min);
                prop_assert!(w.span() <= bounds.max);
                prop_assert!(w.end() > w.start());
            }
        }
    }
}
