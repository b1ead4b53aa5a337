use chrono::{DateTime, TimeDelta, Utc};

use super::unit::{ticks, Tick, TimeUnit};
use super::window::TimeWindow;

/// Pixel thresholds used to pick the header granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitThresholds {
    /// Minimum pixels per hour before hour ticks are used.
    pub hour_min_px: f64,
    /// Minimum pixels per day before day ticks are used.
    pub day_min_px: f64,
    /// Unit used while the canvas width is still unknown.
    pub fallback: TimeUnit,
}

impl Default for UnitThresholds {
    fn default() -> Self {
        Self {
            hour_min_px: 40.0,
            day_min_px: 30.0,
            fallback: TimeUnit::Day,
        }
    }
}

/// A tick positioned on the canvas, relative to its left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayout {
    pub tick: Tick,
    pub left: f32,
    pub width: f32,
}

/// The visible window plus the pixel width it is drawn into.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    pub window: TimeWindow,
    /// Width of the drawing surface in points. Zero until the first layout.
    width: f32,
}

impl TimelineViewport {
    pub fn new(window: TimeWindow) -> Self {
        Self { window, width: 0.0 }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Update the canvas width. Returns true if it changed.
    pub fn set_width(&mut self, width: f32) -> bool {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if (width - self.width).abs() > f32::EPSILON {
            self.width = width;
            true
        } else {
            false
        }
    }

    fn has_extent(&self) -> bool {
        self.width > 0.0 && self.window.span_millis() > 0.0
    }

    /// Convert an instant to an x offset from the canvas left edge.
    pub fn time_to_x(&self, t: DateTime<Utc>) -> f32 {
        if !self.has_extent() {
            return 0.0;
        }
        let offset_ms = (t - self.window.start()).num_milliseconds() as f64;
        (offset_ms * self.width as f64 / self.window.span_millis()) as f32
    }

    /// Convert an x offset back to an instant.
    pub fn x_to_time(&self, x: f32) -> DateTime<Utc> {
        self.window.start() + self.x_to_duration(x)
    }

    /// The time covered by `dx` pixels at the current zoom.
    pub fn x_to_duration(&self, dx: f32) -> TimeDelta {
        if !self.has_extent() {
            return TimeDelta::zero();
        }
        let ms = (dx as f64 * self.window.span_millis() / self.width as f64).round() as i64;
        TimeDelta::milliseconds(ms)
    }

    pub fn duration_to_width(&self, d: TimeDelta) -> f32 {
        if !self.has_extent() {
            return 0.0;
        }
        (d.num_milliseconds() as f64 * self.width as f64 / self.window.span_millis()) as f32
    }

    pub fn pixels_per_hour(&self) -> Option<f64> {
        if !self.has_extent() {
            return None;
        }
        Some(self.width as f64 * 3_600_000.0 / self.window.span_millis())
    }

    /// Pick hour, day or month ticks for the current zoom.
    pub fn compute_unit(&self, thresholds: &UnitThresholds) -> TimeUnit {
        match self.pixels_per_hour() {
            None => thresholds.fallback,
            Some(pph) if pph >= thresholds.hour_min_px => TimeUnit::Hour,
            Some(pph) if pph * 24.0 >= thresholds.day_min_px => TimeUnit::Day,
            Some(_) => TimeUnit::Month,
        }
    }

    /// Ticks of `unit` covering the window, mapped to pixels.
    pub fn tick_layout(&self, unit: TimeUnit) -> Vec<TickLayout> {
        ticks(self.window.start(), self.window.end(), unit)
            .map(|tick| TickLayout {
                tick,
                left: self.time_to_x(tick.current),
                width: self.duration_to_width(tick.next - tick.current),
            })
            .collect()
    }
}
