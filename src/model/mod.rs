pub mod controller;
pub mod dataset;
pub mod item;
pub mod lanes;
pub mod timeline;
pub mod unit;
pub mod window;

pub use controller::TimelineController;
pub use dataset::Dataset;
pub use item::{Category, Item, ItemMoved};
pub use timeline::UnitThresholds;
pub use unit::TimeUnit;
pub use window::{TimeWindow, ZoomBounds};
