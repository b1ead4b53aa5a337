pub mod components;
pub mod dialogs;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
