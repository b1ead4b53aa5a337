use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::config::TimelineOptions;
use crate::error::AppError;
use crate::model::{Dataset, ItemMoved, TimeWindow, TimelineController};
use crate::ui;

/// Main application state. Owns the items; the timeline controller only
/// proposes moves.
pub struct TimelineApp {
    pub dataset: Dataset,
    pub controller: TimelineController,
    pub options: TimelineOptions,
    pub settings_path: PathBuf,

    // Dialog state
    pub show_about: bool,
    pub show_csv_help: bool,
    pub error: Option<AppError>,

    /// Target of the "go to date" picker.
    pub goto_date: NaiveDate,
    pub hovered: Option<Uuid>,
    pub pointer_time: Option<DateTime<Utc>>,
    pub status_message: String,
}

impl TimelineApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        dataset: Dataset,
        options: TimelineOptions,
        settings_path: PathBuf,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        Self::with_dataset(dataset, options, settings_path)
    }

    /// Build the app state without an egui context.
    pub fn with_dataset(mut dataset: Dataset, options: TimelineOptions, settings_path: PathBuf) -> Self {
        dataset.derive_categories();
        let (window, error) = Self::window_for(&dataset, &options);
        let status_message = format!("Loaded '{}' ({} items)", dataset.name, dataset.items.len());
        Self {
            controller: TimelineController::new(window, &options),
            dataset,
            options,
            settings_path,
            show_about: false,
            show_csv_help: false,
            error,
            goto_date: Utc::now().date_naive(),
            hovered: None,
            pointer_time: None,
            status_message,
        }
    }

    fn window_for(dataset: &Dataset, options: &TimelineOptions) -> (TimeWindow, Option<AppError>) {
        match dataset.initial_window(options.initial_span()) {
            Ok(window) => (window, None),
            Err(e) => {
                log::warn!("{}; showing default window", e);
                (TimeWindow::centered(Utc::now(), options.initial_span()), Some(e))
            }
        }
    }

    /// Replace the current dataset and reset the view to fit it.
    pub fn set_dataset(&mut self, mut dataset: Dataset) {
        dataset.derive_categories();
        let (window, error) = Self::window_for(&dataset, &self.options);
        let unit_override = self.controller.unit_override();
        self.controller = TimelineController::new(window, &self.options);
        self.controller.set_unit_override(unit_override);
        self.status_message = format!("Loaded '{}' ({} items)", dataset.name, dataset.items.len());
        log::info!("{}", self.status_message);
        self.dataset = dataset;
        self.hovered = None;
        if error.is_some() {
            self.error = error;
        }
    }

    pub fn report_error(&mut self, e: AppError) {
        log::error!("{}", e);
        self.status_message = e.to_string();
        self.error = Some(e);
    }

    // --- File operations ---

    pub fn open_dataset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["json"])
            .pick_file()
        {
            self.load_dataset_from(&path);
        }
    }

    pub fn load_dataset_from(&mut self, path: &Path) {
        match crate::io::load_dataset(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.report_error(e),
        }
    }

    pub fn import_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match crate::io::import_csv(&path) {
                Ok((items, skipped)) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("Imported Timeline")
                        .to_string();
                    let count = items.len();
                    self.set_dataset(Dataset::new(name, items));
                    self.status_message = if skipped > 0 {
                        format!("Imported {} items ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} items", count)
                    };
                }
                Err(e) => self.report_error(e),
            }
        }
    }

    pub fn load_sample(&mut self) {
        self.set_dataset(Dataset::sample());
    }

    pub fn save_settings(&mut self) {
        match self.options.save(&self.settings_path) {
            Ok(()) => {
                self.status_message = format!("Settings written to {}", self.settings_path.display());
            }
            Err(e) => self.report_error(e),
        }
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = self.settings_path.parent() else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir).and_then(|_| open::that(dir)) {
            log::warn!("could not open {}: {}", dir.display(), e);
            self.status_message = format!("Could not open {}", dir.display());
        }
    }

    // --- View operations ---

    pub fn go_to_date(&mut self) {
        let target = self.goto_date.and_time(NaiveTime::MIN).and_utc();
        self.controller.go_to(target);
    }

    pub fn fit_to_items(&mut self) {
        self.controller.fit_to(&self.dataset.items);
    }

    /// Apply a move proposed by the timeline.
    pub fn apply_move(&mut self, moved: ItemMoved) {
        match moved.apply(&mut self.dataset.items) {
            Some(item) => {
                self.status_message = format!(
                    "Moved '{}' to {} → {}",
                    item.title,
                    item.start.format("%Y-%m-%d %H:%M"),
                    item.end.format("%Y-%m-%d %H:%M")
                );
                log::info!("{}", self.status_message);
            }
            None => log::warn!("moved item {} no longer exists", moved.id),
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui::toolbar::show_status_bar(self, ui);
            });

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::timeline_chart::show_timeline(
                &mut self.controller,
                &self.dataset.items,
                &self.dataset.categories,
                ui,
            );
            self.hovered = interaction.hovered;
            self.pointer_time = interaction.pointer_time;
            if let Some(moved) = interaction.moved {
                self.apply_move(moved);
                ctx.request_repaint();
            }
        });

        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
        if self.error.is_some() {
            ui::dialogs::show_error_dialog(self, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    use crate::model::Item;

    fn app() -> TimelineApp {
        let t = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        let dataset = Dataset::new(
            "test",
            vec![Item::new("a", t, t + TimeDelta::days(2)).with_category("dev")],
        );
        TimelineApp::with_dataset(dataset, TimelineOptions::default(), PathBuf::from("settings.json"))
    }

    #[test]
    fn test_apply_move_updates_owned_item() {
        let mut app = app();
        let id = app.dataset.items[0].id;
        let start = app.dataset.items[0].start + TimeDelta::days(3);
        app.apply_move(ItemMoved {
            id,
            start,
            end: start + TimeDelta::days(2),
        });
        assert_eq!(app.dataset.items[0].start, start);
        assert!(app.status_message.starts_with("Moved 'a'"));
    }

    #[test]
    fn test_set_dataset_reports_invalid_window() {
        let mut app = app();
        let t = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        let mut ds = Dataset::new("broken", vec![Item::new("b", t, t).with_category("ops")]);
        ds.start = Some(t);
        ds.end = Some(t - TimeDelta::days(1));
        app.set_dataset(ds);
        assert!(matches!(app.error, Some(AppError::InvalidWindow { .. })));
        assert_eq!(app.dataset.categories.len(), 1);
        assert_eq!(app.controller.window().span(), TimeDelta::days(30));
    }

    #[test]
    fn test_go_to_date_centres_window() {
        let mut app = app();
        app.goto_date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        app.go_to_date();
        let window = app.controller.window();
        let centre = window.start() + window.span() / 2;
        assert_eq!(centre, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }
}
