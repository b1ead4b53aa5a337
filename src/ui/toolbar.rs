use crate::app::TimelineApp;
use crate::model::TimeUnit;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  File  ", |ui| {
            if ui.button(format!("{}  Open Timeline...", icons::FOLDER_OPEN)).clicked() {
                app.open_dataset();
                ui.close_menu();
            }
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  Load Sample").clicked() {
                app.load_sample();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Write Settings File").clicked() {
                app.save_settings();
                ui.close_menu();
            }
            if ui.button("  Open Settings Folder").clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("  View  ", |ui| {
            let span = app.controller.window().span();
            let bounds = app.controller.bounds();
            let zoom_in = egui::Button::new(format!("{}  Zoom In        +", icons::MAGNIFYING_GLASS_PLUS));
            if ui.add_enabled(span > bounds.min, zoom_in).clicked() {
                app.controller.zoom_by(0.8);
                ui.close_menu();
            }
            let zoom_out = egui::Button::new(format!("{}  Zoom Out      -", icons::MAGNIFYING_GLASS_MINUS));
            if ui.add_enabled(span < bounds.max, zoom_out).clicked() {
                app.controller.zoom_by(1.25);
                ui.close_menu();
            }
            if ui.button("  Fit to Items").clicked() {
                app.fit_to_items();
                ui.close_menu();
            }
            if ui.button("  Reset View").clicked() {
                app.controller.reset_view();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Timeline Scale").small().weak());
            let current = app.controller.unit_override();
            if ui.radio(current.is_none(), "Auto").clicked() {
                app.controller.set_unit_override(None);
                ui.close_menu();
            }
            for unit in TimeUnit::ALL {
                if ui.radio(current == Some(unit), unit.name()).clicked() {
                    app.controller.set_unit_override(Some(unit));
                    ui.close_menu();
                }
            }
        });

        ui.menu_button("  Help  ", |ui| {
            if ui.button("CSV Format").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(icons::CALENDAR_BLANK).color(theme::TEXT_SECONDARY));
        ui.add(egui_extras::DatePickerButton::new(&mut app.goto_date).id_salt("goto_date"));
        if ui.button("Go").clicked() {
            app.go_to_date();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(&app.dataset.name).size(11.0).weak());
        });
    });
}

/// Render the bottom status bar.
pub fn show_status_bar(app: &TimelineApp, ui: &mut Ui) {
    ui.horizontal_centered(|ui| {
        ui.label(
            RichText::new(&app.status_message)
                .font(theme::font_sub())
                .color(theme::TEXT_SECONDARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let window = app.controller.window();
            let unit = app.controller.unit();
            let scale = match app.controller.unit_override() {
                Some(_) => unit.name().to_string(),
                None => format!("{} (auto)", unit.name()),
            };
            ui.label(RichText::new(scale).size(10.5).color(theme::TEXT_DIM));
            ui.label(RichText::new(" · ").size(10.5).color(theme::TEXT_DIM));
            ui.label(
                RichText::new(format!(
                    "{} → {}",
                    window.start().format("%Y-%m-%d %H:%M"),
                    window.end().format("%Y-%m-%d %H:%M")
                ))
                .size(10.5)
                .color(theme::TEXT_DIM),
            );
            ui.label(RichText::new(" · ").size(10.5).color(theme::TEXT_DIM));
            let visible = app.controller.visible_items(&app.dataset.items).count();
            ui.label(
                RichText::new(format!("Items: {} / {}", visible, app.dataset.items.len()))
                    .size(10.5)
                    .color(theme::TEXT_DIM),
            );
            if let Some(item) = app
                .hovered
                .and_then(|id| app.dataset.items.iter().find(|i| i.id == id))
            {
                ui.label(RichText::new(" · ").size(10.5).color(theme::TEXT_DIM));
                ui.label(RichText::new(&item.title).size(10.5).color(theme::TEXT_SECONDARY));
            }
            if let Some(t) = app.pointer_time {
                ui.label(RichText::new(" · ").size(10.5).color(theme::TEXT_DIM));
                ui.label(
                    RichText::new(t.format("%Y-%m-%d %H:%M").to_string())
                        .size(10.5)
                        .color(theme::TEXT_SECONDARY),
                );
            }
        });
    });
}
