use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};
use egui_phosphor::regular as icons;

/// How the timeline reacts to the mouse, shown in the About dialog.
const CONTROLS_HELP: &[&str] = &[
    "Scroll to zoom, ctrl for faster zoom.",
    "Shift+scroll or drag the background to pan.",
    "Drag a bar to move it in time.",
];

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 210.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Rust Timeline App").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                for line in CONTROLS_HELP {
                    ui.label(*line);
                }
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([520.0, 440.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                // ── Delimiters ───────────────────────────────────────────
                ui.label(RichText::new("Delimiters").strong());
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                // ── Columns ──────────────────────────────────────────────
                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(3)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").underline());
                        ui.label(RichText::new("Accepted headers").underline());
                        ui.label(RichText::new("Required").underline());
                        ui.end_row();

                        for (column, headers, required) in [
                            ("Title", "Title, Name, Label, Task, Item, Activity", "yes"),
                            ("Start", "Start, Start Date, Start Time, From, Begin", "yes"),
                            ("End", "End, End Date, End Time, To, Finish, Until", "yes"),
                            ("Category", "Category, Type, Group, Lane", "no"),
                            ("Id", "Id, Key, UUID", "no"),
                        ] {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.label(required);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                // ── Date formats ─────────────────────────────────────────
                ui.label(RichText::new("Supported Date Formats").strong());
                ui.add_space(2.0);
                for fmt in &[
                    "RFC 3339              (e.g. 2025-06-15T09:30:00Z)",
                    "YYYY-MM-DD HH:MM[:SS] (e.g. 2025-06-15 09:30)",
                    "DD/MM/YYYY HH:MM      (e.g. 15/06/2025 09:30)",
                    "DD.MM.YYYY HH:MM      (e.g. 15.06.2025 09:30)",
                    "YYYY-MM-DD            (e.g. 2025-06-15)",
                    "DD/MM/YYYY            (e.g. 15/06/2025)",
                ] {
                    ui.label(RichText::new(*fmt).monospace().size(11.0));
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                let notes = [
                    "• Times without an offset are read as UTC.",
                    "• Rows with a missing title or an unreadable date are skipped.",
                    "• An end before the start is swapped.",
                    "• Each distinct category becomes its own lane.",
                ];
                for note in &notes {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(10.0);

                ui.label(RichText::new("Example (semicolon-delimited)").strong());
                ui.add_space(2.0);
                let example = "Title;Start;End;Category\n\
                               Design;2025-01-06;2025-01-17;dev\n\
                               Build;2025-01-13 09:00;2025-02-07 17:00;dev\n\
                               Review;2025-02-10 10:00;2025-02-10 12:00;";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_csv_help = false;
    }
}

/// Render the error dialog for `app.error`.
pub fn show_error_dialog(app: &mut TimelineApp, ctx: &Context) {
    let Some(error) = &app.error else {
        return;
    };
    let mut should_close = false;

    Window::new(RichText::new(error.dialog_title()).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([420.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(icons::WARNING_CIRCLE)
                        .size(22.0)
                        .color(theme::NOW_LINE),
                );
                ui.label(RichText::new(error.to_string()).color(theme::TEXT_PRIMARY));
            });

            let details = error.details();
            if !details.is_empty() {
                ui.add_space(6.0);
                for line in &details {
                    ui.label(
                        RichText::new(format!("• {}", line))
                            .small()
                            .color(theme::TEXT_SECONDARY),
                    );
                }
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            let ok_btn = egui::Button::new(RichText::new("OK").color(Color32::WHITE))
                .fill(theme::ACCENT)
                .rounding(egui::Rounding::same(4.0));
            if ui.add_sized([80.0, 28.0], ok_btn).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_help_matches_wheel_handling() {
        // vertical wheel zooms, only shift (horizontal) scroll pans
        assert!(CONTROLS_HELP[0].starts_with("Scroll to zoom"));
        assert!(CONTROLS_HELP.iter().any(|l| l.contains("Shift+scroll") && l.contains("pan")));
        assert!(!CONTROLS_HELP.iter().any(|l| l.starts_with("Scroll to pan")));
    }
}
