use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use egui::{Align2, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::model::lanes::{pack_lanes, Lane};
use crate::model::{Category, Item, ItemMoved, TimelineController};
use crate::ui::{components, theme};

/// Result details from interactions with the timeline.
#[derive(Debug, Clone, Default)]
pub struct TimelineInteraction {
    /// Set when a drag of an item was released.
    pub moved: Option<ItemMoved>,
    pub hovered: Option<Uuid>,
    /// Time under the pointer, if it is over the canvas.
    pub pointer_time: Option<DateTime<Utc>>,
}

/// Vertical placement of one lane.
struct LaneBand {
    rect: Rect,
    title: Option<String>,
}

/// Vertical placement of every item, computed from the lane packing.
struct BodyLayout {
    lanes: Vec<LaneBand>,
    slots: HashMap<Uuid, (f32, egui::Color32)>,
}

impl BodyLayout {
    fn compute(lanes: &[Lane<'_>], categories: &[Category], body: Rect) -> Self {
        let mut y = body.top();
        let mut bands = Vec::with_capacity(lanes.len());
        let mut slots = HashMap::new();

        for lane in lanes {
            let title = lane.category.map(|c| c.title.clone());
            let title_h = if title.is_some() {
                theme::LANE_TITLE_HEIGHT
            } else {
                0.0
            };
            let color = theme::lane_color(
                lane.category
                    .and_then(|c| categories.iter().position(|other| other.id == c.id)),
            );
            let rows_top = y + title_h + theme::LANE_PADDING;
            for (row_idx, row) in lane.rows.iter().enumerate() {
                let row_y = rows_top + row_idx as f32 * (theme::ROW_HEIGHT + theme::ROW_GAP);
                for item in row {
                    slots.insert(item.id, (row_y, color));
                }
            }
            let height = title_h
                + theme::LANE_PADDING * 2.0
                + lane.row_count() as f32 * (theme::ROW_HEIGHT + theme::ROW_GAP)
                - theme::ROW_GAP;
            bands.push(LaneBand {
                rect: Rect::from_min_size(Pos2::new(body.left(), y), Vec2::new(body.width(), height)),
                title,
            });
            y += height;
        }
        Self {
            lanes: bands,
            slots,
        }
    }
}

fn item_rect(controller: &TimelineController, origin_x: f32, item: &Item, row_y: f32) -> Rect {
    let vp = &controller.viewport;
    let left = origin_x + vp.time_to_x(controller.display_start(item));
    let width = vp.duration_to_width(item.duration()).max(theme::BAR_MIN_WIDTH);
    Rect::from_min_size(Pos2::new(left, row_y), Vec2::new(width, theme::ROW_HEIGHT))
}

/// Render the timeline and feed pointer, wheel and keyboard input into
/// `controller`.
pub fn show_timeline(
    controller: &mut TimelineController,
    items: &[Item],
    categories: &[Category],
    ui: &mut Ui,
) -> TimelineInteraction {
    let mut interaction = TimelineInteraction::default();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    let origin_x = rect.left();
    let body = Rect::from_min_max(Pos2::new(rect.left(), rect.top() + theme::HEADER_HEIGHT), rect.max);

    controller.on_resize(rect.width());

    let lanes = pack_lanes(items, categories);
    let layout = BodyLayout::compute(&lanes, categories, body);

    // ── Input ────────────────────────────────────────────────────────────
    // ctrl+wheel also shows up in `zoom_delta`; only the raw delta is used
    // so each wheel event zooms once.
    let (pressed, released, latest, scroll, ctrl) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.latest_pos(),
            i.raw_scroll_delta,
            i.modifiers.ctrl || i.modifiers.command,
        )
    });

    if let Some(hover) = response.hover_pos() {
        let x = hover.x - origin_x;
        interaction.pointer_time = Some(controller.viewport.x_to_time(x));
        if scroll != Vec2::ZERO {
            // egui reports wheel-up as positive; the controller expects the
            // opposite sign.
            controller.on_wheel(x, -scroll.x, -scroll.y, ctrl);
        }

        if pressed {
            let hit = items.iter().rev().find(|item| {
                layout
                    .slots
                    .get(&item.id)
                    .is_some_and(|(y, _)| item_rect(controller, origin_x, item, *y).contains(hover))
            });
            if let Some(item) = hit {
                controller.on_item_interact(item);
            }
            controller.on_pointer_down(x);
        }
    }

    if controller.is_dragging() {
        if let Some(pos) = latest {
            controller.on_pointer_move(pos.x - origin_x);
        }
        if released {
            interaction.moved = controller.on_pointer_up();
        }
    }

    if response.hovered() && !controller.is_dragging() {
        let (left, right, plus, minus) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                i.key_pressed(egui::Key::Minus),
            )
        });
        if left {
            controller.pan_by_fraction(-0.1);
        }
        if right {
            controller.pan_by_fraction(0.1);
        }
        if plus {
            controller.zoom_by(0.8);
        }
        if minus {
            controller.zoom_by(1.25);
        }
    }

    // ── Paint ────────────────────────────────────────────────────────────
    painter.rect_filled(rect, 0.0, theme::BG_DARK);

    for (i, band) in layout.lanes.iter().enumerate() {
        components::category_lane(&painter, band.rect, band.title.as_deref(), i % 2 == 1);
    }

    draw_header(&painter, controller, rect);
    draw_now_line(&painter, controller, rect);

    let body_painter = painter.with_clip_rect(body);
    let window = *controller.window();
    for item in items {
        let Some((row_y, color)) = layout.slots.get(&item.id) else {
            continue;
        };
        let start = controller.display_start(item);
        let end = start + item.duration().max(TimeDelta::milliseconds(1));
        if !window.overlaps(start, end) {
            continue;
        }
        let bar = item_rect(controller, origin_x, item, *row_y);
        let active = controller.is_active(item.id);
        components::item_block(&body_painter, bar, item, *color, active);

        if !controller.is_dragging() && response.hover_pos().is_some_and(|p| bar.contains(p)) {
            interaction.hovered = Some(item.id);
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            egui::show_tooltip_at_pointer(
                ui.ctx(),
                ui.layer_id(),
                egui::Id::new(("item-tip", item.id)),
                |ui| {
                    ui.strong(&item.title);
                    ui.label(format!(
                        "{} → {}",
                        item.start.format("%d.%m.%Y %H:%M"),
                        item.end.format("%d.%m.%Y %H:%M"),
                    ));
                    if let Some(category) = &item.category {
                        ui.label(format!("Category: {}", category));
                    }
                },
            );
        }
    }

    if controller.is_dragging() {
        let icon = if controller.drag().active_item.is_some() {
            egui::CursorIcon::Grabbing
        } else {
            egui::CursorIcon::AllScroll
        };
        ui.ctx().set_cursor_icon(icon);
        // keep repainting while the pointer is held outside the canvas
        ui.ctx().request_repaint();
    }

    interaction
}

fn draw_header(painter: &egui::Painter, controller: &TimelineController, rect: Rect) {
    let header = Rect::from_min_size(rect.min, Vec2::new(rect.width(), theme::HEADER_HEIGHT));
    let header_painter = painter.with_clip_rect(header);
    header_painter.rect_filled(header, 0.0, theme::BG_HEADER);

    let vp = &controller.viewport;
    let unit = controller.unit();

    if let Some(parent) = unit.parent() {
        for cell in vp.tick_layout(parent) {
            let cell_rect = Rect::from_min_size(
                Pos2::new(rect.left() + cell.left, rect.top()),
                Vec2::new(cell.width, theme::PERIOD_ROW_HEIGHT),
            );
            components::period_cell(&header_painter, cell_rect, &parent.period_label(cell.tick.current));
        }
    } else {
        let band = Rect::from_min_size(rect.min, Vec2::new(rect.width(), theme::PERIOD_ROW_HEIGHT));
        header_painter.rect_filled(band, 0.0, theme::BG_PERIOD);
        header_painter.text(
            Pos2::new(rect.left() + 6.0, band.center().y),
            Align2::LEFT_CENTER,
            format!(
                "{} – {}",
                vp.window.start().format("%b %Y"),
                vp.window.end().format("%b %Y")
            ),
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }

    let tick_top = rect.top() + theme::PERIOD_ROW_HEIGHT;
    for cell in vp.tick_layout(unit) {
        let x = rect.left() + cell.left;
        let cell_rect = Rect::from_min_size(
            Pos2::new(x, tick_top),
            Vec2::new(cell.width, theme::TICK_ROW_HEIGHT),
        );
        components::header_cell(&header_painter, cell_rect, &unit.tick_label(cell.tick.current));
        painter.line_segment(
            [
                Pos2::new(x, rect.top() + theme::HEADER_HEIGHT),
                Pos2::new(x, rect.bottom()),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }

    painter.line_segment(
        [
            Pos2::new(rect.left(), rect.top() + theme::HEADER_HEIGHT),
            Pos2::new(rect.right(), rect.top() + theme::HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_now_line(painter: &egui::Painter, controller: &TimelineController, rect: Rect) {
    let now = Utc::now();
    let window = controller.window();
    if now < window.start() || now > window.end() {
        return;
    }
    let x = rect.left() + controller.viewport.time_to_x(now);
    painter.line_segment(
        [
            Pos2::new(x, rect.top() + theme::HEADER_HEIGHT),
            Pos2::new(x, rect.bottom()),
        ],
        Stroke::new(1.5, theme::NOW_LINE),
    );
}
