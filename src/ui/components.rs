//! Presentational pieces of the timeline: header cells, period cells, item
//! blocks and category lanes. None of these hold state.

use egui::{Align2, Color32, Painter, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::model::Item;
use crate::ui::theme;

/// One tick of the lower header row.
pub fn header_cell(painter: &Painter, rect: Rect, label: &str) {
    painter.line_segment(
        [rect.left_top(), rect.left_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    if rect.width() < 18.0 {
        return;
    }
    painter
        .with_clip_rect(rect.intersect(painter.clip_rect()))
        .text(
            rect.center(),
            Align2::CENTER_CENTER,
            label,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
}

/// One period of the upper header row. The label sticks to the visible part
/// of the period so it stays readable while panning.
pub fn period_cell(painter: &Painter, rect: Rect, label: &str) {
    painter.rect_filled(rect, 0.0, theme::BG_PERIOD);
    painter.line_segment(
        [rect.left_top(), rect.left_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    let visible = rect.intersect(painter.clip_rect());
    if visible.width() < 24.0 {
        return;
    }
    painter.with_clip_rect(visible).text(
        Pos2::new(visible.left() + 6.0, visible.center().y),
        Align2::LEFT_CENTER,
        label,
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );
}

/// Background band of a lane with its title in the top-left corner.
pub fn category_lane(painter: &Painter, rect: Rect, title: Option<&str>, alternate: bool) {
    let fill = if alternate {
        theme::BG_LANE_ALT
    } else {
        theme::BG_DARK
    };
    painter.rect_filled(rect, 0.0, fill);
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    if let Some(title) = title {
        painter.text(
            Pos2::new(rect.left() + 8.0, rect.top() + 3.0),
            Align2::LEFT_TOP,
            title,
            theme::font_small(),
            theme::TEXT_DIM,
        );
    }
}

/// A draggable item bar.
pub fn item_block(painter: &Painter, rect: Rect, item: &Item, color: Color32, active: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    let shadow_offset = if active {
        Vec2::new(2.0, 4.0)
    } else {
        Vec2::new(1.0, 2.0)
    };
    painter.rect_filled(
        rect.translate(shadow_offset),
        rounding,
        Color32::from_black_alpha(if active { 70 } else { 35 }),
    );

    painter.rect_filled(rect, rounding, color);
    let highlight = Rect::from_min_size(
        rect.min,
        Vec2::new(rect.width(), (rect.height() * 0.45).max(4.0)),
    );
    painter.rect_filled(
        highlight,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if active {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if rect.width() > 24.0 {
        let galley = painter.layout_no_wrap(item.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = rect.top() + (rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(rect.intersect(painter.clip_rect()))
            .galley(Pos2::new(rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }
}
