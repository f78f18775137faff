use eframe::egui;

use crate::model;

use super::View;

// Per-record scatter colors, cycled in record order.
const PALETTE: [egui::Color32; 10] = [
    egui::Color32::from_rgb(31, 119, 180),
    egui::Color32::from_rgb(255, 127, 14),
    egui::Color32::from_rgb(44, 160, 44),
    egui::Color32::from_rgb(214, 39, 40),
    egui::Color32::from_rgb(148, 103, 189),
    egui::Color32::from_rgb(140, 86, 75),
    egui::Color32::from_rgb(227, 119, 194),
    egui::Color32::from_rgb(127, 127, 127),
    egui::Color32::from_rgb(188, 189, 34),
    egui::Color32::from_rgb(23, 190, 207),
];

// Bounding box strokes: blue unselected, green selected.
const BOX_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 90, 200);
const BOX_COLOR_SELECTED: egui::Color32 = egui::Color32::from_rgb(40, 140, 60);

pub(super) fn record_color(idx: usize) -> egui::Color32 {
    PALETTE[idx % PALETTE.len()]
}

pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect, view: &View) {
    let bg = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(rect, 0.0, bg);

    let step = nice_step(80.0 / view.scale);
    let spacing_screen = (step * view.scale) as f32;
    if !spacing_screen.is_finite() || spacing_screen < 24.0 {
        return;
    }

    let grid_color = egui::Color32::from_gray(60);
    let label_color = egui::Color32::from_gray(140);
    let font = egui::FontId::monospace(10.0);

    let (min_x, min_y) = view.screen_to_data(rect, rect.left_bottom());
    let (max_x, max_y) = view.screen_to_data(rect, rect.right_top());

    let mut tick = (min_x / step).ceil() * step;
    while tick <= max_x {
        let sx = view.data_to_screen(rect, tick, 0.0).x;
        painter.line_segment(
            [egui::pos2(sx, rect.min.y), egui::pos2(sx, rect.max.y)],
            egui::Stroke::new(1.0, grid_color),
        );
        painter.text(
            egui::pos2(sx, rect.max.y - 2.0),
            egui::Align2::CENTER_BOTTOM,
            format_tick(tick, step),
            font.clone(),
            label_color,
        );
        tick += step;
    }

    let mut tick = (min_y / step).ceil() * step;
    while tick <= max_y {
        let sy = view.data_to_screen(rect, 0.0, tick).y;
        painter.line_segment(
            [egui::pos2(rect.min.x, sy), egui::pos2(rect.max.x, sy)],
            egui::Stroke::new(1.0, grid_color),
        );
        painter.text(
            egui::pos2(rect.min.x + 2.0, sy),
            egui::Align2::LEFT_CENTER,
            format_tick(tick, step),
            font.clone(),
            label_color,
        );
        tick += step;
    }
}

pub(super) fn draw_records(
    painter: &egui::Painter,
    rect: egui::Rect,
    view: &View,
    catalog: &model::Catalog,
    point_radius: f32,
) {
    let visible_px = rect.expand(point_radius);
    for (idx, record) in catalog.visible() {
        let color = record_color(idx);
        for (&x, &y) in record.table.x.iter().zip(&record.table.y) {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let pos = view.data_to_screen(rect, x, y);
            if visible_px.contains(pos) {
                painter.circle_filled(pos, point_radius, color);
            }
        }
        draw_bounding_box(painter, rect, view, record);
    }
}

fn draw_bounding_box(
    painter: &egui::Painter,
    rect: egui::Rect,
    view: &View,
    record: &model::Record,
) {
    let bounds = record.bounds;
    if bounds.is_empty() {
        return;
    }
    let a = view.data_to_screen(rect, bounds.min_x, bounds.min_y);
    let b = view.data_to_screen(rect, bounds.max_x, bounds.max_y);
    let box_rect = egui::Rect::from_two_pos(a, b);
    let (color, width) = if record.selected {
        (BOX_COLOR_SELECTED, 2.0)
    } else {
        (BOX_COLOR, 1.5)
    };
    painter.rect_stroke(
        box_rect,
        0.0,
        egui::Stroke::new(width, color),
        egui::StrokeKind::Middle,
    );
}

/// Rounds a target spacing to the nearest 1/2/5 decade step.
fn nice_step(target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(target.log10().floor());
    let normalized = target / magnitude;
    let step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{value:.0}")
    } else {
        let decimals = (-step.log10()).ceil().max(0.0) as usize;
        format!("{value:.decimals$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < expected * 1e-9,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn nice_step_snaps_to_decades() {
        assert_close(nice_step(1.0), 1.0);
        assert_close(nice_step(1.8), 2.0);
        assert_close(nice_step(4.0), 5.0);
        assert_close(nice_step(8.0), 10.0);
        assert_close(nice_step(0.03), 0.02);
        assert_close(nice_step(130.0), 100.0);
    }

    #[test]
    fn tick_labels_match_step_precision() {
        assert_eq!(format_tick(25.0, 5.0), "25");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-1.2, 0.2), "-1.2");
    }
}
