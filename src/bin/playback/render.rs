use bouncing_ball::playback::{CanvasScale, Playback};
use bouncing_ball::plot::SERIES_COLORS;
use macroquad::prelude::*;
use nalgebra::Vector2;

use crate::constants::{
    LABEL_COLOR, LEGEND_FONT_SIZE, LEGEND_OFFSET_X, LEGEND_OFFSET_Y, LEGEND_ROW_PX,
    LEGEND_TEXT_GAP_PX, MARKER_RADIUS, TRAIL_STRIDE, TRAIL_THICKNESS,
};

pub(crate) fn angle_color(index: usize) -> Color {
    let rgb = SERIES_COLORS[index % SERIES_COLORS.len()];
    Color::from_rgba(rgb.0, rgb.1, rgb.2, 255)
}

pub(crate) fn draw_legend(playback: &Playback, screen_w: f32) {
    let angles = playback.set().angles();
    let marker_x = screen_w - LEGEND_OFFSET_X;
    for &index in playback.indices() {
        let row_y = LEGEND_OFFSET_Y + LEGEND_ROW_PX * (index + 1) as f32;
        draw_circle(marker_x, row_y, MARKER_RADIUS, angle_color(index));
        draw_text(
            &angles[index].label(),
            marker_x + LEGEND_TEXT_GAP_PX,
            row_y + MARKER_RADIUS,
            LEGEND_FONT_SIZE,
            LABEL_COLOR,
        );
    }
}

/// Draws the first `shown` recorded positions as a polyline.
pub(crate) fn draw_trail(
    positions: &[Vector2<f64>],
    shown: usize,
    scale: CanvasScale,
    color: Color,
) {
    let visible = &positions[..shown.min(positions.len())];
    let Some(first) = visible.first() else {
        return;
    };

    let (mut prev_x, mut prev_y) = scale.to_canvas(first);
    let last_index = visible.len() - 1;
    let strided = (TRAIL_STRIDE..visible.len()).step_by(TRAIL_STRIDE);
    for i in strided.chain(std::iter::once(last_index)) {
        let (x, y) = scale.to_canvas(&visible[i]);
        draw_line(prev_x, prev_y, x, y, TRAIL_THICKNESS, color);
        prev_x = x;
        prev_y = y;
    }
    draw_circle(prev_x, prev_y, MARKER_RADIUS, color);
}
