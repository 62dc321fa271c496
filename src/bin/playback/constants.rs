use macroquad::prelude::Color;

pub const WINDOW_TITLE: &str = "Bouncing ball simulation";
pub const MSAA_SAMPLES: i32 = 4;
pub const BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const LABEL_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

pub const LEGEND_OFFSET_X: f32 = 120.0;
pub const LEGEND_OFFSET_Y: f32 = 50.0;
pub const LEGEND_ROW_PX: f32 = 20.0;
pub const LEGEND_TEXT_GAP_PX: f32 = 14.0;
pub const LEGEND_FONT_SIZE: f32 = 18.0;
pub const MARKER_RADIUS: f32 = 4.0;

pub const TRAIL_THICKNESS: f32 = 1.5;
pub const TRAIL_STRIDE: usize = 5;
