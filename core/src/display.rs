use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::Point,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::framebuffer::{Bitmap128x64, HEIGHT, WIDTH};
use crate::viewer::ViewerState;

pub const PLACEHOLDER: &str = "No Image";

pub trait Display {
    fn show(&mut self, frame: &Bitmap128x64);
}

/// Compose the frame for the current viewer state: the converted image, or
/// a centred placeholder on a bright background.
pub fn render(state: &ViewerState, frame: &mut Bitmap128x64) {
    if let Some(bitmap) = state.current_bitmap() {
        frame.clone_from(bitmap);
        return;
    }
    frame.clear(true);
    let character_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let center = Point::new(WIDTH as i32 / 2, HEIGHT as i32 / 2);
    Text::with_text_style(PLACEHOLDER, center, character_style, text_style)
        .draw(frame)
        .ok();
}
