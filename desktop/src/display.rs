use monoview_core::{
    display::Display,
    framebuffer::{Bitmap128x64, HEIGHT, WIDTH},
    input::{ButtonState, Buttons, mask},
};

const WHITE: u32 = 0xFFFFFFFF;
const BLACK: u32 = 0xFF000000;

pub struct MinifbDisplay {
    display_buffer: Vec<u32>,
    window: minifb::Window,
    buttons: ButtonState,
}

impl MinifbDisplay {
    pub fn new(window: minifb::Window) -> Self {
        Self {
            display_buffer: vec![BLACK; WIDTH * HEIGHT],
            window,
            buttons: ButtonState::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.buttons.is_pressed(Buttons::Back)
    }

    pub fn update(&mut self) {
        self.window.update();
        let mut current: u8 = 0;
        if self.window.is_key_down(minifb::Key::Left) {
            current |= mask(Buttons::Left);
        }
        if self.window.is_key_down(minifb::Key::Right) {
            current |= mask(Buttons::Right);
        }
        if self.window.is_key_down(minifb::Key::Escape) {
            current |= mask(Buttons::Back);
        }
        self.buttons.update(current);
    }

    pub fn get_buttons(&self) -> ButtonState {
        self.buttons
    }
}

impl Display for MinifbDisplay {
    fn show(&mut self, frame: &Bitmap128x64) {
        blit(frame, &mut self.display_buffer);
        if let Err(err) = self
            .window
            .update_with_buffer(&self.display_buffer, WIDTH, HEIGHT)
        {
            log::error!("Window update failed: {}", err);
        }
    }
}

/// Expand packed bits to ARGB, set bits white.
fn blit(frame: &Bitmap128x64, out: &mut [u32]) {
    for (i, byte) in frame.as_bytes().iter().enumerate() {
        for bit in 0..8 {
            out[i * 8 + bit] = if (byte & (1 << (7 - bit))) != 0 {
                WHITE
            } else {
                BLACK
            };
        }
    }
}
