#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buttons {
    Back,
    Left,
    Right,
}

/// Edge detector over a bitmask of [`Buttons`], sampled once per frame.
#[derive(Clone, Copy, Default)]
pub struct ButtonState {
    current: u8,
    previous: u8,
}

impl ButtonState {
    pub fn update(&mut self, current: u8) {
        self.previous = self.current;
        self.current = current;
    }

    fn held(&self) -> u8 {
        self.current & self.previous
    }

    fn pressed(&self) -> u8 {
        self.current & !self.previous
    }

    pub fn is_held(&self, button: Buttons) -> bool {
        (self.held() & mask(button)) != 0
    }

    pub fn is_pressed(&self, button: Buttons) -> bool {
        (self.pressed() & mask(button)) != 0
    }
}

pub fn mask(button: Buttons) -> u8 {
    1 << (button as u8)
}
