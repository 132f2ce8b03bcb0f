use std::env;

use monoview_core::{
    display::{Display, render},
    framebuffer::{Bitmap128x64, HEIGHT, WIDTH},
    image::DecodeLimits,
    viewer::ViewerState,
};

use crate::display::MinifbDisplay;
use crate::storage::StdFilesystem;

mod display;
mod storage;

#[derive(Clone, Debug, PartialEq, Eq)]
struct ViewerConfig {
    root: String,
    scale: u8,
    max_pixels: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            root: ".".into(),
            scale: 4,
            max_pixels: DecodeLimits::default().max_pixels,
        }
    }
}

fn usage() -> ! {
    eprintln!(
        "Usage:\n  monoview [dir] [--scale 1|2|4|8] [--max-pixels N]\n\nDefaults: dir . --scale 4"
    );
    std::process::exit(2);
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<ViewerConfig> {
    let mut config = ViewerConfig::default();
    let mut root = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scale" => {
                config.scale = args.next()?.parse().ok()?;
                window_scale(config.scale)?;
            }
            "--max-pixels" => {
                config.max_pixels = args.next()?.parse().ok()?;
            }
            _ if arg.starts_with("--") || root.is_some() => return None,
            _ => root = Some(arg),
        }
    }
    if let Some(root) = root {
        config.root = root;
    }
    Some(config)
}

fn window_scale(scale: u8) -> Option<minifb::Scale> {
    match scale {
        1 => Some(minifb::Scale::X1),
        2 => Some(minifb::Scale::X2),
        4 => Some(minifb::Scale::X4),
        8 => Some(minifb::Scale::X8),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args(env::args().skip(1)).unwrap_or_else(|| usage());
    log::info!("Monoview desktop started in {}", config.root);

    let mut window = minifb::Window::new(
        "Monoview",
        WIDTH,
        HEIGHT,
        minifb::WindowOptions {
            scale: window_scale(config.scale).unwrap_or(minifb::Scale::X4),
            ..minifb::WindowOptions::default()
        },
    )
    .unwrap_or_else(|e| {
        panic!("Unable to open window: {}", e);
    });

    window.set_target_fps(60);

    let fs = StdFilesystem;
    let mut display = MinifbDisplay::new(window);
    let mut state = ViewerState::new(DecodeLimits {
        max_pixels: config.max_pixels,
    });
    let mut frame = Box::new(Bitmap128x64::new());

    state.open_first(&fs, &config.root);
    render(&state, &mut frame);
    display.show(&frame);

    while display.is_open() {
        display.update();
        if state.update(&fs, &display.get_buttons()) {
            render(&state, &mut frame);
            display.show(&frame);
        }
    }
}
