/// Number of leading bytes the detector looks at.
pub const PREFIX_LEN: usize = 8;

/// File extensions the walker treats as images. Matched case-sensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["bmp", "png", "jpg", "jpeg"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Bmp,
    Unsupported,
}

/// Classify a file from its first bytes. Anything shorter than
/// [`PREFIX_LEN`] is unsupported.
pub fn detect(prefix: &[u8]) -> ImageFormat {
    if prefix.len() < PREFIX_LEN {
        return ImageFormat::Unsupported;
    }
    match prefix {
        [0x42, 0x4D, ..] => ImageFormat::Bmp,
        _ => ImageFormat::Unsupported,
    }
}

/// Suffix after the last `.`. Dot-files without another dot have none.
pub fn extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

pub fn is_image_name(name: &str) -> bool {
    extension(name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

pub fn mime_type(name: &str) -> Option<&'static str> {
    match extension(name)? {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
