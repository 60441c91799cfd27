//! Media kind inference from URL extensions.
//!
//! The kind is decided by the text after the last `.` of the URL,
//! lowercased, against three fixed extension lists. There is no
//! content sniffing, so query strings or fragments after the extension
//! make a URL unsupported.

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "aac", "flac", "m4a"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Unsupported,
}

/// Infers the media kind of a block URL.
pub fn infer_media_kind(url: &str) -> MediaKind {
    if url.is_empty() {
        return MediaKind::Unsupported;
    }

    let extension = url
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        MediaKind::Audio
    } else {
        MediaKind::Unsupported
    }
}
