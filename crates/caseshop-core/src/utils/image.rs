//! Image reference resolution with a one-shot fallback.

use crate::config::DEFAULT_IMAGE_URL;

/// Use `src` if it names something, otherwise the built-in default icon.
pub fn resolve_image(src: Option<&str>) -> &str {
    resolve_image_with(src, DEFAULT_IMAGE_URL)
}

/// Use `src` if it names something, otherwise `fallback`.
pub fn resolve_image_with<'a>(src: Option<&'a str>, fallback: &'a str) -> &'a str {
    match src.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}

/// Tracks one image element's source across load errors.
///
/// The first error swaps in the fallback; later errors (including the fallback
/// itself failing to load) leave the source alone so it cannot loop.
#[derive(Debug, Clone)]
pub struct ImageFallback {
    current: String,
    fallback: String,
    substituted: bool,
}

impl ImageFallback {
    pub fn new(src: Option<&str>) -> Self {
        Self::with_fallback(src, DEFAULT_IMAGE_URL)
    }

    pub fn with_fallback(src: Option<&str>, fallback: &str) -> Self {
        let current = resolve_image_with(src, fallback).to_string();
        let substituted = current == fallback;
        Self {
            current,
            fallback: fallback.to_string(),
            substituted,
        }
    }

    pub fn src(&self) -> &str {
        &self.current
    }

    pub fn is_fallback(&self) -> bool {
        self.substituted
    }

    /// Handle a load error. Returns the new source if it changed.
    pub fn on_error(&mut self) -> Option<&str> {
        if self.substituted {
            return None;
        }
        self.substituted = true;
        self.current = self.fallback.clone();
        Some(&self.current)
    }
}
