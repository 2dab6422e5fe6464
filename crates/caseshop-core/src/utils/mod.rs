//! Display helpers for storefront text and images.

pub mod format;
pub mod image;

// Re-export commonly used functions at module level
pub use format::{format_balance, item_label, plural_form};
pub use image::{resolve_image, resolve_image_with, ImageFallback};
