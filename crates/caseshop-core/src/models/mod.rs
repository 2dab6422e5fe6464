//! Data models for storefront entities.
//!
//! - `User`, `Level`, `LevelProgress`, `Role`: the authenticated profile and wallet
//! - `CatalogItem`: a purchasable case, also used for inventory entries
//! - `Banner`: a promotional banner

pub mod banner;
pub mod catalog;
pub mod user;

pub use banner::Banner;
pub use catalog::CatalogItem;
pub use user::{Level, LevelProgress, Role, User};
