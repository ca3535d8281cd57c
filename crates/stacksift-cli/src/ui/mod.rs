//! # CLI UI Module
//!
//! Styling and table rendering for `stacksift` output. Human output respects
//! `NO_COLOR` and `--color`; every command also offers `--json`.
//!
//! - `color`: color mode detection
//! - `style`: message prefixes and styling helpers
//! - `table`: comfy-table renderers

pub mod color;
pub mod style;
pub mod table;

pub use color::ColorMode;
pub use style::{MessageType, Style};
