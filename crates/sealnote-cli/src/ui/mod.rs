//! UI primitives for the SealNote CLI.
//!
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Theme**: Badge tokens and styles
//! - **Render**: Badges, hints, receipts, note tables
//! - **Progress**: Spinner shown while the vault key is derived
//! - **Format**: Timestamp formatting

mod context;
pub mod format;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use progress::Spinner;
pub use render::{alarm_message, badge, error_message, hint, notes_table, receipt};
pub use theme::Badge;
