//! Block rules.
//!
//! Each rule has the [`BlockRule`](super::BlockRule) signature and is tried
//! in registry order. A rule either consumes one or more lines (advancing
//! `state.line`) and returns `true`, or returns `false` without side effects.

mod blockquote;
mod code;
mod container;
mod fence;
mod heading;
mod hr;
mod list;
mod paragraph;

pub use blockquote::blockquote;
pub use code::code;
pub use container::container;
pub use fence::fence;
pub use heading::heading;
pub use hr::hr;
pub use list::list;
pub use paragraph::{literal, paragraph};
