//! Block-level parser.
//!
//! Line-oriented and rule driven. The default rules handle:
//! - Indented and fenced code
//! - Fenced `:::` containers
//! - Blockquotes
//! - Thematic breaks
//! - Lists
//! - ATX headings
//! - Paragraphs
//!
//! The output is a flat token stream of open/close/leaf tokens; see
//! [`Token`].

mod parser;
mod ruler;
pub(crate) mod rules;
mod state;
mod token;

pub(crate) use parser::FENCE_ALT;
pub use parser::BlockParser;
pub use ruler::{BlockRule, Ruler, RulerError};
pub use state::{BlockState, ParentKind, Scope};
pub use token::{Attrs, Nesting, Token, TokenKind};
