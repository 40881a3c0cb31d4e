//! fencemark: block Markdown to HTML with fenced `:::` containers
//!
//! A line-oriented block parser with a rule registry, plus a container
//! extension for generic fenced blocks:
//!
//! ```text
//! ::: warning
//! *here be dragons*
//! :::
//! ```
//!
//! renders as `<div class="warning">` around the parsed interior.
//!
//! # Design Principles
//! - Flat token stream, no AST
//! - No regex: pure byte-level and char-class scanning
//! - Single-pass, linear-time container parameter grammar
//! - Ambient parse state changes are always scoped and restored

/// Structured trace events, compiled in only with the `trace` feature.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace")]
        ::tracing::trace!($($arg)*);
    };
}

pub mod block;
pub mod container;
pub mod escape;
pub mod limits;
pub mod range;
pub mod render;

// Re-export primary types
pub use block::{BlockParser, Token, TokenKind};
pub use container::{ContainerOptions, OptionsError};
pub use range::Range;
pub use render::HtmlWriter;

/// Parsing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Recognize fenced `:::` containers.
    pub containers: bool,
    /// Container marker configuration.
    pub container: ContainerOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            containers: true,
            container: ContainerOptions::default(),
        }
    }
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = fencemark::to_html("::: note\nHello\n:::");
/// assert_eq!(html, "<div class=\"note\">\n<p>Hello</p>\n</div>\n");
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML, writing into a provided buffer.
///
/// This avoids allocation if the buffer has sufficient capacity.
pub fn to_html_into(input: &str, out: &mut Vec<u8>) {
    to_html_into_with_options(input, out, &Options::default());
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    let tokens = parse_with_options(input, options);
    let mut writer = HtmlWriter::with_capacity_for(input.len());
    render::render(&tokens, &mut writer);
    writer.into_string()
}

/// Convert Markdown to HTML into a provided buffer with options.
pub fn to_html_into_with_options(input: &str, out: &mut Vec<u8>, options: &Options) {
    out.clear();
    out.reserve(input.len() + input.len() / 4);
    let tokens = parse_with_options(input, options);
    let mut writer = HtmlWriter::with_capacity(0);
    // Use the provided buffer directly
    std::mem::swap(writer.buffer_mut(), out);
    render::render(&tokens, &mut writer);
    std::mem::swap(writer.buffer_mut(), out);
}

/// Parse Markdown into block tokens.
///
/// # Example
/// ```
/// use fencemark::TokenKind;
///
/// let tokens = fencemark::parse("::: {#intro}\ntext\n:::");
/// assert_eq!(tokens[0].kind, TokenKind::ContainerOpen);
/// assert_eq!(tokens[0].info, " {#intro}");
/// ```
pub fn parse(input: &str) -> Vec<Token> {
    parse_with_options(input, &Options::default())
}

/// Parse Markdown into block tokens with options.
pub fn parse_with_options(input: &str, options: &Options) -> Vec<Token> {
    BlockParser::new_with_options(*options).parse(input)
}
