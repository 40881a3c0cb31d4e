//! HTML rendering of block tokens.
//!
//! The writer uses md4c's growth strategy: 1.5x + 128-byte alignment.
//! Most tokens go through [`render_token`], the generic tag writer;
//! code, thematic breaks and inline text have their own output.

use crate::block::{Attrs, Nesting, Token, TokenKind};
use crate::{container, escape};

/// HTML output writer with pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use fencemark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.write_str("<p>");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.write_str("</p>");
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>");
/// ```
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.25x input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self::with_capacity(input_len + input_len / 4)
    }

    /// Create with explicit capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Grow buffer using md4c's strategy: 1.5x + 128-byte alignment.
    #[cold]
    #[inline(never)]
    fn grow(&mut self, needed: usize) {
        let new_cap = ((self.out.len() + needed) * 3 / 2 + 128) & !127;
        self.out.reserve(new_cap.saturating_sub(self.out.len()));
    }

    /// Ensure capacity for additional bytes.
    #[inline]
    fn ensure_capacity(&mut self, additional: usize) {
        if self.out.len() + additional > self.out.capacity() {
            self.grow(additional);
        }
    }

    /// Write a static string (compile-time known).
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write a single byte.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        self.ensure_capacity(text.len());
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write attribute value with full escaping (including quotes).
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &[u8]) {
        self.ensure_capacity(attr.len());
        escape::escape_attr_into(&mut self.out, attr);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Get output as str (assumes valid UTF-8).
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: only ASCII markup and slices of `&str` input are written
        unsafe { std::str::from_utf8_unchecked(&self.out) }
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: only ASCII markup and slices of `&str` input are written
        unsafe { String::from_utf8_unchecked(self.out) }
    }

    /// Get mutable reference to internal buffer.
    ///
    /// Use with caution - allows bypassing escaping.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Vec<u8> {
        &mut self.out
    }

    /// Write ` name="value"` pairs in order.
    pub fn write_attrs(&mut self, attrs: &Attrs) {
        for (name, value) in attrs.iter() {
            self.write_byte(b' ');
            self.write_escaped_attr(name.as_bytes());
            self.write_str("=\"");
            self.write_escaped_attr(value.as_bytes());
            self.write_byte(b'"');
        }
    }

    /// Write code block start with optional language class.
    #[inline]
    pub fn code_block_start(&mut self, lang: Option<&str>) {
        match lang {
            Some(l) if !l.is_empty() => {
                self.write_str("<pre><code class=\"language-");
                self.write_escaped_attr(l.as_bytes());
                self.write_str("\">");
            }
            _ => self.write_str("<pre><code>"),
        }
    }

    /// Write code block end: `</code></pre>\n`
    #[inline]
    pub fn code_block_end(&mut self) {
        self.write_str("</code></pre>\n");
    }

    /// Write thematic break: `<hr />\n`
    #[inline]
    pub fn thematic_break(&mut self) {
        self.write_str("<hr />\n");
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a token stream.
pub fn render(tokens: &[Token], writer: &mut HtmlWriter) {
    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Inline => writer.write_escaped_text(token.content.as_bytes()),
            TokenKind::Fence => {
                let lang = token.info.split_whitespace().next();
                writer.code_block_start(lang);
                writer.write_escaped_text(token.content.as_bytes());
                writer.code_block_end();
            }
            TokenKind::CodeBlock => {
                writer.code_block_start(None);
                writer.write_escaped_text(token.content.as_bytes());
                writer.code_block_end();
            }
            TokenKind::ThematicBreak => writer.thematic_break(),
            TokenKind::ContainerOpen => {
                let attrs = container::decorate(token);
                render_token(tokens, idx, &attrs, writer);
            }
            _ => render_token(tokens, idx, &token.attrs, writer),
        }
    }
}

/// Generic tag writer for `tokens[idx]` with the given attributes.
///
/// Hidden tokens produce nothing. Block tags end with a newline unless the
/// next token is inline content, hidden, or the matching close tag.
pub fn render_token(tokens: &[Token], idx: usize, attrs: &Attrs, writer: &mut HtmlWriter) {
    let token = &tokens[idx];
    if token.hidden {
        return;
    }

    // Hidden tight-list paragraph before an opening block tag
    if token.block && token.nesting != Nesting::Close && idx > 0 && tokens[idx - 1].hidden {
        writer.newline();
    }

    if token.nesting == Nesting::Close {
        writer.write_str("</");
    } else {
        writer.write_byte(b'<');
    }
    writer.write_str(token.tag);
    writer.write_attrs(attrs);

    let mut need_lf = token.block;
    if token.block && token.nesting == Nesting::Open {
        if let Some(next) = tokens.get(idx + 1) {
            if next.kind == TokenKind::Inline || next.hidden {
                need_lf = false;
            } else if next.nesting == Nesting::Close && next.tag == token.tag {
                need_lf = false;
            }
        }
    }

    writer.write_byte(b'>');
    if need_lf {
        writer.newline();
    }
}
