//! Line-indexed parse state shared by the block rules.
//!
//! The source is indexed once up front: every line gets its start/end byte
//! offsets, the byte length of its leading whitespace, and its indentation in
//! columns. Container rules (blockquotes, list items) temporarily patch the
//! index of the lines they own and restore it afterwards.

use memchr::memchr;

use super::parser::BlockParser;
use super::token::{Nesting, Token, TokenKind};
use crate::Options;

/// What kind of block the tokenizer is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentKind {
    /// Top level of the document.
    #[default]
    Root,
    /// Collecting paragraph lines (terminator probing).
    Paragraph,
    /// Inside a blockquote.
    Blockquote,
    /// Inside a list.
    List,
    /// Inside a `:::` container.
    Container,
}

/// Ambient tokenizer bounds that nested rules override for their interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Parent-context label.
    pub parent: ParentKind,
    /// Exclusive upper bound for lazy continuation.
    pub line_max: usize,
}

/// Mutable state of one block-level parse.
pub struct BlockState<'a> {
    /// Normalized source text.
    pub src: &'a str,
    /// Parser owning the rule chains.
    pub parser: &'a BlockParser,
    /// Output tokens.
    pub tokens: Vec<Token>,

    /// Byte offset where each line begins.
    pub b_marks: Vec<usize>,
    /// Byte offset where each line ends (excluding `\n`).
    pub e_marks: Vec<usize>,
    /// Bytes of leading whitespace per line.
    pub t_shift: Vec<usize>,
    /// Indentation per line in columns, tabs expanded. Negative marks a
    /// lazy blockquote continuation line.
    pub s_count: Vec<i32>,

    /// Indentation floor of the current block.
    pub blk_indent: i32,
    /// Indentation floor of the enclosing list, if any.
    pub list_indent: Option<i32>,
    /// Line cursor.
    pub line: usize,
    /// Line bound for lazy continuation.
    pub line_max: usize,
    /// Whether no blank lines were seen between blocks so far (lists).
    pub tight: bool,
    /// Current parent-context label.
    pub parent: ParentKind,
    /// Current token nesting level.
    pub level: u32,
}

impl<'a> BlockState<'a> {
    /// Index `src` into lines.
    pub fn new(src: &'a str, parser: &'a BlockParser) -> Self {
        let bytes = src.as_bytes();
        let estimated_lines = bytes.len() / 32 + 1;
        let mut b_marks = Vec::with_capacity(estimated_lines);
        let mut e_marks = Vec::with_capacity(estimated_lines);
        let mut t_shift = Vec::with_capacity(estimated_lines);
        let mut s_count = Vec::with_capacity(estimated_lines);

        let mut start = 0;
        while start < bytes.len() {
            let end = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |i| start + i);

            let mut pos = start;
            let mut offset = 0i32;
            while pos < end {
                match bytes[pos] {
                    b' ' => offset += 1,
                    b'\t' => offset += 4 - offset % 4,
                    _ => break,
                }
                pos += 1;
            }

            b_marks.push(start);
            e_marks.push(end);
            t_shift.push(pos - start);
            s_count.push(offset);
            start = end + 1;
        }

        // Sentinel entry so `line_max` can be indexed.
        b_marks.push(bytes.len());
        e_marks.push(bytes.len());
        t_shift.push(0);
        s_count.push(0);

        let line_max = b_marks.len() - 1;
        Self {
            src,
            parser,
            tokens: Vec::with_capacity(line_max.max(8)),
            b_marks,
            e_marks,
            t_shift,
            s_count,
            blk_indent: 0,
            list_indent: None,
            line: 0,
            line_max,
            tight: false,
            parent: ParentKind::Root,
            level: 0,
        }
    }

    /// Parse options of the owning parser.
    #[inline]
    pub fn options(&self) -> &'a Options {
        self.parser.options()
    }

    /// Byte at `pos`, or `None` past the end.
    #[inline]
    pub fn byte(&self, pos: usize) -> Option<u8> {
        self.src.as_bytes().get(pos).copied()
    }

    /// Offset of the first non-whitespace byte of `line`.
    #[inline]
    pub fn content_start(&self, line: usize) -> usize {
        self.b_marks[line] + self.t_shift[line]
    }

    /// Check if `line` is blank.
    #[inline]
    pub fn is_empty(&self, line: usize) -> bool {
        self.content_start(line) >= self.e_marks[line]
    }

    /// First non-blank line at or after `from`.
    pub fn skip_empty_lines(&self, mut from: usize) -> usize {
        while from < self.line_max && self.is_empty(from) {
            from += 1;
        }
        from
    }

    /// Skip spaces and tabs from `pos`.
    pub fn skip_spaces(&self, mut pos: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        pos
    }

    /// Skip a run of `ch` from `pos`.
    pub fn skip_chars(&self, mut pos: usize, ch: u8) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && bytes[pos] == ch {
            pos += 1;
        }
        pos
    }

    /// Skip spaces and tabs backwards from `pos`, not going below `min`.
    pub fn skip_spaces_back(&self, mut pos: usize, min: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos > min && is_space(bytes[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    /// Skip a run of `ch` backwards from `pos`, not going below `min`.
    pub fn skip_chars_back(&self, mut pos: usize, ch: u8, min: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos > min && bytes[pos - 1] == ch {
            pos -= 1;
        }
        pos
    }

    /// Collect lines `[begin, end)` with up to `indent` columns stripped.
    ///
    /// Bytes hidden by a patched `t_shift` (blockquote and list markers)
    /// count as indentation. Indentation beyond `indent` is kept as spaces.
    pub fn get_lines(&self, begin: usize, end: usize, indent: i32, keep_last_lf: bool) -> String {
        if begin >= end {
            return String::new();
        }

        let bytes = self.src.as_bytes();
        let mut out = String::with_capacity(self.e_marks[end - 1].saturating_sub(self.b_marks[begin]) + 1);

        for line in begin..end {
            let line_start = self.b_marks[line];
            let mut first = line_start;
            let last = if line + 1 < end || keep_last_lf {
                (self.e_marks[line] + 1).min(bytes.len())
            } else {
                self.e_marks[line]
            };

            let mut line_indent = 0i32;
            while first < last && line_indent < indent {
                let ch = bytes[first];
                if is_space(ch) {
                    if ch == b'\t' {
                        line_indent += 4 - line_indent % 4;
                    } else {
                        line_indent += 1;
                    }
                } else if first - line_start < self.t_shift[line] {
                    line_indent += 1;
                } else {
                    break;
                }
                first += 1;
            }

            if line_indent > indent {
                for _ in 0..(line_indent - indent) {
                    out.push(' ');
                }
            }
            out.push_str(&self.src[first..last]);

            // An unterminated final line still needs its separator.
            if last == bytes.len() && keep_last_lf && !out.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }

    /// Append a token and maintain the nesting level.
    pub fn push(&mut self, kind: TokenKind, tag: &'static str, nesting: Nesting) -> &mut Token {
        let mut token = Token::new(kind, tag, nesting);
        if nesting == Nesting::Close {
            self.level = self.level.saturating_sub(1);
        }
        token.level = self.level;
        if nesting == Nesting::Open {
            self.level += 1;
        }

        self.tokens.push(token);
        let idx = self.tokens.len() - 1;
        &mut self.tokens[idx]
    }

    /// Current parent label and line bound.
    #[inline]
    pub fn scope(&self) -> Scope {
        Scope {
            parent: self.parent,
            line_max: self.line_max,
        }
    }

    /// Run `f` with `scope` installed, restoring the previous one afterwards.
    ///
    /// Every rule that changes `parent` or `line_max` goes through here so
    /// the outer values are back in place on every return path.
    pub fn scoped<R>(&mut self, scope: Scope, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.scope();
        self.parent = scope.parent;
        self.line_max = scope.line_max;
        let out = f(self);
        self.parent = saved.parent;
        self.line_max = saved.line_max;
        out
    }

    /// Run `f` with only the parent label replaced.
    #[inline]
    pub fn with_parent<R>(&mut self, parent: ParentKind, f: impl FnOnce(&mut Self) -> R) -> R {
        let line_max = self.line_max;
        self.scoped(Scope { parent, line_max }, f)
    }
}

/// Space or tab.
#[inline]
pub fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}
