//! Block parser implementation.

use std::borrow::Cow;

use memchr::memchr2;

use super::ruler::Ruler;
use super::rules;
use super::state::BlockState;
use super::token::Token;
use crate::limits::MAX_BLOCK_NESTING;
use crate::Options;

/// Chains a fence-like rule interrupts.
pub(crate) const FENCE_ALT: &[&str] = &["paragraph", "reference", "blockquote", "list"];

/// Block parser: the rule registry plus the line-by-line tokenize loop.
pub struct BlockParser {
    ruler: Ruler,
    options: Options,
}

impl BlockParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::new_with_options(Options::default())
    }

    /// Create a parser with options.
    pub fn new_with_options(options: Options) -> Self {
        let mut ruler = Ruler::new();
        ruler.push("code", rules::code, &[]);
        if options.containers {
            ruler.push("container", rules::container, FENCE_ALT);
        }
        ruler.push("fence", rules::fence, FENCE_ALT);
        ruler.push("blockquote", rules::blockquote, FENCE_ALT);
        ruler.push("hr", rules::hr, FENCE_ALT);
        ruler.push("list", rules::list, &["paragraph", "reference", "blockquote"]);
        ruler.push("heading", rules::heading, &["paragraph", "reference", "blockquote"]);
        ruler.push("paragraph", rules::paragraph, &[]);

        Self { ruler, options }
    }

    /// Options this parser was built with.
    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The rule registry.
    #[inline]
    pub fn ruler(&self) -> &Ruler {
        &self.ruler
    }

    /// Mutable access to the rule registry, for plugging in extra rules.
    #[inline]
    pub fn ruler_mut(&mut self) -> &mut Ruler {
        &mut self.ruler
    }

    /// Parse a whole document into block tokens.
    pub fn parse(&self, input: &str) -> Vec<Token> {
        let src = normalize(input);
        let mut state = BlockState::new(&src, self);
        let end = state.line_max;
        self.tokenize(&mut state, 0, end);
        state.tokens
    }

    /// Tokenize lines `[start_line, end_line)` as block content.
    ///
    /// Stops early at the first non-blank line indented below
    /// `state.blk_indent`; `state.line` is left on that line.
    pub fn tokenize(&self, state: &mut BlockState<'_>, start_line: usize, end_line: usize) {
        let rules = self.ruler.rules("");
        let mut line = start_line;
        let mut has_empty_lines = false;

        while line < end_line {
            line = state.skip_empty_lines(line);
            state.line = line;
            if line >= end_line {
                break;
            }

            // Dedented line ends the enclosing block.
            if state.s_count[line] < state.blk_indent {
                break;
            }

            // Past the nesting cap the rest of the block is kept as text.
            if state.level >= MAX_BLOCK_NESTING {
                trace!(line, level = state.level, "block nesting limit reached");
                rules::literal(state, line, end_line);
                break;
            }

            let prev_line = state.line;
            let matched = rules.iter().any(|rule| rule(state, line, end_line, false));

            if !matched || state.line <= prev_line {
                // Paragraph always matches; this only guards a faulty plugin rule.
                debug_assert!(matched, "no block rule matched line {line}");
                state.line = prev_line + 1;
            }

            state.tight = !has_empty_lines;

            if state.is_empty(state.line - 1) {
                has_empty_lines = true;
            }

            line = state.line;

            if line < end_line && state.is_empty(line) {
                has_empty_lines = true;
                line += 1;
                state.line = line;
            }
        }
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize line endings to `\n` and replace NUL with U+FFFD.
fn normalize(input: &str) -> Cow<'_, str> {
    if memchr2(b'\r', b'\0', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\0' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
