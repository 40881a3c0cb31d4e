//! Paragraphs, the fallback rule.

use crate::block::state::{BlockState, ParentKind};
use crate::block::{Nesting, TokenKind};
use crate::limits::CODE_INDENT;
use crate::Range;

/// Paragraph: consumes lines until a blank line or a rule from the
/// `paragraph` chain interrupts it.
///
/// Continuation is bounded by `state.line_max`, not by the caller's end
/// line, so lazy lines follow the enclosing block's bound.
pub fn paragraph(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, _silent: bool) -> bool {
    let parser = state.parser;
    let terminators = parser.ruler().rules("paragraph");
    let end_line = state.line_max;

    state.with_parent(ParentKind::Paragraph, |state| {
        let mut next_line = start_line + 1;

        while next_line < end_line && !state.is_empty(next_line) {
            // Indented code cannot interrupt a paragraph; neither can a lazy
            // blockquote continuation (negative indent).
            let relative = state.s_count[next_line] - state.blk_indent;
            if relative >= CODE_INDENT || state.s_count[next_line] < 0 {
                next_line += 1;
                continue;
            }

            if terminators.iter().any(|rule| rule(state, next_line, end_line, true)) {
                break;
            }
            next_line += 1;
        }

        push_paragraph(state, start_line, next_line);
    });

    true
}

/// Emit lines `[start_line, end_line)` as one paragraph of literal text,
/// without trying any block rule on them.
pub fn literal(state: &mut BlockState<'_>, start_line: usize, end_line: usize) {
    state.with_parent(ParentKind::Paragraph, |state| {
        push_paragraph(state, start_line, end_line);
    });
}

fn push_paragraph(state: &mut BlockState<'_>, start_line: usize, next_line: usize) {
    let content = collapse_lines(&state.get_lines(start_line, next_line, state.blk_indent, false));
    let map = Range::from_usize(start_line, next_line);
    state.line = next_line;

    let token = state.push(TokenKind::ParagraphOpen, "p", Nesting::Open);
    token.map = Some(map);

    let token = state.push(TokenKind::Inline, "", Nesting::Leaf);
    token.content = content;
    token.map = Some(map);

    state.push(TokenKind::ParagraphClose, "p", Nesting::Close);
}

/// Strip surrounding spaces and tabs from every line.
fn collapse_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, line) in raw.trim_matches(is_blank).split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_matches(is_blank));
    }
    out
}

#[inline]
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}
