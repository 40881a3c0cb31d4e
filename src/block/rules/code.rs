//! Indented code blocks.

use crate::block::state::BlockState;
use crate::block::{Nesting, TokenKind};
use crate::limits::CODE_INDENT;
use crate::Range;

/// Indented code block: lines indented 4+ columns past the block floor.
pub fn code(state: &mut BlockState<'_>, start_line: usize, end_line: usize, _silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent < CODE_INDENT {
        return false;
    }

    let mut next_line = start_line + 1;
    let mut last = next_line;

    while next_line < end_line {
        if state.is_empty(next_line) {
            next_line += 1;
            continue;
        }

        if state.s_count[next_line] - state.blk_indent >= CODE_INDENT {
            next_line += 1;
            last = next_line;
            continue;
        }

        break;
    }

    state.line = last;

    let mut content = state.get_lines(start_line, last, CODE_INDENT + state.blk_indent, false);
    content.push('\n');

    let token = state.push(TokenKind::CodeBlock, "code", Nesting::Leaf);
    token.content = content;
    token.map = Some(Range::from_usize(start_line, last));
    true
}
