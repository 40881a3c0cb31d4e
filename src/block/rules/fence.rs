//! Fenced code blocks (backticks and tildes).

use crate::block::state::BlockState;
use crate::block::{Nesting, TokenKind};
use crate::limits::CODE_INDENT;
use crate::Range;

/// Fenced code block.
///
/// The closing fence must use the same character, be at least as long as
/// the opening one and carry nothing but whitespace. Unclosed fences run to
/// `end_line`.
pub fn fence(state: &mut BlockState<'_>, start_line: usize, end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= CODE_INDENT {
        return false;
    }

    let start = state.content_start(start_line);
    let max = state.e_marks[start_line];
    if start + 3 > max {
        return false;
    }

    // Must start with ` or ~
    let fence_char = match state.byte(start) {
        Some(b @ (b'`' | b'~')) => b,
        _ => return false,
    };

    let pos = state.skip_chars(start, fence_char).min(max);
    let fence_len = pos - start;
    if fence_len < 3 {
        return false;
    }

    let src = state.src;
    let params = &src[pos..max];

    // For backtick fences, info string cannot contain backticks
    if fence_char == b'`' && params.as_bytes().contains(&b'`') {
        return false;
    }

    if silent {
        return true;
    }

    let mut next_line = start_line;
    let mut have_end_marker = false;

    loop {
        next_line += 1;
        if next_line >= end_line {
            break;
        }

        let line_start = state.content_start(next_line);
        let line_end = state.e_marks[next_line];

        if line_start < line_end && state.s_count[next_line] < state.blk_indent {
            // Dedented non-blank line ends the enclosing list item.
            break;
        }

        if state.byte(line_start) != Some(fence_char) {
            continue;
        }

        if state.s_count[next_line] - state.blk_indent >= CODE_INDENT {
            continue;
        }

        let run_end = state.skip_chars(line_start, fence_char).min(line_end);

        // Closing fence must be at least as long as opening
        if run_end - line_start < fence_len {
            continue;
        }

        // Check that rest of line is only spaces
        if state.skip_spaces(run_end) < line_end {
            continue;
        }

        have_end_marker = true;
        break;
    }

    let markup = src[start..pos].to_owned();
    let info = params.trim().to_owned();
    let content = state.get_lines(start_line + 1, next_line, state.s_count[start_line], true);

    state.line = next_line + usize::from(have_end_marker);

    let map = Range::from_usize(start_line, state.line);
    let token = state.push(TokenKind::Fence, "code", Nesting::Leaf);
    token.markup = markup;
    token.info = info;
    token.content = content;
    token.map = Some(map);
    true
}
