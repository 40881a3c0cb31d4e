//! Blockquotes.

use crate::block::state::{BlockState, ParentKind, Scope};
use crate::block::{Nesting, TokenKind};
use crate::limits::CODE_INDENT;
use crate::Range;

/// Line index entries patched while the quote's interior is tokenized.
struct SavedLine {
    line: usize,
    b_mark: usize,
    t_shift: usize,
    s_count: i32,
}

/// Blockquote: `>` lines plus lazy paragraph continuations.
///
/// The `>` marker and one optional space are hidden by moving each line's
/// start past them; the interior is then tokenized with an indentation floor
/// of zero and the line index is restored.
pub fn blockquote(state: &mut BlockState<'_>, start_line: usize, end_line: usize, silent: bool) -> bool {
    if state.s_count[start_line] - state.blk_indent >= CODE_INDENT {
        return false;
    }

    let start = state.content_start(start_line);
    if start >= state.e_marks[start_line] || state.byte(start) != Some(b'>') {
        return false;
    }

    if silent {
        return true;
    }

    let parser = state.parser;
    let terminators = parser.ruler().rules("blockquote");
    let mut saved: Vec<SavedLine> = Vec::new();

    let (next_line, line_max) = state.with_parent(ParentKind::Blockquote, |state| {
        let mut line_max = state.line_max;
        let mut last_line_empty = false;
        let mut next_line = start_line;

        while next_line < end_line {
            let is_outdented = state.s_count[next_line] < state.blk_indent;
            let mut pos = state.content_start(next_line);
            let max = state.e_marks[next_line];

            // A blank line outside the quote ends it.
            if pos >= max {
                break;
            }

            if state.byte(pos) == Some(b'>') && !is_outdented {
                pos += 1;
                let marker_col = state.s_count[next_line];
                let mut initial = marker_col + 1;
                let mut offset = initial;

                match state.byte(pos) {
                    Some(b' ') => {
                        pos += 1;
                        initial += 1;
                        offset += 1;
                    }
                    Some(b'\t') => {
                        // The tab provides the optional space; the rest of
                        // its width becomes content indentation.
                        pos += 1;
                        offset = marker_col + 1 + (4 - (marker_col + 1) % 4);
                        initial += 1;
                    }
                    _ => {}
                }

                saved.push(save(state, next_line));
                state.b_marks[next_line] = pos;

                while pos < max {
                    match state.byte(pos) {
                        Some(b' ') => offset += 1,
                        Some(b'\t') => offset += 4 - offset % 4,
                        _ => break,
                    }
                    pos += 1;
                }

                last_line_empty = pos >= max;
                state.s_count[next_line] = offset - initial;
                state.t_shift[next_line] = pos - state.b_marks[next_line];
                next_line += 1;
                continue;
            }

            // Not inside the quote and the previous line was empty.
            if last_line_empty {
                break;
            }

            // Another construct interrupts the quote.
            if terminators.iter().any(|rule| rule(state, next_line, end_line, true)) {
                line_max = next_line;
                if state.blk_indent != 0 {
                    saved.push(save(state, next_line));
                    state.s_count[next_line] -= state.blk_indent;
                }
                break;
            }

            // Lazy paragraph continuation.
            saved.push(save(state, next_line));
            state.s_count[next_line] = -1;
            next_line += 1;
        }

        (next_line, line_max)
    });

    let old_indent = state.blk_indent;
    state.blk_indent = 0;

    let open_idx = state.tokens.len();
    let token = state.push(TokenKind::BlockquoteOpen, "blockquote", Nesting::Open);
    token.markup = ">".to_owned();

    let scope = Scope {
        parent: ParentKind::Blockquote,
        line_max,
    };
    state.scoped(scope, |state| parser.tokenize(state, start_line, next_line));

    let token = state.push(TokenKind::BlockquoteClose, "blockquote", Nesting::Close);
    token.markup = ">".to_owned();

    state.tokens[open_idx].map = Some(Range::from_usize(start_line, state.line));

    for entry in saved.into_iter().rev() {
        state.b_marks[entry.line] = entry.b_mark;
        state.t_shift[entry.line] = entry.t_shift;
        state.s_count[entry.line] = entry.s_count;
    }
    state.blk_indent = old_indent;

    true
}

fn save(state: &BlockState<'_>, line: usize) -> SavedLine {
    SavedLine {
        line,
        b_mark: state.b_marks[line],
        t_shift: state.t_shift[line],
        s_count: state.s_count[line],
    }
}
