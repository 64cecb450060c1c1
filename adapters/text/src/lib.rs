#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plain-text adapter that loads Chronogrid programs and prints boards.
//!
//! Program text holds one board row per line with whitespace-separated
//! tokens. An optional leading `solve <name>` line is ignored so submission
//! files can be loaded as-is.

use chronogrid_core::{Board, BoardError};

const HEADER_PREFIX: &str = "solve";

/// Parses program text and substitutes both input placeholders.
pub fn parse_program(text: &str, a: &str, b: &str) -> Result<Board, BoardError> {
    Ok(parse_board(text)?.with_inputs(a, b))
}

/// Parses program text without substituting input placeholders.
pub fn parse_board(text: &str) -> Result<Board, BoardError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty()).peekable();
    if lines
        .peek()
        .is_some_and(|line| line.split_whitespace().next() == Some(HEADER_PREFIX))
    {
        let _ = lines.next();
    }
    Board::decode(lines.map(str::split_whitespace))
}

/// Renders a board as rows of space-separated tokens.
#[must_use]
pub fn render_board(board: &Board) -> String {
    board.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronogrid_core::{Cell, CellCoord, InputSlot, ParseError};

    #[test]
    fn header_and_blank_lines_are_skipped() {
        let board = parse_board("solve 3d1\n\n. A .\n1 + B\n\n").expect("board");
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 2);
        assert_eq!(
            board.get(CellCoord::new(1, 0)),
            Some(&Cell::Input(InputSlot::A))
        );
    }

    #[test]
    fn programs_without_header_parse_from_the_first_line() {
        let board = parse_board("1 2\n3 4").expect("board");
        assert_eq!(board.get(CellCoord::new(0, 0)), Some(&Cell::from(1)));
        assert_eq!(board.height(), 2);
    }

    #[test]
    fn inputs_are_substituted() {
        let board = parse_program(". A\nB .", "12", "-3").expect("board");
        assert_eq!(render_board(&board), ". 12\n-3 .");
    }

    #[test]
    fn irregular_whitespace_is_tolerated() {
        let board = parse_board("  1\t+   2  \n.  .\t.").expect("board");
        assert_eq!(render_board(&board), "1 + 2\n. . .");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            parse_board("1 2\n3"),
            Err(BoardError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn unknown_tokens_are_rejected_with_position() {
        assert_eq!(
            parse_board(". .\n. ?"),
            Err(BoardError::Token {
                row: 1,
                column: 1,
                error: ParseError::UnknownToken {
                    token: "?".to_owned()
                },
            })
        );
    }

    #[test]
    fn header_only_text_has_no_board() {
        assert_eq!(parse_board("solve 3d4\n"), Err(BoardError::Empty));
    }

    #[test]
    fn rendering_round_trips_canonical_text() {
        let text = ". 4 . .\n3 * S .\n. v @ -1";
        let board = parse_board(text).expect("board");
        assert_eq!(render_board(&board), text);
    }
}
