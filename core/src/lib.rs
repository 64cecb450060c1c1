#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chronogrid engine.
//!
//! This crate defines the vocabulary that connects the tick evaluator, the
//! authoritative world and the driver loop. A [`Board`] holds one snapshot of
//! [`Cell`] values. The evaluator reads a [`BoardView`] and answers with a
//! [`TickPlan`] describing removals, writes and time warps; the world commits
//! that plan and broadcasts [`Event`] values describing what happened. Every
//! failure is reported as a structured [`EngineError`].

use std::{fmt, str::FromStr};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token that marks an empty cell.
pub const EMPTY_TOKEN: &str = ".";

/// Token that marks an output cell.
pub const OUTPUT_TOKEN: &str = "S";

/// Identifies which caller-supplied input string a placeholder stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputSlot {
    /// First input, written as `A` in program text.
    A,
    /// Second input, written as `B` in program text.
    B,
}

impl InputSlot {
    /// Token used for the placeholder in program text.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            _ => None,
        }
    }
}

/// Travel direction of a mover operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices (`^`).
    North,
    /// Movement toward increasing column indices (`>`).
    East,
    /// Movement toward increasing row indices (`v`).
    South,
    /// Movement toward decreasing column indices (`<`).
    West,
}

impl Direction {
    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Integer operators that combine the left and up neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`, truncating toward zero.
    Div,
    /// `%`, carrying the sign of the dividend.
    Rem,
}

impl ArithmeticOp {
    /// Computes `left OP up`.
    ///
    /// Returns `None` when `Div` or `Rem` is asked to divide by zero.
    #[must_use]
    pub fn apply(self, left: &BigInt, up: &BigInt) -> Option<BigInt> {
        match self {
            Self::Add => Some(left + up),
            Self::Sub => Some(left - up),
            Self::Mul => Some(left * up),
            Self::Div if up.is_zero() => None,
            Self::Rem if up.is_zero() => None,
            Self::Div => Some(left / up),
            Self::Rem => Some(left % up),
        }
    }
}

/// Comparison gates that forward their operands when the comparison holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOp {
    /// `=` proceeds when both operands are equal.
    Equal,
    /// `#` proceeds when the operands differ.
    NotEqual,
}

impl GateOp {
    /// Reports whether the gate lets the operands through.
    #[must_use]
    pub fn admits(self, left: &Cell, up: &Cell) -> bool {
        match self {
            Self::Equal => left == up,
            Self::NotEqual => left != up,
        }
    }
}

/// Closed set of operator symbols understood by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Moves the cell behind the operator to the cell in front of it.
    Move(Direction),
    /// Integer arithmetic on the left and up neighbours.
    Arithmetic(ArithmeticOp),
    /// Equality or inequality gate on the left and up neighbours.
    Gate(GateOp),
    /// Sends the up neighbour back in time (`@`).
    TimeWarp,
}

impl Operator {
    /// Symbol used for the operator in program text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Move(Direction::West) => "<",
            Self::Move(Direction::East) => ">",
            Self::Move(Direction::North) => "^",
            Self::Move(Direction::South) => "v",
            Self::Arithmetic(ArithmeticOp::Add) => "+",
            Self::Arithmetic(ArithmeticOp::Sub) => "-",
            Self::Arithmetic(ArithmeticOp::Mul) => "*",
            Self::Arithmetic(ArithmeticOp::Div) => "/",
            Self::Arithmetic(ArithmeticOp::Rem) => "%",
            Self::Gate(GateOp::Equal) => "=",
            Self::Gate(GateOp::NotEqual) => "#",
            Self::TimeWarp => "@",
        }
    }

    /// Looks up the operator written as `symbol`.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "<" => Self::Move(Direction::West),
            ">" => Self::Move(Direction::East),
            "^" => Self::Move(Direction::North),
            "v" => Self::Move(Direction::South),
            "+" => Self::Arithmetic(ArithmeticOp::Add),
            "-" => Self::Arithmetic(ArithmeticOp::Sub),
            "*" => Self::Arithmetic(ArithmeticOp::Mul),
            "/" => Self::Arithmetic(ArithmeticOp::Div),
            "%" => Self::Arithmetic(ArithmeticOp::Rem),
            "=" => Self::Gate(GateOp::Equal),
            "#" => Self::Gate(GateOp::NotEqual),
            "@" => Self::TimeWarp,
            _ => return None,
        };
        Some(operator)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Value occupying a single board position.
///
/// Equality compares decoded content: integers compare numerically, so the
/// tokens `007` and `7` decode to equal cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Inert placeholder.
    Empty,
    /// Arbitrary precision signed integer.
    Integer(BigInt),
    /// Operator symbol.
    Operator(Operator),
    /// Input placeholder awaiting substitution before the first tick.
    Input(InputSlot),
    /// Output marker; a value written here is submitted as the result.
    Output,
    /// Non-integer text supplied through an input placeholder.
    Opaque(String),
}

impl Cell {
    /// Decodes a single program token.
    pub fn decode(token: &str) -> Result<Self, ParseError> {
        if token == EMPTY_TOKEN {
            return Ok(Self::Empty);
        }
        if token == OUTPUT_TOKEN {
            return Ok(Self::Output);
        }
        if let Some(slot) = InputSlot::from_token(token) {
            return Ok(Self::Input(slot));
        }
        if let Some(operator) = Operator::from_symbol(token) {
            return Ok(Self::Operator(operator));
        }
        parse_integer(token)
            .map(Self::Integer)
            .ok_or_else(|| ParseError::UnknownToken {
                token: token.to_owned(),
            })
    }

    /// Converts a caller-supplied input string into the value it substitutes.
    ///
    /// Strings that parse as integers become [`Cell::Integer`]; everything else
    /// is kept verbatim as [`Cell::Opaque`] and never read as an operator.
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        parse_integer(value).map_or_else(|| Self::Opaque(value.to_owned()), Self::Integer)
    }

    /// Canonical token for the cell.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Reports whether the cell is [`Cell::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether the cell carries no movable value.
    ///
    /// Empty cells and the output marker are never moved, copied or sent
    /// through time.
    #[must_use]
    pub const fn is_inert(&self) -> bool {
        matches!(self, Self::Empty | Self::Output)
    }

    /// Integer payload of the cell, if any.
    #[must_use]
    pub const fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Self::Integer(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(BigInt::from(value))
    }
}

impl From<Operator> for Cell {
    fn from(operator: Operator) -> Self {
        Self::Operator(operator)
    }
}

impl FromStr for Cell {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::decode(token)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(EMPTY_TOKEN),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Operator(operator) => f.write_str(operator.symbol()),
            Self::Input(slot) => f.write_str(slot.token()),
            Self::Output => f.write_str(OUTPUT_TOKEN),
            Self::Opaque(text) => f.write_str(text),
        }
    }
}

fn parse_integer(token: &str) -> Option<BigInt> {
    let (negative, digits) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Clamps an integer into the `i64` range, preserving its sign.
#[must_use]
pub fn saturating_i64(value: &BigInt) -> i64 {
    value.to_i64().unwrap_or(if value.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Location of a board position expressed as column and row.
///
/// Coordinates are signed so that positions just outside the board can be
/// named in errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i64,
    row: i64,
}

impl CellCoord {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(column: i64, row: i64) -> Self {
        Self { column, row }
    }

    /// Zero-based column (`x`) of the position.
    #[must_use]
    pub const fn column(&self) -> i64 {
        self.column
    }

    /// Zero-based row (`y`) of the position.
    #[must_use]
    pub const fn row(&self) -> i64 {
        self.row
    }

    /// Coordinate shifted by the provided deltas, saturating at the `i64` range.
    #[must_use]
    pub const fn offset(self, columns: i64, rows: i64) -> Self {
        Self {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    /// Neighbouring coordinate one step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (columns, rows) = direction.delta();
        self.offset(columns, rows)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Rectangular snapshot of cell values.
///
/// Width and height are fixed at construction. Cells are stored row-major.
/// Deserialized boards are validated the same way as [`Board::from_rows`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawBoard {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.width == 0 || raw.height == 0 {
            return Err(BoardError::Empty);
        }
        if raw.width.checked_mul(raw.height) != Some(raw.cells.len()) {
            return Err(BoardError::CellCount {
                width: raw.width,
                height: raw.height,
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            cells: raw.cells,
        })
    }
}

impl Board {
    /// Builds a board from rows of cells, validating the rectangular shape.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(BoardError::Ragged {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Decodes an already tokenized program into a board.
    pub fn decode<R, T>(rows: R) -> Result<Self, BoardError>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut decoded = Vec::new();
        for (row, tokens) in rows.into_iter().enumerate() {
            let mut cells = Vec::new();
            for (column, token) in tokens.into_iter().enumerate() {
                let cell = Cell::decode(token.as_ref())
                    .map_err(|error| BoardError::Token { row, column, error })?;
                cells.push(cell);
            }
            decoded.push(cells);
        }
        Self::from_rows(decoded)
    }

    /// Substitutes both input placeholders with the caller-supplied strings.
    #[must_use]
    pub fn with_inputs(mut self, a: &str, b: &str) -> Self {
        let a = Cell::from_input(a);
        let b = Cell::from_input(b);
        for cell in &mut self.cells {
            match cell {
                Cell::Input(InputSlot::A) => *cell = a.clone(),
                Cell::Input(InputSlot::B) => *cell = b.clone(),
                _ => {}
            }
        }
        self
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reports whether `cell` lies inside the board.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Returns the value at `cell`, or `None` when it lies outside the board.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&Cell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Overwrites the value at `cell`, returning the previous value.
    ///
    /// Returns `None` and leaves the board untouched when `cell` lies outside.
    pub fn replace(&mut self, cell: CellCoord, value: Cell) -> Option<Cell> {
        let index = self.index(cell)?;
        self.cells
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Iterator over rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Iterator over every position in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let column = (index % width) as i64;
            let row = (index / width) as i64;
            (CellCoord::new(column, row), cell)
        })
    }

    /// Captures a read-only view of the board.
    #[must_use]
    pub const fn view(&self) -> BoardView<'_> {
        BoardView { board: self }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        if column < self.width && row < self.height {
            Some(row * self.width + column)
        } else {
            None
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            for (column, cell) in row.iter().enumerate() {
                if column > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

/// Read-only view into a board snapshot.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    board: &'a Board,
}

impl<'a> BoardView<'a> {
    /// Returns the value at `cell`, or `None` when it lies outside the board.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&'a Cell> {
        self.board.get(cell)
    }

    /// Iterator over every position in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &'a Cell)> + 'a {
        self.board.iter()
    }

    /// Provides the board dimensions as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.board.width, self.board.height)
    }
}

/// Cell scheduled to be cleared during commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingRemoval {
    /// Position to clear.
    pub cell: CellCoord,
}

/// Value scheduled to be written during commit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingWrite {
    /// Destination of the write.
    pub cell: CellCoord,
    /// Value written to the destination.
    pub value: Cell,
}

/// Request to patch a past board with a value from the present.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWarpRequest {
    /// Position of the `@` operator that issued the request.
    pub source: CellCoord,
    /// Position patched in the past board.
    pub destination: CellCoord,
    /// Value sent back in time.
    pub value: Cell,
    /// Number of ticks to roll back.
    pub turns: i64,
}

/// Everything a single tick intends to change, collected before any commit.
///
/// Entries keep the row-major order in which the evaluator scheduled them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickPlan {
    removals: Vec<PendingRemoval>,
    writes: Vec<PendingWrite>,
    warps: Vec<TimeWarpRequest>,
}

impl TickPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all scheduled entries while keeping allocations.
    pub fn clear(&mut self) {
        self.removals.clear();
        self.writes.clear();
        self.warps.clear();
    }

    /// Schedules `cell` to be cleared.
    pub fn remove(&mut self, cell: CellCoord) {
        self.removals.push(PendingRemoval { cell });
    }

    /// Schedules `value` to be written at `cell`.
    pub fn write(&mut self, cell: CellCoord, value: Cell) {
        self.writes.push(PendingWrite { cell, value });
    }

    /// Schedules a time warp.
    pub fn warp(&mut self, request: TimeWarpRequest) {
        self.warps.push(request);
    }

    /// Scheduled removals.
    #[must_use]
    pub fn removals(&self) -> &[PendingRemoval] {
        &self.removals
    }

    /// Scheduled writes.
    #[must_use]
    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    /// Scheduled time warps.
    #[must_use]
    pub fn warps(&self) -> &[TimeWarpRequest] {
        &self.warps
    }

    /// Reports whether the plan schedules nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.writes.is_empty() && self.warps.is_empty()
    }
}

/// Value written into an output cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Submission {
    /// Output cell that received the value.
    pub cell: CellCoord,
    /// Submitted value.
    pub value: Cell,
}

/// Events broadcast by the world after committing a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new board was appended to history.
    TickAdvanced {
        /// History length after the tick.
        time: usize,
    },
    /// A value landed in an output cell.
    ValueSubmitted(Submission),
    /// History was rolled back and the new tail board patched.
    TimeWarped {
        /// Number of boards removed from the tail of history.
        turns: usize,
        /// History length after the rollback.
        time: usize,
    },
}

/// Failure to decode a program token.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// The token is neither an integer, an operator nor a reserved symbol.
    #[error("unknown token `{token}`")]
    UnknownToken {
        /// Offending token.
        token: String,
    },
}

/// Failure to assemble a board.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    /// The board has no rows or its first row has no cells.
    #[error("board has no cells")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Stored dimensions disagree with the number of cells.
    #[error("{width}x{height} board holds {found} cells")]
    CellCount {
        /// Declared number of columns.
        width: usize,
        /// Declared number of rows.
        height: usize,
        /// Number of cells actually present.
        found: usize,
    },
    /// A token could not be decoded.
    #[error("cell ({column}, {row}): {error}")]
    Token {
        /// Zero-based row of the token.
        row: usize,
        /// Zero-based column of the token.
        column: usize,
        /// Decoding failure.
        error: ParseError,
    },
}

/// Fatal evaluation failures. None of them is retried.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    /// An operator's neighbour or destination lies outside the board.
    #[error("operator `{operator}` at {at} reaches outside the board at {target}")]
    OutOfBounds {
        /// Operator that failed.
        operator: Operator,
        /// Position of the operator.
        at: CellCoord,
        /// Position outside the board.
        target: CellCoord,
    },
    /// An operand that must be an integer holds something else.
    #[error("operator `{operator}` at {at} expects an integer at {operand}, found `{value}`")]
    TypeError {
        /// Operator that failed.
        operator: Operator,
        /// Position of the operator.
        at: CellCoord,
        /// Position of the operand.
        operand: CellCoord,
        /// Value found at the operand.
        value: Cell,
    },
    /// `/` or `%` with a zero divisor.
    #[error("operator `{operator}` at {at} divides by zero")]
    DivisionByZero {
        /// Operator that failed.
        operator: Operator,
        /// Position of the operator.
        at: CellCoord,
    },
    /// Two writes in one tick disagree on the value of a cell.
    #[error("conflicting writes to {cell}: `{first}` and `{second}`")]
    ConflictingWrite {
        /// Contested position.
        cell: CellCoord,
        /// Value written first in scan order.
        first: Cell,
        /// Value written later in scan order.
        second: Cell,
    },
    /// Time warps issued in one tick disagree on how far to travel.
    #[error("time warps at {first} and {second} travel {first_turns} and {second_turns} ticks")]
    InconsistentTimeWarp {
        /// Operator of the first request in scan order.
        first: CellCoord,
        /// Operator of the first disagreeing request.
        second: CellCoord,
        /// Turn count of the first request.
        first_turns: i64,
        /// Turn count of the disagreeing request.
        second_turns: i64,
    },
    /// A rollback would remove more boards than history holds.
    #[error("time warp at {at} travels {turns} ticks but only {available} are available")]
    TimeWarpUnderflow {
        /// Operator that issued the request.
        at: CellCoord,
        /// Requested turn count.
        turns: i64,
        /// Largest turn count history can satisfy.
        available: usize,
    },
    /// Two time warps disagree on the value of a destination cell.
    #[error("time warps at {first_origin} and {second_origin} write `{first}` and `{second}` to {cell}")]
    ConflictingTimeWarpWrite {
        /// Contested destination.
        cell: CellCoord,
        /// Operator of the first request.
        first_origin: CellCoord,
        /// Operator of the conflicting request.
        second_origin: CellCoord,
        /// Value sent by the first request.
        first: Cell,
        /// Value sent by the conflicting request.
        second: Cell,
    },
    /// A tick plan removes or writes a cell outside the board.
    #[error("tick plan touches {cell} outside the board")]
    PlanOutsideBoard {
        /// Position outside the board.
        cell: CellCoord,
    },
    /// A cell that is neither an operator nor an inert value was scanned.
    #[error("unknown operator `{token}` at {at}")]
    UnknownOperator {
        /// Position of the cell.
        at: CellCoord,
        /// Token found at the position.
        token: String,
    },
}
