#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tick evaluator that scans a board snapshot and plans the next tick.
//!
//! The evaluator never mutates the board it reads. Every operator observes the
//! pre-tick snapshot, so two operators touching the same cell in one tick see
//! the same value regardless of scan order.

use chronogrid_core::{
    saturating_i64, ArithmeticOp, BoardView, Cell, CellCoord, Direction, EngineError, GateOp,
    Operator, TickPlan, TimeWarpRequest,
};
use num_bigint::BigInt;

/// Pure system that turns a board snapshot into a [`TickPlan`].
#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Scans every cell once in row-major order and records the planned
    /// removals, writes and time warps into `out`.
    ///
    /// `out` is cleared first. On error its contents are unspecified and must
    /// not be committed.
    pub fn handle(&self, board: BoardView<'_>, out: &mut TickPlan) -> Result<(), EngineError> {
        out.clear();
        for (at, cell) in board.iter() {
            match cell {
                Cell::Empty | Cell::Integer(_) | Cell::Output => {}
                Cell::Operator(operator) => {
                    let site = Site {
                        board,
                        at,
                        operator: *operator,
                    };
                    match *operator {
                        Operator::Move(direction) => plan_move(&site, direction, out)?,
                        Operator::Arithmetic(op) => plan_arithmetic(&site, op, out)?,
                        Operator::Gate(gate) => plan_gate(&site, gate, out)?,
                        Operator::TimeWarp => plan_time_warp(&site, out)?,
                    }
                }
                Cell::Input(_) | Cell::Opaque(_) => {
                    return Err(EngineError::UnknownOperator {
                        at,
                        token: cell.encode(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Operator being evaluated together with the snapshot it reads.
struct Site<'a> {
    board: BoardView<'a>,
    at: CellCoord,
    operator: Operator,
}

impl<'a> Site<'a> {
    fn neighbour(&self, direction: Direction) -> Result<(CellCoord, &'a Cell), EngineError> {
        let target = self.at.step(direction);
        self.board
            .get(target)
            .map(|cell| (target, cell))
            .ok_or(EngineError::OutOfBounds {
                operator: self.operator,
                at: self.at,
                target,
            })
    }

    /// Fetches the left, up and right neighbours every binary operator needs.
    fn binary_operands(&self) -> Result<BinaryOperands<'a>, EngineError> {
        Ok(BinaryOperands {
            left: self.neighbour(Direction::West)?,
            up: self.neighbour(Direction::North)?,
            right: self.neighbour(Direction::East)?,
        })
    }

    fn integer(&self, (operand, cell): (CellCoord, &'a Cell)) -> Result<&'a BigInt, EngineError> {
        cell.as_integer().ok_or_else(|| EngineError::TypeError {
            operator: self.operator,
            at: self.at,
            operand,
            value: cell.clone(),
        })
    }
}

struct BinaryOperands<'a> {
    left: (CellCoord, &'a Cell),
    up: (CellCoord, &'a Cell),
    right: (CellCoord, &'a Cell),
}

fn plan_move(site: &Site<'_>, direction: Direction, out: &mut TickPlan) -> Result<(), EngineError> {
    let (source, value) = site.neighbour(direction.reverse())?;
    let (destination, _) = site.neighbour(direction)?;
    if value.is_inert() {
        return Ok(());
    }

    out.write(destination, value.clone());
    out.remove(source);
    Ok(())
}

fn plan_arithmetic(
    site: &Site<'_>,
    op: ArithmeticOp,
    out: &mut TickPlan,
) -> Result<(), EngineError> {
    let operands = site.binary_operands()?;
    if operands.left.1.is_empty() || operands.up.1.is_empty() {
        return Ok(());
    }

    let left = site.integer(operands.left)?;
    let up = site.integer(operands.up)?;
    let result = op.apply(left, up).ok_or(EngineError::DivisionByZero {
        operator: site.operator,
        at: site.at,
    })?;
    let (down, _) = site.neighbour(Direction::South)?;

    out.write(operands.right.0, Cell::Integer(result.clone()));
    out.write(down, Cell::Integer(result));
    out.remove(operands.left.0);
    out.remove(operands.up.0);
    Ok(())
}

fn plan_gate(site: &Site<'_>, gate: GateOp, out: &mut TickPlan) -> Result<(), EngineError> {
    let operands = site.binary_operands()?;
    let (left, up) = (operands.left.1, operands.up.1);
    if left.is_inert() || up.is_inert() || !gate.admits(left, up) {
        return Ok(());
    }
    let (down, _) = site.neighbour(Direction::South)?;

    out.write(operands.right.0, up.clone());
    out.write(down, left.clone());
    out.remove(operands.left.0);
    out.remove(operands.up.0);
    Ok(())
}

fn plan_time_warp(site: &Site<'_>, out: &mut TickPlan) -> Result<(), EngineError> {
    let operands = site.binary_operands()?;
    let value = operands.up.1;
    if value.is_inert() {
        return Ok(());
    }
    let down = site.neighbour(Direction::South)?;

    let column_offset = saturating_i64(site.integer(operands.left)?);
    let turns = saturating_i64(site.integer(down)?);
    let row_offset = saturating_i64(site.integer(operands.right)?);

    out.warp(TimeWarpRequest {
        source: site.at,
        destination: site
            .at
            .offset(column_offset.saturating_neg(), row_offset.saturating_neg()),
        value: value.clone(),
        turns,
    });
    Ok(())
}
