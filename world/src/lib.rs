#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation history for Chronogrid.
//!
//! The world owns every board produced so far. Ticks are committed through
//! [`apply`], which either appends a new board or rolls history back and
//! patches the board that becomes current.

use std::collections::HashMap;

use chronogrid_core::{
    Board, Cell, CellCoord, EngineError, Event, Operator, Submission, TickPlan, TimeWarpRequest,
};

/// Ordered boards from the initial board (time 1) to the current one.
///
/// History always holds at least one board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    past: Vec<Board>,
    current: Board,
}

impl History {
    /// Starts a history containing only `initial`.
    #[must_use]
    pub fn new(initial: Board) -> Self {
        Self {
            past: Vec::new(),
            current: initial,
        }
    }

    /// Number of boards held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.past.len() + 1
    }

    /// History is never empty; provided for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Most recent board.
    #[must_use]
    pub const fn current(&self) -> &Board {
        &self.current
    }

    /// Board at zero-based `index`, oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Board> {
        if index == self.past.len() {
            Some(&self.current)
        } else {
            self.past.get(index)
        }
    }

    /// Iterator over all boards, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.past.iter().chain(std::iter::once(&self.current))
    }

    fn push(&mut self, board: Board) {
        let previous = std::mem::replace(&mut self.current, board);
        self.past.push(previous);
    }

    /// Drops the newest `turns` boards. Callers guarantee `turns < len()`.
    fn rewind(&mut self, turns: usize) {
        if turns == 0 {
            return;
        }
        let keep = self.len() - turns;
        self.past.truncate(keep);
        if let Some(board) = self.past.pop() {
            self.current = board;
        }
    }
}

/// Represents the authoritative simulation state.
#[derive(Clone, Debug)]
pub struct World {
    history: History,
}

impl World {
    /// Creates a world whose history holds only `initial`.
    #[must_use]
    pub fn new(initial: Board) -> Self {
        Self {
            history: History::new(initial),
        }
    }
}

/// Commits a tick plan to the world.
///
/// Removals are applied before writes on a copy of the current board. When no
/// output cell received a value and the plan carries time warps, history is
/// rolled back and patched instead of growing. On error the world is left
/// exactly as it was.
pub fn apply(
    world: &mut World,
    plan: &TickPlan,
    out_events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let mut submissions = Vec::new();
    let next = commit(world.history.current(), plan, &mut submissions)?;

    if submissions.is_empty() && !plan.warps().is_empty() {
        let turns = time_travel(&mut world.history, plan.warps())?;
        out_events.push(Event::TimeWarped {
            turns,
            time: world.history.len(),
        });
        return Ok(());
    }

    world.history.push(next);
    out_events.extend(submissions.into_iter().map(Event::ValueSubmitted));
    out_events.push(Event::TickAdvanced {
        time: world.history.len(),
    });
    Ok(())
}

fn commit(
    current: &Board,
    plan: &TickPlan,
    submissions: &mut Vec<Submission>,
) -> Result<Board, EngineError> {
    let mut next = current.clone();
    for removal in plan.removals() {
        if next.replace(removal.cell, Cell::Empty).is_none() {
            return Err(EngineError::PlanOutsideBoard { cell: removal.cell });
        }
    }

    let mut written: HashMap<CellCoord, &Cell> = HashMap::new();
    for write in plan.writes() {
        if !next.contains(write.cell) {
            return Err(EngineError::PlanOutsideBoard { cell: write.cell });
        }
        if let Some(first) = written.get(&write.cell) {
            if **first != write.value {
                return Err(EngineError::ConflictingWrite {
                    cell: write.cell,
                    first: (*first).clone(),
                    second: write.value.clone(),
                });
            }
            continue;
        }
        let _ = written.insert(write.cell, &write.value);

        if next.replace(write.cell, write.value.clone()) == Some(Cell::Output) {
            submissions.push(Submission {
                cell: write.cell,
                value: write.value.clone(),
            });
        }
    }

    Ok(next)
}

/// Rolls history back and patches the new current board.
///
/// Every request is validated before history is touched.
fn time_travel(history: &mut History, warps: &[TimeWarpRequest]) -> Result<usize, EngineError> {
    let Some(first) = warps.first() else {
        return Ok(0);
    };

    if let Some(other) = warps.iter().find(|request| request.turns != first.turns) {
        return Err(EngineError::InconsistentTimeWarp {
            first: first.source,
            second: other.source,
            first_turns: first.turns,
            second_turns: other.turns,
        });
    }

    let available = history.len() - 1;
    let turns = usize::try_from(first.turns)
        .ok()
        .filter(|turns| *turns <= available)
        .ok_or(EngineError::TimeWarpUnderflow {
            at: first.source,
            turns: first.turns,
            available,
        })?;

    let mut patches: Vec<&TimeWarpRequest> = Vec::with_capacity(warps.len());
    let mut claimed: HashMap<CellCoord, &TimeWarpRequest> = HashMap::new();
    for request in warps {
        if !history.current().contains(request.destination) {
            return Err(EngineError::OutOfBounds {
                operator: Operator::TimeWarp,
                at: request.source,
                target: request.destination,
            });
        }
        match claimed.get(&request.destination) {
            Some(earlier) if earlier.value != request.value => {
                return Err(EngineError::ConflictingTimeWarpWrite {
                    cell: request.destination,
                    first_origin: earlier.source,
                    second_origin: request.source,
                    first: earlier.value.clone(),
                    second: request.value.clone(),
                });
            }
            Some(_) => {}
            None => {
                let _ = claimed.insert(request.destination, request);
                patches.push(request);
            }
        }
    }

    history.rewind(turns);
    for request in patches {
        let _ = history
            .current
            .replace(request.destination, request.value.clone());
    }
    Ok(turns)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{History, World};
    use chronogrid_core::Board;

    /// Board the next tick will read.
    #[must_use]
    pub fn current_board(world: &World) -> &Board {
        world.history.current()
    }

    /// Every board produced so far, oldest first.
    #[must_use]
    pub fn history(world: &World) -> &History {
        &world.history
    }

    /// Current time, measured as the number of boards in history.
    #[must_use]
    pub fn time(world: &World) -> usize {
        world.history.len()
    }
}
