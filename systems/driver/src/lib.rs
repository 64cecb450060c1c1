#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Driver loop that advances a Chronogrid simulation until it halts.
//!
//! The [`Driver`] owns the world, runs the evaluator against the current board
//! and commits the resulting plan, one tick per [`Driver::step`]. A run halts
//! when a value lands in an output cell or when any tick fails.

use chronogrid_core::{Board, Cell, EngineError, Event, Submission, TickPlan};
use chronogrid_system_evaluator::Evaluator;
use chronogrid_world::{self as world, query, History, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Caller-imposed limits and policies for a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Maximum number of ticks to execute, counting ticks later undone by
    /// time travel. `None` runs until the program halts on its own.
    pub max_ticks: Option<u64>,
    /// Treats distinct values submitted in the same tick as an error instead
    /// of a warning.
    pub strict_submissions: bool,
}

impl DriverConfig {
    /// Parses a configuration from TOML text.
    ///
    /// ```toml
    /// max_ticks = 1000000
    /// strict_submissions = true
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::from)
    }
}

/// Failure to load a [`DriverConfig`].
#[derive(Debug, Error)]
#[error("invalid driver configuration: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

/// Counters describing how far a run has progressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunStats {
    /// Ticks executed so far, including ticks undone by time travel.
    pub ticks: u64,
    /// Current time, measured as the number of boards in history.
    pub time: usize,
    /// Largest time reached during the run.
    pub peak_time: usize,
    /// Number of ticks that travelled back in time.
    pub time_warps: u64,
}

/// Result of a run that halted by submitting a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    value: Cell,
    submissions: Vec<Submission>,
    stats: RunStats,
}

impl Outcome {
    /// Representative submitted value: the first one in scan order.
    #[must_use]
    pub const fn value(&self) -> &Cell {
        &self.value
    }

    /// Every submission made by the halting tick, in scan order.
    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Reports whether the halting tick submitted more than one distinct value.
    #[must_use]
    pub fn is_inconsistent(&self) -> bool {
        self.submissions
            .iter()
            .any(|submission| submission.value != self.value)
    }

    /// Counters captured when the run halted.
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }
}

/// State reported after a single tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The tick committed and the simulation continues.
    Running,
    /// The tick submitted a value and the simulation halted.
    Submitted(Outcome),
}

/// Reasons a run stops without a submission.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    /// A tick failed; history is left as it was when the tick started.
    #[error("tick {tick} failed: {error}")]
    Engine {
        /// One-based index of the failing tick.
        tick: u64,
        /// Underlying evaluation failure.
        #[source]
        error: EngineError,
    },
    /// The configured tick limit was reached before the program halted.
    #[error("no submission within {limit} ticks")]
    TickLimitReached {
        /// Configured limit.
        limit: u64,
    },
    /// Distinct values were submitted in one tick under strict submissions.
    #[error("tick {tick} submitted {} distinct values", .submissions.len())]
    InconsistentSubmissions {
        /// One-based index of the halting tick.
        tick: u64,
        /// Every submission made by the tick.
        submissions: Vec<Submission>,
    },
    /// The driver already halted and cannot advance further.
    #[error("simulation already halted")]
    Halted,
}

/// Drives a single simulation from its initial board to a terminal state.
#[derive(Debug)]
pub struct Driver {
    world: World,
    evaluator: Evaluator,
    config: DriverConfig,
    stats: RunStats,
    plan: TickPlan,
    events: Vec<Event>,
    halted: bool,
}

impl Driver {
    /// Creates a driver whose history holds only `initial`.
    ///
    /// Input placeholders must already be substituted, see
    /// [`Board::with_inputs`].
    #[must_use]
    pub fn new(initial: Board, config: DriverConfig) -> Self {
        let world = World::new(initial);
        let time = query::time(&world);
        Self {
            world,
            evaluator: Evaluator,
            config,
            stats: RunStats {
                time,
                peak_time: time,
                ..RunStats::default()
            },
            plan: TickPlan::new(),
            events: Vec::new(),
            halted: false,
        }
    }

    /// Board the next tick will read.
    #[must_use]
    pub fn board(&self) -> &Board {
        query::current_board(&self.world)
    }

    /// Every board produced so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &History {
        query::history(&self.world)
    }

    /// Counters describing the run so far.
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Reports whether the driver reached a terminal state.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Executes exactly one tick.
    pub fn step(&mut self) -> Result<Status, RunError> {
        if self.halted {
            return Err(RunError::Halted);
        }
        if let Some(limit) = self.config.max_ticks {
            if self.stats.ticks >= limit {
                self.halted = true;
                return Err(RunError::TickLimitReached { limit });
            }
        }

        let tick = self.stats.ticks + 1;
        trace!(tick, time = self.stats.time, "evaluating tick");

        self.events.clear();
        let board = query::current_board(&self.world).view();
        let committed = self
            .evaluator
            .handle(board, &mut self.plan)
            .and_then(|()| world::apply(&mut self.world, &self.plan, &mut self.events));
        if let Err(error) = committed {
            self.halted = true;
            debug!(tick, %error, "tick failed");
            return Err(RunError::Engine { tick, error });
        }

        self.stats.ticks = tick;
        self.stats.time = query::time(&self.world);
        self.stats.peak_time = self.stats.peak_time.max(self.stats.time);
        trace!(
            tick,
            time = self.stats.time,
            board = %query::current_board(&self.world),
            "committed tick"
        );

        let mut submissions = Vec::new();
        for event in self.events.drain(..) {
            match event {
                Event::ValueSubmitted(submission) => submissions.push(submission),
                Event::TimeWarped { turns, time } => {
                    self.stats.time_warps += 1;
                    debug!(tick, turns, time, "time warp");
                }
                Event::TickAdvanced { .. } => {}
            }
        }

        let Some(first) = submissions.first() else {
            return Ok(Status::Running);
        };
        self.halted = true;

        let outcome = Outcome {
            value: first.value.clone(),
            submissions,
            stats: self.stats,
        };
        if outcome.is_inconsistent() {
            warn!(
                tick,
                value = %outcome.value,
                count = outcome.submissions.len(),
                "distinct values submitted in one tick"
            );
            if self.config.strict_submissions {
                return Err(RunError::InconsistentSubmissions {
                    tick,
                    submissions: outcome.submissions,
                });
            }
        }
        debug!(tick, value = %outcome.value, "submitted");
        Ok(Status::Submitted(outcome))
    }

    /// Runs ticks until the simulation halts.
    pub fn run(&mut self) -> Result<Outcome, RunError> {
        loop {
            if let Status::Submitted(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
    }
}

/// Runs `initial` to completion with the provided configuration.
pub fn run(initial: Board, config: DriverConfig) -> Result<Outcome, RunError> {
    Driver::new(initial, config).run()
}
