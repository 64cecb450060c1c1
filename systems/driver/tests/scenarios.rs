use chronogrid_core::{ArithmeticOp, Cell, CellCoord, EngineError, Operator, Submission};
use chronogrid_system_driver::{run, Driver, DriverConfig, RunError, RunStats, Status};
use chronogrid_text::{parse_board, parse_program, render_board};

/// Sends `9` back one tick so that a mover can carry it into the output cell.
const WARP_PROGRAM: &str = "\
. . 9 . .
. . v . v
. . . . S
. -2 @ 3 .
. . 1 . .";

fn driver(text: &str) -> Driver {
    Driver::new(parse_board(text).expect("board"), DriverConfig::default())
}

#[test]
fn binary_operator_on_the_top_edge_fails() {
    let mut driver = driver("2 + .\n. . .\n. . .");

    let error = driver.run().unwrap_err();

    assert_eq!(
        error,
        RunError::Engine {
            tick: 1,
            error: EngineError::OutOfBounds {
                operator: Operator::Arithmetic(ArithmeticOp::Add),
                at: CellCoord::new(1, 0),
                target: CellCoord::new(1, -1),
            },
        }
    );
}

#[test]
fn product_lands_in_the_output_cell() {
    let mut driver = driver(". 4 .\n3 * S\n. > .");

    let status = driver.step().expect("tick");

    let Status::Submitted(outcome) = status else {
        panic!("expected a submission, got {status:?}");
    };
    assert_eq!(outcome.value(), &Cell::from(12));
    assert!(!outcome.is_inconsistent());
    assert_eq!(render_board(driver.board()), ". . .\n. * 12\n. 12 .");
    assert!(driver.is_halted());
}

#[test]
fn division_by_zero_halts_with_history_unchanged() {
    let text = ". 0 .\n6 / .\n. . .";
    let mut driver = driver(text);

    let error = driver.run().unwrap_err();

    assert!(matches!(
        error,
        RunError::Engine {
            tick: 1,
            error: EngineError::DivisionByZero { .. }
        }
    ));
    assert_eq!(driver.history().len(), 1);
    assert_eq!(render_board(driver.board()), text);
}

#[test]
fn operands_are_read_from_the_pre_tick_board() {
    let mut driver = driver(". . 4 .\n. 5 + .\n. v . .\n. . . .");

    assert_eq!(driver.step(), Ok(Status::Running));

    assert_eq!(
        render_board(driver.board()),
        ". . . .\n. . + 9\n. v 9 .\n. 5 . ."
    );
}

#[test]
fn movers_writing_different_values_to_one_cell_conflict() {
    let error = driver("3 > . < 4").run().unwrap_err();

    assert_eq!(
        error,
        RunError::Engine {
            tick: 1,
            error: EngineError::ConflictingWrite {
                cell: CellCoord::new(2, 0),
                first: Cell::from(3),
                second: Cell::from(4),
            },
        }
    );
}

#[test]
fn movers_writing_the_same_value_to_one_cell_agree() {
    let mut driver = driver("3 > . < 3");

    assert_eq!(driver.step(), Ok(Status::Running));

    assert_eq!(render_board(driver.board()), ". > 3 < .");
}

#[test]
fn equality_gate_forwards_matching_values() {
    let outcome = run(
        parse_board(". 5 .\n5 = S\n. . .").expect("board"),
        DriverConfig::default(),
    )
    .expect("submission");

    assert_eq!(outcome.value(), &Cell::from(5));
}

#[test]
fn inequality_gate_is_the_complement() {
    let outcome = run(
        parse_board(". 6 .\n5 # S\n. . .").expect("board"),
        DriverConfig::default(),
    )
    .expect("submission");
    assert_eq!(outcome.value(), &Cell::from(6));

    let config = DriverConfig {
        max_ticks: Some(5),
        ..DriverConfig::default()
    };
    let error = run(parse_board(". 5 .\n5 # S\n. . .").expect("board"), config).unwrap_err();
    assert_eq!(error, RunError::TickLimitReached { limit: 5 });
}

#[test]
fn inputs_feed_the_program() {
    let board = parse_program(". B .\nA * S\n. . .", "6", "7").expect("board");

    let outcome = run(board, DriverConfig::default()).expect("submission");

    assert_eq!(outcome.value().encode(), "42");
}

#[test]
fn non_integer_inputs_are_not_operators() {
    let board = parse_program(". B .\nA * S\n. . .", "x", "7").expect("board");

    let error = run(board, DriverConfig::default()).unwrap_err();

    assert_eq!(
        error,
        RunError::Engine {
            tick: 1,
            error: EngineError::UnknownOperator {
                at: CellCoord::new(0, 1),
                token: "x".to_owned(),
            },
        }
    );
}

#[test]
fn time_warp_rewrites_the_past_and_reruns_it() {
    let mut driver = driver(WARP_PROGRAM);

    assert_eq!(driver.step(), Ok(Status::Running));
    assert_eq!(driver.history().len(), 2);

    assert_eq!(driver.step(), Ok(Status::Running));
    assert_eq!(driver.history().len(), 1);
    assert_eq!(
        render_board(driver.board()),
        ". . 9 . 9\n. . v . v\n. . . . S\n. -2 @ 3 .\n. . 1 . ."
    );

    let Ok(Status::Submitted(outcome)) = driver.step() else {
        panic!("third tick should submit");
    };
    assert_eq!(outcome.value(), &Cell::from(9));
    assert_eq!(
        outcome.stats(),
        RunStats {
            ticks: 3,
            time: 2,
            peak_time: 2,
            time_warps: 1,
        }
    );
}

#[test]
fn time_warp_on_the_first_tick_underflows() {
    let error = driver(". 2 .\n1 @ 0\n. 1 .").run().unwrap_err();

    assert_eq!(
        error,
        RunError::Engine {
            tick: 1,
            error: EngineError::TimeWarpUnderflow {
                at: CellCoord::new(1, 1),
                turns: 1,
                available: 0,
            },
        }
    );
}

#[test]
fn distinct_submissions_warn_and_keep_the_first() {
    let outcome = run(
        parse_board("7 > S\n8 > S").expect("board"),
        DriverConfig::default(),
    )
    .expect("submission");

    assert_eq!(outcome.value(), &Cell::from(7));
    assert!(outcome.is_inconsistent());
    assert_eq!(
        outcome.submissions(),
        &[
            Submission {
                cell: CellCoord::new(2, 0),
                value: Cell::from(7),
            },
            Submission {
                cell: CellCoord::new(2, 1),
                value: Cell::from(8),
            },
        ]
    );
}

#[test]
fn strict_submissions_reject_distinct_values() {
    let config = DriverConfig {
        strict_submissions: true,
        ..DriverConfig::default()
    };

    let error = run(parse_board("7 > S\n8 > S").expect("board"), config.clone()).unwrap_err();
    assert!(matches!(
        error,
        RunError::InconsistentSubmissions { tick: 1, ref submissions } if submissions.len() == 2
    ));

    let outcome = run(parse_board("7 > S\n7 > S").expect("board"), config).expect("submission");
    assert!(!outcome.is_inconsistent());
    assert_eq!(outcome.submissions().len(), 2);
}
