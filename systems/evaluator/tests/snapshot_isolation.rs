use chronogrid_core::{Cell, CellCoord, PendingRemoval, PendingWrite, TickPlan};
use chronogrid_system_evaluator::Evaluator;
use chronogrid_text::{parse_board, render_board};

fn plan(text: &str) -> TickPlan {
    let board = parse_board(text).expect("board");
    let mut plan = TickPlan::new();
    Evaluator
        .handle(board.view(), &mut plan)
        .expect("evaluation succeeds");
    plan
}

#[test]
fn evaluation_leaves_the_board_untouched() {
    let text = ". 4 .\n3 * S\n. > .";
    let board = parse_board(text).expect("board");
    let mut plan = TickPlan::new();

    Evaluator
        .handle(board.view(), &mut plan)
        .expect("evaluation succeeds");

    assert_eq!(render_board(&board), text);
    assert!(!plan.is_empty());
}

#[test]
fn chained_movers_each_read_the_snapshot() {
    let plan = plan("5 > > .");

    assert_eq!(
        plan.writes(),
        &[
            PendingWrite {
                cell: CellCoord::new(2, 0),
                value: Cell::from(5),
            },
            PendingWrite {
                cell: CellCoord::new(3, 0),
                value: Cell::decode(">").expect("mover"),
            },
        ]
    );
    assert_eq!(
        plan.removals(),
        &[
            PendingRemoval {
                cell: CellCoord::new(0, 0),
            },
            PendingRemoval {
                cell: CellCoord::new(1, 0),
            },
        ]
    );
}

#[test]
fn results_may_land_on_an_operator_that_reads_the_snapshot() {
    let plan = plan(". . . .\n. 2 . .\n3 + + .\n. . . .");

    assert_eq!(plan.writes().len(), 2);

    assert!(plan.writes().contains(&PendingWrite {
        cell: CellCoord::new(2, 2),
        value: Cell::from(5),
    }));
    assert!(plan.removals().contains(&PendingRemoval {
        cell: CellCoord::new(1, 1),
    }));
}

#[test]
fn handle_clears_the_previous_plan() {
    let board = parse_board("7 > .").expect("board");
    let idle = parse_board("7 . .").expect("board");
    let mut plan = TickPlan::new();

    Evaluator.handle(board.view(), &mut plan).expect("plan");
    assert_eq!(plan.writes().len(), 1);

    Evaluator.handle(idle.view(), &mut plan).expect("plan");
    assert!(plan.is_empty());
}
