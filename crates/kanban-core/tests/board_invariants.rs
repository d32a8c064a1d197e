//! Property tests: any sequence of moves keeps every column densely indexed
//! and never loses or duplicates a task.

use std::collections::BTreeSet;

use kanban_core::{drop_index, Board, BoundingBox, Column, ColumnId, Task, TaskId};
use proptest::prelude::*;

const COLUMNS: [&str; 3] = ["todo", "doing", "done"];

#[derive(Debug, Clone)]
enum Op {
    Move { task: usize, target: usize, index: usize },
    Reorder { task: usize, index: usize },
    Append { task: usize, target: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..12, 0usize..3, 0usize..16)
            .prop_map(|(task, target, index)| Op::Move { task, target, index }),
        2 => (0usize..12, 0usize..16).prop_map(|(task, index)| Op::Reorder { task, index }),
        1 => (0usize..12, 0usize..3).prop_map(|(task, target)| Op::Append { task, target }),
    ]
}

fn seed_board(task_count: usize) -> Board {
    let mut columns: Vec<Column> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, id)| Column::new(*id, *id, "p1", i as i32))
        .collect();
    for n in 0..task_count {
        let column = &mut columns[n % COLUMNS.len()];
        column.tasks.push(Task::new(format!("t{n}"), format!("Task {n}"), column.id.clone(), "p1"));
    }
    Board::from_columns(columns)
}

fn task_ids(board: &Board) -> BTreeSet<TaskId> {
    board
        .columns()
        .iter()
        .flat_map(|c| c.tasks.iter().map(|t| t.id.clone()))
        .collect()
}

fn assert_dense(board: &Board) {
    for column in board.columns() {
        for (i, task) in column.tasks.iter().enumerate() {
            assert_eq!(task.position, i, "column {} not densely indexed", column.id);
            assert_eq!(task.column_id, column.id);
        }
    }
}

fn apply_op(board: &mut Board, op: &Op, task_count: usize) {
    let task_id = |n: usize| TaskId::new(format!("t{}", n % task_count));
    let (task, target, index) = match *op {
        Op::Move { task, target, index } => (task_id(task), ColumnId::new(COLUMNS[target]), index),
        Op::Reorder { task, index } => {
            let id = task_id(task);
            let Some(column) = board.column_of(&id) else { return };
            (id, column.id.clone(), index)
        }
        Op::Append { task, target } => (task_id(task), ColumnId::new(COLUMNS[target]), usize::MAX),
    };
    let Some(source) = board.column_of(&task).map(|c| c.id.clone()) else {
        return;
    };
    let moved = board
        .move_task(&task, &source, &target, index)
        .expect("task located before the move");
    let expected = index.min(board.column(&target).map_or(0, |c| c.len() - 1));
    assert_eq!(moved.position, expected);
    assert_eq!(moved.column_id, target);
}

proptest! {
    #[test]
    fn moves_keep_columns_dense_and_tasks_conserved(
        task_count in 1usize..12,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut board = seed_board(task_count);
        let before = task_ids(&board);

        for op in &ops {
            apply_op(&mut board, op, task_count);
            assert_dense(&board);
        }

        prop_assert_eq!(task_ids(&board), before);
        prop_assert_eq!(board.task_count(), task_count);
    }

    #[test]
    fn reinserting_at_own_index_is_identity(
        task_count in 1usize..12,
        pick in 0usize..12,
    ) {
        let mut board = seed_board(task_count);
        let snapshot = board.clone();
        let id = TaskId::new(format!("t{}", pick % task_count));
        let column = board.column_of(&id).cloned().expect("seeded task");
        let index = column.task_index(&id).expect("seeded task");

        board.move_task(&id, &column.id, &column.id, index).expect("valid move");

        prop_assert_eq!(board, snapshot);
    }

    #[test]
    fn drop_index_counts_midpoints_above_pointer(
        heights in prop::collection::vec(1.0f64..120.0, 0..10),
        pointer_y in -50.0f64..1200.0,
    ) {
        let mut top = 0.0;
        let boxes: Vec<BoundingBox> = heights
            .iter()
            .map(|h| {
                let b = BoundingBox::new(top, *h);
                top += h + 8.0;
                b
            })
            .collect();

        let index = drop_index(pointer_y, &boxes);

        prop_assert!(index <= boxes.len());
        prop_assert!(boxes[..index].iter().all(|b| b.midpoint() <= pointer_y));
        if let Some(next) = boxes.get(index) {
            prop_assert!(next.midpoint() > pointer_y);
        }
    }
}
