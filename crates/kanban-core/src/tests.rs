//! Engine Integration Tests
//!
//! Drag → drop → persist → resolve against an in-memory column service.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::actions;
use crate::*;

/// How the fake answers the next move request
enum Reply {
    Ok,
    Err(ServiceError),
    /// Resolve when the test sends on the paired channel
    Wait(oneshot::Receiver<ServiceResult<()>>),
}

#[derive(Default)]
struct FakeService {
    moves: RefCell<Vec<(ProjectId, TaskId, MoveTaskDto)>>,
    replies: RefCell<VecDeque<Reply>>,
    server_columns: RefCell<Vec<Column>>,
    fetch_error: RefCell<Option<ServiceError>>,
    crud_error: RefCell<Option<ServiceError>>,
    crud_calls: Cell<usize>,
}

impl FakeService {
    fn reply(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(reply);
    }

    fn move_calls(&self) -> usize {
        self.moves.borrow().len()
    }

    fn crud_result(&self) -> ServiceResult<()> {
        self.crud_calls.set(self.crud_calls.get() + 1);
        match self.crud_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl ColumnService for FakeService {
    async fn move_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        dto: &MoveTaskDto,
    ) -> ServiceResult<Task> {
        self.moves
            .borrow_mut()
            .push((project_id.clone(), task_id.clone(), dto.clone()));
        let reply = self.replies.borrow_mut().pop_front().unwrap_or(Reply::Ok);
        let result = match reply {
            Reply::Ok => Ok(()),
            Reply::Err(err) => Err(err),
            Reply::Wait(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ServiceError::Transport("reply dropped".into()))),
        };
        result.map(|()| {
            let mut task = Task::new(task_id.clone(), "echo", dto.column_id.clone(), project_id.clone());
            task.position = dto.position;
            task
        })
    }

    async fn fetch_columns(&self, _project_id: &ProjectId) -> ServiceResult<Vec<Column>> {
        match self.fetch_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.server_columns.borrow().clone()),
        }
    }
}

#[async_trait(?Send)]
impl BoardCrudService for FakeService {
    async fn create_column(&self, project_id: &ProjectId, title: &str) -> ServiceResult<Column> {
        self.crud_result()?;
        Ok(Column::new("new-col", title, project_id.clone(), 10))
    }

    async fn update_column(&self, column_id: &ColumnId, patch: &ColumnPatch) -> ServiceResult<Column> {
        self.crud_result()?;
        let title = patch.title.clone().unwrap_or_default();
        Ok(Column::new(column_id.clone(), title, "p1", patch.order_index.unwrap_or(0)))
    }

    async fn delete_column(&self, _column_id: &ColumnId) -> ServiceResult<()> {
        self.crud_result()
    }

    async fn create_task(&self, task: &NewTask) -> ServiceResult<Task> {
        self.crud_result()?;
        Ok(Task::new("new-task", task.title.clone(), task.column_id.clone(), task.project_id.clone()))
    }

    async fn update_task(&self, task: &Task) -> ServiceResult<Task> {
        self.crud_result()?;
        Ok(task.clone())
    }

    async fn delete_task(&self, _task_id: &TaskId) -> ServiceResult<()> {
        self.crud_result()
    }
}

fn project() -> ProjectId {
    ProjectId::new("p1")
}

fn column(id: &str, order: i32, tasks: &[&str]) -> Column {
    Column::new(id, id.to_uppercase(), "p1", order).with_tasks(
        tasks
            .iter()
            .map(|t| Task::new(*t, t.to_uppercase(), id, "p1"))
            .collect(),
    )
}

/// "To Do" = [A, B], "Done" = []
fn setup_store() -> Rc<RefCell<BoardStore>> {
    let mut store = BoardStore::new();
    store.replace_columns(
        project(),
        vec![column("todo", 0, &["A", "B"]).protected(), column("done", 1, &[])],
    );
    Rc::new(RefCell::new(store))
}

fn layout(store: &RefCell<BoardStore>, column_id: &str) -> Vec<(String, usize)> {
    store
        .borrow()
        .board(&project())
        .and_then(|b| b.column(&ColumnId::new(column_id)))
        .map(|c| c.tasks.iter().map(|t| (t.id.to_string(), t.position)).collect())
        .unwrap_or_default()
}

fn command(task: &str, from: &str, to: &str, index: Option<usize>) -> MoveCommand {
    MoveCommand {
        project_id: project(),
        task_id: TaskId::new(task),
        source_column_id: ColumnId::new(from),
        target_column_id: ColumnId::new(to),
        target_index: index,
    }
}

#[tokio::test]
async fn test_drag_and_drop_to_other_column() {
    let store = setup_store();
    let reconciler = MoveReconciler::new(FakeService::default());
    let mut session = DragSession::new();

    session.begin_drag(TaskId::new("A"), ColumnId::new("todo"));
    session.update_target(&ColumnId::new("done"), 10.0, &[]);
    let drop = session.drop_on(None).unwrap();
    assert!(!session.is_dragging());

    let outcome = reconciler
        .move_task(&store, MoveCommand::from_drop(project(), drop))
        .await;

    assert!(outcome.is_success());
    assert_eq!(layout(&store, "todo"), vec![("B".to_string(), 0)]);
    assert_eq!(layout(&store, "done"), vec![("A".to_string(), 0)]);

    let moves = reconciler.service().moves.borrow();
    assert_eq!(moves.len(), 1);
    assert_eq!(
        moves[0].2,
        MoveTaskDto { column_id: ColumnId::new("done"), position: 0 }
    );
}

#[tokio::test]
async fn test_reorder_within_column() {
    let store = Rc::new(RefCell::new(BoardStore::new()));
    store
        .borrow_mut()
        .replace_columns(project(), vec![column("todo", 0, &["A", "B", "C"])]);
    let reconciler = MoveReconciler::new(FakeService::default());

    reconciler
        .move_task(&store, command("C", "todo", "todo", Some(0)))
        .await;

    assert_eq!(
        layout(&store, "todo"),
        vec![("C".to_string(), 0), ("A".to_string(), 1), ("B".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_failure_keeps_optimistic_layout_and_sets_error() {
    let store = setup_store();
    let service = FakeService::default();
    service.reply(Reply::Err(ServiceError::Transport("Network error".into())));
    let reconciler = MoveReconciler::new(service);

    let outcome = reconciler
        .move_task(&store, command("A", "todo", "done", Some(0)))
        .await;

    assert_eq!(outcome.error_message(), Some("Network error"));
    assert_eq!(store.borrow().task_error(), Some("Network error"));
    assert_eq!(layout(&store, "todo"), vec![("B".to_string(), 0)]);
    assert_eq!(layout(&store, "done"), vec![("A".to_string(), 0)]);
}

#[tokio::test]
async fn test_reload_is_the_path_back_to_server_truth() {
    let store = setup_store();
    let service = FakeService::default();
    service.reply(Reply::Err(ServiceError::Transport("Network error".into())));
    *service.server_columns.borrow_mut() = vec![column("todo", 0, &["A", "B"]), column("done", 1, &[])];
    let reconciler = MoveReconciler::new(service);

    reconciler
        .move_task(&store, command("A", "todo", "done", Some(0)))
        .await;
    assert_eq!(layout(&store, "done").len(), 1);

    assert!(actions::reload_board(reconciler.service(), &store, &project()).await);
    assert_eq!(
        layout(&store, "todo"),
        vec![("A".to_string(), 0), ("B".to_string(), 1)]
    );
    assert!(layout(&store, "done").is_empty());
    assert!(!store.borrow().is_loading());
}

#[tokio::test]
async fn test_empty_error_text_uses_fallback() {
    let store = setup_store();
    let service = FakeService::default();
    service.reply(Reply::Err(ServiceError::Transport(String::new())));
    let reconciler = MoveReconciler::new(service);

    reconciler
        .move_task(&store, command("A", "todo", "done", Some(0)))
        .await;

    assert_eq!(store.borrow().task_error(), Some(MOVE_FAILED));
}

#[tokio::test]
async fn test_missing_source_column_is_noop_with_message() {
    let store = setup_store();
    let before = store.borrow().board(&project()).cloned();
    let reconciler = MoveReconciler::new(FakeService::default());

    let outcome = reconciler
        .move_task(&store, command("A", "archived", "done", Some(0)))
        .await;

    let MoveOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(failure.pending.is_none());
    assert!(failure.message.starts_with(MOVE_FAILED));
    assert!(failure.message.contains("archived"));
    assert_eq!(reconciler.service().move_calls(), 0);
    assert_eq!(store.borrow().board(&project()).cloned(), before);
    assert_eq!(store.borrow().task_error(), Some(failure.message.as_str()));
}

#[tokio::test]
async fn test_drop_without_tracked_index_appends() {
    let store = setup_store();
    let reconciler = MoveReconciler::new(FakeService::default());
    let mut session = DragSession::new();

    session.begin_drag(TaskId::new("A"), ColumnId::new("todo"));
    let drop = session.drop_on(Some(&ColumnId::new("todo"))).unwrap();
    assert_eq!(drop.target_index, None);

    reconciler
        .move_task(&store, MoveCommand::from_drop(project(), drop))
        .await;

    assert_eq!(
        layout(&store, "todo"),
        vec![("B".to_string(), 0), ("A".to_string(), 1)]
    );
    assert_eq!(reconciler.service().moves.borrow()[0].2.position, 1);
}

#[test]
fn test_cancelled_drag_never_touches_store() {
    let store = setup_store();
    let before = store.borrow().clone();
    let mut session = DragSession::new();

    session.press(TaskId::new("A"), ColumnId::new("todo"), 0.0, 0.0);
    session.pointer_moved(40.0, 40.0);
    session.update_target(&ColumnId::new("done"), 0.0, &[]);
    session.end_drag();

    assert_eq!(*store.borrow(), before);

    // Released outside every column
    session.begin_drag(TaskId::new("A"), ColumnId::new("todo"));
    session.update_target(&ColumnId::new("done"), 0.0, &[]);
    session.clear_target();
    assert!(session.drop_on(None).is_none());
    assert_eq!(*store.borrow(), before);
}

#[tokio::test]
async fn test_rollback_policy_restores_origin() {
    let store = setup_store();
    let service = FakeService::default();
    service.reply(Reply::Err(ServiceError::Rejected { status: 500, message: "boom".into() }));
    let reconciler = MoveReconciler::new(service).with_policy(FailurePolicy::RollbackOnFailure);

    reconciler
        .move_task(&store, command("A", "todo", "done", Some(0)))
        .await;

    assert_eq!(
        layout(&store, "todo"),
        vec![("A".to_string(), 0), ("B".to_string(), 1)]
    );
    assert!(layout(&store, "done").is_empty());
    assert_eq!(store.borrow().task_error(), Some("boom"));
}

#[tokio::test]
async fn test_same_task_moves_apply_in_drop_order() {
    let store = setup_store();
    let service = FakeService::default();
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    service.reply(Reply::Wait(first_rx));
    service.reply(Reply::Wait(second_rx));
    let reconciler = MoveReconciler::new(service);

    let first = reconciler.move_task(&store, command("A", "todo", "done", Some(0)));
    let second = reconciler.move_task(&store, command("A", "done", "todo", Some(1)));
    let responder = async {
        // Responses arrive in reverse order
        let _ = second_tx.send(Ok(()));
        tokio::task::yield_now().await;
        let _ = first_tx.send(Err(ServiceError::Transport("timeout".into())));
    };
    let (first, second, ()) = tokio::join!(first, second, responder);

    assert!(second.is_success());
    assert_eq!(first.error_message(), Some("timeout"));
    assert_eq!(
        layout(&store, "todo"),
        vec![("B".to_string(), 0), ("A".to_string(), 1)]
    );
    assert!(layout(&store, "done").is_empty());
}

#[tokio::test]
async fn test_rollback_skipped_when_task_moved_again() {
    let store = setup_store();
    let service = FakeService::default();
    let (first_tx, first_rx) = oneshot::channel();
    service.reply(Reply::Wait(first_rx));
    service.reply(Reply::Ok);
    let reconciler = MoveReconciler::new(service).with_policy(FailurePolicy::RollbackOnFailure);

    let first = reconciler.move_task(&store, command("A", "todo", "done", Some(0)));
    let second = reconciler.move_task(&store, command("A", "done", "todo", Some(1)));
    let responder = async {
        tokio::task::yield_now().await;
        let _ = first_tx.send(Err(ServiceError::Transport("timeout".into())));
    };
    tokio::join!(first, second, responder);

    assert_eq!(
        layout(&store, "todo"),
        vec![("B".to_string(), 0), ("A".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_rollback_after_other_task_shifted_it() {
    let store = Rc::new(RefCell::new(BoardStore::new()));
    store.borrow_mut().replace_columns(
        project(),
        vec![column("todo", 0, &["A", "B", "C"]), column("done", 1, &[])],
    );
    let service = FakeService::default();
    let (a_tx, a_rx) = oneshot::channel();
    service.reply(Reply::Wait(a_rx));
    service.reply(Reply::Ok);
    let reconciler = MoveReconciler::new(service).with_policy(FailurePolicy::RollbackOnFailure);

    let move_a = reconciler.move_task(&store, command("A", "todo", "done", Some(0)));
    // C lands above A, pushing A to position 1
    let move_c = reconciler.move_task(&store, command("C", "todo", "done", Some(0)));
    let responder = async {
        tokio::task::yield_now().await;
        let _ = a_tx.send(Err(ServiceError::Transport("timeout".into())));
    };
    let (a, c, ()) = tokio::join!(move_a, move_c, responder);

    assert!(c.is_success());
    assert_eq!(a.error_message(), Some("timeout"));
    assert_eq!(
        layout(&store, "todo"),
        vec![("A".to_string(), 0), ("B".to_string(), 1)]
    );
    assert_eq!(layout(&store, "done"), vec![("C".to_string(), 0)]);
}

#[tokio::test]
async fn test_rollback_skipped_after_reload() {
    let store = setup_store();
    let service = FakeService::default();
    let (tx, rx) = oneshot::channel();
    service.reply(Reply::Wait(rx));
    let reconciler = MoveReconciler::new(service).with_policy(FailurePolicy::RollbackOnFailure);

    let move_a = reconciler.move_task(&store, command("A", "todo", "done", Some(0)));
    let reload_and_fail = async {
        // Server truth arrives before the failure does
        store.borrow_mut().replace_columns(
            project(),
            vec![column("todo", 0, &["B"]), column("done", 1, &["A"])],
        );
        let _ = tx.send(Err(ServiceError::Transport("timeout".into())));
    };
    let (outcome, ()) = tokio::join!(move_a, reload_and_fail);

    assert_eq!(outcome.error_message(), Some("timeout"));
    assert_eq!(layout(&store, "todo"), vec![("B".to_string(), 0)]);
    assert_eq!(layout(&store, "done"), vec![("A".to_string(), 0)]);
}

#[tokio::test]
async fn test_different_tasks_in_flight_concurrently() {
    let store = Rc::new(RefCell::new(BoardStore::new()));
    store.borrow_mut().replace_columns(
        project(),
        vec![column("todo", 0, &["A", "B", "C"]), column("done", 1, &["D"])],
    );
    let service = FakeService::default();
    let (a_tx, a_rx) = oneshot::channel();
    let (c_tx, c_rx) = oneshot::channel();
    service.reply(Reply::Wait(a_rx));
    service.reply(Reply::Wait(c_rx));
    let reconciler = MoveReconciler::new(service);

    let move_a = reconciler.move_task(&store, command("A", "todo", "done", Some(1)));
    let move_c = reconciler.move_task(&store, command("C", "todo", "done", Some(0)));
    let responder = async {
        let _ = c_tx.send(Ok(()));
        let _ = a_tx.send(Ok(()));
    };
    let (a, c, ()) = tokio::join!(move_a, move_c, responder);

    assert!(a.is_success() && c.is_success());
    assert_eq!(layout(&store, "todo"), vec![("B".to_string(), 0)]);
    assert_eq!(
        layout(&store, "done"),
        vec![("C".to_string(), 0), ("D".to_string(), 1), ("A".to_string(), 2)]
    );
    assert_eq!(store.borrow().task_error(), None);
}

#[test]
fn test_new_move_clears_previous_error() {
    let store = setup_store();
    store.borrow_mut().set_task_error("Network error");
    let reconciler = MoveReconciler::new(FakeService::default());

    let applied = reconciler.apply(&mut store.borrow_mut(), command("B", "todo", "done", None));
    assert!(matches!(applied, MoveOutcome::Applied(_)));
    assert_eq!(store.borrow().task_error(), None);
}

#[tokio::test]
async fn test_reload_failure_sets_column_error() {
    let store = setup_store();
    let service = FakeService::default();
    *service.fetch_error.borrow_mut() = Some(ServiceError::Rejected { status: 403, message: "Forbidden".into() });

    assert!(!actions::reload_board(&service, &store, &project()).await);
    assert_eq!(store.borrow().column_error(), Some("Forbidden"));
    assert!(!store.borrow().is_loading());
    // Previous layout survives a failed reload
    assert_eq!(layout(&store, "todo").len(), 2);
}

#[tokio::test]
async fn test_create_task_appends_to_column() {
    let store = setup_store();
    let service = FakeService::default();
    let new_task = NewTask {
        title: "Write tests".into(),
        description: None,
        status: TaskStatus::Todo,
        column_id: ColumnId::new("todo"),
        project_id: project(),
    };

    assert!(actions::create_task(&service, &store, &new_task).await);
    assert_eq!(
        layout(&store, "todo"),
        vec![("A".to_string(), 0), ("B".to_string(), 1), ("new-task".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_delete_protected_column_refused_without_request() {
    let store = setup_store();
    let service = FakeService::default();

    assert!(!actions::delete_column(&service, &store, &project(), &ColumnId::new("todo")).await);
    assert_eq!(service.crud_calls.get(), 0);
    assert_eq!(store.borrow().column_error(), Some(actions::DELETE_COLUMN_FAILED));

    assert!(actions::delete_column(&service, &store, &project(), &ColumnId::new("done")).await);
    assert_eq!(store.borrow().sorted_columns(&project()).len(), 1);
    assert_eq!(store.borrow().column_error(), None);
}

#[tokio::test]
async fn test_crud_failure_uses_service_message() {
    let store = setup_store();
    let service = FakeService::default();
    *service.crud_error.borrow_mut() = Some(ServiceError::Transport(String::new()));

    assert!(!actions::create_column(&service, &store, &project(), "Review").await);
    assert_eq!(store.borrow().column_error(), Some(actions::CREATE_COLUMN_FAILED));

    *service.crud_error.borrow_mut() = None;
    assert!(actions::create_column(&service, &store, &project(), "Review").await);
    let titles: Vec<String> = store
        .borrow()
        .sorted_columns(&project())
        .iter()
        .map(|c| c.title.clone())
        .collect();
    assert_eq!(titles, vec!["TODO", "DONE", "Review"]);
}

#[tokio::test]
async fn test_update_column_renames() {
    let store = setup_store();
    let service = FakeService::default();
    let patch = ColumnPatch { title: Some("Shipped".into()), order_index: Some(1) };

    assert!(actions::update_column(&service, &store, &project(), &ColumnId::new("done"), patch).await);
    let board = store.borrow().board(&project()).cloned().unwrap();
    assert_eq!(board.column(&ColumnId::new("done")).unwrap().title, "Shipped");
}

#[tokio::test]
async fn test_update_task_edits_title_and_description_in_place() {
    let store = setup_store();
    let service = FakeService::default();
    let mut edited = store
        .borrow()
        .board(&project())
        .and_then(|b| b.task(&TaskId::new("B")))
        .cloned()
        .unwrap();
    edited.title = "Write the release notes".into();
    edited.description = Some("Cover the drag fixes".into());

    assert!(actions::update_task(&service, &store, &edited).await);
    let board = store.borrow().board(&project()).cloned().unwrap();
    let task = board.task(&TaskId::new("B")).unwrap();
    assert_eq!(task.title, "Write the release notes");
    assert_eq!(task.description.as_deref(), Some("Cover the drag fixes"));
    assert_eq!(task.column_id, ColumnId::new("todo"));
    assert_eq!(task.position, 1);
    assert_eq!(store.borrow().task_error(), None);
}

#[tokio::test]
async fn test_delete_task_already_gone_locally() {
    let store = setup_store();
    let service = FakeService::default();
    store.borrow_mut().set_task_error("stale");

    assert!(actions::delete_task(&service, &store, &project(), &TaskId::new("A")).await);
    assert!(actions::delete_task(&service, &store, &project(), &TaskId::new("A")).await);
    assert_eq!(layout(&store, "todo"), vec![("B".to_string(), 0)]);
    assert_eq!(store.borrow().task_error(), None);
    assert_eq!(service.crud_calls.get(), 2);
}
