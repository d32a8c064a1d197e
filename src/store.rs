//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The board engine's
//! [`BoardStore`] lives in a single store field; the reconciler and actions
//! reach it through [`BoardCell`].

use kanban_core::{BoardHandle, BoardStore, Column, ColumnId, ProjectId};
use leptos::prelude::*;
use reactive_stores::Store;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Columns per project plus loading/error slots
    pub board: BoardStore,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// [`BoardHandle`] over the app store; each update is one write to the
/// `board` field
#[derive(Clone, Copy)]
pub struct BoardCell(pub AppStore);

impl BoardHandle for BoardCell {
    fn update<R>(&self, f: impl FnOnce(&mut BoardStore) -> R) -> R {
        let field = self.0.board();
        let mut board = field.write();
        f(&mut board)
    }
}

// ========================
// Store Helper Functions
// ========================

/// Columns of a project sorted by order index (tracked)
pub fn store_sorted_columns(store: &AppStore, project_id: &ProjectId) -> Vec<Column> {
    store
        .board()
        .with(|b| b.sorted_columns(project_id).into_iter().cloned().collect())
}

/// One column of a project (tracked)
pub fn store_column(store: &AppStore, project_id: &ProjectId, column_id: &ColumnId) -> Option<Column> {
    store
        .board()
        .with(|b| b.board(project_id).and_then(|board| board.column(column_id)).cloned())
}

pub fn store_is_loading(store: &AppStore) -> bool {
    store.board().with(BoardStore::is_loading)
}

/// Message for the error banner, task errors first (tracked)
pub fn store_banner_message(store: &AppStore) -> Option<String> {
    store.board().with(|b| b.banner_message().map(String::from))
}

/// Dismiss both error slots
pub fn store_clear_errors(store: &AppStore) {
    let field = store.board();
    let mut board = field.write();
    board.clear_task_error();
    board.clear_column_error();
}

/// Whether the project has been loaded at least once (tracked)
pub fn store_has_board(store: &AppStore, project_id: &ProjectId) -> bool {
    store.board().with(|b| b.board(project_id).is_some())
}
