//! Kanban Board Component
//!
//! Columns of the current project side by side. Owns the drag signals and
//! turns each finished drop into an optimistic move. Mounted once; the
//! project is read from context.

use kanban_core::MoveCommand;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_kanban_dnd::{bind_global_mouseup, create_dnd_signals};

use crate::components::{KanbanColumn, NewColumnForm};
use crate::context::AppContext;
use crate::store::{store_has_board, store_is_loading, store_sorted_columns, use_app_store, BoardCell};

#[component]
pub fn KanbanBoard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let dnd = create_dnd_signals();
    bind_global_mouseup(dnd, move |drop| {
        let Some(project_id) = ctx.project() else {
            log::warn!("drop ignored: no project selected");
            return;
        };
        let command = MoveCommand::from_drop(project_id, drop);
        let reconciler = ctx.reconciler();
        spawn_local(async move {
            reconciler.move_task(&BoardCell(store), command).await;
        });
    });

    let columns = move || {
        ctx.project_id
            .get()
            .map(|project_id| store_sorted_columns(&store, &project_id))
            .unwrap_or_default()
    };
    let loaded = move || ctx.project_id.get().is_some_and(|project_id| store_has_board(&store, &project_id));

    view! {
        <Show when=move || store_is_loading(&store) && !loaded()>
            <p class="loading">"Loading board..."</p>
        </Show>
        <div class="kanban-board" class:dragging=move || dnd.is_dragging()>
            <For
                each=columns
                key=|column| column.id.clone()
                children=move |column| view! { <KanbanColumn column_id=column.id dnd=dnd /> }
            />
            <Show when=move || ctx.project_id.get().is_some()>
                <NewColumnForm />
            </Show>
        </div>
    }
}
