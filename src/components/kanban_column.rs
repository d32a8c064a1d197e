//! Kanban Column Component
//!
//! One column: header with count and actions, cards with the drop indicator,
//! and the add-task form. The column measures its own cards while a drag
//! hovers it.

use kanban_core::{actions, ColumnId, ColumnPatch, Task};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_kanban_dnd::{make_on_column_mouseleave, make_on_column_mousemove, DndSignals, IndicatorSlot};

use crate::components::{delete_prompt, DeleteButton, DropIndicator, NewTaskForm, TaskCard};
use crate::context::AppContext;
use crate::store::{store_column, use_app_store, BoardCell};

#[component]
pub fn KanbanColumn(column_id: ColumnId, dnd: DndSignals) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let column = {
        let column_id = column_id.clone();
        Memo::new(move |_| {
            ctx.project_id
                .get()
                .and_then(|project_id| store_column(&store, &project_id, &column_id))
        })
    };
    let tasks = move || column.with(|c| c.as_ref().map(|c| c.tasks.clone()).unwrap_or_default());
    let title = move || column.with(|c| c.as_ref().map(|c| c.title.clone()).unwrap_or_default());
    let task_count = move || column.with(|c| c.as_ref().map_or(0, |c| c.len()));
    let is_protected = move || column.with(|c| c.as_ref().is_some_and(|c| c.is_protected));

    let slot = {
        let column_id = column_id.clone();
        Memo::new(move |_| {
            let ids = column.with(|c| {
                c.as_ref()
                    .map(|c| c.tasks.iter().map(|t| t.id.clone()).collect::<Vec<_>>())
                    .unwrap_or_default()
            });
            dnd.indicator_slot(&column_id, &ids)
        })
    };

    let is_target = {
        let column_id = column_id.clone();
        move || dnd.is_target_column(&column_id)
    };
    let column_class = move || {
        if is_target() { "kanban-column drop-target" } else { "kanban-column" }
    };

    // Rename
    let (editing, set_editing) = signal(false);
    let rename = {
        let column_id = column_id.clone();
        move |new_title: String| {
            set_editing.set(false);
            let new_title = new_title.trim().to_string();
            if new_title.is_empty() || new_title == title() {
                return;
            }
            let Some(project_id) = ctx.project() else { return };
            let column_id = column_id.clone();
            let patch = ColumnPatch { title: Some(new_title), order_index: None };
            spawn_local(async move {
                actions::update_column(&ctx.client(), &BoardCell(store), &project_id, &column_id, patch).await;
            });
        }
    };

    let on_delete = {
        let column_id = column_id.clone();
        Callback::new(move |_| {
            let Some(project_id) = ctx.project() else { return };
            let column_id = column_id.clone();
            spawn_local(async move {
                actions::delete_column(&ctx.client(), &BoardCell(store), &project_id, &column_id).await;
            });
        })
    };

    let card_column_id = column_id.clone();

    view! {
        <section
            class=column_class
            data-column-id=column_id.to_string()
            on:mousemove=make_on_column_mousemove(dnd, column_id.clone())
            on:mouseleave=make_on_column_mouseleave(dnd)
        >
            <header class="column-header">
                <Show
                    when=move || editing.get()
                    fallback=move || view! {
                        <h2 class="column-title" title="Double-click to rename" on:dblclick=move |_| set_editing.set(true)>
                            {title}
                        </h2>
                    }
                >
                    <input
                        class="column-title-input"
                        type="text"
                        prop:value=title
                        autofocus=true
                        on:keydown={
                            let rename = rename.clone();
                            move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                                "Enter" => rename(event_target_value(&ev)),
                                "Escape" => set_editing.set(false),
                                _ => {}
                            }
                        }
                        on:blur=move |_| set_editing.set(false)
                    />
                </Show>
                <span class="column-count">{task_count}</span>
                <Show when=move || !is_protected()>
                    <DeleteButton
                        class="column-delete-btn"
                        prompt=Signal::derive(move || delete_prompt("column", &title()))
                        on_confirm=on_delete
                    />
                </Show>
            </header>

            <div class="column-body">
                <For
                    each=tasks
                    key=card_key
                    children=move |task| {
                        let before = {
                            let task_id = task.id.clone();
                            move || slot.get() == Some(IndicatorSlot::Before(task_id.clone()))
                        };
                        view! {
                            <Show when=before>
                                <DropIndicator />
                            </Show>
                            <TaskCard task=task column_id=card_column_id.clone() dnd=dnd />
                        }
                    }
                />
                <Show when=move || slot.get() == Some(IndicatorSlot::End)>
                    <DropIndicator />
                </Show>
                <Show when=move || task_count() == 0 && slot.get().is_none()>
                    <p class="empty-column">"No tasks"</p>
                </Show>
            </div>

            <NewTaskForm column_id=column_id.clone() />
        </section>
    }
}

/// Re-render a card whenever anything it shows changes
fn card_key(task: &Task) -> (String, String, Option<String>, &'static str, Option<i64>, usize, usize) {
    (
        task.id.to_string(),
        task.title.clone(),
        task.description.clone(),
        task.status.as_str(),
        task.due_date.map(|d| d.timestamp()),
        task.position,
        task.executors.len(),
    )
}
