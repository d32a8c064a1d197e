//! Task Card Component
//!
//! A draggable card. Clicking the status badge advances the status; clicking
//! the card body expands the description. Both are ignored right after a drop.
//! The ✎ button swaps the card body for a title/description editor.

use chrono::{DateTime, Utc};
use kanban_core::{actions, ColumnId, Task, TaskStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_kanban_dnd::{make_on_card_mousedown, DndSignals};

use crate::components::{delete_prompt, DeleteButton};
use crate::context::AppContext;
use crate::store::{use_app_store, BoardCell};

/// Characters of description shown while collapsed
const DESCRIPTION_PREVIEW: usize = 80;

#[component]
pub fn TaskCard(task: Task, column_id: ColumnId, dnd: DndSignals) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let (expanded, set_expanded) = signal(false);
    let (editing, set_editing) = signal(false);
    let (draft_title, set_draft_title) = signal(task.title.clone());
    let (draft_description, set_draft_description) = signal(task.description.clone().unwrap_or_default());

    let task_id = task.id.clone();
    let on_mousedown = {
        let start_press = make_on_card_mousedown(dnd, task_id.clone(), column_id);
        // No dragging out of an open editor
        move |ev: web_sys::MouseEvent| {
            if !editing.get_untracked() {
                start_press(ev);
            }
        }
    };

    let is_dragging = {
        let task_id = task_id.clone();
        move || dnd.is_dragging_task(&task_id)
    };
    let overdue = task.is_overdue(now());
    let card_class = move || {
        let mut c = String::from("task-card");
        if is_dragging() { c.push_str(" dragging"); }
        if overdue { c.push_str(" overdue"); }
        c
    };

    let full_description = task.description.clone().unwrap_or_default();
    let preview = truncate(&full_description, DESCRIPTION_PREVIEW);
    let has_description = !full_description.trim().is_empty();
    let has_more = full_description.chars().count() > DESCRIPTION_PREVIEW;
    let description = move || {
        if expanded.get() { full_description.clone() } else { preview.clone() }
    };

    let status = task.status;
    let advance_status = {
        let task = task.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            if dnd.drag_just_ended() {
                return;
            }
            let mut updated = task.clone();
            updated.status = next_status(status);
            spawn_local(async move {
                actions::update_task(&ctx.client(), &BoardCell(store), &updated).await;
            });
        }
    };

    let cancel_edit = {
        let task = task.clone();
        move || {
            set_draft_title.set(task.title.clone());
            set_draft_description.set(task.description.clone().unwrap_or_default());
            set_editing.set(false);
        }
    };

    let save_edit = {
        let task = task.clone();
        let cancel_edit = cancel_edit.clone();
        move || {
            let edited = draft_title.with_untracked(|title| {
                draft_description.with_untracked(|description| edited_task(&task, title, description))
            });
            let Some(edited) = edited else {
                cancel_edit();
                return;
            };
            set_editing.set(false);
            spawn_local(async move {
                if !actions::update_task(&ctx.client(), &BoardCell(store), &edited).await {
                    log::debug!("task edit not saved: task={}", edited.id);
                }
            });
        }
    };

    let on_delete = {
        let task_id = task_id.clone();
        Callback::new(move |_| {
            let Some(project_id) = ctx.project() else { return };
            let task_id = task_id.clone();
            spawn_local(async move {
                actions::delete_task(&ctx.client(), &BoardCell(store), &project_id, &task_id).await;
            });
        })
    };

    let executors = task
        .executors
        .iter()
        .map(|e| e.full_name.clone())
        .collect::<Vec<_>>()
        .join(", ");
    let due = task.due_date.map(|d| d.format("%Y-%m-%d").to_string());
    let title = task.title.clone();
    let prompt = delete_prompt("task", &task.title);

    view! {
        <div
            class=card_class
            data-task-id=task_id.to_string()
            on:mousedown=on_mousedown
            on:click=move |_| {
                if !dnd.drag_just_ended() && has_more && !editing.get_untracked() {
                    set_expanded.update(|v| *v = !*v);
                }
            }
        >
            <Show
                when=move || editing.get()
                fallback=move || {
                    let (title, description) = (title.clone(), description.clone());
                    view! {
                        <div class="task-card-header">
                            <span class="task-title">{title}</span>
                            <button
                                class="edit-btn"
                                title="Edit"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    if !dnd.drag_just_ended() {
                                        set_editing.set(true);
                                    }
                                }
                            >
                                "✎"
                            </button>
                            <DeleteButton class="delete-btn" prompt=prompt.clone() on_confirm=on_delete />
                        </div>
                        <Show when=move || has_description>
                            <p class="task-description">{description.clone()}</p>
                        </Show>
                    }
                }
            >
                <form
                    class="task-edit"
                    on:click=|ev| ev.stop_propagation()
                    on:submit={
                        let save_edit = save_edit.clone();
                        move |ev: web_sys::SubmitEvent| {
                            ev.prevent_default();
                            save_edit();
                        }
                    }
                >
                    <input
                        class="task-edit-title"
                        type="text"
                        prop:value=move || draft_title.get()
                        autofocus=true
                        on:input=move |ev| set_draft_title.set(event_target_value(&ev))
                        on:keydown={
                            let cancel_edit = cancel_edit.clone();
                            move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Escape" {
                                    cancel_edit();
                                }
                            }
                        }
                    />
                    <textarea
                        class="task-edit-description"
                        rows="3"
                        placeholder="Description"
                        prop:value=move || draft_description.get()
                        on:input=move |ev| set_draft_description.set(event_target_value(&ev))
                    />
                    <div class="task-edit-actions">
                        <button type="submit" class="save-btn">"Save"</button>
                        <button
                            type="button"
                            class="cancel-btn"
                            on:click={
                                let cancel_edit = cancel_edit.clone();
                                move |_| cancel_edit()
                            }
                        >
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>
            <div class="task-meta">
                <button class=format!("status-badge status-{}", status.as_str().to_lowercase()) on:click=advance_status>
                    {status.label()}
                </button>
                {due.map(|d| view! { <span class="task-due">{d}</span> })}
                {(!executors.is_empty()).then(|| view! { <span class="task-executors">{executors}</span> })}
            </div>
        </div>
    }
}

fn next_status(status: TaskStatus) -> TaskStatus {
    match status {
        TaskStatus::Todo => TaskStatus::InProgress,
        TaskStatus::InProgress => TaskStatus::Done,
        TaskStatus::Done => TaskStatus::Todo,
    }
}

/// `task` with the edited title and description, or `None` when the title
/// is blank or nothing changed
fn edited_task(task: &Task, title: &str, description: &str) -> Option<Task> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let description = Some(description.trim()).filter(|d| !d.is_empty()).map(str::to_string);
    if title == task.title && description == task.description {
        return None;
    }
    Some(Task {
        title: title.to_string(),
        description,
        ..task.clone()
    })
}

/// Current time from the browser clock
fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// First `max` characters, with an ellipsis when cut
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
