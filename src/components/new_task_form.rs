//! New Task Form Component
//!
//! Inline form at the bottom of a column with a status selector.

use kanban_core::{actions, ColumnId, NewTask, TaskStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;
use crate::store::{use_app_store, BoardCell};

/// Status options offered for new tasks
const TASK_STATUSES: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

#[component]
pub fn NewTaskForm(column_id: ColumnId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let (open, set_open) = signal(false);
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (status, set_status) = signal(TaskStatus::default());

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get().trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(project_id) = ctx.project() else { return };
        let details = description.get().trim().to_string();
        let new_task = NewTask {
            title: text,
            description: (!details.is_empty()).then_some(details),
            status: status.get(),
            column_id: column_id.clone(),
            project_id,
        };

        spawn_local(async move {
            if actions::create_task(&ctx.client(), &BoardCell(store), &new_task).await {
                set_title.set(String::new());
                set_description.set(String::new());
                set_open.set(false);
            }
        });
    };

    view! {
        <Show
            when=move || open.get()
            fallback=move || view! {
                <button class="add-task-btn" on:click=move |_| set_open.set(true)>"+ Add task"</button>
            }
        >
            <form class="new-task-form" on:submit=create_task.clone()>
                <input
                    type="text"
                    placeholder="Task title..."
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Description (optional)"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                />
                <div class="status-selector-row">
                    {TASK_STATUSES.iter().map(|option| {
                        let option = *option;
                        view! {
                            <button
                                type="button"
                                class=move || if status.get() == option { "status-btn small active" } else { "status-btn small" }
                                on:click=move |_| set_status.set(option)
                            >
                                {option.label()}
                            </button>
                        }
                    }).collect_view()}
                </div>
                <div class="form-actions">
                    <button type="submit">"Add"</button>
                    <button type="button" class="cancel-btn" on:click=move |_| set_open.set(false)>"Cancel"</button>
                </div>
            </form>
        </Show>
    }
}
