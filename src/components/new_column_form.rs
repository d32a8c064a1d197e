//! New Column Form Component

use kanban_core::actions;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;
use crate::store::{use_app_store, BoardCell};

#[component]
pub fn NewColumnForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let (title, set_title) = signal(String::new());

    let create_column = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get().trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(project_id) = ctx.project() else { return };
        spawn_local(async move {
            if actions::create_column(&ctx.client(), &BoardCell(store), &project_id, &text).await {
                set_title.set(String::new());
            }
        });
    };

    view! {
        <form class="new-column-form" on:submit=create_column>
            <input
                type="text"
                placeholder="New column..."
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <button type="submit">"Add column"</button>
        </form>
    }
}
