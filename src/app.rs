//! Kanban Frontend App
//!
//! Board page for the project named in the URL hash.

use kanban_core::actions;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::RestClient;
use crate::components::{ErrorBanner, KanbanBoard};
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::store::{store_is_loading, AppState, BoardCell};

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    // State
    let store = Store::new(AppState::default());
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (project_id, set_project_id) = signal(config.current_project());

    let ctx = AppContext::new(
        (reload_trigger, set_reload_trigger),
        project_id,
        RestClient::new(config.api_base_url.clone()),
        config.failure_policy(),
    );

    // Provide context to all children
    provide_context(store);
    provide_context(ctx);

    // Follow `#/projects/<id>` navigation
    let hash_config = config.clone();
    let _ = window_event_listener(leptos::ev::hashchange, move |_| {
        let next = hash_config.current_project();
        if next != project_id.get_untracked() {
            log::info!("switching to project {next:?}");
            set_project_id.set(next);
        }
    });

    // Load the board when the project or trigger changes
    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        let Some(project) = project_id.get() else { return };
        log::debug!("loading board: project={project} trigger={trigger}");
        let client = ctx.client();
        spawn_local(async move {
            actions::reload_board(&client, &BoardCell(store), &project).await;
        });
    });

    view! {
        <div class="app-layout">
            <header class="board-toolbar">
                <h1>"Board"</h1>
                <button
                    class="reload-btn"
                    disabled=move || store_is_loading(&store)
                    on:click=move |_| ctx.reload()
                >
                    {move || if store_is_loading(&store) { "Loading..." } else { "Reload" }}
                </button>
            </header>

            <ErrorBanner />

            <Show when=move || project_id.get().is_none()>
                <p class="no-project">"No project selected. Open #/projects/<id> to show a board."</p>
            </Show>
            <KanbanBoard />
        </div>
    }
}
