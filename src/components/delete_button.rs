//! Delete Button Component
//!
//! A single × control that asks through the browser's confirm dialog before
//! running its action.

use leptos::prelude::*;

#[component]
pub fn DeleteButton(
    #[prop(into)] class: String,
    /// Question shown in the confirm dialog
    #[prop(into)]
    prompt: Signal<String>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let message = prompt.get_untracked();
        if confirmed(&message) {
            on_confirm.run(());
        } else {
            log::debug!("delete declined: {message}");
        }
    };

    view! {
        <button class=class title="Delete" aria-label="Delete" on:click=on_click>
            "×"
        </button>
    }
}

/// Dialog text for deleting the `kind` named `title`
pub fn delete_prompt(kind: &str, title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        format!("Delete this {kind}?")
    } else {
        format!("Delete {kind} \"{title}\"?")
    }
}

/// A blocked or unavailable dialog counts as "no"
fn confirmed(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
