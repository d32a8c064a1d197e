//! Error Banner Component
//!
//! Shows the latest board error with a dismiss button.

use leptos::prelude::*;

use crate::store::{store_banner_message, store_clear_errors, use_app_store};

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let store = use_app_store();
    let message = Memo::new(move |_| store_banner_message(&store));

    view! {
        {move || message.get().map(|text| view! {
            <div class="error-banner" role="alert">
                <span class="error-text">{text}</span>
                <button class="dismiss-btn" on:click=move |_| store_clear_errors(&store)>"Dismiss"</button>
            </div>
        })}
    }
}
