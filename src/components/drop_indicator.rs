//! Drop Indicator Component
//!
//! Horizontal line marking where the dragged card will land.

use leptos::prelude::*;

#[component]
pub fn DropIndicator() -> impl IntoView {
    view! { <div class="drop-indicator" aria-hidden="true" /> }
}
