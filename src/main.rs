//! Kanban Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod logging;
mod store;

use app::App;
use config::ClientConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = ClientConfig::from_build_env();
    logging::init(config.level_filter());
    log::info!("kanban client starting: api={}", config.api_base_url);
    mount_to_body(move || view! { <App config=config.clone() /> });
}
