//! Application Context
//!
//! Shared state provided via Leptos Context API.

use kanban_core::{FailurePolicy, MoveReconciler, ProjectId};
use leptos::prelude::*;

use crate::api::RestClient;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the board from the server - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the board from the server - write
    set_reload_trigger: WriteSignal<u32>,
    /// Project whose board is shown
    pub project_id: ReadSignal<Option<ProjectId>>,
    client: StoredValue<RestClient, LocalStorage>,
    policy: FailurePolicy,
}

impl AppContext {
    pub fn new(
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        project_id: ReadSignal<Option<ProjectId>>,
        client: RestClient,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            project_id,
            client: StoredValue::new_local(client),
            policy,
        }
    }

    /// Trigger a reload of the board
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn client(&self) -> RestClient {
        self.client.get_value()
    }

    /// Reconciler for one drop, using the configured failure policy
    pub fn reconciler(&self) -> MoveReconciler<RestClient> {
        MoveReconciler::new(self.client()).with_policy(self.policy)
    }

    /// Current project, untracked
    pub fn project(&self) -> Option<ProjectId> {
        self.project_id.get_untracked()
    }
}
