//! UI Components
//!
//! Board view components.

mod delete_button;
mod drop_indicator;
mod error_banner;
mod kanban_board;
mod kanban_column;
mod new_column_form;
mod new_task_form;
mod task_card;

pub use delete_button::{delete_prompt, DeleteButton};
pub use drop_indicator::DropIndicator;
pub use error_banner::ErrorBanner;
pub use kanban_board::KanbanBoard;
pub use kanban_column::KanbanColumn;
pub use new_column_form::NewColumnForm;
pub use new_task_form::NewTaskForm;
pub use task_card::TaskCard;
