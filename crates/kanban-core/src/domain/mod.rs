//! Domain Layer
//!
//! Board entities and core abstractions.
//! This layer has no framework dependencies (serde and chrono only).

mod column;
mod entity;
mod ids;
mod task;

pub use column::Column;
pub use entity::{index_of, DomainError, DomainResult, Entity};
pub use ids::{ColumnId, ProjectId, TaskId};
pub use task::{Executor, Task, TaskStatus};
