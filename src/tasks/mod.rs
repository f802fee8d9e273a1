//! Task domain: record type, payload validation and the route table.

pub mod handlers;
pub mod model;

pub use handlers::{handle, routes, Endpoint};
pub use model::{InvalidPayload, NewTask, Task, TaskPatch};

/// Collection holding every task.
pub const TASKS: &str = "tasks";
