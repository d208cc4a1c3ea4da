pub mod date;
pub mod task;
pub mod user;

pub use task::{Task, TaskDetail, TaskInput, TaskPatch, TaskStatus};
pub use user::{User, UserInput, UserResponse, UserSummary};
