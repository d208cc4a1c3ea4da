pub mod tasks;
pub mod users;

pub use tasks::TaskService;
pub use users::AuthService;
