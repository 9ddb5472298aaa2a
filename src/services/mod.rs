pub mod assignments;
pub mod auth;
pub mod stats;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use stats::StatsService;
pub use users::UserService;
