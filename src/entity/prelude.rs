//! 实体 prelude，方便统一导入

pub use super::assignment_teachers::Entity as AssignmentTeachers;
pub use super::assignments::Entity as Assignments;
pub use super::attachments::Entity as Attachments;
pub use super::registros::Entity as Registros;
pub use super::teacher_stats::Entity as TeacherStatsCache;
pub use super::users::Entity as Users;
