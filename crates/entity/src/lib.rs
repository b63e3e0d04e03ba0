//! Entity definitions for DevCollab
//!
//! Sea-ORM entity definitions for users, projects and the per-project
//! resources (tasks, chat messages and file attachments).

pub mod messages;
pub mod project_files;
pub mod project_members;
pub mod projects;
pub mod sea_orm_active_enums;
pub mod tasks;
pub mod users;

pub use messages::Entity as Messages;
pub use project_files::Entity as ProjectFiles;
pub use project_members::Entity as ProjectMembers;
pub use projects::Entity as Projects;
pub use tasks::Entity as Tasks;
pub use users::Entity as Users;
