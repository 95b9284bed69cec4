pub mod auth;
pub mod courses;
pub mod doc_viewer;
pub mod functions;
pub mod organizations;
pub mod purchases;
pub mod schedules;
pub mod users;
