pub mod github;
pub mod logs;
