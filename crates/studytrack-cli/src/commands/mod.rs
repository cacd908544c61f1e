pub mod analyze;
pub mod dashboard;
pub mod init;
pub mod score;
pub mod validate;
