pub mod analyze;
pub mod init;
pub mod submissions;
pub mod validate;
