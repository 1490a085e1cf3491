pub mod init;
pub mod levels;
pub mod play;
pub mod validate;
