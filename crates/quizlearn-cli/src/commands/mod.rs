pub mod init;
pub mod palettes;
pub mod play;
pub mod validate;
