pub mod log;
pub mod platform;
pub mod rendering;
