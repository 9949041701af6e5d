//! HTTP Routes

pub mod audio;
pub mod emotions;
pub mod health;
pub mod info;
pub mod stats;
pub mod synthesis;
