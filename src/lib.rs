#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exercise;
pub mod geometry;
pub mod logging;
pub mod pose;
#[cfg(feature = "desktop")]
pub mod render;
pub mod replay;
pub mod session;
pub mod speech;
