pub mod overlay;
pub mod skeleton;
pub mod window;

pub use overlay::draw_status;
pub use window::{Command, MinifbRenderer};
