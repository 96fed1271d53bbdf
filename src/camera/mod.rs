pub mod capture;

pub use capture::Webcam;
