pub mod dst_reader;
pub mod glm_reader;
pub mod kp_reader;

pub use dst_reader::DstReader;
pub use glm_reader::GlmReader;
pub use kp_reader::KpReader;
