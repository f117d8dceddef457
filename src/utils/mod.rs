pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use filename::{
    generate_default_dst_filename, generate_default_glm_filename, generate_default_index_filename,
    OutputFormat,
};
pub use progress::ProgressReporter;
