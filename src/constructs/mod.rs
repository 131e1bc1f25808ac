mod config;
mod progress;
mod status;

pub use config::LoaderConfig;
pub use progress::Progress;
pub use status::LoadStatus;
