pub mod episode_key;
pub mod size;

pub use episode_key::{episode_key, extract_episode_key};
pub use size::format_size;
