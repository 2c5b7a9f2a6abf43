pub mod drive;
pub mod episode;
pub mod offline;
pub mod playback;
pub mod season;
pub mod show;
pub mod watched;
