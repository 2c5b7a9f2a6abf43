pub mod connectivity;
pub mod drive;
pub mod tmdb;
