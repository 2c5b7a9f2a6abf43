pub mod offline;
pub mod show;
pub mod watched;
