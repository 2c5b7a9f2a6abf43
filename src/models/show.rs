use serde::{Deserialize, Serialize};

/// A show saved to the user's library.
///
/// `file_id` is the Drive folder holding the show's `Season N` subfolders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedShow {
    pub tmdb_id: i32,
    pub name: String,
    pub poster_path: Option<String>,
    pub file_id: Option<String>,
}
