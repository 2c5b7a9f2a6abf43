use crate::clients::drive::DriveQuery;
use crate::models::drive::DriveFile;
use crate::services::ports::FileListing;
use tracing::{debug, warn};

#[must_use]
pub fn season_folder_name(season_number: i32) -> String {
    format!("Season {season_number}")
}

/// Finds the `Season {n}` subfolder directly under a show's root folder.
///
/// Listing failures are logged and reported as absence, which sends the caller
/// to default mapping.
pub async fn locate_season_folder(
    listing: &dyn FileListing,
    root_folder_id: &str,
    season_number: i32,
) -> Option<DriveFile> {
    let target = season_folder_name(season_number);
    let query = DriveQuery::new()
        .in_parents(root_folder_id)
        .folders_only()
        .trashed(false);

    let folders = match listing.list_files(&query).await {
        Ok(folders) => folders,
        Err(e) => {
            warn!(root_folder_id, error = %e, "Failed to list season folders");
            return None;
        }
    };

    let found = folders
        .into_iter()
        .find(|folder| folder.name.eq_ignore_ascii_case(&target));

    if found.is_none() {
        debug!("No folder named {:?} under {}", target, root_folder_id);
    }
    found
}

/// Lists the video files of a season folder.
pub async fn list_season_files(
    listing: &dyn FileListing,
    folder_id: &str,
) -> anyhow::Result<Vec<DriveFile>> {
    let query = DriveQuery::new()
        .in_parents(folder_id)
        .files_only()
        .trashed(false);

    let files = listing.list_files(&query).await?;
    Ok(files.into_iter().filter(DriveFile::is_video_file).collect())
}
