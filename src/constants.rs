pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "webm", "mov", "wmv", "flv", "m4v"];

/// Used for downloads whose source name carries no extension.
pub const DEFAULT_VIDEO_EXTENSION: &str = "mkv";

pub mod drive {

    pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

    pub const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size)";

    pub const MAX_PAGES: usize = 50;
}

pub mod tmdb {

    pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
}

pub mod playback {

    /// Progress is reported as a whole percentage.
    pub const MAX_PROGRESS: i32 = 100;
}

pub mod limits {

    pub const DOWNLOAD_QUEUE_CAPACITY: usize = 64;

    pub const WATCH_EVENT_BUFFER: usize = 100;

    /// How often live watch feeds re-read the database.
    pub const WATCH_POLL_INTERVAL_MS: u64 = 1000;
}
