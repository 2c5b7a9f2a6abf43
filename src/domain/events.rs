//! Domain events for the application.
//!
//! These events are sent via the event bus to notify listeners (the CLI, or a
//! UI collaborator) of season and download state changes.

use serde::Serialize;

/// Events published on the notification bus.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    SeasonLoaded {
        show_id: i32,
        season_number: i32,
        episodes: usize,
    },
    ReconcileFinished {
        show_id: i32,
        season_number: i32,
        matched: usize,
        offline: usize,
        total: usize,
    },

    DownloadQueued {
        title: String,
    },
    DownloadFinished {
        title: String,
        path: String,
    },
    DownloadFailed {
        title: String,
        message: String,
    },

    Error {
        message: String,
    },
}
