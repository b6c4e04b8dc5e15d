//! Test Helper Utilities
//!
//! Shared utilities for testing wkmp-em

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::LogCapture;

use serde_json::{json, Value};

/// Album release fragments in arrival order: release, details, user
/// details, artists, both tracks, then the user detail of the second track.
pub fn album_release_fragments() -> Vec<Value> {
    vec![
        json!({"albumRelease": {
            "id": 1,
            "title": "Blue Train",
            "details": 1,
            "userDetails": 1,
            "primaryArtists": [7]
        }}),
        json!({"albumReleaseDetail": {"id": 1, "label": "Blue Note", "tracks": [100, 101]}}),
        json!({"albumReleaseUserDetail": {"id": 1, "rating": 5}}),
        json!({"artist": {"id": 7, "name": "John Coltrane"}}),
        json!({"track": {"id": 100, "name": "Blue Train", "userDetails": 500}}),
        json!({"track": {"id": 101, "name": "Moment's Notice", "userDetails": 501}}),
        json!({"trackUserDetail": {"id": 501, "parentTrack": 101, "playCount": 12}}),
    ]
}
