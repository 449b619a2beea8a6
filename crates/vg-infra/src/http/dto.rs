//! Wire shapes of the progress service.

use serde::{Deserialize, Deserializer, Serialize};
use vg_core::ProgressRecord;

/// `GET /progress/{participant}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ProgressResponse {
    #[serde(rename = "lastWatchedVideo", default)]
    last_watched_video: Option<i64>,
    #[serde(
        rename = "watchedTheVideos",
        default,
        deserialize_with = "deserialize_watched_flag"
    )]
    watched_the_videos: bool,
}

impl ProgressResponse {
    /// Missing or negative positions mean "nothing watched yet".
    pub(crate) fn into_record(self) -> ProgressRecord {
        let position = self
            .last_watched_video
            .map(|position| usize::try_from(position).unwrap_or(0))
            .unwrap_or(0);
        ProgressRecord::new(position, self.watched_the_videos)
    }
}

/// `POST /progress/update` body.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateProgressRequest<'a> {
    pub(crate) email: &'a str,
    #[serde(rename = "lastWatchedVideo")]
    pub(crate) last_watched_video: usize,
    #[serde(rename = "watchedTheVideos")]
    pub(crate) watched_the_videos: u8,
}

impl<'a> UpdateProgressRequest<'a> {
    pub(crate) fn new(email: &'a str, record: ProgressRecord) -> Self {
        Self {
            email,
            last_watched_video: record.position,
            watched_the_videos: u8::from(record.completed),
        }
    }
}

/// `POST /progress/restart` body.
#[derive(Debug, Serialize)]
pub(crate) struct RestartProgressRequest<'a> {
    pub(crate) email: &'a str,
}

/// Accepts `0|1`, `true|false` or `null`; any non-zero number counts as set.
fn deserialize_watched_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(i64),
        Bool(bool),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Int(value)) => value != 0,
        Some(Flag::Bool(value)) => value,
    })
}
