use serde::{Deserialize, Serialize};

/// Short graded reading with an accompanying audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub text: String,
    pub audio_url: String,
}
