use serde::{Deserialize, Serialize};

/// Display hint a member broadcasts about itself. Last delivered value wins.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    AudioMuted,
    VideoOff,
    ScreenSharing,
}
