use convene_core::StatusKind;

/// Latest display hints received from one remote member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteStatus {
    pub audio_muted: bool,
    pub video_off: bool,
    pub screen_sharing: bool,
}

impl RemoteStatus {
    /// Applies one hint. Returns whether the view changed.
    pub fn apply(&mut self, kind: StatusKind, enabled: bool) -> bool {
        let slot = match kind {
            StatusKind::AudioMuted => &mut self.audio_muted,
            StatusKind::VideoOff => &mut self.video_off,
            StatusKind::ScreenSharing => &mut self.screen_sharing,
        };
        let changed = *slot != enabled;
        *slot = enabled;
        changed
    }
}
