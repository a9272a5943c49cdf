//! Playback and seek state of a voice message.

#[derive(Debug, Clone, PartialEq)]
pub struct VoicePlayback {
    pub position_ms: u32,
    progress: f64,
}

impl VoicePlayback {
    /// Played fraction in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    duration_ms: u32,
    playback: Option<VoicePlayback>,
    last_duration_ms: u32,
    seeking: bool,
    seeking_start: f64,
    seeking_current: f64,
}

impl Voice {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            playback: None,
            last_duration_ms: duration_ms,
            seeking: false,
            seeking_start: 0.0,
            seeking_current: 0.0,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn playback(&self) -> Option<&VoicePlayback> {
        self.playback.as_ref()
    }

    pub fn ensure_playback(&mut self) -> &mut VoicePlayback {
        self.playback.get_or_insert(VoicePlayback {
            position_ms: 0,
            progress: 0.0,
        })
    }

    /// Records the player position. `duration_ms` comes from the player and
    /// may differ from the duration announced in the message.
    pub fn update_position(&mut self, position_ms: u32, duration_ms: u32) {
        if duration_ms > 0 {
            self.last_duration_ms = duration_ms;
        }
        let total = self.last_duration_ms;
        let playback = self.ensure_playback();
        playback.position_ms = position_ms.min(total);
        playback.progress = if total == 0 {
            0.0
        } else {
            f64::from(playback.position_ms) / f64::from(total)
        };
    }

    /// Drops the playback state once the end was reached.
    pub fn check_playback_finished(&mut self) -> bool {
        let finished = self
            .playback
            .as_ref()
            .is_some_and(|playback| playback.position_ms >= self.last_duration_ms);
        if finished {
            self.playback = None;
        }
        finished
    }

    #[cfg(test)]
    pub fn seeking(&self) -> bool {
        self.seeking
    }

    pub fn start_seeking(&mut self) {
        self.seeking = true;
        self.seeking_current = self.seeking_start;
    }

    pub fn stop_seeking(&mut self) {
        self.seeking = false;
    }

    pub fn seeking_start(&self) -> f64 {
        self.seeking_start
    }

    pub fn set_seeking_start(&mut self, fraction: f64) {
        self.seeking_start = fraction.clamp(0.0, 1.0);
    }

    pub fn seeking_current(&self) -> f64 {
        self.seeking_current
    }

    pub fn set_seeking_current(&mut self, fraction: f64) {
        self.seeking_current = fraction.clamp(0.0, 1.0);
    }

    /// Fraction to draw on the waveform: the seek handle while seeking,
    /// otherwise the playback progress.
    pub fn display_progress(&self) -> f64 {
        if self.seeking {
            self.seeking_current
        } else {
            self.playback.as_ref().map_or(0.0, VoicePlayback::progress)
        }
    }
}
