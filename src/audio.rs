//! Sound cues for game events
//!
//! The core never plays audio itself. [`AudioManager`] turns tick events into
//! short synthesized tones and music commands that a platform backend drains
//! and plays. Muted or disabled output simply queues nothing.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One synthesized tone, ready for a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub freq_hz: f32,
    /// Exponential sweep target, if any
    pub end_freq_hz: Option<f32>,
    /// Seconds
    pub duration: f32,
    /// Peak gain after settings are applied
    pub volume: f32,
    /// Seconds after the cue starts
    pub delay: f32,
}

impl Tone {
    const fn beep(waveform: Waveform, freq_hz: f32, duration: f32, volume: f32) -> Self {
        Self {
            waveform,
            freq_hz,
            end_freq_hz: None,
            duration,
            volume,
            delay: 0.0,
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Vehicle flapped
    Flap,
    /// Obstacle cleared
    Clear,
    /// Collectible picked up
    Pickup,
    /// Slow motion started
    SlowMotion,
    /// Run ended
    Crash,
}

impl SoundCue {
    /// Cue for a tick event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flap => Some(SoundCue::Flap),
            GameEvent::ObstacleCleared { .. } => Some(SoundCue::Clear),
            GameEvent::CollectiblePickup => Some(SoundCue::Pickup),
            GameEvent::SlowMotion { .. } => Some(SoundCue::SlowMotion),
            GameEvent::Crashed { .. } => Some(SoundCue::Crash),
            GameEvent::RunStarted | GameEvent::CollectibleArmed | GameEvent::LeaderboardRequested => {
                None
            }
        }
    }

    /// Tones at unit gain
    pub fn tones(self) -> Vec<Tone> {
        match self {
            SoundCue::Flap => vec![Tone::beep(Waveform::Triangle, 520.0, 0.08, 0.10)],
            SoundCue::Clear => vec![Tone::beep(Waveform::Square, 740.0, 0.05, 0.06)],
            SoundCue::Pickup => vec![
                Tone::beep(Waveform::Sine, 880.0, 0.06, 0.10),
                Tone {
                    delay: 0.04,
                    ..Tone::beep(Waveform::Sine, 1320.0, 0.08, 0.10)
                },
            ],
            SoundCue::SlowMotion => vec![Tone::beep(Waveform::Sine, 330.0, 0.12, 0.09)],
            SoundCue::Crash => vec![Tone {
                end_freq_hz: Some(60.0),
                ..Tone::beep(Waveform::Sawtooth, 220.0, 0.22, 0.22)
            }],
        }
    }
}

/// Background music control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MusicCommand {
    Play { volume: f32 },
    Stop,
}

/// Audio manager for the game
#[derive(Debug, Default)]
pub struct AudioManager {
    sfx_gain: f32,
    music_gain: f32,
    muted: bool,
    /// Music was requested; it plays whenever it is audible
    music_wanted: bool,
    music_playing: bool,
    pending: Vec<Tone>,
    music: Option<MusicCommand>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let mut audio = Self::default();
        audio.apply_settings(settings);
        audio
    }

    /// Pick up changed preferences; music stops or resumes to match
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_gain = settings.sfx_gain();
        self.music_gain = settings.music_gain();
        self.sync_music();
    }

    /// Mute/unmute all audio (e.g. window lost focus)
    ///
    /// Music pauses while muted and resumes on unmute if it was playing.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sync_music();
    }

    fn effective_sfx_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_gain }
    }

    /// React to one tick event
    pub fn on_event(&mut self, event: &GameEvent) {
        if matches!(event, GameEvent::RunStarted) {
            self.start_music();
        }
        if let Some(cue) = SoundCue::for_event(event) {
            self.play(cue);
        }
    }

    /// Queue a sound effect
    pub fn play(&mut self, cue: SoundCue) {
        let gain = self.effective_sfx_gain();
        if gain <= 0.0 {
            return;
        }
        self.pending.extend(cue.tones().into_iter().map(|tone| Tone {
            volume: tone.volume * gain,
            ..tone
        }));
    }

    pub fn start_music(&mut self) {
        self.music_wanted = true;
        self.sync_music();
    }

    pub fn stop_music(&mut self) {
        self.music_wanted = false;
        self.sync_music();
    }

    /// Issue a command when the audible state of the music changes
    fn sync_music(&mut self) {
        let audible = self.music_wanted && !self.muted && self.music_gain > 0.0;
        if audible == self.music_playing {
            return;
        }
        self.music_playing = audible;
        self.music = Some(if audible {
            MusicCommand::Play {
                volume: self.music_gain,
            }
        } else {
            MusicCommand::Stop
        });
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Tones queued since the last drain
    pub fn drain_tones(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.pending)
    }

    /// Latest music command since the last call
    pub fn take_music_command(&mut self) -> Option<MusicCommand> {
        self.music.take()
    }
}
