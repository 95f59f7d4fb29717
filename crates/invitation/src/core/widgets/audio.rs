//! Background music state.
//!
//! Browsers only allow playback after a user gesture, so the first click
//! anywhere on the page starts the music once. The toggle control flips
//! play/pause and counts as that first interaction. Playback starts
//! asynchronously: `playing` only becomes true once the browser confirms.

use crate::error::InvitationError;

pub const PLAYING_CLASS: &str = "playing";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    Play,
    Pause,
    Nothing,
}

#[derive(Debug, Default)]
pub struct AudioState {
    playing: bool,
    first_interaction_handled: bool,
}

impl AudioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn first_interaction_handled(&self) -> bool {
        self.first_interaction_handled
    }

    /// A click anywhere on the page; `on_toggle_control` when it landed on
    /// the toggle (which has its own handler).
    pub fn on_page_click(&mut self, on_toggle_control: bool) -> AudioCommand {
        if self.first_interaction_handled || on_toggle_control {
            return AudioCommand::Nothing;
        }
        self.first_interaction_handled = true;
        log::debug!("First click - starting music");
        AudioCommand::Play
    }

    pub fn on_toggle(&mut self) -> AudioCommand {
        self.first_interaction_handled = true;
        if self.playing {
            AudioCommand::Pause
        } else {
            AudioCommand::Play
        }
    }

    /// Opening the envelope always tries to start music that is not running.
    pub fn on_envelope_click(&mut self, media_paused: bool) -> AudioCommand {
        self.first_interaction_handled = true;
        if media_paused {
            AudioCommand::Play
        } else {
            AudioCommand::Nothing
        }
    }

    pub fn playback_started(&mut self) {
        self.playing = true;
        log::info!("Music playing");
    }

    /// Autoplay restrictions and missing sources end up here.
    pub fn playback_failed(&mut self, error: &InvitationError) {
        self.playing = false;
        log::warn!("Music play error: {error}");
    }

    pub fn paused(&mut self) {
        self.playing = false;
        log::info!("Music paused");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_click_plays_once() {
        let mut audio = AudioState::new();
        assert_eq!(audio.on_page_click(false), AudioCommand::Play);
        assert_eq!(audio.on_page_click(false), AudioCommand::Nothing);
    }

    #[test]
    fn clicks_on_the_toggle_are_left_to_the_toggle() {
        let mut audio = AudioState::new();
        assert_eq!(audio.on_page_click(true), AudioCommand::Nothing);
        assert!(!audio.first_interaction_handled());

        assert_eq!(audio.on_toggle(), AudioCommand::Play);
        audio.playback_started();
        assert_eq!(audio.on_page_click(false), AudioCommand::Nothing);
        assert_eq!(audio.on_toggle(), AudioCommand::Pause);
        audio.paused();
        assert_eq!(audio.on_toggle(), AudioCommand::Play);
    }

    #[test]
    fn blocked_autoplay_leaves_music_stopped() {
        let mut audio = AudioState::new();
        audio.on_page_click(false);
        audio.playback_failed(&InvitationError::media_unavailable("bg-music", "NotAllowedError"));
        assert!(!audio.is_playing());
        assert_eq!(audio.on_toggle(), AudioCommand::Play);
    }

    #[test]
    fn envelope_only_starts_paused_music() {
        let mut audio = AudioState::new();
        assert_eq!(audio.on_envelope_click(true), AudioCommand::Play);
        assert_eq!(audio.on_envelope_click(false), AudioCommand::Nothing);
        assert_eq!(audio.on_page_click(false), AudioCommand::Nothing);
    }
}
