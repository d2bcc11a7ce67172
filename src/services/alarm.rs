//! Alarm sound collaborator
//!
//! Models the single named, preloaded alarm asset at its interface boundary:
//! "play from start" and "stop and rewind to start". Commands travel on a
//! watch channel carrying a generation counter, so a later command always
//! wins over an in-flight playback and a restart really starts from the top.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Latest playback instruction for the alarm asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackCommand {
    /// Bumped on every play/stop so stale playbacks can be recognized
    pub generation: u64,
    pub playing: bool,
}

/// Handle to the alarm asset. Play and stop never fail; playback trouble is
/// the playback task's problem and must not reach the countdown.
#[derive(Debug)]
pub struct AlarmPlayer {
    asset: String,
    length: Duration,
    command_tx: watch::Sender<PlaybackCommand>,
    /// Keep the receiver alive to prevent channel closure
    _command_rx: watch::Receiver<PlaybackCommand>,
}

impl AlarmPlayer {
    pub fn new(asset: impl Into<String>, length: Duration) -> Self {
        let (command_tx, command_rx) = watch::channel(PlaybackCommand::default());
        Self {
            asset: asset.into(),
            length,
            command_tx,
            _command_rx: command_rx,
        }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Playback length of the asset
    pub fn length(&self) -> Duration {
        self.length
    }

    /// Begin playback from the start of the sound, restarting if it is
    /// already sounding
    pub fn play_from_start(&self) {
        debug!("Alarm '{}' playing from start", self.asset);
        self.command_tx.send_modify(|command| {
            command.generation += 1;
            command.playing = true;
        });
    }

    /// Halt playback and rewind. A no-op when nothing is sounding.
    pub fn stop(&self) {
        self.command_tx.send_modify(|command| {
            if command.playing {
                debug!("Alarm '{}' stopped", self.asset);
                command.generation += 1;
                command.playing = false;
            }
        });
    }

    /// Mark a playback generation as naturally finished. Returns false when a
    /// newer command superseded it, in which case nothing changes.
    pub fn finish(&self, generation: u64) -> bool {
        self.command_tx.send_if_modified(|command| {
            if command.generation == generation && command.playing {
                debug!("Alarm '{}' playback ended", self.asset);
                command.playing = false;
                true
            } else {
                false
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackCommand> {
        self.command_tx.subscribe()
    }

    pub fn current(&self) -> PlaybackCommand {
        *self.command_tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> AlarmPlayer {
        AlarmPlayer::new("alarm.wav", Duration::from_secs(2))
    }

    #[test]
    fn play_bumps_generation_and_sounds() {
        let alarm = player();
        alarm.play_from_start();
        let command = alarm.current();
        assert!(command.playing);
        assert_eq!(command.generation, 1);

        // Re-playing restarts from the top under a fresh generation.
        alarm.play_from_start();
        assert_eq!(alarm.current().generation, 2);
        assert!(alarm.current().playing);
    }

    #[test]
    fn stop_wins_over_an_in_flight_playback() {
        let alarm = player();
        alarm.play_from_start();
        let started = alarm.current().generation;
        alarm.stop();
        assert!(!alarm.current().playing);
        // The finished playback is stale now and must not resurrect anything.
        assert!(!alarm.finish(started));
        assert!(!alarm.current().playing);
    }

    #[test]
    fn stop_when_silent_is_a_no_op() {
        let alarm = player();
        alarm.stop();
        assert_eq!(alarm.current(), PlaybackCommand::default());
    }

    #[test]
    fn finish_clears_only_the_current_generation() {
        let alarm = player();
        alarm.play_from_start();
        let generation = alarm.current().generation;
        assert!(alarm.finish(generation));
        assert!(!alarm.current().playing);
        // Finishing twice is harmless.
        assert!(!alarm.finish(generation));
    }
}
