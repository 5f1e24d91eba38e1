//! Presentation seam
//!
//! The simulation only decides what happens. Whatever draws sprites, plays
//! sounds or lays out text implements `Presenter` and consumes the events a
//! tick returns.

use std::io::Write;

use crate::sim::GameEvent;

/// Consumer of simulation output events
pub trait Presenter {
    fn present(&mut self, event: &GameEvent);

    fn present_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.present(event);
        }
    }
}

/// Writes gameplay-relevant events to the log; entity churn goes to `trace`
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EntitySpawned { .. } | GameEvent::EntityDestroyed { .. } => {
                log::trace!("{:?}", event)
            }
            GameEvent::VisualEffect { .. } | GameEvent::CameraShake { .. } => {
                log::debug!("{:?}", event)
            }
            GameEvent::Audio(cue) => log::debug!("audio cue {}", cue.name()),
            GameEvent::ScoreChanged(score) => log::info!("Score: {}", score),
            GameEvent::HealthChanged(health) => log::info!("Health: {}", health),
            GameEvent::BossHealthBarUpdated(fraction) => {
                log::debug!("Boss health bar {:.0}%", fraction * 100.0)
            }
            GameEvent::BannerShown { text, duration_ms } => {
                log::info!("Banner '{}' for {} ms", text, duration_ms)
            }
            GameEvent::GameOverShown => log::info!("GAME OVER - press restart"),
            GameEvent::WonShown => log::info!("YOU WIN! - press restart"),
            GameEvent::GameReset => log::info!("Game reset"),
        }
    }
}

/// Streams every event as one JSON object per line
#[derive(Debug)]
pub struct JsonLinesPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn present(&mut self, event: &GameEvent) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = written {
            log::warn!("Failed to write event: {}", e);
        }
    }
}
