//! Guided breathing: the three-phase cycle and the frame pulse driver.
//!
//! `BreathCycle` and `Oscillator` are pure. `BreathSession` schedules them on
//! tokio and publishes through `watch` channels for as long as the overlay is
//! open. Stopping (or dropping) the session aborts both tasks.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::types::{BreathPhase, MeditationConfig};

/// Oscillator advance per frame tick.
const PROGRESS_STEP: f64 = 0.015;

impl BreathPhase {
    pub fn next(self) -> Self {
        match self {
            BreathPhase::Inspire => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Expire,
            BreathPhase::Expire => BreathPhase::Inspire,
        }
    }

    pub fn accent(self) -> &'static str {
        match self {
            BreathPhase::Inspire => "green",
            BreathPhase::Hold => "amber",
            BreathPhase::Expire => "blue",
        }
    }

    /// Lens scale the animation eases toward during this phase.
    pub fn target_scale(self) -> f64 {
        match self {
            BreathPhase::Inspire => 1.12,
            BreathPhase::Hold => 1.05,
            BreathPhase::Expire => 0.95,
        }
    }
}

/// Fixed-period phase clock starting at `Inspire`.
#[derive(Debug, Clone, Copy)]
pub struct BreathCycle {
    phase_duration: Duration,
}

impl BreathCycle {
    pub fn new(phase_duration: Duration) -> Self {
        Self { phase_duration }
    }

    pub fn phase_duration(&self) -> Duration {
        self.phase_duration
    }

    /// Phase after `elapsed` time since the cycle started.
    pub fn phase_at(&self, elapsed: Duration) -> BreathPhase {
        let period = self.phase_duration.as_millis().max(1);
        match (elapsed.as_millis() / period) % 3 {
            0 => BreathPhase::Inspire,
            1 => BreathPhase::Hold,
            _ => BreathPhase::Expire,
        }
    }
}

/// One animation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseFrame {
    pub pulse: f64,
    pub lens_scale: f64,
    pub glow_radius: f64,
    pub glow_alpha: f64,
    pub aura_radius: f64,
    pub aura_alpha: f64,
}

/// Phase-agnostic sine driver. Never resets while the overlay is open.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oscillator {
    progress: f64,
}

impl Oscillator {
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn pulse(&self) -> f64 {
        self.progress.sin() * 0.5 + 0.5
    }

    /// Advance one tick and shape the frame for `phase`.
    pub fn tick(&mut self, phase: BreathPhase) -> PulseFrame {
        self.progress += PROGRESS_STEP;
        self.frame(phase)
    }

    pub fn frame(&self, phase: BreathPhase) -> PulseFrame {
        let pulse = self.pulse();
        PulseFrame {
            pulse,
            lens_scale: phase.target_scale() + pulse * 0.02,
            glow_radius: 40.0 + pulse * 20.0,
            glow_alpha: 0.05 + pulse * 0.05,
            aura_radius: 160.0 + pulse * 30.0,
            aura_alpha: 0.05 + pulse * 0.1,
        }
    }
}

/// Receives breath updates as they are produced (e.g. to forward them to a
/// webview). Called from the session's tasks, so implementations must not block.
pub trait BreathSink: Send + Sync {
    fn phase_changed(&self, phase: BreathPhase);
    fn frame(&self, frame: PulseFrame);
}

/// Running breath overlay: phase timer plus frame driver.
pub struct BreathSession {
    phase_rx: watch::Receiver<BreathPhase>,
    pulse_rx: watch::Receiver<PulseFrame>,
    tasks: Vec<JoinHandle<()>>,
}

impl BreathSession {
    /// Spawn the phase timer and frame driver. Must run inside a tokio runtime.
    pub fn start(timing: MeditationConfig, sink: Option<Arc<dyn BreathSink>>) -> Self {
        let cycle = BreathCycle::new(Duration::from_millis(timing.phase_duration_ms));
        let frame_interval = Duration::from_millis(timing.frame_interval_ms.max(1));

        let (phase_tx, phase_rx) = watch::channel(BreathPhase::Inspire);
        let (pulse_tx, pulse_rx) =
            watch::channel(Oscillator::default().frame(BreathPhase::Inspire));

        let phase_sink = sink.clone();
        let phase_task = tokio::spawn(async move {
            let period = cycle.phase_duration().max(Duration::from_millis(1));
            let started = Instant::now();
            let mut ticker = time::interval_at(started + period, period);
            let mut phase = BreathPhase::Inspire;
            loop {
                ticker.tick().await;
                let next = cycle.phase_at(started.elapsed());
                if next == phase {
                    continue;
                }
                phase = next;
                log::debug!("Breath: phase -> {:?}", phase);
                phase_tx.send_replace(phase);
                if let Some(sink) = &phase_sink {
                    sink.phase_changed(phase);
                }
            }
        });

        let frame_phase = phase_rx.clone();
        let frame_task = tokio::spawn(async move {
            let mut oscillator = Oscillator::default();
            let mut ticker = time::interval(frame_interval);
            ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let phase = *frame_phase.borrow();
                let frame = oscillator.tick(phase);
                pulse_tx.send_replace(frame);
                if let Some(sink) = &sink {
                    sink.frame(frame);
                }
            }
        });

        log::info!(
            "Breath session started (phase {}ms, frame {}ms)",
            timing.phase_duration_ms,
            frame_interval.as_millis()
        );

        Self {
            phase_rx,
            pulse_rx,
            tasks: vec![phase_task, frame_task],
        }
    }

    pub fn phase(&self) -> BreathPhase {
        *self.phase_rx.borrow()
    }

    pub fn pulse(&self) -> PulseFrame {
        *self.pulse_rx.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<BreathPhase> {
        self.phase_rx.clone()
    }

    pub fn subscribe_pulse(&self) -> watch::Receiver<PulseFrame> {
        self.pulse_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Abort both tasks. Subscribers observe their channel closing.
    pub fn stop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        log::info!("Breath session stopped");
    }
}

impl Drop for BreathSession {
    fn drop(&mut self) {
        self.stop();
    }
}
