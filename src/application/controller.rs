//! Recording controller use case
//!
//! Wraps one [`CaptureSession`] and drives it through the recording
//! lifecycle: start, pause/resume, stop, reset, publish and the automatic
//! stop at the maximum duration. The controller owns the elapsed-seconds
//! timer; a timer exists iff the status is `Recording`.
//!
//! Ticks are delivered through a channel so the owner can multiplex them
//! with user input:
//!
//! ```no_run
//! # use voice_sampler::application::{RecordingController, ports::CaptureSession};
//! # async fn drive<C: CaptureSession>(controller: &mut RecordingController<C>) {
//! loop {
//!     let tick = controller.recv_tick().await;
//!     controller.on_tick(tick).await;
//! }
//! # }
//! ```

use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::domain::audio::AudioBlob;
use crate::domain::recording::{
    guide, DurationPolicy, InvalidStateTransition, Operation, RecordingSession, RecordingStatus,
};

use super::ports::{CaptureError, CaptureSession};
use super::timer::{Tick, TickTimer};

/// Period of the elapsed-seconds timer
pub const TICK_PERIOD: StdDuration = StdDuration::from_secs(1);

/// Errors from controller operations.
///
/// Each one is also reflected in the session's status and guide text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("Recording too short: {elapsed}s recorded, at least {min}s required")]
    PrematureStop { elapsed: u32, min: u32 },

    #[error("Encoding failed: {0}")]
    EncodeFailure(String),

    #[error("Capture failed: {0}")]
    Capture(CaptureError),
}

impl From<CaptureError> for ControllerError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::PermissionDenied(reason) => Self::PermissionDenied(reason),
            CaptureError::EncodeFailure(reason) => Self::EncodeFailure(reason),
            other => Self::Capture(other),
        }
    }
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick came from a timer that has since been cancelled
    Stale,
    /// Elapsed seconds after counting the tick
    Elapsed(u32),
    /// The maximum was reached; capture stopped and status is `Fail`
    TimedOut,
}

/// Read-only view of the session for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: RecordingStatus,
    pub elapsed_seconds: u32,
    pub guide_text: String,
    pub show_countdown_warning: bool,
    pub can_publish: bool,
    pub remaining_seconds: u32,
}

/// A finalized recording handed to the upload pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSample {
    pub blob: AudioBlob,
    pub file_name: String,
    pub seconds: u32,
}

/// Recording lifecycle state machine
pub struct RecordingController<C: CaptureSession> {
    capture: C,
    policy: DurationPolicy,
    session: RecordingSession,
    tick_period: StdDuration,
    timer: Option<TickTimer>,
    next_timer_id: u64,
    ticks_tx: UnboundedSender<Tick>,
    ticks_rx: UnboundedReceiver<Tick>,
}

impl<C: CaptureSession> RecordingController<C> {
    /// Create a controller in `Idle` with a one-second tick.
    pub fn new(capture: C, policy: DurationPolicy) -> Self {
        Self::with_tick_period(capture, policy, TICK_PERIOD)
    }

    pub fn with_tick_period(capture: C, policy: DurationPolicy, tick_period: StdDuration) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        Self {
            capture,
            policy,
            session: RecordingSession::new(),
            tick_period,
            timer: None,
            next_timer_id: 0,
            ticks_tx,
            ticks_rx,
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.session.status()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.session.elapsed_seconds()
    }

    pub fn guide_text(&self) -> &str {
        self.session.guide_text()
    }

    /// Computed on read from elapsed seconds and the policy.
    pub fn show_countdown_warning(&self) -> bool {
        self.policy
            .show_countdown_warning(self.session.elapsed_seconds())
    }

    pub fn can_publish(&self) -> bool {
        self.policy.can_publish(self.session.elapsed_seconds())
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.policy.remaining(self.session.elapsed_seconds())
    }

    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn policy(&self) -> &DurationPolicy {
        &self.policy
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            elapsed_seconds: self.elapsed_seconds(),
            guide_text: self.guide_text().to_string(),
            show_countdown_warning: self.show_countdown_warning(),
            can_publish: self.can_publish(),
            remaining_seconds: self.remaining_seconds(),
        }
    }

    /// Begin a fresh recording attempt (from `Idle`, `Fail` or `Success`).
    ///
    /// On capture failure the status is left unchanged and the error is
    /// surfaced through the guide text.
    pub async fn start_record(&mut self) -> Result<(), ControllerError> {
        if let Err(e) = self.session.check(Operation::Start) {
            return Err(self.reject(e));
        }

        if let Err(e) = self.capture.start().await {
            let err = ControllerError::from(e);
            let message = match err {
                ControllerError::PermissionDenied(_) => guide::PERMISSION_DENIED,
                _ => guide::RECORDING_FAILED,
            };
            self.session.set_guide(message);
            warn!(error = %err, "failed to start recording");
            return Err(err);
        }

        self.session.apply(Operation::Start)?;
        self.session.reset_elapsed();
        self.session.set_guide(guide::DEFAULT_PROMPT);
        self.start_timer();
        info!(max = self.policy.max_duration(), "recording started");
        Ok(())
    }

    /// Finish the attempt and return the encoded blob. Status becomes `Idle`.
    ///
    /// Calling again after the capture has been released is rejected with
    /// `InvalidState` and has no side effects.
    pub async fn stop_record(&mut self) -> Result<AudioBlob, ControllerError> {
        self.cancel_timer();
        if let Err(e) = self.session.check(Operation::Stop) {
            return Err(self.reject(e));
        }

        let elapsed = self.session.elapsed_seconds();
        match self.finish_capture().await {
            Ok(blob) => {
                self.session.apply(Operation::Stop)?;
                self.session.set_guide(guide::DEFAULT_PROMPT);
                info!(elapsed, size = %blob.human_readable_size(), "recording stopped");
                Ok(blob)
            }
            Err(err) => {
                self.session.fail(guide::RECORDING_FAILED);
                warn!(error = %err, "recording could not be finalized");
                Err(err)
            }
        }
    }

    /// Pause a running recording. The elapsed counter freezes.
    pub fn paused_record(&mut self) -> Result<(), ControllerError> {
        if let Err(e) = self.session.check(Operation::Pause) {
            return Err(self.reject(e));
        }

        self.capture.pause()?;
        self.cancel_timer();
        self.session.apply(Operation::Pause)?;
        self.session.set_guide(guide::PAUSED_PROMPT);
        debug!(elapsed = self.session.elapsed_seconds(), "recording paused");
        Ok(())
    }

    /// Resume a paused recording, counting on from the frozen value.
    pub fn resume_record(&mut self) -> Result<(), ControllerError> {
        if let Err(e) = self.session.check(Operation::Resume) {
            return Err(self.reject(e));
        }

        self.capture.resume()?;
        self.session.apply(Operation::Resume)?;
        self.session.set_guide(guide::DEFAULT_PROMPT);
        self.start_timer();
        debug!(elapsed = self.session.elapsed_seconds(), "recording resumed");
        Ok(())
    }

    /// Abandon the current attempt and start a new one.
    ///
    /// Works from any state. The previous capture is fully stopped (and its
    /// blob discarded) before the new one starts. A pending upload is
    /// abandoned, so its late completion is rejected.
    pub async fn reset_record(&mut self) -> Result<(), ControllerError> {
        let previous = self.session.status();
        if previous.holds_capture() {
            match self.finish_capture().await {
                Ok(blob) => debug!(size = blob.size_bytes(), "discarded previous recording"),
                Err(e) => debug!(error = %e, "previous recording discarded with error"),
            }
        }
        if previous != RecordingStatus::Idle {
            debug!(%previous, "abandoning attempt");
        }
        self.session.reset();
        self.start_record().await
    }

    /// Stop and hand the recording to the upload pipeline.
    ///
    /// Below the minimum duration the attempt fails with `PrematureStop`
    /// and nothing is returned. On success the status is `Uploading` until
    /// [`complete_upload`](Self::complete_upload) is called.
    pub async fn publish(&mut self) -> Result<PublishedSample, ControllerError> {
        if let Err(e) = self.session.check(Operation::Publish) {
            return Err(self.reject(e));
        }

        let elapsed = self.session.elapsed_seconds();
        if !self.policy.can_publish(elapsed) {
            if let Err(e) = self.finish_capture().await {
                debug!(error = %e, "short recording discarded with error");
            }
            self.session.fail(guide::TOO_SHORT);
            let min = self.policy.min_duration();
            warn!(elapsed, min, "recording too short to publish");
            return Err(ControllerError::PrematureStop { elapsed, min });
        }

        match self.finish_capture().await {
            Ok(blob) => {
                self.session.apply(Operation::Publish)?;
                self.session.set_guide(guide::UPLOADING);
                info!(seconds = elapsed, size = %blob.human_readable_size(), "recording published");
                Ok(PublishedSample {
                    file_name: blob.file_name(),
                    seconds: elapsed,
                    blob,
                })
            }
            Err(err) => {
                self.session.fail(guide::RECORDING_FAILED);
                warn!(error = %err, "recording could not be finalized");
                Err(err)
            }
        }
    }

    /// Report the upload outcome: `Uploading -> Success | Fail`.
    pub fn complete_upload(&mut self, succeeded: bool) -> Result<RecordingStatus, ControllerError> {
        let (op, message) = if succeeded {
            (Operation::CompleteUpload, guide::UPLOAD_COMPLETE)
        } else {
            (Operation::FailUpload, guide::UPLOAD_FAILED)
        };

        match self.session.apply(op) {
            Ok(status) => {
                self.session.set_guide(message);
                info!(%status, "upload finished");
                Ok(status)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Release everything and return to `Idle`, whatever the current state.
    pub async fn teardown(&mut self) {
        self.cancel_timer();
        if self.capture.is_active() || self.session.status().holds_capture() {
            if let Err(e) = self.capture.stop().await {
                debug!(error = %e, "capture released with error during teardown");
            }
        }
        self.session.reset();
        debug!("recording controller torn down");
    }

    /// Wait for the next tick. Cancel-safe, so it can sit in `select!`.
    ///
    /// Pends forever while no timer is running.
    pub async fn recv_tick(&mut self) -> Tick {
        match self.ticks_rx.recv().await {
            Some(tick) => tick,
            // The controller holds a sender, so the channel never closes.
            None => std::future::pending().await,
        }
    }

    /// Count one second and enforce the maximum duration.
    pub async fn on_tick(&mut self, tick: Tick) -> TickOutcome {
        match &self.timer {
            Some(timer) if timer.id() == tick.timer_id => {}
            _ => return TickOutcome::Stale,
        }

        let elapsed = self.session.tick();
        if self.policy.is_timed_out(elapsed) {
            self.time_out().await;
            return TickOutcome::TimedOut;
        }
        TickOutcome::Elapsed(elapsed)
    }

    async fn time_out(&mut self) {
        warn!(max = self.policy.max_duration(), "maximum duration reached, stopping");
        if let Err(e) = self.finish_capture().await {
            debug!(error = %e, "timed out recording discarded with error");
        }
        if let Err(e) = self.session.apply(Operation::Timeout) {
            debug!(error = %e, "timeout outside recording");
        }
        self.session.fail(guide::TIMEOUT);
    }

    /// Cancel the timer, zero the counter and stop the capture. An empty
    /// blob counts as an encode failure.
    async fn finish_capture(&mut self) -> Result<AudioBlob, ControllerError> {
        self.cancel_timer();
        self.session.reset_elapsed();

        let blob = self.capture.stop().await?;
        if blob.is_empty() {
            return Err(ControllerError::EncodeFailure(
                "no audio captured".to_string(),
            ));
        }
        Ok(blob)
    }

    fn start_timer(&mut self) {
        self.cancel_timer();
        self.next_timer_id += 1;
        self.timer = Some(TickTimer::spawn(
            self.next_timer_id,
            self.tick_period,
            self.ticks_tx.clone(),
        ));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn reject(&self, err: InvalidStateTransition) -> ControllerError {
        warn!(error = %err, "operation rejected");
        ControllerError::InvalidState(err)
    }
}
