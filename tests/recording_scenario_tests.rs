//! End-to-end recording lifecycle against a simulated microphone.
//!
//! Runs on tokio's paused clock, so a 59 second recording completes
//! instantly and tick timing is deterministic.

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;

use voice_sampler::application::ports::{CaptureError, CaptureSession};
use voice_sampler::application::{ControllerError, RecordingController, TickOutcome};
use voice_sampler::domain::audio::{AudioBlob, AudioFormat, DEFAULT_SAMPLE_RATE};
use voice_sampler::domain::recording::{guide, Duration, DurationPolicy, RecordingStatus};

#[derive(Debug, Default)]
struct Microphone {
    held: bool,
    starts: usize,
    stops: usize,
}

/// Capture session that records how the device was used
#[derive(Clone, Default)]
struct SimulatedCapture {
    mic: Arc<Mutex<Microphone>>,
}

impl SimulatedCapture {
    fn held(&self) -> bool {
        self.mic.lock().unwrap().held
    }

    fn stops(&self) -> usize {
        self.mic.lock().unwrap().stops
    }

    fn starts(&self) -> usize {
        self.mic.lock().unwrap().starts
    }
}

#[async_trait]
impl CaptureSession for SimulatedCapture {
    async fn start(&mut self) -> Result<(), CaptureError> {
        let mut mic = self.mic.lock().unwrap();
        if mic.held {
            return Err(CaptureError::InvalidState {
                action: "start",
                state: "capturing",
            });
        }
        mic.held = true;
        mic.starts += 1;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn stop(&mut self) -> Result<AudioBlob, CaptureError> {
        let mut mic = self.mic.lock().unwrap();
        mic.stops += 1;
        if !mic.held {
            return Ok(AudioBlob::empty(AudioFormat::Wav));
        }
        mic.held = false;
        Ok(AudioBlob::new(vec![0x52, 0x49, 0x46, 0x46], AudioFormat::Wav, DEFAULT_SAMPLE_RATE))
    }

    fn is_active(&self) -> bool {
        self.held()
    }
}

fn policy(min: u32, max: u32) -> DurationPolicy {
    DurationPolicy::new(
        Duration::from_secs(min),
        Duration::from_secs(max),
        Duration::default_countdown_window(),
    )
    .unwrap()
}

fn recorder(min: u32, max: u32) -> (RecordingController<SimulatedCapture>, SimulatedCapture) {
    let capture = SimulatedCapture::default();
    (RecordingController::new(capture.clone(), policy(min, max)), capture)
}

/// Deliver `n` ticks, returning the last outcome
async fn run_ticks(controller: &mut RecordingController<SimulatedCapture>, n: u32) -> TickOutcome {
    let mut outcome = TickOutcome::Stale;
    for _ in 0..n {
        let tick = controller.recv_tick().await;
        outcome = controller.on_tick(tick).await;
    }
    outcome
}

/// True when no tick arrives within `secs` seconds
async fn no_tick_within(controller: &mut RecordingController<SimulatedCapture>, secs: u64) -> bool {
    tokio::time::timeout(StdDuration::from_secs(secs), controller.recv_tick())
        .await
        .is_err()
}

#[tokio::test(start_paused = true)]
async fn full_scenario_min_16_max_59() {
    let (mut controller, mic) = recorder(16, 59);

    // Stopping for publish at t=10 is premature
    controller.start_record().await.unwrap();
    assert_eq!(run_ticks(&mut controller, 10).await, TickOutcome::Elapsed(10));
    let err = controller.publish().await.unwrap_err();
    assert_eq!(err, ControllerError::PrematureStop { elapsed: 10, min: 16 });
    assert_eq!(controller.status(), RecordingStatus::Fail);
    assert_eq!(controller.guide_text(), guide::TOO_SHORT);
    assert!(!mic.held());

    // Reaching 59s forces a timeout
    controller.start_record().await.unwrap();
    assert_eq!(run_ticks(&mut controller, 58).await, TickOutcome::Elapsed(58));
    let stops_before = mic.stops();
    assert_eq!(run_ticks(&mut controller, 1).await, TickOutcome::TimedOut);
    assert_eq!(controller.status(), RecordingStatus::Fail);
    assert_eq!(controller.guide_text(), guide::TIMEOUT);
    assert_eq!(mic.stops(), stops_before + 1);
    assert!(!mic.held());
    assert!(!controller.has_active_timer());

    // Pausing freezes the counter, resuming continues from it
    controller.start_record().await.unwrap();
    assert_eq!(controller.elapsed_seconds(), 0);
    run_ticks(&mut controller, 20).await;
    controller.paused_record().unwrap();
    assert!(no_tick_within(&mut controller, 5).await);
    assert_eq!(controller.elapsed_seconds(), 20);
    controller.resume_record().unwrap();
    assert_eq!(run_ticks(&mut controller, 1).await, TickOutcome::Elapsed(21));

    // Past the minimum, publishing succeeds
    let sample = controller.publish().await.unwrap();
    assert_eq!(sample.seconds, 21);
    assert_eq!(sample.file_name, "speech.wav");
    assert_eq!(controller.status(), RecordingStatus::Uploading);
    assert_eq!(controller.complete_upload(true).unwrap(), RecordingStatus::Success);
    assert_eq!(controller.guide_text(), guide::UPLOAD_COMPLETE);
    assert!(!mic.held());
    assert_eq!(mic.starts(), 3);
}

#[tokio::test(start_paused = true)]
async fn timer_runs_only_while_recording() {
    let (mut controller, _mic) = recorder(11, 59);
    assert!(!controller.has_active_timer());

    controller.start_record().await.unwrap();
    assert!(controller.has_active_timer());

    for _ in 0..3 {
        run_ticks(&mut controller, 2).await;
        controller.paused_record().unwrap();
        assert!(!controller.has_active_timer());
        assert!(no_tick_within(&mut controller, 3).await);

        controller.resume_record().unwrap();
        assert!(controller.has_active_timer());
    }
    assert_eq!(controller.elapsed_seconds(), 6);

    controller.stop_record().await.unwrap();
    assert!(!controller.has_active_timer());
    assert_eq!(controller.status(), RecordingStatus::Idle);
    assert_eq!(controller.elapsed_seconds(), 0);
    assert!(no_tick_within(&mut controller, 3).await);
}

#[tokio::test(start_paused = true)]
async fn countdown_warning_window() {
    let (mut controller, _mic) = recorder(11, 59);
    controller.start_record().await.unwrap();

    run_ticks(&mut controller, 48).await;
    assert!(!controller.show_countdown_warning());
    run_ticks(&mut controller, 1).await;
    assert_eq!(controller.elapsed_seconds(), 49);
    assert!(controller.show_countdown_warning());
    assert_eq!(controller.snapshot().remaining_seconds, 10);

    run_ticks(&mut controller, 9).await;
    assert!(controller.show_countdown_warning());
    assert_eq!(controller.status(), RecordingStatus::Recording);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_and_restarts() {
    let (mut controller, mic) = recorder(11, 59);
    controller.start_record().await.unwrap();
    run_ticks(&mut controller, 7).await;
    controller.paused_record().unwrap();

    controller.reset_record().await.unwrap();

    assert_eq!(controller.status(), RecordingStatus::Recording);
    assert_eq!(controller.elapsed_seconds(), 0);
    assert_eq!(mic.starts(), 2);
    assert_eq!(mic.stops(), 1);
    assert!(mic.held());
    assert_eq!(run_ticks(&mut controller, 1).await, TickOutcome::Elapsed(1));
}

#[tokio::test(start_paused = true)]
async fn teardown_releases_everything_from_any_state() {
    for pause in [false, true] {
        let (mut controller, mic) = recorder(11, 59);
        controller.start_record().await.unwrap();
        run_ticks(&mut controller, 3).await;
        if pause {
            controller.paused_record().unwrap();
        }

        controller.teardown().await;

        assert!(!mic.held());
        assert!(!controller.has_active_timer());
        assert_eq!(controller.status(), RecordingStatus::Idle);
        assert_eq!(controller.elapsed_seconds(), 0);
        assert!(no_tick_within(&mut controller, 2).await);
    }

    // Teardown with nothing running is harmless
    let (mut controller, mic) = recorder(11, 59);
    controller.teardown().await;
    assert!(!mic.held());
    assert_eq!(mic.starts(), 0);
}
