//! Microphone capture session using cpal
//!
//! `cpal::Stream` is not `Send`, so the stream lives on a dedicated worker
//! thread for the whole session. The thread reports the device sample rate
//! (or the failure) once the stream is playing, then idles until its
//! shutdown flag is raised and drops the stream. Joining the thread is what
//! releases the microphone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use super::encoder;
use crate::application::ports::{CaptureError, CaptureSession};
use crate::domain::audio::{AudioBlob, AudioFormat, DEFAULT_SAMPLE_RATE};

/// How often the worker checks its shutdown flag
const WORKER_POLL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Inactive,
    Capturing,
    Paused,
}

impl CaptureState {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Capturing => "capturing",
            Self::Paused => "paused",
        }
    }
}

/// The thread that owns the open stream.
///
/// Dropping the worker raises the shutdown flag without waiting, so an
/// abandoned `start` still lets the thread drop the stream.
struct CaptureWorker {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    fn new(shutdown: Arc<AtomicBool>, handle: JoinHandle<()>) -> Self {
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to drop the stream. Blocking.
    fn release(mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("capture thread panicked");
            }
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

type SampleBuffer = Arc<StdMutex<Vec<i16>>>;

/// Capture session backed by the default input device
pub struct CpalCaptureSession {
    /// Captured samples (mono, i16, at device sample rate)
    buffer: SampleBuffer,
    /// Gate for the stream callback; false while paused
    buffering: Arc<AtomicBool>,
    state: CaptureState,
    worker: Option<CaptureWorker>,
    device_rate: u32,
    format: AudioFormat,
    target_rate: u32,
}

impl CpalCaptureSession {
    /// Create an inactive session producing `format` at `target_rate`
    pub fn new(format: AudioFormat, target_rate: u32) -> Self {
        Self {
            buffer: Arc::new(StdMutex::new(Vec::new())),
            buffering: Arc::new(AtomicBool::new(false)),
            state: CaptureState::Inactive,
            worker: None,
            device_rate: 0,
            format,
            target_rate,
        }
    }

    fn invalid(&self, action: &'static str) -> CaptureError {
        CaptureError::InvalidState {
            action,
            state: self.state.as_str(),
        }
    }

    /// Open the default input device and start the stream. Runs on the
    /// worker thread.
    fn open_stream(
        buffer: SampleBuffer,
        buffering: Arc<AtomicBool>,
    ) -> Result<(cpal::Stream, u32), CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| CaptureError::PermissionDenied("no input device available".into()))?;

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        let channels = config.channels;
        let sample_rate = config.sample_rate.0;

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if buffering.load(Ordering::SeqCst) {
                        append(&buffer, &downmix(data, channels));
                    }
                },
                stream_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if buffering.load(Ordering::SeqCst) {
                        let pcm: Vec<i16> = data
                            .iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                            .collect();
                        append(&buffer, &downmix(&pcm, channels));
                    }
                },
                stream_error,
                None,
            ),
            other => {
                return Err(CaptureError::PermissionDenied(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        }
        .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

        Ok((stream, sample_rate))
    }

    fn run_worker(
        buffer: SampleBuffer,
        buffering: Arc<AtomicBool>,
        shutdown: Arc<AtomicBool>,
        ready: oneshot::Sender<Result<u32, CaptureError>>,
    ) {
        let stream = match Self::open_stream(buffer, buffering) {
            Ok((stream, rate)) => {
                if ready.send(Ok(rate)).is_err() {
                    debug!("start abandoned, releasing microphone");
                    return;
                }
                stream
            }
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        while !shutdown.load(Ordering::SeqCst) {
            std::thread::sleep(WORKER_POLL);
        }

        drop(stream);
        debug!("microphone released");
    }

    async fn join_worker(worker: CaptureWorker) -> Result<(), CaptureError> {
        tokio::task::spawn_blocking(move || worker.release())
            .await
            .map_err(|e| CaptureError::Device(format!("capture thread join failed: {e}")))
    }
}

impl Default for CpalCaptureSession {
    fn default() -> Self {
        Self::new(AudioFormat::default(), DEFAULT_SAMPLE_RATE)
    }
}

impl Drop for CpalCaptureSession {
    fn drop(&mut self) {
        self.buffering.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker.release();
        }
    }
}

#[async_trait]
impl CaptureSession for CpalCaptureSession {
    async fn start(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Inactive {
            return Err(self.invalid("start"));
        }

        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.buffering.store(true, Ordering::SeqCst);

        let (ready_tx, ready_rx) = oneshot::channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = {
            let buffer = Arc::clone(&self.buffer);
            let buffering = Arc::clone(&self.buffering);
            let shutdown = Arc::clone(&shutdown);
            std::thread::Builder::new()
                .name("voice-sampler-capture".into())
                .spawn(move || Self::run_worker(buffer, buffering, shutdown, ready_tx))
                .map_err(|e| CaptureError::Device(e.to_string()))?
        };
        let worker = CaptureWorker::new(shutdown, handle);

        match ready_rx.await {
            Ok(Ok(rate)) => {
                self.device_rate = rate;
                self.worker = Some(worker);
                self.state = CaptureState::Capturing;
                info!(device_rate = rate, "microphone acquired");
                Ok(())
            }
            Ok(Err(e)) => {
                self.buffering.store(false, Ordering::SeqCst);
                Self::join_worker(worker).await?;
                Err(e)
            }
            Err(_) => {
                self.buffering.store(false, Ordering::SeqCst);
                Self::join_worker(worker).await?;
                Err(CaptureError::Device(
                    "capture thread exited before the stream started".into(),
                ))
            }
        }
    }

    fn pause(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Capturing {
            return Err(self.invalid("pause"));
        }
        self.buffering.store(false, Ordering::SeqCst);
        self.state = CaptureState::Paused;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Paused {
            return Err(self.invalid("resume"));
        }
        self.buffering.store(true, Ordering::SeqCst);
        self.state = CaptureState::Capturing;
        Ok(())
    }

    async fn stop(&mut self) -> Result<AudioBlob, CaptureError> {
        self.buffering.store(false, Ordering::SeqCst);
        self.state = CaptureState::Inactive;

        let Some(worker) = self.worker.take() else {
            return Ok(AudioBlob::empty(self.format));
        };
        Self::join_worker(worker).await?;

        let samples = {
            let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *buffer)
        };
        if samples.is_empty() {
            return Ok(AudioBlob::empty(self.format));
        }

        let (rate, format, target) = (self.device_rate, self.format, self.target_rate);
        debug!(samples = samples.len(), rate, %format, "encoding capture");

        tokio::task::spawn_blocking(move || encoder::encode(&samples, rate, format, target))
            .await
            .map_err(|e| CaptureError::EncodeFailure(format!("encode task failed: {e}")))?
            .map_err(|e| CaptureError::EncodeFailure(e.to_string()))
    }

    fn is_active(&self) -> bool {
        self.worker.is_some()
    }
}

fn stream_error(err: cpal::StreamError) {
    error!(error = %err, "audio stream error");
}

fn append(buffer: &SampleBuffer, samples: &[i16]) {
    buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .extend_from_slice(samples);
}

/// Average interleaved channels down to mono
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}
