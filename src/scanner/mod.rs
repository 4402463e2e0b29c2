//! Badge capture.
//!
//! A [`Decoder`] turns some capture device into decoded text. [`ScanWidget`]
//! drives one decoder through a single capture: load, start, wait for the
//! first event, then always tear down. Decoders are injected so the kiosk can
//! run against the console reader, a camera library, or a scripted source in
//! tests.

mod console;

pub use console::{CANCEL_INPUT, ConsoleDecoder};

use crate::flight::SingleFlight;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, error, warn};

pub const CAPTURE_FPS: u32 = 10;
pub const DECODE_REGION_SIDE: u32 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// Front camera, towards the operator.
    User,
    Environment,
}

/// Parameters handed to [`Decoder::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    pub facing: Facing,
    pub fps: u32,
    /// Central decode region, in pixels.
    pub region_width: u32,
    pub region_height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            facing: Facing::User,
            fps: CAPTURE_FPS,
            region_width: DECODE_REGION_SIDE,
            region_height: DECODE_REGION_SIDE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    Decoded(String),
    Cancelled,
}

/// A capture device plus whatever library decodes its frames.
///
/// Backend failures are reported as `anyhow::Error`; the widget logs them and
/// maps them onto [`ScanError`] for the operator.
pub trait Decoder {
    fn load(&mut self) -> impl Future<Output = anyhow::Result<()>>;

    fn start(&mut self, config: &CaptureConfig) -> impl Future<Output = anyhow::Result<()>>;

    /// Waits for the next decode or cancellation.
    fn next_event(&mut self) -> impl Future<Output = CaptureEvent>;

    fn stop(&mut self) -> impl Future<Output = anyhow::Result<()>>;

    fn is_scanning(&self) -> bool;

    fn unload(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Could not load the scanning library.")]
    LibraryUnavailable,
    #[error("Could not start the camera. Check the permissions.")]
    CameraUnavailable,
    #[error("A scan is already in progress.")]
    CaptureBusy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanReport {
    Decoded(String),
    Cancelled,
    Failed(ScanError),
}

#[derive(Clone, Debug, Default)]
pub struct ScanWidget {
    config: CaptureConfig,
    camera: SingleFlight,
}

impl ScanWidget {
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            camera: SingleFlight::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.camera.is_busy()
    }

    /// Run one capture to completion.
    ///
    /// Only the first decoded payload is reported. The decoder is stopped and
    /// unloaded before this returns, whatever the outcome.
    pub async fn capture<D: Decoder>(&self, decoder: &mut D) -> ScanReport {
        let Some(_guard) = self.camera.try_begin() else {
            warn!("capture requested while the camera is in use");
            return ScanReport::Failed(ScanError::CaptureBusy);
        };

        let report = self.run(decoder).await;
        teardown(decoder).await;

        debug!("capture finished: {report:?}");
        report
    }

    async fn run<D: Decoder>(&self, decoder: &mut D) -> ScanReport {
        if let Err(e) = decoder.load().await {
            error!("Failed to load scanner: {e:#}");
            return ScanReport::Failed(ScanError::LibraryUnavailable);
        }

        if let Err(e) = decoder.start(&self.config).await {
            error!("Failed to start scanner: {e:#}");
            return ScanReport::Failed(ScanError::CameraUnavailable);
        }

        match decoder.next_event().await {
            CaptureEvent::Decoded(text) => {
                if let Err(e) = decoder.stop().await {
                    warn!("Failed to stop scanner after decode: {e:#}");
                }
                ScanReport::Decoded(text)
            }
            CaptureEvent::Cancelled => ScanReport::Cancelled,
        }
    }
}

async fn teardown<D: Decoder>(decoder: &mut D) {
    if decoder.is_scanning()
        && let Err(e) = decoder.stop().await
    {
        debug!("Failed to stop scanner on teardown: {e:#}");
    }
    decoder.unload();
}
