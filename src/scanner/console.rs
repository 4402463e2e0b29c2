//! Decoder for keyboard-wedge readers.
//!
//! Barcode and QR readers in keyboard mode type the decoded text followed by
//! Enter, so a line read from the console is one decode. The operator cancels
//! by entering [`CANCEL_INPUT`] on its own.

use super::{CaptureConfig, CaptureEvent, Decoder};
use crate::kiosk::Console;
use std::io::Write;
use tokio::io::AsyncBufRead;
use tracing::{debug, warn};

pub const CANCEL_INPUT: &str = ".";

pub struct ConsoleDecoder<'a, R, W> {
    console: &'a mut Console<R, W>,
    loaded: bool,
    scanning: bool,
}

impl<'a, R, W> ConsoleDecoder<'a, R, W> {
    pub fn new(console: &'a mut Console<R, W>) -> Self {
        Self {
            console,
            loaded: false,
            scanning: false,
        }
    }
}

impl<R, W> Decoder for ConsoleDecoder<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    async fn load(&mut self) -> anyhow::Result<()> {
        self.loaded = true;
        Ok(())
    }

    async fn start(&mut self, config: &CaptureConfig) -> anyhow::Result<()> {
        anyhow::ensure!(self.loaded, "decoder started before it was loaded");

        debug!(
            "console capture started (facing {:?}, {} fps, region {}x{})",
            config.facing, config.fps, config.region_width, config.region_height
        );
        self.console
            .line(format!("Scan the badge now ('{CANCEL_INPUT}' to cancel)"))?;
        self.scanning = true;
        Ok(())
    }

    async fn next_event(&mut self) -> CaptureEvent {
        if !self.scanning {
            return CaptureEvent::Cancelled;
        }

        match self.console.prompt("code> ").await {
            Ok(Some(line)) if line.trim() == CANCEL_INPUT => CaptureEvent::Cancelled,
            Ok(Some(line)) => CaptureEvent::Decoded(line),
            Ok(None) => {
                debug!("input closed during capture");
                CaptureEvent::Cancelled
            }
            Err(e) => {
                warn!("Failed to read scanner input: {e}");
                CaptureEvent::Cancelled
            }
        }
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        self.scanning = false;
        Ok(())
    }

    fn is_scanning(&self) -> bool {
        self.scanning
    }

    fn unload(&mut self) {
        self.loaded = false;
    }
}
