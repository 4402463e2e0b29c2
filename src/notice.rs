//! Transient operator notices.
//!
//! There is one slot. Showing a notice replaces whatever is there and
//! reschedules the automatic clear; notices are never queued.

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::debug;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    seq: u64,
}

impl Notice {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug)]
pub struct NoticeBoard {
    slot: Arc<watch::Sender<Option<Notice>>>,
    ttl: Duration,
    seq: u64,
    pending_clear: Option<JoinHandle<()>>,
}

impl NoticeBoard {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            ttl,
            seq: 0,
            pending_clear: None,
        }
    }

    /// Replace the current notice and schedule its clear.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&mut self, kind: NoticeKind, text: impl Into<String>) {
        if let Some(pending) = self.pending_clear.take() {
            pending.abort();
        }

        self.seq += 1;
        let seq = self.seq;
        let notice = Notice {
            kind,
            text: text.into(),
            seq,
        };
        debug!("notice: {:?} {}", notice.kind, notice.text);
        self.slot.send_replace(Some(notice));

        let slot = Arc::clone(&self.slot);
        let deadline = Instant::now() + self.ttl;
        self.pending_clear = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            // A newer notice may have landed between wake-up and abort.
            slot.send_if_modified(|current| {
                if current.as_ref().is_some_and(|notice| notice.seq == seq) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        }));
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(NoticeKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(NoticeKind::Error, text);
    }

    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        self.slot.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.slot.subscribe()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl Drop for NoticeBoard {
    fn drop(&mut self) {
        if let Some(pending) = self.pending_clear.take() {
            pending.abort();
        }
    }
}
