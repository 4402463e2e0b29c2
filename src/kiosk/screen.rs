//! Main screen of a logged-in kiosk.

use crate::{
    attendance::{self, RecordOutcome},
    directory::{Directory, Movement},
    flight::SingleFlight,
    notice::{Notice, NoticeBoard},
    roster::Roster,
    scanner::{CaptureConfig, Decoder, ScanReport, ScanWidget},
    session::Session,
};
use std::time::Duration;
use tracing::{error, warn};

pub struct MainScreen {
    session: Session,
    roster: Roster,
    loading: bool,
    roster_flight: SingleFlight,
    notices: NoticeBoard,
    widget: ScanWidget,
}

impl MainScreen {
    /// A fresh screen starts loading with an empty roster.
    #[must_use]
    pub fn new(session: Session, notice_ttl: Duration, capture: CaptureConfig) -> Self {
        Self {
            session,
            roster: Roster::default(),
            loading: true,
            roster_flight: SingleFlight::new(),
            notices: NoticeBoard::new(notice_ttl),
            widget: ScanWidget::new(capture),
        }
    }

    /// The single roster fetch for this screen.
    ///
    /// On failure the roster stays empty and an error notice is shown; the
    /// screen stays usable.
    pub async fn load_roster<D: Directory>(&mut self, directory: &D) {
        if !self.loading {
            return;
        }

        match Roster::load(directory, &self.roster_flight).await {
            Ok(roster) => self.roster = roster,
            Err(e) => {
                error!("Error loading students: {e}");
                self.notices.error(format!("Error loading students: {e}"));
            }
        }
        self.loading = false;
    }

    /// Capture one badge and record it.
    ///
    /// Returns `None` when nothing was recorded or attempted: the roster is
    /// still loading, the capture was cancelled, or the decoder failed (shown
    /// as a notice).
    pub async fn scan<D, C>(&mut self, directory: &D, movement: Movement, decoder: &mut C) -> Option<RecordOutcome>
    where
        D: Directory,
        C: Decoder,
    {
        if self.loading {
            warn!("scan requested while the roster is loading");
            return None;
        }

        let report = self.widget.capture(decoder).await;
        match report {
            ScanReport::Decoded(payload) => Some(self.handle_decoded(directory, movement, &payload).await),
            ScanReport::Cancelled => None,
            ScanReport::Failed(e) => {
                self.notices.error(e.to_string());
                None
            }
        }
    }

    pub async fn handle_decoded<D: Directory>(&mut self, directory: &D, movement: Movement, payload: &str) -> RecordOutcome {
        let outcome = attendance::record_scan(
            directory,
            &self.roster,
            &self.session.classroom_id,
            movement,
            payload,
        )
        .await;
        outcome.show_on(&mut self.notices);
        outcome
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.notices.current()
    }
}
