//! # Aula Kiosk (classroom attendance terminal)
//!
//! `aula-kiosk` records student check-ins and check-outs against a hosted Ninox
//! database. Staff log a terminal into a classroom ("aula"), then every scanned
//! badge code is resolved against the student roster and written as an
//! attendance event.
//!
//! ## Remote state
//!
//! All durable state lives in three Ninox tables (classrooms, students and the
//! attendance history) reached over REST with a static bearer key. Nothing is
//! cached across runs except the logged-in classroom.
//!
//! ## Authentication
//!
//! Classroom credentials are matched client-side against the full classroom
//! table. The classroom name is compared case-insensitively, the password
//! exactly (both trimmed). Unknown classrooms and wrong passwords produce the
//! same error so classroom names cannot be enumerated.
//!
//! ## Scanning
//!
//! Codes arrive through a [`scanner::Decoder`]. The default decoder reads the
//! console, which is how keyboard-wedge barcode and QR readers deliver text.

pub mod attendance;
pub mod auth;
pub mod cli;
pub mod directory;
pub mod flight;
pub mod kiosk;
pub mod notice;
pub mod roster;
pub mod scanner;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
