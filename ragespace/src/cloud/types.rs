//! Owned data types for the cloud worker thread.
//!
//! All types here are fully owned and `Send` so they can cross the channel
//! between the main UI thread and the worker that owns the HTTP agent.
//! The wire protocol behind these types is an implementation detail of the
//! worker; nothing outside `cloud/` depends on it.

use ragespace_core::SessionRecord;
use serde::Deserialize;

/// Commands sent from the main thread to the cloud worker thread.
///
/// Sent over a `crossbeam_channel::Sender<CloudRequest>` owned by the main
/// thread. The worker receives these and performs the corresponding remote
/// operation.
#[derive(Debug)]
pub enum CloudRequest {
    /// Create an account, then log in with the same credentials.
    CreateAccount { email: String, password: String },
    /// Log in and retain the session token inside the worker.
    Login { email: String, password: String },
    /// Forget the session token.
    Logout,
    /// Push one completed session to the remote mood log.
    PushRecord(SessionRecord),
    /// Fetch the remote mood entries for the logged-in account.
    FetchEntries,
    /// Bump the remote daily-use streak.
    UpdateStreak,
}

/// A mood entry as the remote service returns it.
///
/// Only the count is surfaced in the status bar today; the fields are kept
/// so the payload deserializes strictly and stays ready for a richer
/// cloud view.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct RemoteMoodEntry {
    pub stressor: String,
    pub emotion_before: u8,
    pub emotion_after: u8,
    pub recorded_at: i64,
}

/// Results sent from the cloud worker back to the main thread.
///
/// Carried inside `AppEvent::Cloud`. Every failure mode collapses into
/// `Failed(notice)`: the app shows the notice in the status bar and keeps
/// running local-only. Nothing here is allowed to block or abort the flow.
#[derive(Debug)]
pub enum CloudUpdate {
    /// Logged in; `email` identifies the account for the status bar.
    LoggedIn { email: String },
    /// The session token was dropped.
    LoggedOut,
    /// A session record was accepted by the remote.
    RecordPushed,
    /// Remote mood entries, newest last.
    Entries(Vec<RemoteMoodEntry>),
    /// The streak counter after the update.
    StreakUpdated(u32),
    /// Any error, already formatted for the status bar.
    Failed(String),
}
