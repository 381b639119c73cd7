//! Background thread that owns the HTTP agent for its lifetime.
//!
//! The agent, the session token, and every network round trip live on this
//! thread; the UI thread only ever touches channels. Requests arrive over a
//! crossbeam channel and results go back as `AppEvent::Cloud`. The loop
//! exits when the request sender is dropped.
//!
//! Every error path degrades to `CloudUpdate::Failed` with a short notice.
//! The worker never panics the app and never blocks the event loop; a slow
//! or dead endpoint costs nothing but a delayed notice.

use std::time::Duration;

use crossbeam_channel::Receiver;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::CloudConfig;
use crate::event::AppEvent;

use super::types::{CloudRequest, CloudUpdate, RemoteMoodEntry};

/// Per-request network timeout. Generous because nothing waits on it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Entry point for the background thread that owns the HTTP agent.
///
/// Builds the agent, then loops over incoming `CloudRequest` messages until
/// the channel closes (sender dropped). Results are sent back via
/// `event_tx` as `AppEvent::Cloud`.
pub fn cloud_worker_loop(
    config: CloudConfig,
    rx: Receiver<CloudRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    let agent = ureq::builder().timeout(REQUEST_TIMEOUT).build();
    // Bearer token for the current login; None while logged out.
    let mut token: Option<String> = None;

    for request in rx {
        let update = handle_request(&agent, &config, &mut token, request);
        if event_tx.send(AppEvent::Cloud(update)).is_err() {
            break;
        }
    }
}

/// Dispatches one request and maps any error into a status-bar notice.
fn handle_request(
    agent: &ureq::Agent,
    config: &CloudConfig,
    token: &mut Option<String>,
    request: CloudRequest,
) -> CloudUpdate {
    let result = match request {
        CloudRequest::CreateAccount { email, password } => {
            create_account(agent, config, token, &email, &password)
        }
        CloudRequest::Login { email, password } => login(agent, config, token, &email, &password),
        CloudRequest::Logout => {
            *token = None;
            Ok(CloudUpdate::LoggedOut)
        }
        CloudRequest::PushRecord(record) => push_record(agent, config, token, &record),
        CloudRequest::FetchEntries => fetch_entries(agent, config, token),
        CloudRequest::UpdateStreak => update_streak(agent, config, token),
    };

    result.unwrap_or_else(|notice| {
        tracing::warn!("cloud request failed: {notice}");
        CloudUpdate::Failed(notice)
    })
}

/// POSTs the credentials to `/auth/register`, then logs in.
///
/// A rejected registration (typically: the account already exists) is not
/// fatal; the login below settles whether the credentials work. This makes
/// `auto_register` startups idempotent.
fn create_account(
    agent: &ureq::Agent,
    config: &CloudConfig,
    token: &mut Option<String>,
    email: &str,
    password: &str,
) -> Result<CloudUpdate, String> {
    match agent
        .post(&format!("{}/auth/register", config.base_url))
        .send_json(serde_json::json!({ "email": email, "password": password }))
    {
        Ok(_) => {}
        Err(ureq::Error::Status(code, _)) => {
            tracing::info!("registration returned {code}, trying login");
        }
        Err(e) => return Err(format!("account creation failed: {e}")),
    }
    login(agent, config, token, email, password)
}

/// POSTs the credentials to `/auth/login` and stores the returned token.
fn login(
    agent: &ureq::Agent,
    config: &CloudConfig,
    token: &mut Option<String>,
    email: &str,
    password: &str,
) -> Result<CloudUpdate, String> {
    let response = agent
        .post(&format!("{}/auth/login", config.base_url))
        .send_json(serde_json::json!({ "email": email, "password": password }))
        .map_err(|e| format!("login failed: {e}"))?;

    let body: serde_json::Value = response
        .into_json()
        .map_err(|e| format!("login response unreadable: {e}"))?;
    let session = body
        .get("token")
        .and_then(|t| t.as_str())
        .ok_or_else(|| "login response had no token".to_owned())?;

    *token = Some(session.to_owned());
    Ok(CloudUpdate::LoggedIn { email: email.to_owned() })
}

/// Returns the stored bearer token or a "not logged in" notice.
fn require_token(token: &Option<String>) -> Result<&str, String> {
    token.as_deref().ok_or_else(|| "not logged in".to_owned())
}

/// POSTs one completed session to `/entries`.
fn push_record(
    agent: &ureq::Agent,
    config: &CloudConfig,
    token: &Option<String>,
    record: &ragespace_core::SessionRecord,
) -> Result<CloudUpdate, String> {
    let bearer = require_token(token)?;
    agent
        .post(&format!("{}/entries", config.base_url))
        .set("Authorization", &format!("Bearer {bearer}"))
        .send_json(
            serde_json::to_value(record).map_err(|e| format!("record unserializable: {e}"))?,
        )
        .map_err(|e| format!("sync failed: {e}"))?;
    Ok(CloudUpdate::RecordPushed)
}

/// GETs the account's mood entries from `/entries`.
fn fetch_entries(
    agent: &ureq::Agent,
    config: &CloudConfig,
    token: &Option<String>,
) -> Result<CloudUpdate, String> {
    let bearer = require_token(token)?;
    let entries: Vec<RemoteMoodEntry> = agent
        .get(&format!("{}/entries", config.base_url))
        .set("Authorization", &format!("Bearer {bearer}"))
        .call()
        .map_err(|e| format!("fetch failed: {e}"))?
        .into_json()
        .map_err(|e| format!("entries unreadable: {e}"))?;
    Ok(CloudUpdate::Entries(entries))
}

/// POSTs to `/streak` and returns the new streak length.
fn update_streak(
    agent: &ureq::Agent,
    config: &CloudConfig,
    token: &Option<String>,
) -> Result<CloudUpdate, String> {
    let bearer = require_token(token)?;
    let body: serde_json::Value = agent
        .post(&format!("{}/streak", config.base_url))
        .set("Authorization", &format!("Bearer {bearer}"))
        .send_json(serde_json::json!({}))
        .map_err(|e| format!("streak update failed: {e}"))?
        .into_json()
        .map_err(|e| format!("streak response unreadable: {e}"))?;
    let streak = body.get("streak").and_then(|s| s.as_u64()).unwrap_or(0) as u32;
    Ok(CloudUpdate::StreakUpdated(streak))
}
