//! Session refresh call
//!
//! Performs the one privileged request that exchanges an expired session
//! for a renewed one: `POST /auth/refresh-token`. The refresh token rides
//! in an HTTP-only cookie, so the reqwest client must be built with a
//! cookie store; there is no token material to send explicitly.
//!
//! This function never retries and never loops — deciding whether a
//! refresh should run at all belongs to the coordinator in `api-client`.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::identity::{ApiEnvelope, UserProfile};

/// Path of the refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// Exchange the current (expired) session for a renewed one.
///
/// On success returns the renewed user profile from the response envelope.
/// Failures are typed: transport problems map to `Error::Http`, non-2xx
/// statuses to `Error::Rejected`, and a 2xx body that lacks the success
/// flag or the user payload to `Error::Malformed`.
pub async fn refresh_session(client: &reqwest::Client, base_url: &str) -> Result<UserProfile> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH);
    debug!(%url, "refreshing session");

    let response = client
        .post(&url)
        .send()
        .await
        .map_err(|e| Error::Http(format!("refresh request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Http(format!("reading refresh response failed: {e}")))?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "refresh rejected");
        return Err(Error::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    parse_refresh_body(&body)
}

/// Interpret a 2xx refresh response body.
///
/// The backend may answer 200 with `success: false` (e.g. expired refresh
/// token); that is a malformed-success from the client's point of view and
/// must not be mistaken for a renewed session.
pub fn parse_refresh_body(body: &str) -> Result<UserProfile> {
    let envelope: ApiEnvelope<UserProfile> = serde_json::from_str(body)
        .map_err(|e| Error::Malformed(format!("invalid refresh envelope: {e}")))?;

    if !envelope.success {
        return Err(Error::Malformed(format!(
            "refresh response without success flag: {}",
            envelope.message
        )));
    }

    envelope
        .data
        .ok_or_else(|| Error::Malformed("refresh succeeded but no user payload".into()))
}
