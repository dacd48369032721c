//! Route53 ID normalization.
//!
//! The API returns resource IDs as paths (`/hostedzone/Z123`, `/change/C456`);
//! everything outside the client works with the bare ID.

const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";
const CHANGE_PREFIX: &str = "/change/";

/// Strip a leading `/hostedzone/` from a zone ID.
pub fn clean_zone_id(id: &str) -> String {
    id.strip_prefix(HOSTED_ZONE_PREFIX).unwrap_or(id).to_string()
}

/// Strip a leading `/change/` from a change ID.
pub fn clean_change_id(id: &str) -> String {
    id.strip_prefix(CHANGE_PREFIX).unwrap_or(id).to_string()
}
