use serde::{Deserialize, Serialize};

/// Sentinel used when no usable identity or User-Agent is present.
pub const UNKNOWN: &str = "unknown";

/// One unique (client identity, UTC calendar date) occurrence.
///
/// Wire field names are fixed by the durable JSON format, hence the
/// `userAgent` rename. `ip` is whatever the identity resolver produced —
/// it is not validated as a real network address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub ip: String,
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Full ISO-8601 UTC timestamp of creation.
    pub time: String,
    /// Documents written by older deployments predate this field, so
    /// deserialization defaults it.
    #[serde(rename = "userAgent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    UNKNOWN.to_string()
}
