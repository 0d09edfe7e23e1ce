//! Caller identity derivation.

use super::quota::UNKNOWN_CLIENT;

/// Header carrying the proxy chain of client addresses.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Derive the quota key for a request.
///
/// Prefers the upstream-supplied source address, then the first address of
/// the `X-Forwarded-For` chain (header name matched case-insensitively), and
/// falls back to [`UNKNOWN_CLIENT`].
pub fn resolve_client_key<'a, I>(source_ip: Option<&str>, headers: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    if let Some(ip) = source_ip.map(str::trim).filter(|ip| !ip.is_empty()) {
        return ip.to_string();
    }

    headers
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(FORWARDED_FOR))
        .and_then(|(_, value)| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), ToOwned::to_owned)
}
