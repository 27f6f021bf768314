//! Client identity extraction and bucket key generation.

/// Shared bucket for requests whose origin cannot be attributed.
///
/// Missing or malformed address headers deliberately fail open into one
/// shared quota rather than rejecting the request.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the client identifier from proxy-supplied address headers.
///
/// Prefers the first address in the forwarded-for chain, then the direct
/// real-ip header, then [`UNKNOWN_CLIENT`].
pub fn client_identifier(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    if let Some(forwarded) = forwarded_for {
        let first = forwarded.split(',').next().unwrap_or_default().trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    match real_ip.map(str::trim) {
        Some(ip) if !ip.is_empty() => ip.to_string(),
        _ => UNKNOWN_CLIENT.to_string(),
    }
}

/// A key that uniquely identifies a rate limit bucket.
///
/// Buckets are per (client, concrete path): two strict paths hit by the same
/// client track independently even though they share the tier's numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// The client identifier the request was attributed to
    pub client: String,
    /// The exact request path, case-sensitive, without query string
    pub path: String,
}

impl BucketKey {
    /// Create a new bucket key.
    pub fn new(client: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.client, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let id = client_identifier(Some("203.0.113.7, 10.0.0.1, 10.0.0.2"), None);
        assert_eq!(id, "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_is_trimmed() {
        let id = client_identifier(Some("  203.0.113.7 ,10.0.0.1"), Some("10.9.9.9"));
        assert_eq!(id, "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        assert_eq!(client_identifier(None, Some("198.51.100.4")), "198.51.100.4");
    }

    #[test]
    fn test_empty_forwarded_for_falls_through() {
        assert_eq!(client_identifier(Some(""), Some("198.51.100.4")), "198.51.100.4");
        assert_eq!(client_identifier(Some(" , 10.0.0.1"), None), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_unattributed_client_is_unknown() {
        assert_eq!(client_identifier(None, None), UNKNOWN_CLIENT);
        assert_eq!(client_identifier(None, Some("  ")), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_bucket_key_display() {
        let key = BucketKey::new("1.2.3.4", "/api/links");
        assert_eq!(key.to_string(), "1.2.3.4:/api/links");
    }

    #[test]
    fn test_bucket_key_equality() {
        let key1 = BucketKey::new("1.2.3.4", "/api/links");
        let key2 = BucketKey::new("1.2.3.4", "/api/links");
        let key3 = BucketKey::new("1.2.3.4", "/api/profile/update");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }
}
