//! Header helpers for mock-server expectations.

/// Lower-case authorization header name as matched by mock servers.
pub const AUTHORIZATION: &str = "authorization";

/// `Authorization` header value for `token`.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefixes_token() {
        assert_eq!(bearer("abc"), "Bearer abc");
    }
}
