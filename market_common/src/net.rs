//! Shared networking constants and helpers used by server and client.

/// HTTP port of the web dashboard.
pub const WEB_PORT: u16 = 8080;
/// Host the web dashboard binds to by default (all interfaces).
pub const BIND_HOST: &str = "0.0.0.0";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Base URL of a dashboard server reachable at `host:port`.
pub fn base_url(host: &str, port: u16) -> String {
    format!("http://{}", addr(host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_addresses() {
        assert_eq!(addr(BIND_HOST, WEB_PORT), "0.0.0.0:8080");
        assert_eq!(base_url("localhost", 9000), "http://localhost:9000");
    }
}
