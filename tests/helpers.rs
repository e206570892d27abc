// Shared test helpers for integration tests.

use std::time::Duration;

use httptest::Server;
use reachable::{ClientConfig, ReachabilityOptions};

/// Options for tests against a local server: no jitter, short timeouts.
pub fn quiet_options() -> ReachabilityOptions {
    reachable::initialization::init_crypto_provider();
    ReachabilityOptions {
        sleep_between_requests: false,
        client_config: ClientConfig {
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(5),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Absolute URL of `path` on the mock server.
pub fn url(server: &Server, path: &str) -> String {
    format!("http://{}{}", server.addr(), path)
}

/// A local port with nothing listening on it.
#[allow(dead_code)] // Used by some test files only
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);
    port
}
