// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept loop.
///
/// Each accepted socket is served on its own task. Once `shutdown` is
/// notified the listener is closed and connections in flight get up to the
/// per-connection timeout to finish before this returns.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }

    drop(listener);
    logger::log_server_stop(active_connections.load(Ordering::SeqCst));

    let performance = &state.config.performance;
    let grace = Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));
    let remaining = drain_connections(&active_connections, grace).await;
    if remaining > 0 {
        logger::log_warning(&format!(
            "Shutdown grace period of {}s elapsed, abandoning {remaining} connection(s)",
            grace.as_secs()
        ));
    }
    Ok(())
}

/// Wait until no connection is active or `grace` elapses.
///
/// Returns the number of connections still active at the end.
async fn drain_connections(conn_counter: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let remaining = conn_counter.load(Ordering::SeqCst);
        if remaining == 0 {
            return 0;
        }
        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {
                return conn_counter.load(Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_serves_over_tcp_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hi").unwrap();

        let mut config = Config::default();
        config.listing.root = dir.path().to_string_lossy().into_owned();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config).unwrap());

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK"), "got: {raw}");
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(raw.ends_with(
            r#"[{"name":"a.txt","type":"file","sha1":"c22b5f9178342609428d6f51b2c5af4c0bde6a42"}]"#
        ));

        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_drain_waits_for_connections() {
        let counter = Arc::new(AtomicUsize::new(1));
        let finishing = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            finishing.fetch_sub(1, Ordering::SeqCst);
        });

        let remaining = drain_connections(&counter, Duration::from_secs(5)).await;
        assert_eq!(remaining, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let counter = AtomicUsize::new(2);
        let started = tokio::time::Instant::now();

        let remaining = drain_connections(&counter, Duration::from_millis(120)).await;
        assert_eq!(remaining, 2);
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_in_flight_connection_finishes_before_return() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hi").unwrap();

        let mut config = Config::default();
        config.listing.root = dir.path().to_string_lossy().into_owned();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config).unwrap());

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        // Accepted, but the request is only sent after shutdown begins
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.notify_one();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!server.is_finished());

        stream
            .write_all(b"GET /a.txt HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK"), "got: {raw}");
        assert!(raw.ends_with("hi"));

        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
