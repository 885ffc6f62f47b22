//! Serving with a bounded graceful shutdown

use std::{
    future::{Future, IntoFuture},
    io,
    sync::Arc,
    time::Duration,
};

use axum::Router;
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing::{info, warn};

/// Serve `app` until `shutdown` resolves, then drain in-flight requests
///
/// With `drain_timeout` set, connections still open once it elapses are
/// dropped and the call returns. `None` waits for every connection.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    drain_timeout: Option<Duration>,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let notifier = Arc::clone(&draining);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            notifier.notify_one();
        })
        .into_future();

    let deadline = async move {
        draining.notified().await;
        match drain_timeout {
            Some(timeout) => {
                info!("Waiting up to {:?} for connections to close...", timeout);
                tokio::time::sleep(timeout).await;
            },
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => result,
        () = deadline => {
            warn!("Shutdown timeout elapsed, dropping remaining connections");
            Ok(())
        }
    }
}

/// Wait for SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpStream,
        sync::oneshot,
        time::timeout,
    };

    use super::*;

    /// Router whose `/stuck` handler never finishes
    fn stuck_router(entered: Arc<Notify>) -> Router {
        Router::new()
            .route(
                "/stuck",
                get(move || {
                    let entered = Arc::clone(&entered);
                    async move {
                        entered.notify_one();
                        std::future::pending::<&'static str>().await
                    }
                }),
            )
            .route("/ok", get(|| async { "ok" }))
    }

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        (listener, addr)
    }

    async fn send_get(addr: &str, path: &str) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        stream
    }

    #[tokio::test]
    async fn stuck_request_is_dropped_after_drain_timeout() {
        let (listener, addr) = bind().await;
        let entered = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            stuck_router(Arc::clone(&entered)),
            async move {
                let _ = stop_rx.await;
            },
            Some(Duration::from_millis(100)),
        ));

        let _client = send_get(&addr, "/stuck").await;
        entered.notified().await;
        stop_tx.send(()).unwrap();

        let result = timeout(Duration::from_secs(5), server)
            .await
            .expect("server kept waiting past its drain timeout")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn stuck_request_blocks_shutdown_without_timeout() {
        let (listener, addr) = bind().await;
        let entered = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            stuck_router(Arc::clone(&entered)),
            async move {
                let _ = stop_rx.await;
            },
            None,
        ));

        let _client = send_get(&addr, "/stuck").await;
        entered.notified().await;
        stop_tx.send(()).unwrap();

        assert!(timeout(Duration::from_millis(300), server).await.is_err());
    }

    #[tokio::test]
    async fn idle_server_stops_promptly() {
        let (listener, addr) = bind().await;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            stuck_router(Arc::new(Notify::new())),
            async move {
                let _ = stop_rx.await;
            },
            Some(Duration::from_secs(30)),
        ));

        let mut client = send_get(&addr, "/ok").await;
        let mut buf = [0_u8; 12];
        client.read_exact(&mut buf).await.unwrap();
        assert!(buf.starts_with(b"HTTP/1.1 200"));
        drop(client);

        stop_tx.send(()).unwrap();

        let result = timeout(Duration::from_secs(5), server)
            .await
            .expect("idle server should stop well before the drain timeout")
            .unwrap();
        assert!(result.is_ok());
    }
}
