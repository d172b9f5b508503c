//! Shared utilities for relay integration tests.

use std::net::SocketAddr;

use axum::Router;
use nowplaying_core::config::Config;
use nowplaying_core::overlay::OverlayServer;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its address.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start an overlay server with the given config on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_overlay(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = OverlayServer::new(config).unwrap();
    tokio::spawn(async move {
        server
            .serve(listener, std::future::pending())
            .await
            .unwrap();
    });
    addr
}

/// Relay address for `target` on an overlay server at `relay`.
#[allow(dead_code)]
pub fn relay_for(relay: SocketAddr, target: &str) -> String {
    nowplaying_core::overlay::relay_url(&format!("http://{}", relay), target)
}
