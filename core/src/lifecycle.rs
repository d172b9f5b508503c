//! Background lifecycle for embedding the overlay server in a host process.
//!
//! The host owns an [`OverlayService`] and decides when it starts and stops.
//! The server runs on its own OS thread with a private tokio runtime, so the
//! host's main loop is never blocked and the host does not need a runtime.

use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;

use anyhow::Context;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::overlay::OverlayServer;

/// A running overlay server.
pub struct OverlayService {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<anyhow::Result<()>>>,
}

impl OverlayService {
    /// Bind the configured address and start serving in the background.
    ///
    /// Binding happens before this returns, so an occupied port is reported
    /// to the caller rather than lost on the worker thread.
    pub fn start(config: &Config) -> anyhow::Result<Self> {
        let server = OverlayServer::new(config.clone())?;

        let bind = format!("{}:{}", config.server.bind_address(), config.server.port);
        let listener =
            TcpListener::bind(&bind).with_context(|| format!("Failed to bind {}", bind))?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let (tx, rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("overlay-server".to_string())
            .spawn(move || -> anyhow::Result<()> {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .thread_name("overlay-worker")
                    .build()?;

                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(listener)?;
                    server
                        .serve(listener, async move {
                            // A dropped sender means the owner went away.
                            let _ = rx.await;
                        })
                        .await
                })
            })?;

        tracing::info!("Overlay service started on http://{}", addr);

        Ok(Self {
            addr,
            shutdown: Some(tx),
            thread: Some(thread),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shut down gracefully and wait for the server thread to exit.
    pub fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        let result = match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| anyhow::anyhow!("Overlay server thread panicked"))?,
            None => Ok(()),
        };

        tracing::info!("Overlay service on {} stopped", self.addr);
        result
    }
}

impl Drop for OverlayService {
    fn drop(&mut self) {
        // Signal only; joining here could stall the host's unload path.
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Callbacks a host application fires around loading and unloading us.
pub trait HostLifecycle {
    fn on_load(&mut self) -> anyhow::Result<()>;
    fn on_unload(&mut self) -> anyhow::Result<()>;
}

/// Adapter that maps host load/unload callbacks onto an [`OverlayService`].
pub struct ServiceHost {
    config: Config,
    service: Option<OverlayService>,
}

impl ServiceHost {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            service: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.service.is_some()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.service.as_ref().map(OverlayService::local_addr)
    }
}

impl HostLifecycle for ServiceHost {
    fn on_load(&mut self) -> anyhow::Result<()> {
        if self.service.is_none() {
            self.service = Some(OverlayService::start(&self.config)?);
        }
        Ok(())
    }

    fn on_unload(&mut self) -> anyhow::Result<()> {
        match self.service.take() {
            Some(service) => service.stop(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_config() -> Config {
        let mut config = Config::default();
        config.server.port = 0;
        config
    }

    #[test]
    fn start_returns_immediately_and_stop_joins() {
        let service = OverlayService::start(&ephemeral_config()).unwrap();
        let addr = service.local_addr();
        assert_ne!(addr.port(), 0);

        // The listener is live while the service runs.
        std::net::TcpStream::connect(addr).unwrap();

        service.stop().unwrap();
    }

    #[test]
    fn occupied_port_is_reported_by_start() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = Config::default();
        config.server.port = taken.local_addr().unwrap().port();

        assert!(OverlayService::start(&config).is_err());
    }

    #[test]
    fn host_adapter_load_is_idempotent() {
        let mut host = ServiceHost::new(ephemeral_config());
        assert!(!host.is_running());

        host.on_load().unwrap();
        let addr = host.local_addr().unwrap();
        host.on_load().unwrap();
        assert_eq!(host.local_addr(), Some(addr));

        host.on_unload().unwrap();
        assert!(!host.is_running());
        host.on_unload().unwrap();
    }
}
