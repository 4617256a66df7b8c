//! Persistent-store connection lifecycle.
//!
//! The bootstrap lifecycle is the only component that opens or closes the
//! store. The trait seam exists so tests can observe connect/disconnect
//! ordering without a live endpoint.

use anyhow::{Context, Result};
use std::net::{Shutdown, TcpStream};
use tracing::info;

pub trait Store {
    fn connect(&mut self, name: &str, host: &str, port: u16) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;
}

/// Plain TCP connection to the store, opened once at bootstrap and held for
/// the process lifetime.
#[derive(Debug, Default)]
pub struct TcpStore {
    conn: Option<TcpStream>,
}

impl TcpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }
}

impl Store for TcpStore {
    fn connect(&mut self, name: &str, host: &str, port: u16) -> Result<()> {
        let stream = TcpStream::connect((host, port))
            .with_context(|| format!("failed to connect to store {name} at {host}:{port}"))?;
        info!("connected to store {name} at {host}:{port}");
        self.conn = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.shutdown(Shutdown::Both).ok();
            info!("store connection closed");
        }
        Ok(())
    }
}
