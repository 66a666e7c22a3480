//! Scripted single-threaded servers for connection tests.

use crate::config::ConnectionConfig;
use std::io::Read;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Binds an ephemeral local port and runs `script` with the listener on a
/// background thread. Join the handle to surface assertion failures.
pub(crate) fn serve<F>(script: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(TcpListener) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || script(listener));
    (addr, handle)
}

/// Reads exactly `n` request bytes.
pub(crate) fn read_exactly(socket: &mut TcpStream, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    socket.read_exact(&mut buf).unwrap();
    buf
}

pub(crate) fn config_for(addr: SocketAddr) -> ConnectionConfig {
    ConnectionConfig::new(addr.ip().to_string(), addr.port())
}
