//! Client Connection
//!
//! Owns the TCP socket to the server.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::protocol::{read_crlf_line, read_exact_bytes, ReplyReader};

/// Buffered halves of one connected socket
struct Stream {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,
}

/// A connected socket to one server
///
/// Connected on construction; there is no lazy connect. After `close`
/// every send and receive fails with `NotConnected`.
pub struct Connection {
    stream: Option<Stream>,

    host: String,
    port: u16,

    /// Peer address for logging
    peer_addr: SocketAddr,
}

impl Connection {
    /// Connect to `host:port` with default socket options
    pub fn open(host: impl Into<String>, port: u16) -> Result<Self> {
        let config = Config::builder().host(host).port(port).build();
        Self::open_with(&config)
    }

    /// Connect using the endpoint and socket options from `config`
    pub fn open_with(config: &Config) -> Result<Self> {
        config.validate()?;
        let addr = config.addr();

        // Socket setup failures count as failing to connect
        let (stream, peer_addr) = connect(config)
            .and_then(|stream| configure(stream, config))
            .map_err(|source| ClientError::Connection {
                addr: addr.clone(),
                source,
            })?;

        tracing::debug!("Connected to {} ({})", addr, peer_addr);

        Ok(Self {
            stream: Some(stream),
            host: config.host.clone(),
            port: config.port,
            peer_addr,
        })
    }

    /// Write all bytes and flush them to the socket
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream_mut()?;
        stream.writer.write_all(bytes)?;
        stream.writer.flush()?;
        Ok(())
    }

    /// Read one line, returning it without the trailing `\r\n`
    pub fn receive_line(&mut self) -> Result<Vec<u8>> {
        read_crlf_line(&mut self.stream_mut()?.reader)
    }

    /// Read exactly `n` bytes
    pub fn receive_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        read_exact_bytes(&mut self.stream_mut()?.reader, n)
    }

    /// Release the socket. Calling it again is a no-op.
    pub fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.writer.flush();
            if let Err(e) = stream.reader.get_ref().shutdown(Shutdown::Both) {
                if e.kind() != io::ErrorKind::NotConnected {
                    tracing::debug!("Shutdown of {} failed: {}", self.peer_addr, e);
                }
            }
            tracing::debug!("Closed connection to {}", self.peer_addr);
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Host as given at construction
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port as given at construction
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolved address of the server
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    fn stream_mut(&mut self) -> Result<&mut Stream> {
        self.stream.as_mut().ok_or_else(|| {
            ClientError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection is closed",
            ))
        })
    }
}

impl ReplyReader for Connection {
    fn next_line(&mut self) -> Result<Vec<u8>> {
        self.receive_line()
    }

    fn next_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        self.receive_exact(n)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Apply socket options and split the stream into buffered halves
fn configure(stream: TcpStream, config: &Config) -> io::Result<(Stream, SocketAddr)> {
    // Disable Nagle's algorithm for low latency
    stream.set_nodelay(config.nodelay)?;
    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    let peer_addr = stream.peer_addr()?;

    // Clone stream for separate read/write handles
    let read_stream = stream.try_clone()?;
    let write_stream = stream;

    let stream = Stream {
        reader: BufReader::new(read_stream),
        writer: BufWriter::new(write_stream),
    };
    Ok((stream, peer_addr))
}

/// Try every resolved address in order and keep the last error
fn connect(config: &Config) -> io::Result<TcpStream> {
    let addrs = (config.host.as_str(), config.port).to_socket_addrs()?;

    let mut last_err = None;
    for addr in addrs {
        let attempt = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))
        } else {
            TcpStream::connect(addr)
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::trace!("Connect attempt to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{} resolved to no addresses", config.addr()),
        )
    }))
}
