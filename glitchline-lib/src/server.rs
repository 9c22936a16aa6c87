use std::sync::Arc;

use socket2::{Domain, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::config::{Cli, Settings};
use crate::error::{RelayError, Result};
use crate::pipeline::Pipeline;
use crate::protocol;
use crate::registry::Registry;

/// Binds the relay's UDP socket per `cli` and runs the receive loop until
/// the socket itself fails.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_cli(&cli);
    let socket = bind(&cli.address, cli.port)?;
    serve(socket, settings).await
}

/// Runs the receive loop against an already-bound socket. Split out from
/// [`run`] so tests can bind an ephemeral port themselves and read back
/// `local_addr()` before the loop takes ownership of the socket.
///
/// Every reply leaves through the unreliability [`Pipeline`]; the loop's
/// own bookkeeping (registration, settings, framing) is always reliable.
pub async fn serve(socket: UdpSocket, mut settings: Settings) -> Result<()> {
    let mut registry = Registry::new(settings.max_clients);
    let socket = Arc::new(socket);
    let pipeline = Pipeline::new(socket.clone());

    let local_addr = socket.local_addr().ok();
    info!(?local_addr, max_clients = settings.max_clients, "relay listening");

    let mut buf = vec![0u8; protocol::MAX_DATAGRAM];
    loop {
        registry.clean();

        let (n, addr) = socket.recv_from(&mut buf).await?;
        let datagram = &buf[..n];

        let Some(line) = protocol::frame(datagram) else {
            warn!(%addr, "dropping unterminated datagram");
            continue;
        };
        info!(%addr, %line, "FROM");

        let caller = addr.to_string();
        let replies = protocol::dispatch(line, &caller, &mut registry, &mut settings);
        for reply in replies {
            pipeline.emit(reply, &settings).await;
        }
    }
}

/// Binds a UDP socket with `SO_REUSEADDR` set, since `tokio::net::UdpSocket`
/// has no builtin way to request it before binding.
pub fn bind(address: &str, port: u16) -> Result<UdpSocket> {
    let addr = format!("{address}:{port}")
        .parse()
        .map_err(|e| RelayError::Config(format!("invalid listen address {address}:{port}: {e}")))?;

    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, None)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;

    Ok(UdpSocket::from_std(socket.into())?)
}
