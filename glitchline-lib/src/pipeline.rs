use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::config::Settings;
use crate::corruption;
use crate::protocol::{self, Reply};

/// Sanity cap on a delayed send's sleep, independent of whatever
/// `delayLenUpper` is configured to. Keeps a misconfigured harness from
/// holding a datagram forever.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Applies drop / bit-flip / burst / delay to outbound datagrams and hands
/// them to the socket, either immediately or via a detached timer task.
pub struct Pipeline {
    socket: Arc<UdpSocket>,
}

impl Pipeline {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }

    /// Runs one reply through the pipeline. Exempt replies (`SET-OK`,
    /// `VALUE`) bypass every transform; everything else is subject to the
    /// full drop/flip/burst/delay sequence described in the spec.
    pub async fn emit(&self, reply: Reply, settings: &Settings) {
        let Reply { to, payload } = reply;
        let Ok(dest) = to.parse::<SocketAddr>() else {
            warn!(addr = %to, "dropping reply to unparsable address");
            return;
        };

        if protocol::is_exempt(&payload) {
            self.send_now(dest, payload).await;
            return;
        }

        let mut rng = rand::thread_rng();

        if rng.gen_bool(settings.drop) {
            return;
        }

        let payload = corruption::bit_flip(&payload, settings.flip, &mut rng);

        let payload = if rng.gen_bool(settings.burst) {
            let len = pick_range(settings.burst_len_lower, settings.burst_len_upper, &mut rng);
            corruption::burst(&payload, len, &mut rng)
        } else {
            payload
        };

        let sleep_for = rng.gen_bool(settings.delay).then(|| {
            let secs = pick_range(settings.delay_len_lower, settings.delay_len_upper, &mut rng);
            Duration::from_secs(secs).min(MAX_DELAY)
        });
        // `ThreadRng` is `!Send`; it must not be alive across the `.await`
        // points below, or this future (and the `serve` loop that awaits
        // it every iteration) becomes `!Send` and can't be spawned.
        drop(rng);

        match sleep_for {
            Some(sleep_for) => {
                let socket = self.socket.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(sleep_for).await;
                    write_and_log(&socket, dest, &payload).await;
                });
            }
            None => self.send_now(dest, payload).await,
        }
    }

    async fn send_now(&self, dest: SocketAddr, payload: Vec<u8>) {
        write_and_log(&self.socket, dest, &payload).await;
    }
}

async fn write_and_log(socket: &UdpSocket, dest: SocketAddr, payload: &[u8]) {
    match socket.send_to(payload, dest).await {
        Ok(_) => info!(addr = %dest, payload = %String::from_utf8_lossy(payload), "TO"),
        Err(error) => warn!(addr = %dest, %error, "failed to send reply"),
    }
}

/// Picks a value in `[lower, upper)`, or exactly `lower` when the bounds
/// are equal (burst/delay length selection, per the spec).
fn pick_range<R: Rng + ?Sized>(lower: u64, upper: u64, rng: &mut R) -> u64 {
    if upper > lower {
        lower + rng.gen_range(0..(upper - lower))
    } else {
        lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_range_returns_lower_bound_when_equal() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_range(5, 5, &mut rng), 5);
    }

    #[test]
    fn pick_range_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let v = pick_range(3, 9, &mut rng);
            assert!((3..9).contains(&v));
        }
    }
}
