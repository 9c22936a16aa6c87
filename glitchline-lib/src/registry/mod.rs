use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a client may stay idle before the sweeper forgets it.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct ClientRecord {
    name: String,
    last_active: Instant,
}

/// Bidirectional name<->address binding, owned exclusively by the
/// single-threaded receive loop. Every public method preserves the
/// invariant that `addr_to_client` and `name_to_addr` agree in both
/// directions.
#[derive(Debug, Default)]
pub struct Registry {
    addr_to_client: HashMap<String, ClientRecord>,
    name_to_addr: HashMap<String, String>,
    max_clients: usize,
}

impl Registry {
    pub fn new(max_clients: usize) -> Self {
        Self { addr_to_client: HashMap::new(), name_to_addr: HashMap::new(), max_clients }
    }

    /// Binds `addr` to `name` and stamps the current time. The caller is
    /// responsible for checking `is_known`/`is_full` first.
    pub fn add(&mut self, addr: &str, name: &str) {
        self.addr_to_client
            .insert(addr.to_string(), ClientRecord { name: name.to_string(), last_active: Instant::now() });
        self.name_to_addr.insert(name.to_string(), addr.to_string());
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.name_to_addr.contains_key(name)
    }

    pub fn is_full(&self) -> bool {
        self.addr_to_client.len() >= self.max_clients
    }

    /// Returns the name bound to `addr`, if any, refreshing its timestamp
    /// as a side effect.
    pub fn get_user(&mut self, addr: &str) -> Option<String> {
        let record = self.addr_to_client.get_mut(addr)?;
        record.last_active = Instant::now();
        Some(record.name.clone())
    }

    /// Returns the address bound to `name`, if any. Does not touch.
    pub fn get_address(&self, name: &str) -> Option<String> {
        self.name_to_addr.get(name).cloned()
    }

    /// Comma-joined list of every known name, in unspecified order.
    pub fn names(&self) -> String {
        self.name_to_addr.keys().cloned().collect::<Vec<_>>().join(",")
    }

    /// Removes every record idle for longer than [`IDLE_TIMEOUT`], patching
    /// both directions atomically.
    pub fn clean(&mut self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .addr_to_client
            .iter()
            .filter(|(_, record)| now.duration_since(record.last_active) > IDLE_TIMEOUT)
            .map(|(addr, _)| addr.clone())
            .collect();
        for addr in expired {
            if let Some(record) = self.addr_to_client.remove(&addr) {
                self.name_to_addr.remove(&record.name);
            }
        }
    }
}
