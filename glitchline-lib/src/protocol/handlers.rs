use super::reply::{self, Reply};
use super::request::{ParseError, Request};
use crate::config::Settings;
use crate::registry::Registry;

/// Parses and dispatches one request line, mutating `registry`/`settings`
/// as needed, and returns the reply datagram(s) to hand to the
/// unreliability pipeline (zero, one, or — for `SEND` — two).
///
/// `BAD-RQST-HDR` is the one reply that never requires prior registration,
/// matching the original's unconditional bad-header handler.
pub fn dispatch(line: &str, caller: &str, registry: &mut Registry, settings: &mut Settings) -> Vec<Reply> {
    match super::request::parse(line) {
        Err(ParseError::BadHeader) => vec![Reply::new(caller, reply::BAD_RQST_HDR)],
        Err(ParseError::BadBody) => {
            // A malformed body from an unregistered caller is still silence:
            // the handler that would have reported it never runs.
            if line.starts_with("HELLO-FROM") {
                vec![Reply::new(caller, reply::BAD_RQST_BODY)]
            } else if registry.get_user(caller).is_some() {
                vec![Reply::new(caller, reply::BAD_RQST_BODY)]
            } else {
                vec![]
            }
        }
        Ok(Request::HelloFrom { name }) => handle_hello_from(registry, caller, &name),
        Ok(other) => {
            let Some(caller_name) = registry.get_user(caller) else {
                return vec![];
            };
            match other {
                Request::Send { dest, text } => handle_send(registry, caller, &caller_name, &dest, &text),
                Request::List => handle_list(caller, &caller_name),
                Request::Get { key } => handle_get(settings, caller, &key),
                Request::SetScalar { key, value } => handle_set_scalar(settings, caller, &key, value),
                Request::SetRange { key, lower, upper } => {
                    handle_set_range(settings, caller, &key, lower, upper)
                }
                Request::Reset => handle_reset(settings, caller),
                Request::HelloFrom { .. } => unreachable!("handled above"),
            }
        }
    }
}

fn handle_hello_from(registry: &mut Registry, caller: &str, name: &str) -> Vec<Reply> {
    if registry.is_full() {
        return vec![Reply::new(caller, reply::BUSY)];
    }
    if registry.is_known(name) {
        return if registry.get_address(name).as_deref() == Some(caller) {
            vec![Reply::new(caller, reply::BAD_RQST_HDR)]
        } else {
            vec![Reply::new(caller, reply::IN_USE)]
        };
    }
    registry.add(caller, name);
    vec![Reply::new(caller, format!("HELLO {name}\n"))]
}

fn handle_send(registry: &Registry, caller: &str, caller_name: &str, dest: &str, text: &str) -> Vec<Reply> {
    let Some(dest_addr) = registry.get_address(dest) else {
        return vec![Reply::new(caller, reply::BAD_DEST_USER)];
    };
    vec![
        Reply::new(dest_addr, format!("DELIVERY {caller_name} {text}\n")),
        Reply::new(caller, reply::SEND_OK),
    ]
}

fn handle_list(caller: &str, caller_name: &str) -> Vec<Reply> {
    vec![Reply::new(caller, format!("LIST-OK {caller_name}\n"))]
}

fn handle_get(settings: &Settings, caller: &str, key: &str) -> Vec<Reply> {
    match settings.get_formatted(key) {
        Some(value) => vec![Reply::new(caller, format!("VALUE {key} {value}\n"))],
        None => vec![Reply::new(caller, reply::BAD_RQST_BODY)],
    }
}

fn handle_set_scalar(settings: &mut Settings, caller: &str, key: &str, value: f64) -> Vec<Reply> {
    if settings.set_scalar(key, value) {
        vec![Reply::new(caller, reply::SET_OK)]
    } else {
        vec![Reply::new(caller, reply::BAD_RQST_BODY)]
    }
}

fn handle_set_range(settings: &mut Settings, caller: &str, key: &str, lower: u64, upper: u64) -> Vec<Reply> {
    if settings.set_range(key, lower, upper) {
        vec![Reply::new(caller, reply::SET_OK)]
    } else {
        vec![Reply::new(caller, reply::BAD_RQST_BODY)]
    }
}

fn handle_reset(settings: &mut Settings, caller: &str) -> Vec<Reply> {
    settings.reset();
    vec![Reply::new(caller, reply::SET_OK)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;

    fn settings() -> Settings {
        Settings::from_cli(&Cli {
            address: "127.0.0.1".into(),
            port: 5382,
            drop: 0.0,
            flip: 0.0,
            burst: 0.0,
            delay: 0.0,
            burst_len_lower: 0,
            burst_len_upper: 0,
            delay_len_lower: 0,
            delay_len_upper: 0,
            max_clients: 10,
        })
    }

    #[test]
    fn hello_from_registers_a_new_client() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        let replies = dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", "HELLO alice\n")]);
    }

    #[test]
    fn repeat_hello_from_same_address_is_bad_header() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        let replies = dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", reply::BAD_RQST_HDR)]);
    }

    #[test]
    fn hello_from_different_address_is_in_use() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        let replies = dispatch("HELLO-FROM alice", "B", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("B", reply::IN_USE)]);
    }

    #[test]
    fn hello_from_full_registry_is_busy() {
        let mut registry = Registry::new(1);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        let replies = dispatch("HELLO-FROM bob", "B", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("B", reply::BUSY)]);
    }

    #[test]
    fn send_delivers_to_recipient_and_acks_sender() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        dispatch("HELLO-FROM bob", "B", &mut registry, &mut s);
        let replies = dispatch("SEND bob hi there", "A", &mut registry, &mut s);
        assert_eq!(
            replies,
            vec![Reply::new("B", "DELIVERY alice hi there\n"), Reply::new("A", reply::SEND_OK)]
        );
    }

    #[test]
    fn send_to_unknown_destination_is_bad_dest_user() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        let replies = dispatch("SEND nobody hi", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", reply::BAD_DEST_USER)]);
    }

    #[test]
    fn unregistered_caller_gets_silence_except_for_bad_header() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        assert!(dispatch("LIST", "A", &mut registry, &mut s).is_empty());
        assert!(dispatch("RESET", "A", &mut registry, &mut s).is_empty());
        assert!(dispatch("SEND bob hi", "A", &mut registry, &mut s).is_empty());
        assert_eq!(
            dispatch("PING", "A", &mut registry, &mut s),
            vec![Reply::new("A", reply::BAD_RQST_HDR)]
        );
    }

    #[test]
    fn list_returns_only_callers_own_name() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        dispatch("HELLO-FROM bob", "B", &mut registry, &mut s);
        let replies = dispatch("LIST", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", "LIST-OK alice\n")]);
    }

    #[test]
    fn get_and_set_round_trip_clamped_value() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        let replies = dispatch("SET DROP 5.0", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", reply::SET_OK)]);
        let replies = dispatch("GET DROP", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", "VALUE DROP 1.000000\n")]);
    }

    #[test]
    fn reset_is_idempotent_and_requires_registration() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        dispatch("SET DROP 0.9", "A", &mut registry, &mut s);
        dispatch("RESET", "A", &mut registry, &mut s);
        let after_one = s.clone();
        dispatch("RESET", "A", &mut registry, &mut s);
        assert_eq!(after_one, s);
        let replies = dispatch("GET BURST-LEN", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", "VALUE BURST-LEN 3 3\n")]);
    }

    #[test]
    fn bad_body_from_registered_caller_is_reported() {
        let mut registry = Registry::new(10);
        let mut s = settings();
        dispatch("HELLO-FROM alice", "A", &mut registry, &mut s);
        let replies = dispatch("GET not_a_key!", "A", &mut registry, &mut s);
        assert_eq!(replies, vec![Reply::new("A", reply::BAD_RQST_BODY)]);
    }
}
