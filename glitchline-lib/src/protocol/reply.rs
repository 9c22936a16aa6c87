/// The wire tokens that carry no variable data.
pub const BUSY: &str = "BUSY\n";
pub const SEND_OK: &str = "SEND-OK\n";
pub const BAD_DEST_USER: &str = "BAD-DEST-USER\n";
pub const BAD_RQST_HDR: &str = "BAD-RQST-HDR\n";
pub const BAD_RQST_BODY: &str = "BAD-RQST-BODY\n";
pub const IN_USE: &str = "IN-USE\n";
pub const SET_OK: &str = "SET-OK\n";

/// A reply bound for exactly one destination address, prior to entering
/// the unreliability pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub to: String,
    pub payload: Vec<u8>,
}

impl Reply {
    pub fn new(to: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { to: to.into(), payload: payload.into().into_bytes() }
    }
}

/// `SET-OK` and `VALUE` replies bypass the corruption pipeline entirely —
/// this is what keeps the control plane usable under adversarial settings.
pub fn is_exempt(payload: &[u8]) -> bool {
    payload.starts_with(b"SET-OK") || payload.starts_with(b"VALUE")
}
