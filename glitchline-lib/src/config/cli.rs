use clap::Parser;

/// Command-line flags for the unreliable chat relay.
///
/// Field names follow the wire-documented flag spelling rather than Rust
/// convention (`burstLenLower`, not `burst-len-lower`) because that spelling
/// is the external interface clients and harnesses are written against.
#[derive(Parser, Debug)]
#[command(author, version, about = "Intentionally-unreliable UDP chat relay")]
pub struct Cli {
    /// The chat server address.
    #[arg(long, default_value = "127.0.0.1")]
    pub address: String,

    /// The chat server port.
    #[arg(long, default_value_t = 5382)]
    pub port: u16,

    /// The probability of dropping a reply outright.
    #[arg(long, default_value_t = 0.0)]
    pub drop: f64,

    /// The probability of flipping any given bit of a reply.
    #[arg(long, default_value_t = 0.0)]
    pub flip: f64,

    /// The probability of applying a burst error to a reply.
    #[arg(long, default_value_t = 0.0)]
    pub burst: f64,

    /// The probability of delaying a reply.
    #[arg(long, default_value_t = 0.0)]
    pub delay: f64,

    /// Lower bound (inclusive), in bits, of a burst error's length.
    #[arg(long = "burstLenLower", default_value_t = 0)]
    pub burst_len_lower: u64,

    /// Upper bound (exclusive unless equal to the lower bound), in bits, of a burst error's length.
    #[arg(long = "burstLenUpper", default_value_t = 0)]
    pub burst_len_upper: u64,

    /// Lower bound, in seconds, of a delayed reply's delay. Normalised against the upper bound.
    #[arg(long = "delayLenLower", default_value_t = 0)]
    pub delay_len_lower: u64,

    /// Upper bound, in seconds, of a delayed reply's delay. Normalised against the lower bound.
    #[arg(long = "delayLenUpper", default_value_t = 0)]
    pub delay_len_upper: u64,

    /// Maximum number of simultaneously registered clients.
    #[arg(long = "maxClients", default_value_t = 1000)]
    pub max_clients: usize,
}
