use super::grammar;

/// A parsed request line, prior to any registry/settings lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    HelloFrom { name: String },
    Send { dest: String, text: String },
    List,
    Get { key: String },
    SetScalar { key: String, value: f64 },
    SetRange { key: String, lower: u64, upper: u64 },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The header token is not one of the known request types.
    BadHeader,
    /// The header is recognised but the body fails its grammar.
    BadBody,
}

/// Parses one already-newline-stripped request line.
pub fn parse(line: &str) -> Result<Request, ParseError> {
    let header = line.split(' ').next().unwrap_or("");
    match header {
        "HELLO-FROM" => parse_hello_from(line),
        "SEND" => parse_send(line),
        "LIST" => parse_list(line),
        "GET" => parse_get(line),
        "SET" => parse_set(line),
        "RESET" => parse_reset(line),
        _ => Err(ParseError::BadHeader),
    }
}

fn parse_hello_from(line: &str) -> Result<Request, ParseError> {
    let name = line.strip_prefix("HELLO-FROM ").ok_or(ParseError::BadBody)?;
    if grammar::is_name(name) {
        Ok(Request::HelloFrom { name: name.to_string() })
    } else {
        Err(ParseError::BadBody)
    }
}

fn parse_send(line: &str) -> Result<Request, ParseError> {
    let rest = line.strip_prefix("SEND ").ok_or(ParseError::BadBody)?;
    let (dest, text) = rest.split_once(' ').ok_or(ParseError::BadBody)?;
    if grammar::is_letters(dest) && !text.is_empty() {
        Ok(Request::Send { dest: dest.to_string(), text: text.to_string() })
    } else {
        Err(ParseError::BadBody)
    }
}

fn parse_list(line: &str) -> Result<Request, ParseError> {
    if line == "LIST" {
        Ok(Request::List)
    } else {
        Err(ParseError::BadBody)
    }
}

fn parse_get(line: &str) -> Result<Request, ParseError> {
    let key = line.strip_prefix("GET ").ok_or(ParseError::BadBody)?;
    if grammar::is_letters_or_hyphen(key) {
        Ok(Request::Get { key: key.to_string() })
    } else {
        Err(ParseError::BadBody)
    }
}

fn parse_set(line: &str) -> Result<Request, ParseError> {
    let rest = line.strip_prefix("SET ").ok_or(ParseError::BadBody)?;
    let mut fields = rest.splitn(3, ' ');
    let key = fields.next().ok_or(ParseError::BadBody)?;
    let second = fields.next().ok_or(ParseError::BadBody)?;
    match fields.next() {
        // `SET <key> <int> <int>`
        Some(third) => {
            if !grammar::is_letters_or_hyphen(key) {
                return Err(ParseError::BadBody);
            }
            let lower = grammar::parse_int(second).ok_or(ParseError::BadBody)?;
            let upper = grammar::parse_int(third).ok_or(ParseError::BadBody)?;
            Ok(Request::SetRange { key: key.to_string(), lower, upper })
        }
        // `SET <key> <real>`
        None => {
            if !grammar::is_letters(key) {
                return Err(ParseError::BadBody);
            }
            let value = grammar::parse_real(second).ok_or(ParseError::BadBody)?;
            Ok(Request::SetScalar { key: key.to_string(), value })
        }
    }
}

fn parse_reset(line: &str) -> Result<Request, ParseError> {
    if line == "RESET" {
        Ok(Request::Reset)
    } else {
        Err(ParseError::BadBody)
    }
}
