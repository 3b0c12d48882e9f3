//! Query kinds and the comparison predicates callers hand to `compare`.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Match semantics a caller asks a backend for.
///
/// The service never interprets this tag; each backend decides which kinds
/// it answers and fails the rest with `BackendError::UnsupportedKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryKind {
    #[default]
    Exact,
    Alias,
    Virtual,
    Credentials,
    NetAddr,
    UserInfo,
}

impl QueryKind {
    pub const ALL: [QueryKind; 6] = [
        QueryKind::Exact,
        QueryKind::Alias,
        QueryKind::Virtual,
        QueryKind::Credentials,
        QueryKind::NetAddr,
        QueryKind::UserInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Exact => "exact",
            QueryKind::Alias => "alias",
            QueryKind::Virtual => "virtual",
            QueryKind::Credentials => "credentials",
            QueryKind::NetAddr => "netaddr",
            QueryKind::UserInfo => "userinfo",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown query kind \"{0}\"")]
pub struct UnknownQueryKind(pub String);

impl FromStr for QueryKind {
    type Err = UnknownQueryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownQueryKind(s.to_owned()))
    }
}

/// Predicate applied as `predicate(candidate, key)`, where `candidate` is a
/// key stored in the map and `key` is what the caller asked about.
pub type Predicate<'a> = &'a dyn Fn(&str, &str) -> bool;

pub fn exact(candidate: &str, key: &str) -> bool {
    candidate == key
}

pub fn ignore_case(candidate: &str, key: &str) -> bool {
    candidate.eq_ignore_ascii_case(key)
}

/// True when `key` is `candidate` or one of its subdomains, provided the
/// candidate is written with a leading dot (`.example.org`).
pub fn domain(candidate: &str, key: &str) -> bool {
    if candidate.eq_ignore_ascii_case(key) {
        return true;
    }
    match candidate.strip_prefix('.') {
        Some(parent) => {
            if key.eq_ignore_ascii_case(parent) {
                return true;
            }
            let Some(start) = key.len().checked_sub(candidate.len()) else {
                return false;
            };
            start > 0
                && key.is_char_boundary(start)
                && key[start..].eq_ignore_ascii_case(candidate)
        }
        None => false,
    }
}

/// True when address `key` equals `candidate` or lies in the network
/// `candidate` written as `addr/prefix`.
pub fn netaddr(candidate: &str, key: &str) -> bool {
    let Ok(addr) = key.parse::<IpAddr>() else {
        return false;
    };
    let (net, prefix) = match candidate.split_once('/') {
        Some((net, prefix)) => match prefix.parse::<u8>() {
            Ok(prefix) => (net, Some(prefix)),
            Err(_) => return false,
        },
        None => (candidate, None),
    };
    let Ok(net) = net.parse::<IpAddr>() else {
        return false;
    };

    match (net, addr) {
        (IpAddr::V4(net), IpAddr::V4(addr)) => {
            same_network(u32::from(net).into(), u32::from(addr).into(), 32, prefix)
        }
        (IpAddr::V6(net), IpAddr::V6(addr)) => {
            same_network(u128::from(net), u128::from(addr), 128, prefix)
        }
        _ => false,
    }
}

fn same_network(net: u128, addr: u128, width: u8, prefix: Option<u8>) -> bool {
    let prefix = prefix.unwrap_or(width);
    if prefix > width {
        return false;
    }
    if prefix == 0 {
        return true;
    }
    let shift = u32::from(width - prefix);
    net >> shift == addr >> shift
}
