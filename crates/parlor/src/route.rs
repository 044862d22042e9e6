//! Parsing of the request target a WebSocket client connected with.

use parlor_protocol::RoomCode;
use url::form_urlencoded;

/// Path prefix every game socket lives under.
const GAME_PREFIX: &str = "/ws/game/";

/// A parsed `/ws/game/<CODE>/?query` request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub code: RoomCode,
    query: Vec<(String, String)>,
}

impl Route {
    /// Parses a request target. The trailing slash after the code is
    /// optional; anything else after it is not a game route.
    pub fn parse(target: &str) -> Option<Self> {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let rest = path.strip_prefix(GAME_PREFIX)?;
        let code = rest.strip_suffix('/').unwrap_or(rest);
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        Some(Self {
            code: RoomCode::new(code),
            query: parse_query(query),
        })
    }

    /// First value of query parameter `name`, if present and non-empty.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
