//! Session identity and route resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one conversation thread on the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRef(String);

impl SessionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const CHAT_ROUTE_PREFIX: &str = "/chat/";

/// Resolve the active session from a navigation route.
///
/// Only `/chat/{id}` routes name a session. A trailing slash, query string
/// or fragment is ignored, and the id segment is percent-decoded. The decoded
/// id is kept verbatim; a blank one names no session.
pub fn resolve_route(route: &str) -> Option<SessionRef> {
    let path = route
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let segment = path.strip_prefix(CHAT_ROUTE_PREFIX)?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }

    let id = urlencoding::decode(segment).ok()?;
    if id.trim().is_empty() {
        return None;
    }
    Some(SessionRef::new(id))
}

/// Route that [`resolve_route`] maps back to `session`
pub fn route_for(session: &SessionRef) -> String {
    format!("{CHAT_ROUTE_PREFIX}{}", urlencoding::encode(session.as_str()))
}
