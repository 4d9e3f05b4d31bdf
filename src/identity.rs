//! Voter identity - who is casting a vote.
//!
//! Authenticated voters are identified by their user id. Anonymous voters get
//! a pseudo-identity: the hex SHA-256 of their network origin, so repeated
//! anonymous votes from one origin collide on the one-vote rule.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable identifier of a vote caster.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoterIdentity {
    User(u64),
    Anonymous(String),
}

impl VoterIdentity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, VoterIdentity::Anonymous(_))
    }

    pub fn user_id(&self) -> Option<u64> {
        match self {
            VoterIdentity::User(uid) => Some(*uid),
            VoterIdentity::Anonymous(_) => None,
        }
    }
}

impl fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoterIdentity::User(uid) => write!(f, "user:{}", uid),
            VoterIdentity::Anonymous(hash) => write!(f, "anonymous:{}", hash),
        }
    }
}

/// The acting voter: identity plus the hashed origin recorded on every vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voter {
    pub identity: VoterIdentity,
    pub source: String,
}

/// Hex SHA-256 of a network origin string.
pub fn hash_origin(origin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(origin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Supplies the acting voter for the current request.
pub trait IdentityProvider: Send + Sync {
    /// Authenticated user id, or None for anonymous requests.
    fn current_user(&self) -> Option<u64>;

    /// Network origin of the request (usually the client IP).
    fn client_origin(&self) -> Option<String>;

    /// Resolve the acting voter. Anonymous voters fall back to their hashed origin.
    ///
    /// A request without an origin hashes the empty string, so all
    /// origin-less anonymous visitors share one identity.
    fn current_voter(&self) -> Voter {
        let origin = self.client_origin().unwrap_or_default();
        let source = hash_origin(&origin);

        let identity = match self.current_user() {
            Some(uid) if uid != 0 => VoterIdentity::User(uid),
            _ => VoterIdentity::Anonymous(source.clone()),
        };

        Voter { identity, source }
    }
}

const USER_ID: &str = "user-id";
const CLIENT_IP: &str = "client-ip";

/// Request session variables, as forwarded by the hosting application.
///
/// ```json
/// { "user-id": "42", "client-ip": "203.0.113.9" }
/// ```
///
/// A missing or zero `user-id` means an anonymous request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Session for an authenticated user.
    pub fn user(uid: u64) -> Self {
        let mut session = Self::new();
        session.set(USER_ID, uid.to_string());
        session
    }

    /// Session for an anonymous visitor from `origin`.
    pub fn anonymous(origin: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(CLIENT_IP, origin);
        session
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.set(CLIENT_IP, origin);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }
}

impl IdentityProvider for Session {
    fn current_user(&self) -> Option<u64> {
        self.get(USER_ID).and_then(|raw| raw.parse().ok())
    }

    fn client_origin(&self) -> Option<String> {
        self.get(CLIENT_IP).map(str::to_string)
    }
}
