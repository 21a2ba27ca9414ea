use std::collections::HashSet;
use std::sync::RwLock;

/// Process-wide set of tokens invalidated before their natural expiry.
///
/// Revocation is by exact token string, not by subject: revoking one token
/// leaves other tokens issued to the same user valid, so a second device's
/// session survives the first device's logout.
///
/// Entries are never evicted and live for the process lifetime. A production
/// deployment should back this with a TTL-keyed store (e.g. Redis `EXPIRE`)
/// so entries lapse together with the tokens they shadow.
#[derive(Debug, Default)]
pub struct RevocationList {
    revoked: RwLock<HashSet<String>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `token` as revoked. Idempotent.
    pub fn revoke(&self, token: &str) {
        let mut revoked = self
            .revoked
            .write()
            .expect("revocation list lock poisoned");
        revoked.insert(token.to_string());
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        let revoked = self
            .revoked
            .read()
            .expect("revocation list lock poisoned");
        revoked.contains(token)
    }

    pub fn len(&self) -> usize {
        self.revoked
            .read()
            .expect("revocation list lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
