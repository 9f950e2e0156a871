//! Leadership panel unlock.
//!
//! This is a plain string comparison against a configured value. It hides the Head panel
//! from casual viewers and is not an authentication boundary: there is no hashing, no
//! rate limiting and no audit trail.

use std::fmt;

pub struct LeadershipGate {
    secret: Option<String>,
}

impl LeadershipGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    /// Gate with no configured secret; every unlock attempt is denied.
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    pub fn from_optional(secret: Option<String>) -> Self {
        match secret {
            Some(secret) if !secret.is_empty() => Self::new(secret),
            _ => Self::disabled(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn unlock(&self, credential: &str) -> Result<LeadershipAccess, AccessDenied> {
        match &self.secret {
            Some(secret) if secret == credential => Ok(LeadershipAccess { _private: () }),
            _ => Err(AccessDenied),
        }
    }
}

impl fmt::Debug for LeadershipGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadershipGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Proof that the leadership credential matched; required to evaluate the Head payout.
#[derive(Debug)]
pub struct LeadershipAccess {
    _private: (),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access denied")]
pub struct AccessDenied;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_credential_unlocks() {
        let gate = LeadershipGate::new("diretoria");
        assert!(gate.unlock("diretoria").is_ok());
    }

    #[test]
    fn wrong_credential_is_denied_without_detail() {
        let gate = LeadershipGate::new("diretoria");
        let err = gate.unlock("Diretoria").expect_err("case sensitive");
        assert_eq!(err.to_string(), "access denied");
    }

    #[test]
    fn unconfigured_gate_denies_everything() {
        let gate = LeadershipGate::from_optional(Some(String::new()));
        assert!(!gate.is_configured());
        assert_eq!(gate.unlock("").unwrap_err(), AccessDenied);
    }

    #[test]
    fn debug_output_hides_secret() {
        let gate = LeadershipGate::new("diretoria");
        assert!(!format!("{gate:?}").contains("diretoria"));
    }
}
