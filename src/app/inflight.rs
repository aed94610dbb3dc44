//! Per-session operation claims.
//!
//! An operation claims its own session plus any session it will disturb
//! (the visible one, for Create and Show). A second operation touching a
//! claimed session is rejected until the first one's result is applied.

use crate::error::OrchestratorError;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InFlight {
    /// Operation's own session id -> every session id it claimed.
    claims: HashMap<String, Vec<String>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, session_id: &str) -> bool {
        self.claims
            .values()
            .any(|ids| ids.iter().any(|id| id == session_id))
    }

    /// Claim `primary` and `others`, or fail with `Busy` naming the first
    /// session already claimed.
    pub fn claim(&mut self, primary: &str, others: &[&str]) -> Result<(), OrchestratorError> {
        let mut ids: Vec<String> = Vec::with_capacity(others.len() + 1);
        for id in std::iter::once(primary).chain(others.iter().copied()) {
            if self.is_busy(id) {
                return Err(OrchestratorError::Busy(id.to_string()));
            }
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        self.claims.insert(primary.to_string(), ids);
        Ok(())
    }

    pub fn release(&mut self, primary: &str) {
        self.claims.remove(primary);
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_blocks_overlapping_operations() {
        let mut flight = InFlight::new();
        flight.claim("b", &["a"]).unwrap();

        assert_eq!(
            flight.claim("a", &[]),
            Err(OrchestratorError::Busy("a".into()))
        );
        assert_eq!(
            flight.claim("c", &["b"]),
            Err(OrchestratorError::Busy("b".into()))
        );
        flight.claim("c", &[]).unwrap();
        assert_eq!(flight.len(), 2);
    }

    #[test]
    fn release_frees_every_claimed_session() {
        let mut flight = InFlight::new();
        flight.claim("b", &["a"]).unwrap();
        flight.release("b");
        assert!(flight.is_empty());
        assert!(!flight.is_busy("a"));
        flight.claim("a", &[]).unwrap();
    }

    #[test]
    fn duplicate_ids_in_one_claim_are_fine() {
        let mut flight = InFlight::new();
        flight.claim("a", &["a"]).unwrap();
        assert!(flight.is_busy("a"));
    }
}
