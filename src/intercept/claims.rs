//! Exclusive response-header claims.
//!
//! An interceptor that owns a header asks for a [`HeaderClaim`] on its name.
//! The claim is a single-use token: it cannot be cloned and is consumed by
//! [`HeaderClaims::set`], so each claimed slot receives at most one value.
//! When the response is finished the host calls [`HeaderClaims::apply`],
//! which replaces whatever the handler wrote under a claimed name.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// Errors raised while claiming a header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Another interceptor already owns this header for the response.
    #[error("header `{0}` is already claimed")]
    AlreadyClaimed(HeaderName),
}

/// Token granting the right to assign one value to one header name.
#[derive(Debug)]
pub struct HeaderClaim {
    index: usize,
}

#[derive(Debug)]
struct Slot {
    name: HeaderName,
    value: Option<HeaderValue>,
}

/// Per-response arena of claimed headers.
#[derive(Debug, Default)]
pub struct HeaderClaims {
    slots: Vec<Slot>,
}

impl HeaderClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim exclusive ownership of `name` for the rest of the response.
    pub fn claim(&mut self, name: HeaderName) -> Result<HeaderClaim, ClaimError> {
        if self.is_claimed(&name) {
            return Err(ClaimError::AlreadyClaimed(name));
        }
        self.slots.push(Slot { name, value: None });
        Ok(HeaderClaim {
            index: self.slots.len() - 1,
        })
    }

    /// Assign the claimed header's value, consuming the claim.
    pub fn set(&mut self, claim: HeaderClaim, value: HeaderValue) {
        if let Some(slot) = self.slots.get_mut(claim.index) {
            slot.value = Some(value);
        }
    }

    pub fn is_claimed(&self, name: &HeaderName) -> bool {
        self.slots.iter().any(|slot| slot.name == *name)
    }

    /// Value assigned to a claimed header, if any.
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.slots
            .iter()
            .find(|slot| slot.name == *name)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write every assigned claim into `headers`, replacing all prior values.
    ///
    /// Returns the names whose previous values were overwritten, so the
    /// caller can report the conflict.
    pub fn apply(self, headers: &mut HeaderMap) -> Vec<HeaderName> {
        let mut overwritten = Vec::new();
        for slot in self.slots {
            let Some(value) = slot.value else {
                continue;
            };
            if headers.insert(slot.name.clone(), value).is_some() {
                overwritten.push(slot.name);
            }
        }
        overwritten
    }
}
