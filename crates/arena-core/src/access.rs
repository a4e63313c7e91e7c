//! Caller identities for role-gated operations.
//!
//! The registry recognizes two roles: a single administrator fixed at
//! construction, and a single authorized battle caller that the administrator
//! wires up. Every other identity is an ordinary caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of whoever invokes an operation.
///
/// Addresses compare by value; the registry never inspects them beyond
/// equality with its configured roles.
///
/// # Example
///
/// ```
/// use arena_core::access::Address;
///
/// let admin = Address::new(0xA11CE);
/// assert_eq!(admin.to_string(), "0x00000000000a11ce");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(u64);

impl Address {
    /// Creates an address from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#018x})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_compare_by_value() {
        assert_eq!(Address::new(7), Address::from(7));
        assert_ne!(Address::new(7), Address::new(8));
    }

    #[test]
    fn debug_and_display_are_hex() {
        let addr = Address::new(255);
        assert_eq!(format!("{addr}"), "0x00000000000000ff");
        assert_eq!(format!("{addr:?}"), "Address(0x00000000000000ff)");
    }
}
