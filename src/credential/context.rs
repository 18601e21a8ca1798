//! Curve context: the nothing-up-my-sleeve generators `g ∈ G1`, `g̃ ∈ G2` shared by every
//! credential operation, held as an explicit, cloneable value threaded through `Server`/`Client`
//! rather than a module-level global.

use blstrs::{G1Projective, G2Projective};
use group::Group;

use crate::constants::{DST_CREDENTIAL_G1_GENERATOR, DST_CREDENTIAL_G2_GENERATOR, SEED_CREDENTIAL_CONTEXT};

/// The curve generators shared by every issuer, user, and verifier in a single deployment.
///
/// Two independent deployments that both call [`CredentialContext::new`] obtain byte-identical
/// generators, since they are derived deterministically by hashing to the curve rather than by
/// trusted setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialContext {
    g: G1Projective,
    g_tilde: G2Projective,
}

impl CredentialContext {
    /// Derives the generators via hash-to-curve from the fixed, published domain-separation seed.
    pub fn new() -> Self {
        Self {
            g: G1Projective::hash_to_curve(
                SEED_CREDENTIAL_CONTEXT.as_slice(),
                DST_CREDENTIAL_G1_GENERATOR.as_slice(),
                b"g",
            ),
            g_tilde: G2Projective::hash_to_curve(
                SEED_CREDENTIAL_CONTEXT.as_slice(),
                DST_CREDENTIAL_G2_GENERATOR.as_slice(),
                b"g_tilde",
            ),
        }
    }

    pub fn g(&self) -> G1Projective {
        self.g
    }

    pub fn g_tilde(&self) -> G2Projective {
        self.g_tilde
    }
}

impl Default for CredentialContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_deterministic_and_non_identity() {
        let a = CredentialContext::new();
        let b = CredentialContext::new();
        assert_eq!(a, b);
        assert_ne!(a.g(), G1Projective::identity());
        assert_ne!(a.g_tilde(), G2Projective::identity());
    }
}
