//! Pointcheval–Sanders key generation.

use blstrs::{G1Projective, G2Projective, Scalar};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::credential::context::CredentialContext;
use crate::utils::random::random_scalars;

/// The issuer's secret key `(x, X, y)`.
///
/// `Debug` is hand-rolled to avoid ever printing the scalars `x`/`y` in a log line.
#[derive(Clone, Serialize, Deserialize)]
pub struct IssuerSecretKey {
    pub(crate) x: Scalar,
    pub(crate) cap_x: G1Projective,
    pub(crate) y: Vec<Scalar>,
}

impl std::fmt::Debug for IssuerSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerSecretKey")
            .field("l", &self.y.len())
            .finish_non_exhaustive()
    }
}

impl IssuerSecretKey {
    pub fn num_attributes(&self) -> usize {
        self.y.len()
    }
}

/// The issuer's public key `(g, Y, g̃, X̃, Ỹ)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerPublicKey {
    pub(crate) g: G1Projective,
    pub(crate) cap_y: Vec<G1Projective>,
    pub(crate) g_tilde: G2Projective,
    pub(crate) cap_x_tilde: G2Projective,
    pub(crate) cap_y_tilde: Vec<G2Projective>,
}

impl IssuerPublicKey {
    pub fn num_attributes(&self) -> usize {
        self.cap_y.len()
    }
}

/// Draws `x, y_0, …, y_{L-1} \$← Z_p` and derives the matching public key.
///
/// `L` must be at least 1; there is always at least one attribute slot (the reserved ones, at a
/// minimum — the caller is responsible for including those in `L`).
pub fn generate_key<R: RngCore + CryptoRng>(
    ctx: &CredentialContext,
    l: usize,
    rng: &mut R,
) -> (IssuerSecretKey, IssuerPublicKey) {
    assert!(l > 0, "an issuer key must cover at least one attribute slot");

    let x = random_scalars(1, rng)[0];
    let y = random_scalars(l, rng);

    let g = ctx.g();
    let g_tilde = ctx.g_tilde();

    let cap_x = g * x;
    let cap_y: Vec<G1Projective> = y.iter().map(|y_i| g * y_i).collect();
    let cap_x_tilde = g_tilde * x;
    let cap_y_tilde: Vec<G2Projective> = y.iter().map(|y_i| g_tilde * y_i).collect();

    let sk = IssuerSecretKey { x, cap_x, y };
    let pk = IssuerPublicKey {
        g,
        cap_y,
        g_tilde,
        cap_x_tilde,
        cap_y_tilde,
    };

    (sk, pk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn generated_keys_are_consistent() {
        let ctx = CredentialContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let (sk, pk) = generate_key(&ctx, 4, &mut rng);

        assert_eq!(sk.y.len(), 4);
        assert_eq!(pk.cap_y.len(), 4);
        assert_eq!(pk.cap_y_tilde.len(), 4);
        assert_eq!(pk.g, ctx.g());
        assert_eq!(pk.cap_x_tilde, ctx.g_tilde() * sk.x);
    }
}
