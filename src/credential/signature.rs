//! Pointcheval–Sanders signing and verification.

use blstrs::{pairing, G1Affine, G1Projective, G2Affine, Scalar};
use group::{Curve, Group};
use serde::{Deserialize, Serialize};

use crate::credential::keys::{IssuerPublicKey, IssuerSecretKey};
use crate::error::CredentialError;

/// A PS signature `(σ1, σ2) ∈ G1 × G1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsSignature {
    pub(crate) sigma1: G1Projective,
    pub(crate) sigma2: G1Projective,
}

/// Signs `msgs` (already hashed to scalars, one per attribute slot) under the fixed-generator
/// variant: `σ1 = h = g`, `σ2 = h^{x + Σ y_i·msg_i}`.
///
/// Takes the scheme's fixed G1 generator explicitly (callers always have a
/// [`crate::credential::context::CredentialContext`] in hand) rather than reading it off a global.
/// `msgs.len()` must equal `sk.num_attributes()`.
pub fn sign(
    g: &G1Projective,
    sk: &IssuerSecretKey,
    msgs: &[Scalar],
) -> Result<PsSignature, CredentialError> {
    if msgs.len() != sk.y.len() {
        return Err(CredentialError::ArityMismatch {
            expected: sk.y.len(),
            actual: msgs.len(),
        });
    }

    let mut exponent = sk.x;
    for (y_i, m_i) in sk.y.iter().zip(msgs.iter()) {
        exponent += y_i * m_i;
    }

    Ok(PsSignature {
        sigma1: *g,
        sigma2: g * exponent,
    })
}

/// Verifies `e(σ1, X̃ · Π Ỹ_i^{msg_i}) = e(σ2, g̃)`, rejecting the forgery `σ1 = 1_{G1}`.
pub fn verify(pk: &IssuerPublicKey, sig: &PsSignature, msgs: &[Scalar]) -> bool {
    if msgs.len() != pk.cap_y_tilde.len() {
        return false;
    }
    if sig.sigma1 == G1Projective::identity() {
        return false;
    }

    let mut rhs_g2 = pk.cap_x_tilde;
    for (y_tilde_i, m_i) in pk.cap_y_tilde.iter().zip(msgs.iter()) {
        rhs_g2 += y_tilde_i * m_i;
    }

    let sigma1_aff: G1Affine = sig.sigma1.to_affine();
    let sigma2_aff: G1Affine = sig.sigma2.to_affine();
    let rhs_g2_aff: G2Affine = rhs_g2.to_affine();
    let g_tilde_aff: G2Affine = pk.g_tilde.to_affine();

    pairing(&sigma1_aff, &rhs_g2_aff) == pairing(&sigma2_aff, &g_tilde_aff)
}
