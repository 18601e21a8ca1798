//! Interactive blinded issuance: commit + Schnorr PoK, blind signing, unblinding.

use std::collections::BTreeMap;

use blstrs::{G1Projective, Scalar};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::credential::attributes::{full_message_vector, hash_attribute, AttributeMap};
use crate::credential::context::CredentialContext;
use crate::credential::keys::{IssuerPublicKey, IssuerSecretKey};
use crate::credential::signature::{self, PsSignature};
use crate::credential::transcript::{append_g1_point, append_public_key, Transcript};
use crate::credential::Credential;
use crate::constants::DST_ISSUANCE_TRANSCRIPT;
use crate::error::CredentialError;
use crate::utils::random::random_scalars;

/// User-held state across the issuance round trip. Explicit rather than implicit: the caller owns
/// its lifetime and is responsible for discarding it once issuance completes.
#[derive(Clone)]
pub struct IssuanceState {
    pub(crate) t: Scalar,
    pub(crate) user_attrs: AttributeMap,
}

/// The user's issue request `(C, π)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssueRequest {
    pub(crate) cap_c: G1Projective,
    pub(crate) alpha: G1Projective,
    pub(crate) s: BTreeMap<usize, Scalar>,
    pub(crate) cap_t: Scalar,
}

/// The issuer's blind signature response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlindSignatureResponse {
    pub(crate) sigma1_prime: G1Projective,
    pub(crate) sigma2_prime: G1Projective,
    pub(crate) issuer_attrs: AttributeMap,
}

fn issuance_transcript(pk: &IssuerPublicKey, cap_c: &G1Projective, alpha: &G1Projective) -> Transcript {
    let mut t = Transcript::new(DST_ISSUANCE_TRANSCRIPT);
    append_public_key(&mut t, pk);
    append_g1_point(&mut t, b"C", cap_c);
    append_g1_point(&mut t, b"alpha", alpha);
    t
}

/// Builds an issue request for the user-owned subset `user_attrs` (keyed by slot index).
pub fn prepare_issue_request<R: RngCore + CryptoRng>(
    ctx: &CredentialContext,
    pk: &IssuerPublicKey,
    user_attrs: AttributeMap,
    rng: &mut R,
) -> (IssueRequest, IssuanceState) {
    let t = random_scalars(1, rng)[0];
    let g = ctx.g();

    let cap_c = user_attrs.iter().fold(g * t, |acc, (&idx, bytes)| {
        acc + pk.cap_y[idx] * hash_attribute(bytes)
    });

    let z0 = random_scalars(1, rng)[0];
    let z: BTreeMap<usize, Scalar> = user_attrs
        .keys()
        .map(|&idx| (idx, random_scalars(1, rng)[0]))
        .collect();

    let alpha = z.iter().fold(g * z0, |acc, (&idx, z_i)| acc + pk.cap_y[idx] * z_i);

    let c = issuance_transcript(pk, &cap_c, &alpha).challenge_scalar(b"c");

    let cap_t = z0 + c * t;
    let s: BTreeMap<usize, Scalar> = z
        .iter()
        .map(|(&idx, z_i)| {
            let a_i = hash_attribute(&user_attrs[&idx]);
            (idx, *z_i + c * a_i)
        })
        .collect();

    let req = IssueRequest { cap_c, alpha, s, cap_t };
    let state = IssuanceState { t, user_attrs };
    (req, state)
}

/// Recomputes the challenge and checks `α · C^c == g^T · Π Y_i^{s_i}`. The disclosed index set
/// `U` is inferred from `req.s`'s keys, as the protocol does not separately transmit it.
pub fn verify_issue_request(ctx: &CredentialContext, pk: &IssuerPublicKey, req: &IssueRequest) -> bool {
    let g = ctx.g();
    if req.s.keys().any(|&idx| idx >= pk.num_attributes()) {
        return false;
    }

    let c = issuance_transcript(pk, &req.cap_c, &req.alpha).challenge_scalar(b"c");

    let lhs = req.alpha + req.cap_c * c;
    let rhs = req
        .s
        .iter()
        .fold(g * req.cap_t, |acc, (&idx, s_i)| acc + pk.cap_y[idx] * s_i);

    lhs == rhs
}

/// Issuer-side blind signing on a verified request. `issuer_attrs` must cover exactly the
/// complement of `req.s`'s keys within `0..pk.num_attributes()`.
pub fn sign_blind<R: RngCore + CryptoRng>(
    ctx: &CredentialContext,
    sk: &IssuerSecretKey,
    pk: &IssuerPublicKey,
    req: &IssueRequest,
    issuer_attrs: AttributeMap,
    rng: &mut R,
) -> Result<BlindSignatureResponse, CredentialError> {
    let l = pk.num_attributes();
    let user_idx: std::collections::BTreeSet<usize> = req.s.keys().copied().collect();
    let issuer_idx: std::collections::BTreeSet<usize> = issuer_attrs.keys().copied().collect();

    let expected_issuer_idx: std::collections::BTreeSet<usize> =
        (0..l).filter(|idx| !user_idx.contains(idx)).collect();
    if issuer_idx != expected_issuer_idx {
        return Err(CredentialError::BadAttributePartition {
            user: user_idx.into_iter().collect(),
            issuer: issuer_idx.into_iter().collect(),
            total: l,
        });
    }

    if !verify_issue_request(ctx, pk, req) {
        return Err(CredentialError::InvalidProof);
    }

    let u = random_scalars(1, rng)[0];
    let sigma1_prime = ctx.g() * u;

    let base = sk.cap_x + req.cap_c;
    let base = issuer_attrs
        .iter()
        .fold(base, |acc, (&idx, bytes)| acc + pk.cap_y[idx] * hash_attribute(bytes));
    let sigma2_prime = base * u;

    Ok(BlindSignatureResponse {
        sigma1_prime,
        sigma2_prime,
        issuer_attrs,
    })
}

/// User-side unblinding and self-verification.
pub fn unblind(
    pk: &IssuerPublicKey,
    state: &IssuanceState,
    resp: &BlindSignatureResponse,
) -> Result<Credential, CredentialError> {
    let sigma1 = resp.sigma1_prime;
    let sigma2 = resp.sigma2_prime - resp.sigma1_prime * state.t;

    let mut full_attrs = state.user_attrs.clone();
    for (idx, bytes) in &resp.issuer_attrs {
        full_attrs.insert(*idx, bytes.clone());
    }

    let l = pk.num_attributes();
    if full_attrs.len() != l || !(0..l).all(|idx| full_attrs.contains_key(&idx)) {
        return Err(CredentialError::ArityMismatch {
            expected: l,
            actual: full_attrs.len(),
        });
    }

    let sig = PsSignature { sigma1, sigma2 };
    let msgs = full_message_vector(&full_attrs, l);
    if !signature::verify(pk, &sig, &msgs) {
        return Err(CredentialError::InvalidProof);
    }

    Ok(Credential { sig, full_attrs })
}
