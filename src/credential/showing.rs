//! Non-interactive selective-disclosure showing protocol.

use std::collections::{BTreeMap, BTreeSet};

use blstrs::{pairing, G1Affine, G1Projective, G2Affine, Gt, Scalar};
use group::{Curve, Group};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::constants::DST_SHOWING_TRANSCRIPT;
use crate::credential::attributes::{hash_attribute, AttributeMap};
use crate::credential::context::CredentialContext;
use crate::credential::keys::IssuerPublicKey;
use crate::credential::transcript::{append_g1_point, append_gt_element, append_public_key, Transcript};
use crate::credential::Credential;
use crate::error::CredentialError;
use crate::utils::random::random_scalars;

/// A disclosure proof `((s1,s2), (K, α, {s_i}, T), disclosed_attrs)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisclosureProof {
    pub(crate) s1: G1Projective,
    pub(crate) s2: G1Projective,
    pub(crate) cap_k: Gt,
    pub(crate) alpha: Gt,
    pub(crate) s_hidden: BTreeMap<usize, Scalar>,
    pub(crate) cap_t: Scalar,
    pub(crate) disclosed: AttributeMap,
}

fn showing_transcript(
    pk: &IssuerPublicKey,
    s1: &G1Projective,
    s2: &G1Projective,
    cap_k: &Gt,
    msg: &[u8],
    alpha: &Gt,
) -> Transcript {
    let mut t = Transcript::new(DST_SHOWING_TRANSCRIPT);
    append_public_key(&mut t, pk);
    append_g1_point(&mut t, b"s1", s1);
    append_g1_point(&mut t, b"s2", s2);
    append_gt_element(&mut t, b"K", cap_k);
    t.append_message(b"m", msg);
    append_gt_element(&mut t, b"alpha", alpha);
    t
}

/// Produces a disclosure proof for `credential`, disclosing exactly the attributes at indices in
/// `disclosed`, hiding the rest, bound to `msg`.
pub fn prove<R: RngCore + CryptoRng>(
    ctx: &CredentialContext,
    pk: &IssuerPublicKey,
    credential: &Credential,
    disclosed: &BTreeSet<usize>,
    msg: &[u8],
    rng: &mut R,
) -> DisclosureProof {
    let l = pk.num_attributes();
    let hidden: Vec<usize> = (0..l).filter(|idx| !disclosed.contains(idx)).collect();

    let r = random_scalars(1, rng)[0];
    let t_rand = random_scalars(1, rng)[0];

    let s1 = credential.sig.sigma1 * r;
    let s2 = (credential.sig.sigma2 + credential.sig.sigma1 * t_rand) * r;

    let s1_aff: G1Affine = s1.to_affine();
    let g_tilde_aff: G2Affine = ctx.g_tilde().to_affine();
    let e_s1_g_tilde = pairing(&s1_aff, &g_tilde_aff);

    let p: BTreeMap<usize, Gt> = hidden
        .iter()
        .map(|&idx| {
            let y_tilde_aff: G2Affine = pk.cap_y_tilde[idx].to_affine();
            (idx, pairing(&s1_aff, &y_tilde_aff))
        })
        .collect();

    let cap_k = hidden.iter().fold(e_s1_g_tilde * t_rand, |acc, idx| {
        acc + p[idx] * hash_attribute(&credential.full_attrs[idx])
    });

    let z_prime = random_scalars(1, rng)[0];
    let z: BTreeMap<usize, Scalar> = hidden.iter().map(|&idx| (idx, random_scalars(1, rng)[0])).collect();

    let alpha = hidden
        .iter()
        .fold(e_s1_g_tilde * z_prime, |acc, idx| acc + p[idx] * z[idx]);

    let c = showing_transcript(pk, &s1, &s2, &cap_k, msg, &alpha).challenge_scalar(b"c");

    let cap_t = z_prime + c * t_rand;
    let s_hidden: BTreeMap<usize, Scalar> = hidden
        .iter()
        .map(|&idx| {
            let a_i = hash_attribute(&credential.full_attrs[idx]);
            (idx, z[&idx] + c * a_i)
        })
        .collect();

    let disclosed_attrs: AttributeMap = disclosed
        .iter()
        .map(|&idx| (idx, credential.full_attrs[&idx].clone()))
        .collect();

    DisclosureProof {
        s1,
        s2,
        cap_k,
        alpha,
        s_hidden,
        cap_t,
        disclosed: disclosed_attrs,
    }
}

/// Verifies a disclosure proof. On success returns the disclosed attribute map carried by
/// `proof` (the caller does not need to separately track which indices were disclosed).
pub fn verify(ctx: &CredentialContext, pk: &IssuerPublicKey, proof: &DisclosureProof, msg: &[u8]) -> bool {
    if proof.s1 == G1Projective::identity() {
        return false;
    }

    let l = pk.num_attributes();
    let hidden: BTreeSet<usize> = proof.s_hidden.keys().copied().collect();
    let disclosed: BTreeSet<usize> = proof.disclosed.keys().copied().collect();
    if hidden.len() + disclosed.len() != l || !hidden.is_disjoint(&disclosed) {
        return false;
    }
    if hidden.iter().any(|idx| *idx >= l) || disclosed.iter().any(|idx| *idx >= l) {
        return false;
    }

    let c = showing_transcript(pk, &proof.s1, &proof.s2, &proof.cap_k, msg, &proof.alpha).challenge_scalar(b"c");

    let s1_aff: G1Affine = proof.s1.to_affine();
    let g_tilde_aff: G2Affine = ctx.g_tilde().to_affine();
    let e_s1_g_tilde = pairing(&s1_aff, &g_tilde_aff);

    let lhs_pok = proof.cap_k * c + proof.alpha;
    let rhs_pok = proof.s_hidden.iter().fold(e_s1_g_tilde * proof.cap_t, |acc, (idx, s_i)| {
        let y_tilde_aff: G2Affine = pk.cap_y_tilde[*idx].to_affine();
        acc + pairing(&s1_aff, &y_tilde_aff) * s_i
    });
    if lhs_pok != rhs_pok {
        return false;
    }

    let s2_aff: G1Affine = proof.s2.to_affine();
    let lhs_consistency = disclosed.iter().fold(pairing(&s2_aff, &g_tilde_aff), |acc, idx| {
        let y_tilde_aff: G2Affine = pk.cap_y_tilde[*idx].to_affine();
        let h_ai = hash_attribute(&proof.disclosed[idx]);
        acc + pairing(&s1_aff, &y_tilde_aff) * (-h_ai)
    });
    let x_tilde_aff: G2Affine = pk.cap_x_tilde.to_affine();
    let rhs_consistency = pairing(&s1_aff, &x_tilde_aff) + proof.cap_k;

    lhs_consistency == rhs_consistency
}

/// Convenience wrapper for façade callers that want a typed error instead of a boolean.
pub fn verify_checked(
    ctx: &CredentialContext,
    pk: &IssuerPublicKey,
    proof: &DisclosureProof,
    msg: &[u8],
) -> Result<AttributeMap, CredentialError> {
    if verify(ctx, pk, proof, msg) {
        Ok(proof.disclosed.clone())
    } else {
        Err(CredentialError::InvalidProof)
    }
}
