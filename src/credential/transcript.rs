//! Canonical Fiat–Shamir transcript.
//!
//! This workspace's PVSS code built its transcripts over `merlin::Transcript`, appending
//! length-prefixed labeled messages via small free functions (`append_g1_point` and friends).
//! This module keeps that free-function idiom but backs it with a minimal hand-rolled transcript
//! reduced via plain SHA-256 instead of STROBE: every appended field is prefixed with an 8-byte
//! little-endian length, so two adjacent short fields can never be confused with one longer one.

use blstrs::{G1Projective, G2Projective, Gt};
use group::GroupEncoding;

use crate::utils::hash_to_scalar;

/// An append-only, length-prefixed byte buffer that gets reduced to a `Z_p` challenge.
#[derive(Clone)]
pub struct Transcript {
    buf: Vec<u8>,
}

fn append_length_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}

impl Transcript {
    /// Starts a new transcript under a fixed domain-separation label (e.g. issuance vs. showing).
    pub fn new(dst: &'static [u8]) -> Self {
        let mut buf = Vec::new();
        append_length_prefixed(&mut buf, dst);
        Transcript { buf }
    }

    pub fn append_message(&mut self, label: &'static [u8], message: &[u8]) {
        append_length_prefixed(&mut self.buf, label);
        append_length_prefixed(&mut self.buf, message);
    }

    pub fn append_u64(&mut self, label: &'static [u8], x: u64) {
        self.append_message(label, &x.to_le_bytes());
    }

    /// Hashes the accumulated buffer (plus one final domain label) to a `Z_p` scalar. Does not
    /// consume `self`: callers that need to append more context after peeking a challenge (none do
    /// today) remain free to.
    pub fn challenge_scalar(&self, label: &'static [u8]) -> blstrs::Scalar {
        let mut buf = self.buf.clone();
        append_length_prefixed(&mut buf, label);
        hash_to_scalar(&buf, crate::constants::DST_TRANSCRIPT_CHALLENGE.as_slice())
    }
}

pub(crate) fn append_g1_point(t: &mut Transcript, label: &'static [u8], p: &G1Projective) {
    t.append_message(label, p.to_bytes().as_ref())
}

pub(crate) fn append_g2_point(t: &mut Transcript, label: &'static [u8], p: &G2Projective) {
    t.append_message(label, p.to_bytes().as_ref())
}

pub(crate) fn append_gt_element(t: &mut Transcript, label: &'static [u8], e: &Gt) {
    let bytes = bcs::to_bytes(e).expect("Gt serializes canonically via blstrs's serde impl");
    t.append_message(label, &bytes)
}

pub(crate) fn append_g1_vector(t: &mut Transcript, label: &'static [u8], vec: &[G1Projective]) {
    t.append_u64(label, vec.len() as u64);
    for p in vec {
        append_g1_point(t, b"g1_point", p)
    }
}

pub(crate) fn append_g2_vector(t: &mut Transcript, label: &'static [u8], vec: &[G2Projective]) {
    t.append_u64(label, vec.len() as u64);
    for p in vec {
        append_g2_point(t, b"g2_point", p)
    }
}

/// Appends an issuer public key's full tuple `(g, Y, g~, X~, Ỹ)` so every transcript binds `pk`.
pub(crate) fn append_public_key(t: &mut Transcript, pk: &crate::credential::keys::IssuerPublicKey) {
    append_g1_point(t, b"pk.g", &pk.g);
    append_g1_vector(t, b"pk.Y", &pk.cap_y);
    append_g2_point(t, b"pk.g_tilde", &pk.g_tilde);
    append_g2_point(t, b"pk.X_tilde", &pk.cap_x_tilde);
    append_g2_vector(t, b"pk.Y_tilde", &pk.cap_y_tilde);
}
