//! Issuer-side façade gluing the protocol steps to a byte-in/byte-out wire interface.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use rand_core::{CryptoRng, RngCore};

use crate::constants::{RESERVED_ATTRIBUTE_PASSWORD, RESERVED_ATTRIBUTE_USERNAME};
use crate::credential::attributes::AttributeMap;
use crate::credential::context::CredentialContext;
use crate::credential::issuance::{self, IssueRequest};
use crate::credential::keys::{self, IssuerSecretKey};
use crate::credential::showing::{self, DisclosureProof};
use crate::credential::wire::{self, PublicKeyBundle};
use crate::error::CredentialError;

/// An issuer. Owns the curve context and the write-once `username → issuer-chosen attributes`
/// registration record; does not hold the issuer secret key in memory between calls (callers pass
/// `sk_bytes` back in on every request, matching the byte-oriented wire interface in §6).
pub struct Server {
    ctx: CredentialContext,
    registrations: Mutex<HashMap<String, AttributeMap>>,
}

impl Server {
    pub fn new() -> Self {
        Self {
            ctx: CredentialContext::new(),
            registrations: Mutex::new(HashMap::new()),
        }
    }

    /// Generates a fresh CA key pair for the given subscription names, appending the reserved
    /// `username`/`password` slots. Returns `(sk_bytes, pk_bundle_bytes)`.
    pub fn generate_ca<R: RngCore + CryptoRng>(
        &self,
        subscriptions: &[String],
        rng: &mut R,
    ) -> Result<(Vec<u8>, Vec<u8>), CredentialError> {
        let mut subscription_map = BTreeMap::new();
        for (idx, name) in subscriptions.iter().enumerate() {
            subscription_map.insert(name.clone(), idx);
        }
        let n = subscriptions.len();
        subscription_map.insert(RESERVED_ATTRIBUTE_USERNAME.to_string(), n);
        subscription_map.insert(RESERVED_ATTRIBUTE_PASSWORD.to_string(), n + 1);

        let l = n + 2;
        let (sk, pk) = keys::generate_key(&self.ctx, l, rng);
        let bundle = PublicKeyBundle { pk, subscription_map };

        tracing::info!(l, "generated issuer key pair");
        Ok((wire::encode(&sk)?, wire::encode(&bundle)?))
    }

    /// Verifies the user's issue request, samples issuer-owned attribute values for every slot the
    /// user did not request, and blindly signs. Records the issuer-chosen values under `username`
    /// in the write-once registration map.
    pub fn process_registration<R: RngCore + CryptoRng>(
        &self,
        sk_bytes: &[u8],
        pk_bundle_bytes: &[u8],
        request_bytes: &[u8],
        username: &str,
        rng: &mut R,
    ) -> Result<Vec<u8>, CredentialError> {
        let sk: IssuerSecretKey = wire::decode(sk_bytes)?;
        let bundle: PublicKeyBundle = wire::decode(pk_bundle_bytes)?;
        let req: IssueRequest = wire::decode(request_bytes)?;

        let username_idx = *bundle
            .subscription_map
            .get(RESERVED_ATTRIBUTE_USERNAME)
            .ok_or(CredentialError::PolicyViolation("issuer key has no username slot"))?;
        let password_idx = *bundle
            .subscription_map
            .get(RESERVED_ATTRIBUTE_PASSWORD)
            .ok_or(CredentialError::PolicyViolation("issuer key has no password slot"))?;

        if !req.s.contains_key(&username_idx) || !req.s.contains_key(&password_idx) {
            return Err(CredentialError::PolicyViolation(
                "request does not cover the mandatory username/password slots",
            ));
        }

        let l = bundle.pk.num_attributes();
        let issuer_idx: BTreeSet<usize> = (0..l).filter(|idx| !req.s.contains_key(idx)).collect();

        let mut issuer_attrs = AttributeMap::new();
        for idx in issuer_idx {
            let mut bytes = vec![0u8; 16];
            rng.fill_bytes(&mut bytes);
            issuer_attrs.insert(idx, bytes);
        }

        let resp = issuance::sign_blind(&self.ctx, &sk, &bundle.pk, &req, issuer_attrs.clone(), rng)?;

        {
            let mut registrations = self.registrations.lock().expect("registration map mutex poisoned");
            if registrations.contains_key(username) {
                return Err(CredentialError::PolicyViolation("username already registered"));
            }
            registrations.insert(username.to_string(), issuer_attrs);
        }

        tracing::info!(username, "processed registration");
        Ok(wire::encode(&resp)?)
    }

    /// Verifies a disclosure proof against `message` and cross-checks that the proof's disclosed
    /// index set matches `disclosed_names` under the bundle's `subscription_map` — closing the
    /// binding gap between caller-claimed and actually-proven disclosed attributes.
    pub fn check_request_signature(
        &self,
        pk_bundle_bytes: &[u8],
        message: &[u8],
        disclosed_names: &[String],
        signature_bytes: &[u8],
    ) -> Result<bool, CredentialError> {
        let bundle: PublicKeyBundle = wire::decode(pk_bundle_bytes)?;
        let proof: DisclosureProof = wire::decode(signature_bytes)?;

        if !showing::verify(&self.ctx, &bundle.pk, &proof, message) {
            tracing::debug!("disclosure proof failed verification");
            return Ok(false);
        }

        let expected: BTreeSet<usize> = disclosed_names
            .iter()
            .filter_map(|name| bundle.subscription_map.get(name).copied())
            .collect();
        if expected.len() != disclosed_names.len() {
            tracing::debug!("disclosed_names contained an unknown subscription name");
            return Ok(false);
        }

        let actual: BTreeSet<usize> = proof.disclosed.keys().copied().collect();
        Ok(expected == actual)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}
