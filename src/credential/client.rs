//! User-side façade: registration and selective-disclosure showing.

use std::collections::BTreeSet;

use rand_core::{CryptoRng, RngCore};

use crate::constants::{RESERVED_ATTRIBUTE_PASSWORD, RESERVED_ATTRIBUTE_USERNAME};
use crate::credential::attributes::AttributeMap;
use crate::credential::context::CredentialContext;
use crate::credential::issuance::{self, BlindSignatureResponse, IssuanceState};
use crate::credential::showing;
use crate::credential::wire::{self, PublicKeyBundle};
use crate::credential::Credential;
use crate::error::CredentialError;

/// A user. Holds the state that must survive across the two-round-trip issuance protocol:
/// `username`, a locally generated `password`, and the pending [`IssuanceState`] once a request
/// has been sent but not yet answered.
pub struct Client {
    ctx: CredentialContext,
    username: String,
    password: Vec<u8>,
    pending: Option<IssuanceState>,
}

impl Client {
    pub fn new<R: RngCore + CryptoRng>(username: impl Into<String>, rng: &mut R) -> Self {
        let mut password = vec![0u8; 16];
        rng.fill_bytes(&mut password);
        Self {
            ctx: CredentialContext::new(),
            username: username.into(),
            password,
            pending: None,
        }
    }

    /// Builds an issue request disclosing `subscriptions` (each attribute's value is its own
    /// name, acting as a membership flag) plus the mandatory `username`/`password` slots.
    pub fn prepare_registration<R: RngCore + CryptoRng>(
        &mut self,
        pk_bundle_bytes: &[u8],
        subscriptions: &[String],
        rng: &mut R,
    ) -> Result<Vec<u8>, CredentialError> {
        let bundle: PublicKeyBundle = wire::decode(pk_bundle_bytes)?;

        let mut user_attrs = AttributeMap::new();
        for name in subscriptions {
            let idx = *bundle
                .subscription_map
                .get(name)
                .ok_or(CredentialError::PolicyViolation("unknown subscription name"))?;
            user_attrs.insert(idx, name.as_bytes().to_vec());
        }

        let username_idx = *bundle
            .subscription_map
            .get(RESERVED_ATTRIBUTE_USERNAME)
            .ok_or(CredentialError::PolicyViolation("issuer key has no username slot"))?;
        let password_idx = *bundle
            .subscription_map
            .get(RESERVED_ATTRIBUTE_PASSWORD)
            .ok_or(CredentialError::PolicyViolation("issuer key has no password slot"))?;
        user_attrs.insert(username_idx, self.username.as_bytes().to_vec());
        user_attrs.insert(password_idx, self.password.clone());

        let (req, state) = issuance::prepare_issue_request(&self.ctx, &bundle.pk, user_attrs, rng);
        self.pending = Some(state);

        tracing::info!(username = %self.username, "prepared registration request");
        Ok(wire::encode(&req)?)
    }

    /// Unblinds the issuer's response against the pending issuance state and self-verifies.
    pub fn process_registration_response(
        &mut self,
        pk_bundle_bytes: &[u8],
        response_bytes: &[u8],
    ) -> Result<Vec<u8>, CredentialError> {
        let bundle: PublicKeyBundle = wire::decode(pk_bundle_bytes)?;
        let resp: BlindSignatureResponse = wire::decode(response_bytes)?;
        let state = self
            .pending
            .take()
            .ok_or(CredentialError::PolicyViolation("no pending registration"))?;

        let cred = issuance::unblind(&bundle.pk, &state, &resp)?;
        tracing::info!(username = %self.username, "obtained credential");
        Ok(wire::encode(&cred)?)
    }

    /// Produces a disclosure proof for `credential_bytes`, disclosing exactly `disclosed_names`.
    /// Refuses to ever disclose `password`.
    pub fn sign_request<R: RngCore + CryptoRng>(
        &self,
        pk_bundle_bytes: &[u8],
        credential_bytes: &[u8],
        message: &[u8],
        disclosed_names: &[String],
        rng: &mut R,
    ) -> Result<Vec<u8>, CredentialError> {
        if disclosed_names.iter().any(|name| name == RESERVED_ATTRIBUTE_PASSWORD) {
            return Err(CredentialError::PolicyViolation("refusing to disclose password"));
        }

        let bundle: PublicKeyBundle = wire::decode(pk_bundle_bytes)?;
        let credential: Credential = wire::decode(credential_bytes)?;

        let disclosed: BTreeSet<usize> = disclosed_names
            .iter()
            .map(|name| {
                bundle
                    .subscription_map
                    .get(name)
                    .copied()
                    .ok_or(CredentialError::PolicyViolation("unknown subscription name"))
            })
            .collect::<Result<_, _>>()?;

        let proof = showing::prove(&self.ctx, &bundle.pk, &credential, &disclosed, message, rng);
        tracing::info!(username = %self.username, n_disclosed = disclosed.len(), "produced showing proof");
        Ok(wire::encode(&proof)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::server::Server;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn refuses_to_disclose_password() {
        let mut rng = ChaCha20Rng::seed_from_u64(55);
        let server = Server::new();
        let subscriptions = vec!["gold".to_string()];
        let (sk_bytes, pk_bundle_bytes) = server.generate_ca(&subscriptions, &mut rng).unwrap();

        let mut client = Client::new("carol", &mut rng);
        let request_bytes = client
            .prepare_registration(&pk_bundle_bytes, &["gold".to_string()], &mut rng)
            .unwrap();
        let response_bytes = server
            .process_registration(&sk_bytes, &pk_bundle_bytes, &request_bytes, "carol", &mut rng)
            .unwrap();
        let credential_bytes = client
            .process_registration_response(&pk_bundle_bytes, &response_bytes)
            .unwrap();

        let err = client
            .sign_request(
                &pk_bundle_bytes,
                &credential_bytes,
                b"m",
                &["password".to_string()],
                &mut rng,
            )
            .unwrap_err();
        assert!(matches!(err, CredentialError::PolicyViolation(_)));
    }
}
