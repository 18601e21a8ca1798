//! Canonical wire encoding for every credential protocol message.
//!
//! Every logical wire type is either a struct defined alongside its protocol step
//! (`IssueRequest`, `BlindSignatureResponse`, `Credential`, `DisclosureProof`) or, for the two
//! bundle types that don't belong to a single protocol step, defined here. All of them round-trip
//! through `bcs`, the same deterministic binary framing this workspace already uses for its own
//! signed/transcripted values.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::credential::keys::IssuerPublicKey;
use crate::error::WireError;

/// The public bundle an issuer hands out: its public key plus the stable `name → slot index` map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKeyBundle {
    pub pk: IssuerPublicKey,
    pub subscription_map: BTreeMap<String, usize>,
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    bcs::to_bytes(value).map_err(|e| WireError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    bcs::from_bytes(bytes).map_err(|e| WireError::Decode(e.to_string()))
}
