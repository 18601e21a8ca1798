//! Pointcheval–Sanders attribute-based anonymous credentials.
//!
//! Module layout mirrors the protocol's dependency order: curve context and keys at the bottom,
//! the signature scheme above that, issuance and showing built on the signature scheme, and the
//! `Server`/`Client` façade gluing everything to a wire format at the top.

use serde::{Deserialize, Serialize};

use crate::credential::attributes::AttributeMap;
use crate::credential::signature::PsSignature;

pub mod attributes;
pub mod client;
pub mod context;
pub mod issuance;
pub mod keys;
pub mod server;
pub mod showing;
pub mod signature;
pub mod transcript;
pub mod wire;

/// An anonymous credential: a PS signature valid over the full, now-fixed attribute vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credential {
    pub(crate) sig: PsSignature,
    pub(crate) full_attrs: AttributeMap,
}

impl Credential {
    pub fn attribute(&self, idx: usize) -> Option<&[u8]> {
        self.full_attrs.get(&idx).map(|v| v.as_slice())
    }

    pub fn num_attributes(&self) -> usize {
        self.full_attrs.len()
    }
}
