//! Typed error taxonomy for credential and SMC protocol failures.
//!
//! Cryptographic predicates (`verify`, `verify_issue_request`, `verify_disclosure_proof`) keep
//! returning plain `bool` at their natural layer; only the façade and the SMC evaluator convert a
//! failed predicate into one of these typed errors. A failed verification must never be mapped to
//! `Ok(())`.

use thiserror::Error;

/// Errors surfaced by the credential façade (issuance, showing, wire (de)serialization).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A message vector did not have exactly `L` entries.
    #[error("expected {expected} attributes, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A cryptographic predicate (signature, proof-of-knowledge, disclosure proof) rejected.
    #[error("invalid proof or signature")]
    InvalidProof,

    /// A protocol-level policy was violated (e.g. a mandatory attribute slot was withheld, or a
    /// disclosure request named a slot that must never be disclosed).
    #[error("policy violation: {0}")]
    PolicyViolation(&'static str),

    /// User-supplied and issuer-supplied attribute index sets were not a clean partition of
    /// `{0, ..., L-1}`.
    #[error("attribute index sets {user:?} and {issuer:?} do not partition 0..{total}")]
    BadAttributePartition {
        user: Vec<usize>,
        issuer: Vec<usize>,
        total: usize,
    },

    /// Wire (de)serialization failed.
    #[error("wire encoding error: {0}")]
    Wire(#[from] WireError),
}

/// Errors from (de)serializing protocol messages to/from their canonical wire encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("failed to encode value: {0}")]
    Encode(String),
    #[error("failed to decode value: {0}")]
    Decode(String),
    #[error("malformed group element or scalar encoding")]
    MalformedElement,
}

/// Errors from the SMC expression evaluator and message bus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmcError {
    /// A blocking mailbox read did not complete before its deadline; the evaluator aborts rather
    /// than deadlocking forever on an unmet `recv`/`fetch`.
    #[error("evaluation aborted waiting on {0}")]
    Aborted(String),

    /// A node referenced a party id that is not part of the fixed roster.
    #[error("unknown party: {0}")]
    UnknownParty(String),

    /// A `Secret` node was referenced with no owner and no value ever published for its `sid`.
    #[error("no value available for secret {0}")]
    MissingSecret(String),
}
