//! Per-party circuit evaluation over the shared expression DAG.
//!
//! Each party runs one `Evaluator` against the same [`Expression`] arena. `Add`/`Mul` results are
//! memoized per node id so a node referenced twice is only evaluated once; `Secret` node results
//! are additionally cached per `sid`, since a secret must only be shared out by its owner once
//! even when more than one AST node names the same `sid`.

use std::cell::RefCell;
use std::collections::HashMap;

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::error::SmcError;
use crate::smc::beaver::Dealer;
use crate::smc::bus::MessageBus;
use crate::smc::context::SmcContext;
use crate::smc::expr::{Expression, NodeId, NodeKind};
use crate::smc::share::Share;

#[derive(Clone, Debug)]
pub(crate) enum Value {
    Share(Share),
    Scalar(BigUint),
}

/// One party's view of a single evaluation run. `inputs` holds the `sid -> value` map this party
/// owns; a `Secret(sid)` node belonging to a different party is read off the bus instead.
pub(crate) struct Evaluator<'a, B: MessageBus, R: RngCore + CryptoRng> {
    ctx: &'a SmcContext,
    bus: &'a B,
    dealer: &'a Dealer,
    party_id: String,
    party_idx: usize,
    secret_owners: &'a HashMap<String, String>,
    inputs: &'a HashMap<String, BigUint>,
    node_cache: RefCell<HashMap<NodeId, Value>>,
    secret_cache: RefCell<HashMap<String, Share>>,
    rng: RefCell<R>,
}

impl<'a, B: MessageBus, R: RngCore + CryptoRng> Evaluator<'a, B, R> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ctx: &'a SmcContext,
        bus: &'a B,
        dealer: &'a Dealer,
        party_id: impl Into<String>,
        secret_owners: &'a HashMap<String, String>,
        inputs: &'a HashMap<String, BigUint>,
        rng: R,
    ) -> Result<Self, SmcError> {
        let party_id = party_id.into();
        let party_idx = ctx
            .party_index(&party_id)
            .ok_or_else(|| SmcError::UnknownParty(party_id.clone()))?;
        Ok(Self {
            ctx,
            bus,
            dealer,
            party_id,
            party_idx,
            secret_owners,
            inputs,
            node_cache: RefCell::new(HashMap::new()),
            secret_cache: RefCell::new(HashMap::new()),
            rng: RefCell::new(rng),
        })
    }

    pub(crate) fn eval(&self, expr: &Expression, node: NodeId) -> Result<Value, SmcError> {
        if let Some(v) = self.node_cache.borrow().get(&node) {
            return Ok(v.clone());
        }
        let value = match expr.node(node) {
            NodeKind::Scalar(v) => Value::Scalar(v.clone()),
            NodeKind::Secret(sid) => Value::Share(self.eval_secret(sid)?),
            NodeKind::Add(l, r) => {
                let left = self.eval(expr, *l)?;
                let right = self.eval(expr, *r)?;
                self.combine_add(left, right)
            }
            NodeKind::Mul(l, r) => {
                let left = self.eval(expr, *l)?;
                let right = self.eval(expr, *r)?;
                self.combine_mul(&format!("mul:{node}"), left, right)?
            }
        };
        self.node_cache.borrow_mut().insert(node, value.clone());
        Ok(value)
    }

    /// Shares out `sid` if this party owns it, otherwise receives it from its owner. Memoized so
    /// a secret referenced from several AST nodes is shared/received exactly once.
    fn eval_secret(&self, sid: &str) -> Result<Share, SmcError> {
        if let Some(share) = self.secret_cache.borrow().get(sid) {
            return Ok(share.clone());
        }
        let owner = self
            .secret_owners
            .get(sid)
            .ok_or_else(|| SmcError::MissingSecret(sid.to_string()))?;

        let share = if owner == &self.party_id {
            let value = self
                .inputs
                .get(sid)
                .ok_or_else(|| SmcError::MissingSecret(sid.to_string()))?;
            let mut rng = self.rng.borrow_mut();
            let shares = crate::smc::share::share_secret(value, self.ctx.num_parties(), self.ctx, &mut *rng);
            for (idx, party) in self.ctx.parties().iter().enumerate() {
                if party != &self.party_id {
                    self.bus
                        .send(&self.party_id, party, &format!("secret:{sid}"), shares[idx].to_bytes(self.ctx));
                }
            }
            shares[self.party_idx].clone()
        } else {
            let bytes = self.bus.recv(owner, &self.party_id, &format!("secret:{sid}"))?;
            Share::from_bytes(&bytes)
        };

        self.secret_cache.borrow_mut().insert(sid.to_string(), share.clone());
        Ok(share)
    }

    fn combine_add(&self, left: Value, right: Value) -> Value {
        match (left, right) {
            (Value::Share(a), Value::Share(b)) => Value::Share(a.add(&b, self.ctx)),
            (Value::Share(a), Value::Scalar(s)) | (Value::Scalar(s), Value::Share(a)) => {
                if self.ctx.is_designated(&self.party_id) {
                    Value::Share(a.add_scalar(&s, self.ctx))
                } else {
                    Value::Share(a)
                }
            }
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar((a + b) % self.ctx.prime()),
        }
    }

    fn combine_mul(&self, eid: &str, left: Value, right: Value) -> Result<Value, SmcError> {
        match (left, right) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar((a * b) % self.ctx.prime())),
            (Value::Share(a), Value::Scalar(s)) | (Value::Scalar(s), Value::Share(a)) => {
                Ok(Value::Share(a.mul_scalar(&s, self.ctx)))
            }
            (Value::Share(x), Value::Share(y)) => Ok(Value::Share(self.beaver_mul(eid, &x, &y)?)),
        }
    }

    /// Beaver's trick for `⟨x⟩ · ⟨y⟩` with a trusted-dealer triplet `(⟨a⟩, ⟨b⟩, ⟨c=ab⟩)`:
    /// every party opens `d = x - a` and `e = y - b` publicly, then locally computes
    /// `z = c + D·y + E·x − [designated]·D·E` where `D`/`E` are the reconstructed openings.
    /// Only the designated party applies the `−D·E` term; applying it at every party would sum
    /// to `−N·D·E` once shares are reconstructed instead of `−D·E`.
    fn beaver_mul(&self, eid: &str, x: &Share, y: &Share) -> Result<Share, SmcError> {
        let (a, b, c) = self.dealer.triplet_share(eid, self.party_idx, &mut *self.rng.borrow_mut());

        let d_share = x.add(&a.negate(self.ctx), self.ctx);
        let e_share = y.add(&b.negate(self.ctx), self.ctx);
        self.bus
            .publish(&self.party_id, &format!("{eid}:d"), d_share.to_bytes(self.ctx));
        self.bus
            .publish(&self.party_id, &format!("{eid}:e"), e_share.to_bytes(self.ctx));

        let mut d = BigUint::from(0u32);
        let mut e = BigUint::from(0u32);
        for party in self.ctx.parties() {
            let d_bytes = self.bus.fetch(party, &format!("{eid}:d"))?;
            let e_bytes = self.bus.fetch(party, &format!("{eid}:e"))?;
            d = (d + Share::from_bytes(&d_bytes).value()) % self.ctx.prime();
            e = (e + Share::from_bytes(&e_bytes).value()) % self.ctx.prime();
        }

        let mut z = c.add(&y.mul_scalar(&d, self.ctx), self.ctx);
        z = z.add(&x.mul_scalar(&e, self.ctx), self.ctx);
        if self.ctx.is_designated(&self.party_id) {
            let correction = (&d * &e) % self.ctx.prime();
            let neg_correction = if correction.is_zero() {
                BigUint::zero()
            } else {
                self.ctx.prime() - &correction
            };
            z = z.add_scalar(&neg_correction, self.ctx);
        }
        Ok(z)
    }
}
