//! Public per-party entry point: evaluate an [`Expression`] and reconstruct its result.

use std::collections::HashMap;

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::error::SmcError;
use crate::smc::beaver::Dealer;
use crate::smc::bus::MessageBus;
use crate::smc::context::SmcContext;
use crate::smc::evaluator::{Evaluator, Value};
use crate::smc::expr::{Expression, NodeId};
use crate::smc::share::{reconstruct, Share};

/// One participant in a secure multiparty computation. Holds this party's own secret inputs
/// (keyed by `sid`) and a reference to the shared bus and trusted-dealer triplet source.
pub struct Party<'a, B: MessageBus> {
    ctx: &'a SmcContext,
    bus: &'a B,
    dealer: &'a Dealer,
    party_id: String,
    secret_owners: HashMap<String, String>,
    inputs: HashMap<String, BigUint>,
}

impl<'a, B: MessageBus> Party<'a, B> {
    pub fn new(
        ctx: &'a SmcContext,
        bus: &'a B,
        dealer: &'a Dealer,
        party_id: impl Into<String>,
        secret_owners: HashMap<String, String>,
        inputs: HashMap<String, BigUint>,
    ) -> Self {
        Self {
            ctx,
            bus,
            dealer,
            party_id: party_id.into(),
            secret_owners,
            inputs,
        }
    }

    /// Evaluates `expr` down to `root`, publishes this party's final share, and reconstructs the
    /// plaintext result from every party's published share.
    pub fn evaluate<R: RngCore + CryptoRng>(
        &self,
        expr: &Expression,
        root: NodeId,
        rng: R,
    ) -> Result<BigUint, SmcError> {
        let evaluator = Evaluator::new(
            self.ctx,
            self.bus,
            self.dealer,
            self.party_id.clone(),
            &self.secret_owners,
            &self.inputs,
            rng,
        )?;

        let result = evaluator.eval(expr, root)?;
        let final_share = match result {
            Value::Share(s) => s,
            Value::Scalar(v) => {
                // A circuit with no secret inputs on the path to root evaluates to a public
                // scalar directly; every party already holds the same value.
                return Ok(v);
            }
        };

        self.bus.publish(&self.party_id, "final", final_share.to_bytes(self.ctx));
        let mut shares = Vec::with_capacity(self.ctx.num_parties());
        for party in self.ctx.parties() {
            let bytes = self.bus.fetch(party, "final")?;
            shares.push(Share::from_bytes(&bytes));
        }
        Ok(reconstruct(&shares, self.ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smc::bus::InMemoryBus;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn test_ctx() -> SmcContext {
        SmcContext::new(BigUint::from(2_147_483_647u64), vec!["alice".into(), "bob".into(), "carol".into()])
    }

    fn run_three_parties(
        expr: Arc<Expression>,
        root: NodeId,
        secret_owners: HashMap<String, String>,
        inputs: Vec<HashMap<String, BigUint>>,
    ) -> Vec<BigUint> {
        run_with_roster(test_ctx(), expr, root, secret_owners, inputs)
    }

    /// Like [`run_three_parties`], but lets the caller supply the roster order passed to
    /// [`SmcContext::new`] (which sorts it internally) to check that reconstruction is unaffected
    /// by the order parties happened to be listed in.
    fn run_with_roster(
        ctx: SmcContext,
        expr: Arc<Expression>,
        root: NodeId,
        secret_owners: HashMap<String, String>,
        inputs: Vec<HashMap<String, BigUint>>,
    ) -> Vec<BigUint> {
        let ctx = Arc::new(ctx);
        let bus = Arc::new(InMemoryBus::new(Duration::from_secs(5)));
        let dealer = Arc::new(Dealer::new((*ctx).clone()));
        let owners = Arc::new(secret_owners);

        let handles: Vec<_> = ctx
            .parties()
            .to_vec()
            .into_iter()
            .zip(inputs)
            .enumerate()
            .map(|(i, (party_id, party_inputs))| {
                let ctx = Arc::clone(&ctx);
                let bus = Arc::clone(&bus);
                let dealer = Arc::clone(&dealer);
                let owners = Arc::clone(&owners);
                let expr = Arc::clone(&expr);
                thread::spawn(move || {
                    let rng = ChaCha20Rng::seed_from_u64(100 + i as u64);
                    let party = Party::new(&*ctx, &*bus, &*dealer, party_id, (*owners).clone(), party_inputs);
                    party.evaluate(&expr, root, rng).unwrap()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn three_party_addition() {
        let mut expr = Expression::new();
        let a = expr.secret("a");
        let b = expr.secret("b");
        let c = expr.secret("c");
        let ab = expr.add(a, b);
        let root = expr.add(ab, c);
        let expr = Arc::new(expr);

        let mut owners = HashMap::new();
        owners.insert("a".to_string(), "alice".to_string());
        owners.insert("b".to_string(), "bob".to_string());
        owners.insert("c".to_string(), "carol".to_string());

        let mut alice_in = HashMap::new();
        alice_in.insert("a".to_string(), BigUint::from(10u32));
        let mut bob_in = HashMap::new();
        bob_in.insert("b".to_string(), BigUint::from(4u32));
        let mut carol_in = HashMap::new();
        carol_in.insert("c".to_string(), BigUint::from(5u32));

        let results = run_three_parties(expr, root, owners, vec![alice_in, bob_in, carol_in]);
        for r in &results {
            assert_eq!(*r, BigUint::from(19u32));
        }
    }

    #[test]
    fn addition_with_public_scalars() {
        let mut expr = Expression::new();
        let x = expr.secret("x");
        let two = expr.scalar(2u32);
        let three = expr.scalar(3u32);
        let sum = expr.add(x, two);
        let root = expr.mul(sum, three);
        let expr = Arc::new(expr);

        let mut owners = HashMap::new();
        owners.insert("x".to_string(), "alice".to_string());

        let mut alice_in = HashMap::new();
        alice_in.insert("x".to_string(), BigUint::from(5u32));

        let results = run_three_parties(expr, root, owners, vec![alice_in, HashMap::new(), HashMap::new()]);
        for r in &results {
            assert_eq!(*r, BigUint::from(21u32));
        }
    }

    #[test]
    fn beaver_multiplication_is_order_independent() {
        let mut expr = Expression::new();
        let a = expr.secret("a");
        let b = expr.secret("b");
        let root = expr.mul(a, b);
        let expr = Arc::new(expr);

        let mut owners = HashMap::new();
        owners.insert("a".to_string(), "alice".to_string());
        owners.insert("b".to_string(), "bob".to_string());

        let mut alice_in = HashMap::new();
        alice_in.insert("a".to_string(), BigUint::from(6u32));
        let mut bob_in = HashMap::new();
        bob_in.insert("b".to_string(), BigUint::from(4u32));

        let results = run_three_parties(expr, root, owners, vec![alice_in, bob_in, HashMap::new()]);
        for r in &results {
            assert_eq!(*r, BigUint::from(24u32));
        }
    }

    /// The designated party is derived from the roster's sorted order, not the order the roster
    /// happened to be listed in; a computation built from a permuted roster must reconstruct to
    /// the same value as one built from the canonical order.
    #[test]
    fn beaver_multiplication_is_invariant_to_roster_listing_order() {
        let mut owners = HashMap::new();
        owners.insert("a".to_string(), "alice".to_string());
        owners.insert("b".to_string(), "bob".to_string());

        let mut alice_in = HashMap::new();
        alice_in.insert("a".to_string(), BigUint::from(6u32));
        let mut bob_in = HashMap::new();
        bob_in.insert("b".to_string(), BigUint::from(4u32));

        let prime = BigUint::from(2_147_483_647u64);
        let rosters = [
            vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
            vec!["carol".to_string(), "alice".to_string(), "bob".to_string()],
        ];

        for roster in rosters {
            let mut expr = Expression::new();
            let a = expr.secret("a");
            let b = expr.secret("b");
            let root = expr.mul(a, b);
            let expr = Arc::new(expr);

            let ctx = SmcContext::new(prime.clone(), roster);
            let results = run_with_roster(
                ctx,
                expr,
                root,
                owners.clone(),
                vec![alice_in.clone(), bob_in.clone(), HashMap::new()],
            );
            for r in &results {
                assert_eq!(*r, BigUint::from(24u32));
            }
        }
    }
}
