//! Trusted-dealer Beaver triplet generation, memoized per multiplication node.

use std::collections::HashMap;
use std::sync::Mutex;

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::smc::context::SmcContext;
use crate::smc::share::{random_field_element, share_secret, Share};

struct Triplet {
    a: Vec<Share>,
    b: Vec<Share>,
    c: Vec<Share>,
}

/// Draws fresh `(a, b, c=ab)` triplets on first request per `eid` and hands out each party's
/// slice on every subsequent request for the same `eid`. The dealer is trusted and assumed
/// offline with respect to the computing parties.
pub struct Dealer {
    ctx: SmcContext,
    triplets: Mutex<HashMap<String, Triplet>>,
}

impl Dealer {
    pub fn new(ctx: SmcContext) -> Self {
        Self {
            ctx,
            triplets: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `(⟨a⟩, ⟨b⟩, ⟨c⟩)` for `party_idx` under multiplication node `eid`, generating the
    /// underlying triplet the first time any party asks for it.
    pub fn triplet_share<R: RngCore + CryptoRng>(
        &self,
        eid: &str,
        party_idx: usize,
        rng: &mut R,
    ) -> (Share, Share, Share) {
        let mut triplets = self.triplets.lock().expect("beaver dealer mutex poisoned");
        let triplet = triplets.entry(eid.to_string()).or_insert_with(|| {
            let a = random_field_element(self.ctx.prime(), rng);
            let b = random_field_element(self.ctx.prime(), rng);
            let c = (&a * &b) % self.ctx.prime();
            let n = self.ctx.num_parties();
            Triplet {
                a: share_secret(&a, n, &self.ctx, rng),
                b: share_secret(&b, n, &self.ctx, rng),
                c: share_secret(&c, n, &self.ctx, rng),
            }
        });

        (
            triplet.a[party_idx].clone(),
            triplet.b[party_idx].clone(),
            triplet.c[party_idx].clone(),
        )
    }
}

#[allow(unused)]
fn debug_reconstructed_product(a: &BigUint, b: &BigUint, c: &BigUint, prime: &BigUint) -> bool {
    (a * b) % prime == *c % prime
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smc::share::reconstruct;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn ctx() -> SmcContext {
        SmcContext::new(BigUint::from(1_000_003u64), vec!["a".into(), "b".into(), "c".into()])
    }

    #[test]
    fn triplet_satisfies_a_times_b_equals_c() {
        let ctx = ctx();
        let dealer = Dealer::new(ctx.clone());
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let shares: Vec<(Share, Share, Share)> = (0..3).map(|i| dealer.triplet_share("mul-0", i, &mut rng)).collect();
        let a_shares: Vec<Share> = shares.iter().map(|(a, _, _)| a.clone()).collect();
        let b_shares: Vec<Share> = shares.iter().map(|(_, b, _)| b.clone()).collect();
        let c_shares: Vec<Share> = shares.iter().map(|(_, _, c)| c.clone()).collect();

        let a = reconstruct(&a_shares, &ctx);
        let b = reconstruct(&b_shares, &ctx);
        let c = reconstruct(&c_shares, &ctx);
        assert!(debug_reconstructed_product(&a, &b, &c, ctx.prime()));
    }

    #[test]
    fn same_eid_is_memoized() {
        let ctx = ctx();
        let dealer = Dealer::new(ctx);
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let first = dealer.triplet_share("mul-0", 0, &mut rng);
        let second = dealer.triplet_share("mul-0", 0, &mut rng);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
        assert_eq!(first.2, second.2);
    }
}
