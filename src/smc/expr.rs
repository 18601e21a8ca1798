//! Arena-indexed arithmetic expression AST.
//!
//! Expressions are a DAG, not a pure tree: a `Secret` node may be referenced from more than one
//! place and must keep a single id rather than being cloned per reference. Modeled as an arena:
//! nodes live in a flat `Vec` and reference each other by integer id.
//! A node's id doubles as its `eid` — the identifier the evaluator uses to key per-node protocol
//! messages and Beaver triplets (§4.8).

use num_bigint::BigUint;

pub type NodeId = usize;

#[derive(Clone, Debug)]
pub enum NodeKind {
    Scalar(BigUint),
    Secret(String),
    Add(NodeId, NodeId),
    Mul(NodeId, NodeId),
}

/// An arena of expression nodes. Every `Expression` instance used by all parties in one
/// computation must be built identically (same node ids in the same order) since `eid`s are
/// derived from position.
#[derive(Clone, Debug, Default)]
pub struct Expression {
    nodes: Vec<NodeKind>,
}

impl Expression {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn scalar(&mut self, v: impl Into<BigUint>) -> NodeId {
        self.push(NodeKind::Scalar(v.into()))
    }

    pub fn secret(&mut self, sid: impl Into<String>) -> NodeId {
        self.push(NodeKind::Secret(sid.into()))
    }

    pub fn add(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Add(left, right))
    }

    pub fn mul(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.push(NodeKind::Mul(left, right))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(kind);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_secret_node_keeps_a_single_id() {
        let mut e = Expression::new();
        let a = e.secret("a");
        let sum = e.add(a, a);
        assert!(matches!(e.node(sum), NodeKind::Add(l, r) if *l == a && *r == a));
    }
}
