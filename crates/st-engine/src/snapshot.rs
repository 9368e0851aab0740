//! Per-turn input.

use st_core::NodeId;

/// Where one UFO is now and where it will be over the next two turns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UfoSighting {
    pub current: NodeId,
    pub next: NodeId,
    pub next_next: NodeId,
}

impl UfoSighting {
    pub fn new(current: NodeId, next: NodeId, next_next: NodeId) -> Self {
        Self { current, next, next_next }
    }
}

/// Everything the engine learns at the start of a turn.
///
/// Ids are not range-checked here (the snapshot does not know the field
/// size); the engine treats out-of-range ids like `NodeId::INVALID`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSnapshot {
    pub ufos: Vec<UfoSighting>,
    /// Ship positions in ship order.
    pub ships: Vec<NodeId>,
}

impl TurnSnapshot {
    pub fn new(ufos: Vec<UfoSighting>, ships: Vec<NodeId>) -> Self {
        Self { ufos, ships }
    }

    /// Decode the flat wire form: `ufos` is `current, next, next_next` per
    /// UFO, `ships` one node id per ship.
    ///
    /// A trailing partial triple is dropped and values that cannot be node
    /// ids (negative or too large) become `NodeId::INVALID`; both are logged.
    pub fn from_flat(ufos: &[i64], ships: &[i64]) -> Self {
        if ufos.len() % 3 != 0 {
            tracing::warn!(len = ufos.len(), "UFO list is not a whole number of triples; dropping the tail");
        }
        let ufos = ufos
            .chunks_exact(3)
            .map(|t| UfoSighting::new(to_node(t[0]), to_node(t[1]), to_node(t[2])))
            .collect();
        let ships = ships.iter().map(|&v| to_node(v)).collect();
        Self { ufos, ships }
    }
}

fn to_node(raw: i64) -> NodeId {
    match u32::try_from(raw) {
        Ok(v) if v != u32::MAX => NodeId(v),
        _ => {
            tracing::warn!(raw, "value is not a node id");
            NodeId::INVALID
        }
    }
}
