//! Symbol-to-authority partitioning.

use dashmap::DashMap;

/// The partition that unregistered symbols resolve to. Ordinary assetchains
/// all share this authority; only specially registered chains live in
/// separate trust partitions.
pub const DEFAULT_AUTHORITY: u32 = 0;

/// Registry mapping assetchain symbols to authority partitions.
///
/// Only notarisations whose symbol shares the target's authority contribute
/// to the target's proof root; the partition keeps unrelated trust domains
/// from polluting each other's roots.
#[derive(Debug, Default)]
pub struct AuthorityRegistry {
    partitions: DashMap<String, u32>,
}

impl AuthorityRegistry {
    /// Create a registry where every symbol resolves to
    /// [`DEFAULT_AUTHORITY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a symbol to an authority partition.
    pub fn register(&self, symbol: impl Into<String>, authority: u32) {
        self.partitions.insert(symbol.into(), authority);
    }

    /// The authority partition for a symbol.
    pub fn authority_of(&self, symbol: &str) -> u32 {
        self.partitions
            .get(symbol)
            .map(|entry| *entry.value())
            .unwrap_or(DEFAULT_AUTHORITY)
    }

    /// Whether two symbols share an authority partition.
    pub fn same_authority(&self, a: &str, b: &str) -> bool {
        self.authority_of(a) == self.authority_of(b)
    }
}
