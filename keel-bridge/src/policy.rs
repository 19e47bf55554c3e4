//! Scan policy.

/// Default bound on every notarisation scan, in blocks.
pub const DEFAULT_SCAN_LIMIT_BLOCKS: u64 = 1440;

/// Bounds for the engine's chain scans.
///
/// Every scan, forward for the next notarisation or backward for the proof
/// root window, examines at most `scan_limit_blocks` blocks, clipped to the
/// tip snapshot taken at proof entry.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
    /// Maximum number of blocks one scan may examine.
    pub scan_limit_blocks: u64,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            scan_limit_blocks: DEFAULT_SCAN_LIMIT_BLOCKS,
        }
    }
}

impl ScanPolicy {
    /// A policy with a custom scan limit.
    pub fn with_limit(scan_limit_blocks: u64) -> Self {
        Self { scan_limit_blocks }
    }

    /// Last height (inclusive) a forward scan from `from` may examine,
    /// given the pinned tip. `None` when the window is empty.
    pub(crate) fn forward_end(&self, from: u64, tip: u64) -> Option<u64> {
        if from > tip || self.scan_limit_blocks == 0 {
            return None;
        }
        Some(u64::min(
            from.saturating_add(self.scan_limit_blocks - 1),
            tip,
        ))
    }
}
