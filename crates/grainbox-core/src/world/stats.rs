//! Simulation statistics collection trait

use super::physics_step::ColumnOrder;

/// Trait for collecting simulation statistics
///
/// Rules report what they did through this so callers can choose between
/// counting (`TickStats`) and ignoring (`NoopStats`) without touching the
/// rule code.
pub trait SimStats {
    /// A cell's rule was evaluated
    fn record_rule_applied(&mut self);

    /// A cell changed position (fall, slide, flow, sink)
    fn record_cell_moved(&mut self);

    /// A vacuum turned a neighbor into Empty
    fn record_cell_erased(&mut self);

    /// A cloner stamped its remembered material into a neighbor
    fn record_cell_cloned(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_rule_applied(&mut self) {}
    fn record_cell_moved(&mut self) {}
    fn record_cell_erased(&mut self) {}
    fn record_cell_cloned(&mut self) {}
}

/// Counters for a single tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub rules_applied: u64,
    pub cells_moved: u64,
    pub cells_erased: u64,
    pub cells_cloned: u64,
    /// Column order the sweep used
    pub column_order: ColumnOrder,
}

impl TickStats {
    /// True if the tick changed nothing
    pub fn is_idle(&self) -> bool {
        self.cells_moved == 0 && self.cells_erased == 0 && self.cells_cloned == 0
    }
}

impl SimStats for TickStats {
    fn record_rule_applied(&mut self) {
        self.rules_applied += 1;
    }

    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }

    fn record_cell_erased(&mut self) {
        self.cells_erased += 1;
    }

    fn record_cell_cloned(&mut self) {
        self.cells_cloned += 1;
    }
}
