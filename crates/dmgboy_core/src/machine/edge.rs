/// Edge detector over a signal sampled once per machine cycle.
///
/// Both the timer's input (falling edge increments TIMA) and the PPU's STAT
/// interrupt line (rising edge requests INT $48) compare the current level
/// against the level latched on the previous sample, never against the
/// current one, so a level that stays asserted fires only once.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct EdgeLatch {
    previous: bool,
}

impl EdgeLatch {
    /// Latch `level`; true on a low to high transition.
    #[inline]
    pub(super) fn rising(&mut self, level: bool) -> bool {
        let edge = !self.previous && level;
        self.previous = level;
        edge
    }

    /// Latch `level`; true on a high to low transition.
    #[inline]
    pub(super) fn falling(&mut self, level: bool) -> bool {
        let edge = self.previous && !level;
        self.previous = level;
        edge
    }

    /// Force the latched level without reporting an edge.
    #[inline]
    pub(super) fn reset(&mut self, level: bool) {
        self.previous = level;
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeLatch;

    #[test]
    fn held_level_fires_once() {
        let mut latch = EdgeLatch::default();
        assert!(latch.rising(true));
        assert!(!latch.rising(true));
        assert!(!latch.rising(false));
        assert!(latch.rising(true));
    }

    #[test]
    fn falling_edge_against_previous_sample() {
        let mut latch = EdgeLatch::default();
        latch.reset(true);
        assert!(latch.falling(false));
        assert!(!latch.falling(false));
        assert!(!latch.falling(true));
        assert!(latch.falling(false));
    }
}
