//! Staggered reveal timing.
//!
//! Blocks fade in one after another as the page loads. In the browser this is
//! pure CSS: each block carries `animation-delay` and the `reveal` keyframes
//! run with `fill-mode: both`, so a block is hidden until its delay elapses
//! and stays visible for the rest of the page's lifetime.
//!
//! [`RevealTimeline`] models the same schedule so the contract can be checked
//! without a browser: a block is revealed once `elapsed >= delay`, each block
//! is revealed exactly once, and nothing is ever hidden again.

use crate::types::ContentSection;

/// Reveal state of an ordered sequence of blocks.
///
/// A reference model of the CSS schedule. Rendering never consults it; the
/// generate tests check the delays written into pages against it.
#[derive(Debug, Clone)]
pub struct RevealTimeline {
    delays: Vec<u32>,
    revealed: Vec<bool>,
}

impl RevealTimeline {
    pub fn new(delays: impl IntoIterator<Item = u32>) -> Self {
        let delays: Vec<u32> = delays.into_iter().collect();
        let revealed = vec![false; delays.len()];
        Self { delays, revealed }
    }

    pub fn from_sections(sections: &[ContentSection]) -> Self {
        Self::new(sections.iter().map(|s| s.reveal_delay_ms))
    }

    /// Block indices in the order they appear: ascending delay, ties in input order.
    pub fn reveal_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.delays.len()).collect();
        order.sort_by_key(|&i| self.delays[i]);
        order
    }

    /// Move the clock to `elapsed_ms` and return the blocks revealed by this step,
    /// in reveal order.
    ///
    /// Moving the clock backwards reveals nothing and hides nothing.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<usize> {
        let mut newly = Vec::new();
        for i in self.reveal_order() {
            if !self.revealed[i] && elapsed_ms >= self.delays[i] {
                self.revealed[i] = true;
                newly.push(i);
            }
        }
        newly
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn all_revealed(&self) -> bool {
        self.revealed.iter().all(|&r| r)
    }

    /// Visibility of every block at a given time since load, ignoring state.
    pub fn visible_at(&self, elapsed_ms: u32) -> Vec<bool> {
        self.delays.iter().map(|&d| elapsed_ms >= d).collect()
    }
}

/// Inline style that schedules one block's fade.
pub fn reveal_style(delay_ms: u32) -> String {
    format!("animation-delay: {delay_ms}ms;")
}
