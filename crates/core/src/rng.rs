//! RNG module - seeded pair generation
//!
//! Pairs are generated with an independent uniform color per cell, drawn from
//! the configured palette. The queue always holds the next two pairs; the
//! session promotes `next` into play and refills `next_next` from the generator.
//!
//! A simple LCG keeps every session reproducible from its seed.

use crate::piece::PuyoPair;
use puyo_chain_types::PuyoColor;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Low bits of an LCG cycle quickly; take the high ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Pick a uniformly random element. `None` for an empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_range(items.len() as u32) as usize;
        items.get(idx).copied()
    }

    /// Current generator state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Next/next-next pair queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceQueue {
    rng: SimpleRng,
    palette: Vec<PuyoColor>,
    width: u16,
    next: PuyoPair,
    next_next: PuyoPair,
}

impl PieceQueue {
    /// Create a queue and pre-generate the two preview pairs.
    ///
    /// An empty palette falls back to the default palette; validated
    /// configurations never hit that path.
    pub fn new(seed: u32, palette: &[PuyoColor], width: u16) -> Self {
        let palette = if palette.is_empty() {
            PuyoColor::DEFAULT_PALETTE.to_vec()
        } else {
            palette.to_vec()
        };
        let mut rng = SimpleRng::new(seed);
        let next = Self::roll(&mut rng, &palette, width);
        let next_next = Self::roll(&mut rng, &palette, width);
        Self {
            rng,
            palette,
            width,
            next,
            next_next,
        }
    }

    fn roll(rng: &mut SimpleRng, palette: &[PuyoColor], width: u16) -> PuyoPair {
        let pivot = rng.choose(palette).unwrap_or(PuyoColor::Red);
        let satellite = rng.choose(palette).unwrap_or(PuyoColor::Red);
        PuyoPair::spawn(width, pivot, satellite)
    }

    /// Generate a fresh pair at the spawn position
    pub fn generate(&mut self) -> PuyoPair {
        Self::roll(&mut self.rng, &self.palette, self.width)
    }

    /// Take the next pair: next <- next-next <- freshly generated
    pub fn promote(&mut self) -> PuyoPair {
        let fresh = self.generate();
        let current = self.next;
        self.next = self.next_next;
        self.next_next = fresh;
        current
    }

    /// Peek at the next pair
    pub fn next(&self) -> PuyoPair {
        self.next
    }

    /// Peek at the pair after next
    pub fn next_next(&self) -> PuyoPair {
        self.next_next
    }

    /// Get the current RNG state (for restarting with a continued sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(
            1,
            &PuyoColor::DEFAULT_PALETTE,
            puyo_chain_types::DEFAULT_WIDTH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            assert!(rng.next_range(4) < 4);
        }
        assert_eq!(rng.next_range(0), 0);
        assert_eq!(rng.choose::<u8>(&[]), None);
    }

    #[test]
    fn test_every_palette_color_appears() {
        let mut rng = SimpleRng::new(7);
        let palette = PuyoColor::DEFAULT_PALETTE;
        let mut seen = [false; 4];
        for _ in 0..200 {
            let c = rng.choose(&palette).unwrap();
            let idx = palette.iter().position(|p| *p == c).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_queue_promote_shifts_previews() {
        let mut queue = PieceQueue::new(42, &PuyoColor::DEFAULT_PALETTE, 6);
        let next = queue.next();
        let next_next = queue.next_next();

        let current = queue.promote();
        assert_eq!(current, next);
        assert_eq!(queue.next(), next_next);
    }

    #[test]
    fn test_queue_is_reproducible() {
        let mut a = PieceQueue::new(5, &PuyoColor::DEFAULT_PALETTE, 6);
        let mut b = PieceQueue::new(5, &PuyoColor::DEFAULT_PALETTE, 6);
        for _ in 0..50 {
            assert_eq!(a.promote(), b.promote());
        }
        assert_eq!(a.seed(), b.seed());
    }

    #[test]
    fn test_generated_pairs_use_palette_and_spawn() {
        let palette = [PuyoColor::Purple];
        let mut queue = PieceQueue::new(3, &palette, 8);
        let pair = queue.generate();
        assert_eq!(pair.colors(), (PuyoColor::Purple, PuyoColor::Purple));
        assert_eq!((pair.pivot.x, pair.pivot.y), (3, 0));
        assert_eq!((pair.satellite.x, pair.satellite.y), (3, 1));
    }
}
