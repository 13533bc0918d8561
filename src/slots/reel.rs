//! A single horizontally cycling reel
//!
//! The reel owns `symbol_count + 1` slots laid out `symbol_size` apart. While
//! moving, every slot advances by `speed * delta` modulo one full cycle; a slot
//! that scrolls off the right edge gets a new symbol and jumps back one cycle
//! so it re-enters from the left. Once told to stop, speed decays geometrically and the reel
//! snaps to the grid when it gets slow enough.

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::symbols::{SymbolAlphabet, SymbolId, SymbolSlot, TextureHandle, TextureProvider};
use crate::consts::*;

/// Strategy invoked whenever a slot needs a fresh symbol
pub trait ReplaceSymbol {
    /// Assign a new symbol to `slot` and reset its size to `symbol_size`
    fn replace(&mut self, slot: &mut SymbolSlot, symbol_size: f32);
}

impl<F> ReplaceSymbol for F
where
    F: FnMut(&mut SymbolSlot, f32),
{
    fn replace(&mut self, slot: &mut SymbolSlot, symbol_size: f32) {
        self(slot, symbol_size)
    }
}

/// Default strategy: uniform pick from the alphabet
pub struct RandomSymbol {
    rng: Pcg32,
    alphabet: SymbolAlphabet,
    textures: Rc<dyn TextureProvider>,
}

impl RandomSymbol {
    pub fn new(seed: u64, alphabet: SymbolAlphabet, textures: Rc<dyn TextureProvider>) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            alphabet,
            textures,
        }
    }

    /// Draw the next symbol identifier
    pub fn pick(&mut self) -> SymbolId {
        let len = self.alphabet.len().clamp(1, SymbolAlphabet::MAX_SYMBOLS);
        let index = self.rng.random_range(0..len);
        match u16::try_from(index) {
            Ok(index) => SymbolId(index),
            Err(_) => {
                log::warn!("Symbol index {index} out of range, using 0");
                SymbolId(0)
            }
        }
    }
}

impl ReplaceSymbol for RandomSymbol {
    fn replace(&mut self, slot: &mut SymbolSlot, symbol_size: f32) {
        let symbol = self.pick();
        let texture = match self.alphabet.name(symbol) {
            Some(name) => self.textures.texture(name),
            None => TextureHandle::MISSING,
        };
        slot.assign(symbol, texture, symbol_size);
    }
}

/// One reel of the machine
pub struct Reel {
    slots: Vec<SymbolSlot>,
    symbol_size: f32,
    symbol_count: usize,
    speed: f32,
    is_spinning: bool,
    replace: Box<dyn ReplaceSymbol>,
}

impl std::fmt::Debug for Reel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reel")
            .field("symbol_size", &self.symbol_size)
            .field("symbol_count", &self.symbol_count)
            .field("speed", &self.speed)
            .field("is_spinning", &self.is_spinning)
            .field("slots", &self.slots)
            .finish()
    }
}

impl Reel {
    /// Create a reel showing `symbol_count` symbols of `symbol_size` pixels.
    ///
    /// The strategy fills every slot once up front and is called again each
    /// time a slot wraps around. One extra slot is parked just left of the
    /// window to absorb the scroll gap.
    pub fn new(symbol_count: usize, symbol_size: f32, mut replace: Box<dyn ReplaceSymbol>) -> Self {
        let symbol_count = symbol_count.max(1);
        let symbol_size = if symbol_size.is_finite() && symbol_size > 0.0 {
            symbol_size
        } else {
            log::warn!("Invalid symbol size {symbol_size}, using {SYMBOL_SIZE}");
            SYMBOL_SIZE
        };

        let slots = (0..=symbol_count)
            .map(|i| {
                let x = (i as f32 - 1.0) * symbol_size;
                let mut slot = SymbolSlot::blank(x, symbol_size);
                replace.replace(&mut slot, symbol_size);
                slot
            })
            .collect();

        Self {
            slots,
            symbol_size,
            symbol_count,
            speed: 0.0,
            is_spinning: false,
            replace,
        }
    }

    pub fn symbol_size(&self) -> f32 {
        self.symbol_size
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Width of the visible window
    pub fn total_width(&self) -> f32 {
        self.symbol_count as f32 * self.symbol_size
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    /// All slots, in storage order (not sorted by position)
    pub fn slots(&self) -> &[SymbolSlot] {
        &self.slots
    }

    pub fn start_spin(&mut self) {
        self.is_spinning = true;
        self.speed = SPIN_SPEED;
    }

    /// Release the reel; it decelerates over the following updates
    pub fn stop_spin(&mut self) {
        self.is_spinning = false;
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_spinning && self.speed < STOPPED_THRESHOLD
    }

    /// Advance the reel by `delta` time units
    pub fn update(&mut self, delta: f32) {
        if !self.is_spinning && self.speed == 0.0 {
            return;
        }

        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let total_width = self.total_width();
        let cycle = total_width + self.symbol_size;
        // Whole cycles leave the layout unchanged, so only the remainder moves
        let step = (self.speed as f64 * delta as f64).rem_euclid(cycle as f64) as f32;
        let step = if step.is_finite() && step < cycle { step } else { 0.0 };

        for slot in &mut self.slots {
            slot.pos.x += step;

            if slot.pos.x >= total_width {
                slot.pos.x -= cycle;
                self.replace.replace(slot, self.symbol_size);
            }
        }

        if !self.is_spinning && self.speed > 0.0 {
            self.speed *= SLOWDOWN_RATE;

            if self.speed < SNAP_THRESHOLD {
                self.speed = 0.0;
                self.snap_to_grid();
            }
        }
    }

    /// Round every slot down to a multiple of `symbol_size`.
    ///
    /// The floor is taken from the leftmost slot; the rest keep their whole
    /// number of cells relative to it so accumulated float error can never
    /// collapse two slots into one cell. A slot landing on the right edge
    /// goes back to the parking cell left of the window.
    fn snap_to_grid(&mut self) {
        let size = self.symbol_size;
        let total_width = self.total_width();
        let Some(leftmost) = self.slots.iter().map(SymbolSlot::x).reduce(f32::min) else {
            return;
        };
        let base = (leftmost / size).floor() * size;

        for slot in &mut self.slots {
            let cells = ((slot.pos.x - leftmost) / size).round();
            let mut x = base + cells * size;
            if x >= total_width {
                x -= total_width + size;
            }
            slot.pos.x = x;
        }
    }

    /// Slots overlapping the visible window, left to right
    pub fn visible_symbols(&self) -> Vec<&SymbolSlot> {
        let visible_end = self.total_width();
        let mut visible: Vec<&SymbolSlot> = self
            .slots
            .iter()
            .filter(|slot| slot.right() > 0.0 && slot.x() < visible_end)
            .collect();
        visible.sort_by(|a, b| a.x().total_cmp(&b.x()));
        visible
    }

    /// Identifiers of the visible symbols, left to right
    pub fn symbol_ids(&self) -> Vec<SymbolId> {
        self.visible_symbols().iter().map(|slot| slot.symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::symbols::TextureAtlas;
    use proptest::prelude::*;
    use std::cell::Cell;

    const DELTA: f32 = 1000.0 / 60.0;

    fn counting_reel(count: usize, size: f32) -> (Reel, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let reel = Reel::new(
            count,
            size,
            Box::new(move |slot: &mut SymbolSlot, size: f32| {
                counter.set(counter.get() + 1);
                slot.assign(SymbolId(1), TextureHandle(1), size);
            }),
        );
        (reel, calls)
    }

    fn random_reel(count: usize, size: f32, seed: u64) -> Reel {
        let alphabet = SymbolAlphabet::default();
        let atlas: Rc<dyn TextureProvider> = Rc::new(TextureAtlas::for_alphabet(&alphabet));
        Reel::new(count, size, Box::new(RandomSymbol::new(seed, alphabet, atlas)))
    }

    /// Spin, release and update until the reel settles
    fn settle(reel: &mut Reel, delta: f32, spin_frames: usize) {
        reel.start_spin();
        for _ in 0..spin_frames {
            reel.update(delta);
        }
        reel.stop_spin();
        for _ in 0..1000 {
            reel.update(delta);
            if reel.is_stopped() {
                break;
            }
        }
    }

    fn sorted_xs(reel: &Reel) -> Vec<f32> {
        let mut xs: Vec<f32> = reel.slots().iter().map(SymbolSlot::x).collect();
        xs.sort_by(f32::total_cmp);
        xs
    }

    #[test]
    fn test_initial_layout() {
        let reel = random_reel(6, 150.0, 1);
        assert_eq!(reel.slots().len(), 7);
        assert_eq!(sorted_xs(&reel), vec![-150.0, 0.0, 150.0, 300.0, 450.0, 600.0, 750.0]);
        assert_eq!(reel.visible_symbols().len(), 6);
        assert!(reel.is_stopped());
    }

    #[test]
    fn test_strategy_fills_slots_on_construction() {
        let (reel, calls) = counting_reel(7, 150.0);
        assert_eq!(calls.get(), 8);
        assert!(reel.slots().iter().all(|s| s.symbol == SymbolId(1)));
    }

    #[test]
    fn test_start_spin_sets_speed() {
        let mut reel = random_reel(6, 150.0, 1);
        reel.start_spin();
        assert!(reel.is_spinning());
        assert_eq!(reel.speed(), SPIN_SPEED);
        assert!(!reel.is_stopped());

        // Idempotent
        reel.start_spin();
        assert_eq!(reel.speed(), SPIN_SPEED);
    }

    #[test]
    fn test_update_is_noop_when_stopped() {
        let (mut reel, calls) = counting_reel(6, 150.0);
        let before = reel.slots().to_vec();
        reel.update(DELTA);
        assert_eq!(reel.slots(), &before[..]);
        assert_eq!(calls.get(), 7);
    }

    #[test]
    fn test_update_moves_slots() {
        let mut reel = random_reel(6, 150.0, 1);
        reel.start_spin();
        reel.update(1.0);
        assert_eq!(sorted_xs(&reel), vec![-100.0, 50.0, 200.0, 350.0, 500.0, 650.0, 800.0]);
    }

    #[test]
    fn test_slot_past_window_is_replaced() {
        let (mut reel, calls) = counting_reel(7, 150.0);
        let total_width = reel.total_width();
        let before = calls.get();

        reel.start_spin();
        reel.speed = 10.0;
        reel.slots[3].pos.x = total_width + 1.0;
        reel.update(1.0);

        assert!(calls.get() > before);
        // Moved back one full cycle
        let cycle = total_width + reel.symbol_size();
        assert!((reel.slots[3].x() - (total_width + 11.0 - cycle)).abs() < 1e-3);
    }

    #[test]
    fn test_replacement_during_long_spin() {
        let (mut reel, calls) = counting_reel(7, 150.0);
        let before = calls.get();
        reel.start_spin();
        for _ in 0..300 {
            reel.update(DELTA);
        }
        assert!(calls.get() > before);
    }

    #[test]
    fn test_huge_delta_stays_inside_cycle() {
        for delta in [1.0e4, 1.0e6, 3.0e7, f32::MAX] {
            let mut reel = random_reel(6, 150.0, 3);
            reel.start_spin();
            reel.update(delta);
            let total_width = reel.total_width();
            for slot in reel.slots() {
                assert!(slot.x() >= -reel.symbol_size(), "delta {delta}: x = {}", slot.x());
                assert!(slot.x() < total_width, "delta {delta}: x = {}", slot.x());
            }
            let xs = sorted_xs(&reel);
            for pair in xs.windows(2) {
                assert!((pair[1] - pair[0] - 150.0).abs() < 0.01, "delta {delta}: {xs:?}");
            }
        }
    }

    #[test]
    fn test_huge_delta_settles_on_grid() {
        for delta in [1.0e6, 3.0e7, f32::MAX] {
            let mut reel = random_reel(6, 150.0, 3);
            reel.start_spin();
            reel.update(delta);
            reel.stop_spin();
            for _ in 0..200 {
                reel.update(1.0);
            }
            assert!(reel.is_stopped(), "delta {delta}");

            let expected: Vec<f32> = (0..7).map(|i| (i as f32 - 1.0) * 150.0).collect();
            assert_eq!(sorted_xs(&reel), expected, "delta {delta}");
            assert_eq!(reel.visible_symbols().len(), reel.symbol_count());
        }
    }

    #[test]
    fn test_wrap_replaces_once_per_crossing() {
        let (mut reel, calls) = counting_reel(6, 150.0);
        let before = calls.get();
        reel.start_spin();
        // Two whole cycles plus one cell: exactly one slot crosses the edge
        reel.update((2.0 * 1050.0 + 150.0) / SPIN_SPEED);
        assert_eq!(calls.get() - before, 1);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut reel = random_reel(6, 150.0, 1);
        reel.start_spin();
        let before = sorted_xs(&reel);
        reel.update(-5.0);
        reel.update(f32::NAN);
        assert_eq!(sorted_xs(&reel), before);
    }

    #[test]
    fn test_stop_decelerates_then_snaps() {
        let mut reel = random_reel(6, 150.0, 9);
        reel.start_spin();
        reel.update(0.37);
        reel.stop_spin();
        assert!(!reel.is_stopped());

        reel.update(0.37);
        assert!((reel.speed() - SPIN_SPEED * SLOWDOWN_RATE).abs() < 1e-4);

        let mut updates = 1;
        while !reel.is_stopped() {
            reel.update(0.37);
            updates += 1;
            assert!(updates < 200, "reel never settled");
        }
        assert_eq!(reel.speed(), 0.0);
        // 50 * 0.95^n < 0.5
        assert_eq!(updates, 90);
    }

    #[test]
    fn test_visible_symbols_snapped_after_stop() {
        let mut reel = random_reel(6, 150.0, 42);
        settle(&mut reel, DELTA, 120);
        assert!(reel.is_stopped());

        let visible = reel.visible_symbols();
        assert_eq!(visible.len(), 6);
        let mut expected_x = 0.0;
        for slot in &visible {
            assert_eq!(slot.x() % reel.symbol_size(), 0.0);
            assert_eq!(slot.x(), expected_x);
            expected_x += reel.symbol_size();
        }
        let last = visible[visible.len() - 1];
        assert_eq!(last.right(), reel.total_width());
    }

    #[test]
    fn test_snap_is_idempotent() {
        let mut reel = random_reel(7, 150.0, 5);
        settle(&mut reel, 0.73, 33);
        let snapped = sorted_xs(&reel);
        reel.snap_to_grid();
        assert_eq!(sorted_xs(&reel), snapped);
    }

    #[test]
    fn test_snap_floors_positions() {
        let mut reel = random_reel(3, 100.0, 5);
        for (slot, x) in reel.slots.iter_mut().zip([-40.0, 60.0, 160.0, 260.0]) {
            slot.pos.x = x;
        }
        reel.snap_to_grid();
        assert_eq!(sorted_xs(&reel), vec![-100.0, 0.0, 100.0, 200.0]);
    }

    #[test]
    fn test_snap_absorbs_float_drift() {
        let mut reel = random_reel(3, 100.0, 5);
        for (slot, x) in reel.slots.iter_mut().zip([-0.00001, 99.99999, 200.00002, 299.99997]) {
            slot.pos.x = x;
        }
        reel.snap_to_grid();
        assert_eq!(sorted_xs(&reel), vec![-100.0, 0.0, 100.0, 200.0]);
    }

    #[test]
    fn test_symbol_ids_follow_visible_order() {
        let reel = random_reel(6, 150.0, 11);
        let ids = reel.symbol_ids();
        let visible: Vec<SymbolId> = reel.visible_symbols().iter().map(|s| s.symbol).collect();
        assert_eq!(ids, visible);
        assert!(ids.iter().all(|id| id.index() < 5));
    }

    #[test]
    fn test_same_seed_same_symbols() {
        let a = random_reel(6, 150.0, 77);
        let b = random_reel(6, 150.0, 77);
        assert_eq!(a.symbol_ids(), b.symbol_ids());
    }

    #[test]
    fn test_pick_stays_inside_large_alphabet() {
        let names: Vec<String> = (0..70_000).map(|i| format!("s{i}.png")).collect();
        let alphabet = SymbolAlphabet::new(names).unwrap();
        let atlas: Rc<dyn TextureProvider> = Rc::new(TextureAtlas::for_alphabet(&alphabet));
        let mut random = RandomSymbol::new(5, alphabet.clone(), atlas);
        for _ in 0..1000 {
            assert!(alphabet.name(random.pick()).is_some());
        }
    }

    #[test]
    fn test_invalid_geometry_is_clamped() {
        let reel = random_reel(0, -3.0, 1);
        assert_eq!(reel.symbol_count(), 1);
        assert_eq!(reel.symbol_size(), SYMBOL_SIZE);
        assert_eq!(reel.slots().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_settled_reel_sits_on_grid(
            seed in any::<u64>(),
            count in 1usize..9,
            delta in 0.05f32..3.0,
            spin_frames in 0usize..400,
        ) {
            let mut reel = random_reel(count, 150.0, seed);
            settle(&mut reel, delta, spin_frames);
            prop_assert!(reel.is_stopped());

            let xs = sorted_xs(&reel);
            for (i, x) in xs.iter().enumerate() {
                prop_assert_eq!(*x, (i as f32 - 1.0) * 150.0);
            }
            prop_assert_eq!(reel.visible_symbols().len(), count);
        }

        #[test]
        fn prop_spacing_preserved_while_spinning(
            seed in any::<u64>(),
            deltas in proptest::collection::vec(0.0f32..5.0, 1..200),
        ) {
            let mut reel = random_reel(6, 150.0, seed);
            reel.start_spin();
            for delta in deltas {
                reel.update(delta);
            }
            let xs = sorted_xs(&reel);
            for pair in xs.windows(2) {
                prop_assert!((pair[1] - pair[0] - 150.0).abs() < 0.05);
            }
            prop_assert!(xs[0] >= -150.05);
            prop_assert!(xs[xs.len() - 1] < reel.total_width());
        }
    }
}
