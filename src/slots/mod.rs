//! Slot machine core
//!
//! Everything here is driven synchronously by the caller's frame clock:
//! - Reels own their slots and physics
//! - The machine owns the reels and the spin state
//! - The stop schedule tells reels when to let go

pub mod machine;
pub mod reel;
pub mod schedule;
pub mod symbols;

#[cfg(test)]
pub(crate) mod testing;

pub use machine::{NoWin, SlotMachine, SymbolGrid, WinEvaluator};
pub use reel::{RandomSymbol, Reel, ReplaceSymbol};
pub use schedule::{SpinSequence, StopSchedule};
pub use symbols::{
    DEFAULT_SYMBOLS, SymbolAlphabet, SymbolId, SymbolSlot, TextureAtlas, TextureHandle,
    TextureProvider,
};
