//! Symbol alphabet, textures and the slot element
//!
//! A reel never creates or destroys slots after construction; replacing a
//! symbol only swaps the identifier and texture and resets the slot size.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Index of a symbol in its alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u16);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Reference symbol textures
pub const DEFAULT_SYMBOLS: [&str; 5] = [
    "symbol1.png",
    "symbol2.png",
    "symbol3.png",
    "symbol4.png",
    "symbol5.png",
];

/// Finite, ordered set of symbol texture names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolAlphabet {
    names: Vec<String>,
}

impl Default for SymbolAlphabet {
    fn default() -> Self {
        Self {
            names: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SymbolAlphabet {
    /// Largest alphabet a `SymbolId` can address
    pub const MAX_SYMBOLS: usize = u16::MAX as usize + 1;

    /// Build an alphabet. Returns `None` for an empty list; names past
    /// `MAX_SYMBOLS` are dropped.
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        let mut alphabet = Self { names };
        alphabet.truncate_to_max();
        Some(alphabet)
    }

    /// Drop names past `MAX_SYMBOLS`. Returns `true` if any were dropped.
    pub fn truncate_to_max(&mut self) -> bool {
        if self.names.len() <= Self::MAX_SYMBOLS {
            return false;
        }
        log::warn!(
            "Symbol alphabet has {} names, keeping the first {}",
            self.names.len(),
            Self::MAX_SYMBOLS
        );
        self.names.truncate(Self::MAX_SYMBOLS);
        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Texture name for a symbol
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.names.len()).map_while(|i| u16::try_from(i).ok().map(SymbolId))
    }
}

/// Opaque handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// Placeholder returned for names the provider doesn't know
    pub const MISSING: TextureHandle = TextureHandle(u32::MAX);

    pub fn is_missing(self) -> bool {
        self == Self::MISSING
    }
}

/// Capability: resolve a texture name to a handle
pub trait TextureProvider {
    fn texture(&self, name: &str) -> TextureHandle;
}

/// Name → handle table, filled once at startup
#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    handles: HashMap<String, TextureHandle>,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atlas with one handle per alphabet entry, in alphabet order
    pub fn for_alphabet(alphabet: &SymbolAlphabet) -> Self {
        let mut atlas = Self::new();
        for id in alphabet.ids() {
            if let Some(name) = alphabet.name(id) {
                atlas.register(name);
            }
        }
        atlas
    }

    /// Register a texture name, returning its handle (stable on re-register)
    pub fn register(&mut self, name: &str) -> TextureHandle {
        let next = TextureHandle(self.handles.len() as u32);
        *self.handles.entry(name.to_string()).or_insert(next)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl TextureProvider for TextureAtlas {
    fn texture(&self, name: &str) -> TextureHandle {
        match self.handles.get(name) {
            Some(handle) => *handle,
            None => {
                log::warn!("Texture not found: {name}");
                TextureHandle::MISSING
            }
        }
    }
}

/// One positioned symbol within a reel's cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSlot {
    /// Top-left corner relative to the reel (y stays 0 for horizontal reels)
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub symbol: SymbolId,
    pub texture: TextureHandle,
}

impl SymbolSlot {
    /// Slot with no symbol assigned yet
    pub fn blank(x: f32, symbol_size: f32) -> Self {
        Self {
            pos: Vec2::new(x, 0.0),
            width: symbol_size,
            height: symbol_size,
            symbol: SymbolId(0),
            texture: TextureHandle::MISSING,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    /// Right edge of the slot's bounding box
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Assign a new symbol and reset the visual size
    pub fn assign(&mut self, symbol: SymbolId, texture: TextureHandle, symbol_size: f32) {
        self.symbol = symbol;
        self.texture = texture;
        self.width = symbol_size;
        self.height = symbol_size;
    }
}
