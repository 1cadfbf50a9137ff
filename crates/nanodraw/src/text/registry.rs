use std::collections::HashMap;

use crate::batch::TextureId;

use super::atlas::FontAtlas;

/// Opaque handle to a loaded font.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct FontKey {
    name: String,
    // Sizes compare by bit pattern so the key can be hashed.
    size_bits: u32,
}

impl FontKey {
    fn new(name: &str, size: f32) -> Self {
        Self {
            name: name.to_owned(),
            size_bits: size.to_bits(),
        }
    }
}

#[derive(Debug)]
struct FontEntry {
    atlas: FontAtlas,
    texture: TextureId,
}

/// Baked fonts keyed by `(name, size)`.
///
/// Entries are never evicted, so a [`FontId`] stays valid for the lifetime of
/// the registry.
#[derive(Debug, Default)]
pub struct FontRegistry {
    entries: Vec<FontEntry>,
    by_key: HashMap<FontKey, FontId>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Previously registered font with this name and size.
    pub fn lookup(&self, name: &str, size: f32) -> Option<FontId> {
        self.by_key.get(&FontKey::new(name, size)).copied()
    }

    pub(crate) fn insert(&mut self, name: &str, size: f32, atlas: FontAtlas, texture: TextureId) -> FontId {
        let id = FontId(self.entries.len());
        self.entries.push(FontEntry { atlas, texture });
        self.by_key.insert(FontKey::new(name, size), id);
        id
    }

    pub fn atlas(&self, id: FontId) -> Option<&FontAtlas> {
        self.entries.get(id.0).map(|e| &e.atlas)
    }

    /// Atlas and its texture, in one lookup.
    pub(crate) fn get(&self, id: FontId) -> Option<(&FontAtlas, TextureId)> {
        self.entries.get(id.0).map(|e| (&e.atlas, e.texture))
    }
}
