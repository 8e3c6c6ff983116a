use crate::error::SceneError;
use deskscene_render::TextureHandle;
use serde::Serialize;

/// Most textures the registry (and the texture units) can hold.
pub const MAX_TEXTURES: usize = 16;

/// Files the desk scene loads, with the tag each is registered under.
/// Registration order fixes each tag's texture unit.
pub const SCENE_TEXTURES: [(&str, &str); 5] = [
    ("stainless.jpg", "stainless"),
    ("gold-seamless-texture.jpg", "gold"),
    ("wood_cherry_seamless.jpg", "wood"),
    ("plastic_blue_seamless.jpg", "plastic"),
    ("plastic_dark_seamless.jpg", "darkplastic"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureEntry {
    pub handle: TextureHandle,
    pub tag: String,
}

/// Ordered, bounded table of loaded textures.
///
/// The index of an entry is its texture unit. Entries are only ever
/// appended, and only removed all at once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `tag` could be registered, before any decoding or upload.
    pub fn ensure_room(&self, tag: &str) -> Result<(), SceneError> {
        if self.entries.len() >= MAX_TEXTURES {
            return Err(SceneError::RegistryFull {
                capacity: MAX_TEXTURES,
            });
        }
        if self.find_slot(tag).is_some() {
            return Err(SceneError::DuplicateTag(tag.to_string()));
        }
        Ok(())
    }

    /// Append an entry, returning its slot.
    pub fn register(&mut self, tag: &str, handle: TextureHandle) -> Result<usize, SceneError> {
        self.ensure_room(tag)?;
        self.entries.push(TextureEntry {
            handle,
            tag: tag.to_string(),
        });
        Ok(self.entries.len() - 1)
    }

    pub fn find_id(&self, tag: &str) -> Option<TextureHandle> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| e.handle)
    }

    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.tag == tag)
    }

    /// Slot as a sampler uniform value; `-1` when the tag is unknown.
    pub fn sampler_slot(&self, tag: &str) -> i32 {
        self.find_slot(tag).map_or(-1, |slot| slot as i32)
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, handing back the handles for release.
    pub fn drain(&mut self) -> Vec<TextureHandle> {
        self.entries.drain(..).map(|e| e.handle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_insertion_order() {
        let mut reg = TextureRegistry::new();
        for (i, (_, tag)) in SCENE_TEXTURES.iter().enumerate() {
            let slot = reg.register(tag, TextureHandle(100 + i as u32)).unwrap();
            assert_eq!(slot, i);
        }
        for (i, (_, tag)) in SCENE_TEXTURES.iter().enumerate() {
            assert_eq!(reg.find_slot(tag), Some(i));
            assert_eq!(reg.find_id(tag), Some(TextureHandle(100 + i as u32)));
        }
    }

    #[test]
    fn unknown_tag_is_minus_one() {
        let mut reg = TextureRegistry::new();
        reg.register("wood", TextureHandle(1)).unwrap();
        assert_eq!(reg.find_slot("nonexistent"), None);
        assert_eq!(reg.find_id("nonexistent"), None);
        assert_eq!(reg.sampler_slot("nonexistent"), -1);
        assert_eq!(reg.sampler_slot("wood"), 0);
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut reg = TextureRegistry::new();
        reg.register("gold", TextureHandle(1)).unwrap();
        let err = reg.register("gold", TextureHandle(2)).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateTag(ref t) if t == "gold"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn capacity_is_sixteen() {
        let mut reg = TextureRegistry::new();
        for i in 0..MAX_TEXTURES {
            reg.register(&format!("t{i}"), TextureHandle(i as u32)).unwrap();
        }
        let err = reg.register("one_more", TextureHandle(99)).unwrap_err();
        assert!(matches!(err, SceneError::RegistryFull { capacity: 16 }));
    }

    #[test]
    fn drain_empties_registry() {
        let mut reg = TextureRegistry::new();
        reg.register("a", TextureHandle(7)).unwrap();
        reg.register("b", TextureHandle(8)).unwrap();
        assert_eq!(reg.drain(), vec![TextureHandle(7), TextureHandle(8)]);
        assert!(reg.is_empty());
        assert_eq!(reg.sampler_slot("a"), -1);
    }
}
