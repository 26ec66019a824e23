//! Shader Define Set
//!
//! Preprocessor defines a material injects into its program (name → value).
//!
//! # Architecture
//!
//! Both names and values are interned [`Symbol`]s, kept sorted by symbol id.
//! That gives:
//!
//! - **Fast comparison**: two define sets compare as integer slices
//! - **Stable iteration**: iteration order is fixed for the lifetime of the
//!   process, so program cache keys built from it are deterministic
//! - **Insertion-order independence**: `{A, B}` and `{B, A}` are the same set
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_programs::resources::ShaderDefines;
//!
//! let mut defines = ShaderDefines::new();
//! defines.set("USE_RIM_LIGHT", "1");
//! defines.set("RIM_POWER", "4");
//!
//! for (name, value) in defines.iter_strings() {
//!     println!("#define {name} {value}");
//! }
//! ```

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::utils::interner::{self, Symbol};

/// A collection of shader define name/value pairs.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    defines: SmallVec<[(Symbol, Symbol); 8]>,
}

impl ShaderDefines {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            defines: SmallVec::new(),
        }
    }

    /// Sets a define, replacing the value if the name is already present.
    pub fn set(&mut self, key: &str, value: &str) {
        let key_sym = interner::intern(key);
        let value_sym = interner::intern(value);
        self.set_symbol(key_sym, value_sym);
    }

    /// Sets a define from pre-interned symbols.
    #[inline]
    pub fn set_symbol(&mut self, key: Symbol, value: Symbol) {
        match self.defines.binary_search_by_key(&key, |&(k, _)| k) {
            Ok(idx) => {
                self.defines[idx].1 = value;
            }
            Err(idx) => {
                self.defines.insert(idx, (key, value));
            }
        }
    }

    /// Removes a define. Returns `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(key_sym) = interner::get(key) else {
            return false;
        };
        match self.defines.binary_search_by_key(&key_sym, |&(k, _)| k) {
            Ok(idx) => {
                self.defines.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        interner::get(key).is_some_and(|key_sym| {
            self.defines
                .binary_search_by_key(&key_sym, |&(k, _)| k)
                .is_ok()
        })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let key_sym = interner::get(key)?;
        self.defines
            .binary_search_by_key(&key_sym, |&(k, _)| k)
            .ok()
            .map(|idx| interner::resolve(self.defines[idx].1))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.defines.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Iterates all defines as symbols, in the set's stable order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &(Symbol, Symbol)> {
        self.defines.iter()
    }

    /// Iterates all defines as strings, in the set's stable order.
    #[inline]
    pub fn iter_strings(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.defines
            .iter()
            .map(|&(k, v)| (interner::resolve(k), interner::resolve(v)))
    }
}

impl Hash for ShaderDefines {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defines.as_slice().hash(state);
    }
}

impl PartialEq for ShaderDefines {
    fn eq(&self, other: &Self) -> bool {
        self.defines.as_slice() == other.defines.as_slice()
    }
}

impl Eq for ShaderDefines {}

impl PartialOrd for ShaderDefines {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShaderDefines {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.defines.as_slice().cmp(other.defines.as_slice())
    }
}

impl From<&[(&str, &str)]> for ShaderDefines {
    fn from(defines: &[(&str, &str)]) -> Self {
        let mut result = Self::new();
        for (k, v) in defines {
            result.set(k, v);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut defines = ShaderDefines::new();
        defines.set("USE_MAP", "1");
        defines.set("USE_NORMALMAP", "1");

        assert!(defines.contains("USE_MAP"));
        assert!(defines.contains("USE_NORMALMAP"));
        assert!(!defines.contains("USE_AOMAP_UNSET"));

        assert_eq!(defines.get("USE_MAP"), Some("1"));
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut defines = ShaderDefines::new();
        defines.set("SAMPLES", "4");
        defines.set("SAMPLES", "8");

        assert_eq!(defines.len(), 1);
        assert_eq!(defines.get("SAMPLES"), Some("8"));
    }

    #[test]
    fn test_ordering() {
        let mut defines = ShaderDefines::new();
        defines.set("B", "1");
        defines.set("A", "1");
        defines.set("C", "1");

        // Sorted by symbol id (intern order), not by string
        let symbols: Vec<_> = defines.iter().map(|(k, _)| k).collect();
        assert!(symbols.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_insertion_order_independent() {
        let mut d1 = ShaderDefines::new();
        d1.set("A", "1");
        d1.set("B", "2");

        let mut d2 = ShaderDefines::new();
        d2.set("B", "2");
        d2.set("A", "1");

        assert_eq!(d1, d2);
        assert_eq!(d1.iter_strings().collect::<Vec<_>>(), d2.iter_strings().collect::<Vec<_>>());
    }

    #[test]
    fn test_remove() {
        let mut defines = ShaderDefines::from(&[("X", "1"), ("Y", "2")][..]);
        assert!(defines.remove("X"));
        assert!(!defines.remove("X"));
        assert_eq!(defines.len(), 1);
    }
}
