//! Global String Interner
//!
//! Turns define names and values into integer [`Symbol`]s so that define sets
//! compare and hash as plain integers. Backs [`ShaderDefines`].
//!
//! Symbol order follows intern order, which is stable for the lifetime of the
//! process but not across runs.
//!
//! [`ShaderDefines`]: crate::resources::ShaderDefines

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Compact integer identifier for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning the existing symbol if it was seen before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the symbol of an already interned string without allocating.
#[inline]
#[must_use]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
#[inline]
#[must_use]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

/// Pre-interns the define names the builtin shaders use most, so the hot
/// path of the first frames does not hit the interner's write lock.
pub fn preload_common_defines() {
    let common = [
        "USE_MAP",
        "USE_ENVMAP",
        "USE_NORMALMAP",
        "USE_TANGENT",
        "USE_COLOR",
        "USE_FOG",
        "USE_SKINNING",
        "USE_MORPHTARGETS",
        "USE_INSTANCING",
        "STANDARD",
        "PHYSICAL",
        "FLAT_SHADED",
        "DOUBLE_SIDED",
        "1",
        "",
    ];

    for name in common {
        intern(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let s1 = intern("hello");
        let s2 = intern("hello");
        let s3 = intern("world");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);

        assert_eq!(resolve(s1), "hello");
        assert_eq!(resolve(s3), "world");
    }

    #[test]
    fn test_get() {
        let _ = intern("existing_define");

        assert!(get("existing_define").is_some());
        assert!(get("never_interned_define").is_none());
    }
}
