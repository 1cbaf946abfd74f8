//! Runtime identity of the types flowing through a pipeline.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of a Rust type, paired with its name for diagnostics.
///
/// Equality and hashing only consider the [`TypeId`].
#[derive(Debug, Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Returns the tag of `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the type id.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name with module paths stripped,
    /// e.g. `Option<String>` for `core::option::Option<alloc::string::String>`.
    #[must_use]
    pub fn short_name(&self) -> String {
        shorten_type_name(self.name)
    }

    /// Returns true if this tag identifies `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

fn shorten_type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment = String::new();

    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            flush_segment(&mut segment, &mut out);
            out.push(ch);
        }
    }
    flush_segment(&mut segment, &mut out);

    out
}

fn flush_segment(segment: &mut String, out: &mut String) {
    if let Some(last) = segment.rsplit("::").next() {
        out.push_str(last);
    }
    segment.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tag_equality() {
        assert_eq!(TypeTag::of::<String>(), TypeTag::of::<String>());
        assert_ne!(TypeTag::of::<String>(), TypeTag::of::<&'static str>());
        assert!(TypeTag::of::<i32>().is::<i32>());
        assert!(!TypeTag::of::<i32>().is::<i64>());
    }

    #[test]
    fn test_tag_hash_uses_id() {
        let tags: HashSet<TypeTag> = [TypeTag::of::<u8>(), TypeTag::of::<u8>(), TypeTag::of::<u16>()]
            .into_iter()
            .collect();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TypeTag::of::<String>().short_name(), "String");
        assert_eq!(TypeTag::of::<Option<String>>().short_name(), "Option<String>");
        assert_eq!(
            TypeTag::of::<Vec<(i32, String)>>().short_name(),
            "Vec<(i32, String)>"
        );
        assert_eq!(TypeTag::of::<u64>().to_string(), "u64");
    }
}
