//! Immutable context threaded through resolution calls.

use std::rc::Rc;

use smol_str::SmolStr;

/// Resolution is a completion request; accept the placeholder identifier.
pub const COMPLETION: &str = "completion";
/// Enum members are reported as `Enum.Member`.
pub const NEED_PREFIX: &str = "need-prefix";
/// Name to search for instead of the usage text (`int32` → `intN`).
pub const SEARCH_NAME: &str = "search-name";
/// The usage is the qualifier of a dot expression.
pub const DOT_QUALIFIER: &str = "dot-qualifier";

#[derive(Debug)]
struct Entry {
    key: SmolStr,
    value: SmolStr,
    parent: Option<Rc<Entry>>,
}

/// A persistent key/value chain.
///
/// `with_value` never mutates: it returns a new state whose tail is shared
/// with the old one. Later entries shadow earlier ones with the same key.
#[derive(Debug, Clone, Default)]
pub struct ResolveState {
    head: Option<Rc<Entry>>,
}

impl ResolveState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(&self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        Self {
            head: Some(Rc::new(Entry {
                key: key.into(),
                value: value.into(),
                parent: self.head.clone(),
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let mut entry = self.head.as_deref();
        while let Some(e) = entry {
            if e.key == key {
                return Some(e.value.as_str());
            }
            entry = e.parent.as_deref();
        }
        None
    }

    /// A flag is set when its value is `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
