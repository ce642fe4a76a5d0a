//! Name → constructor registry behind the storage, key-value and separator factories.
//!
//! A registry holds one constructor per implementation name. Looking up an unknown
//! name fails with [`UnsupportedImplementation`], whose message lists every name that
//! is registered so configuration mistakes are easy to spot.

use std::collections::BTreeMap;
use std::fmt;

/// Returned when a factory is asked for an implementation it does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported {kind} type: {requested}. Supported types are: {}", .available.join(", "))]
pub struct UnsupportedImplementation {
    pub kind: &'static str,
    pub requested: String,
    pub available: Vec<String>,
}

/// Static mapping from implementation name to constructor.
///
/// `C` is usually a boxed closure; the registry itself never calls it, so each
/// factory decides what arguments are forwarded.
pub struct Registry<C> {
    kind: &'static str,
    constructors: BTreeMap<&'static str, C>,
}

impl<C> Registry<C> {
    /// Create an empty registry. `kind` names the abstraction in error messages
    /// (e.g. "storage", "separator").
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            constructors: BTreeMap::new(),
        }
    }

    /// Register (or replace) the constructor for `name`.
    pub fn register(&mut self, name: &'static str, constructor: C) {
        self.constructors.insert(name, constructor);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: &'static str, constructor: C) -> Self {
        self.register(name, constructor);
        self
    }

    pub fn get(&self, name: &str) -> Result<&C, UnsupportedImplementation> {
        self.constructors
            .get(name)
            .ok_or_else(|| UnsupportedImplementation {
                kind: self.kind,
                requested: name.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.constructors.keys().copied().collect()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}
