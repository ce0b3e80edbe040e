//! Per-class method tables
//!
//! Every wrapped type family (big integers here, names and certificates in
//! the X.509 crate) keeps its methods in a [`MethodTable`]. Higher layers can
//! replace any binding with [`MethodTable::interpose`], which hands back the
//! previous implementation so a wrapper can delegate to it.

use std::collections::HashMap;
use std::fmt;

/// Named bindings for one class, which higher layers may interpose
#[derive(Clone)]
pub struct MethodTable<M> {
    class: String,
    methods: HashMap<String, M>,
}

impl<M: Clone> MethodTable<M> {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            methods: HashMap::new(),
        }
    }

    /// Builder form of [`MethodTable::set`] for class bootstrap
    pub fn with(mut self, name: impl Into<String>, method: M) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<M> {
        self.methods.get(name).cloned()
    }

    /// Bind `name` to `method`, returning the previous binding.
    pub fn set(&mut self, name: impl Into<String>, method: M) -> Option<M> {
        self.methods.insert(name.into(), method)
    }

    /// Replace `name` and return what it was bound to before.
    pub fn interpose(&mut self, name: impl Into<String>, method: M) -> Option<M> {
        let name = name.into();
        let previous = self.set(name.clone(), method);
        tracing::debug!(
            class = %self.class,
            method = %name,
            replaced = previous.is_some(),
            "interposed method"
        );
        previous
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<M> fmt::Debug for MethodTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.methods.keys().collect();
        names.sort_unstable();
        f.debug_struct("MethodTable")
            .field("class", &self.class)
            .field("methods", &names)
            .finish()
    }
}
