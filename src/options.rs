/// Prefix reserved for identifiers used internally by embedding applications
pub const DEFAULT_RESERVED_PREFIX: &str = "__";

/// Construction options for a `MetadataStore`
///
/// # Examples
///
/// ```
/// use sovran_metadata::{MetadataStore, StoreOptions};
///
/// let options = StoreOptions::default()
///     .with_initial_capacity(16)
///     .with_reserved_prefix("sys.");
/// let store = MetadataStore::with_options("session", options);
///
/// assert!(store.is_reserved("__internal"));
/// assert!(store.is_reserved("sys.pid"));
/// assert!(!store.is_reserved("user"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Slots to preallocate in each submap
    pub initial_capacity: usize,
    /// Identifier prefixes that applications should not use for their own entries.
    /// Advisory only: the store does not reject writes to reserved identifiers.
    pub reserved_prefixes: Vec<String>,
}

impl StoreOptions {
    /// Sets how many slots each submap preallocates
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Adds a reserved prefix on top of the ones already configured
    pub fn with_reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reserved_prefixes.push(prefix.into());
        self
    }

    /// Returns true if `identifier` starts with any reserved prefix
    pub fn is_reserved(&self, identifier: &str) -> bool {
        self.reserved_prefixes
            .iter()
            .any(|prefix| identifier.starts_with(prefix.as_str()))
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            reserved_prefixes: vec![DEFAULT_RESERVED_PREFIX.to_owned()],
        }
    }
}
