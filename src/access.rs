use crate::error::MetadataError;
use std::collections::HashMap;

/// The read/write contract shared by a store, its nullable façade and every typed view
///
/// `Value` is what the view hands out and accepts: `Value` for the whole
/// store, `T` for a typed view, and `Option<_>` of either for the nullable
/// flavors. The provided methods are built purely on top of the required
/// ones.
///
/// # Examples
///
/// ```
/// use sovran_metadata::{MetadataAccess, MetadataStore};
///
/// let store = MetadataStore::new("counters");
/// let ints = store.ints();
///
/// ints.set("visits", 1i32);
/// ints.update("visits", |v| v + 1)?;
/// assert_eq!(ints.get("visits")?, 2);
///
/// assert_eq!(ints.get_or("missing", 10), 10);
/// assert_eq!(ints.consume("visits", |v| v * 100)?, 200);
/// assert!(ints.exists_not("visits"));
/// # Ok::<(), sovran_metadata::MetadataError>(())
/// ```
pub trait MetadataAccess {
    type Value: Clone;

    /// Diagnostic label of this view
    fn name(&self) -> String;

    /// Retrieves the value for `identifier`
    ///
    /// # Errors
    ///
    /// Returns a `MetadataError` if this view has nothing to hand out for the
    /// identifier.
    fn get(&self, identifier: &str) -> Result<Self::Value, MetadataError>;

    /// Retrieves the value for `identifier`, or `None` instead of failing
    fn get_or_null(&self, identifier: &str) -> Option<Self::Value>;

    /// Stores a value, moving ownership of `identifier` as needed
    fn set(&self, identifier: &str, value: impl Into<Self::Value>);

    /// Removes the entry and returns the previous value, if this view could see one
    fn remove(&self, identifier: &str) -> Option<Self::Value>;

    fn exists(&self, identifier: &str) -> bool;

    fn exists_not(&self, identifier: &str) -> bool {
        !self.exists(identifier)
    }

    /// Snapshot of every entry visible through this view
    fn all_entries(&self) -> HashMap<String, Self::Value>;

    fn get_or(&self, identifier: &str, default: Self::Value) -> Self::Value {
        self.get_or_null(identifier).unwrap_or(default)
    }

    fn get_or_else<F>(&self, identifier: &str, default: F) -> Self::Value
    where
        F: FnOnce() -> Self::Value,
    {
        self.get_or_null(identifier).unwrap_or_else(default)
    }

    /// Replaces the value with `f(value)` and returns the new value
    ///
    /// # Errors
    ///
    /// Fails like `get` when the identifier is not visible through this view.
    fn update<F>(&self, identifier: &str, f: F) -> Result<Self::Value, MetadataError>
    where
        F: FnOnce(Self::Value) -> Self::Value,
    {
        let updated = f(self.get(identifier)?);
        self.set(identifier, updated.clone());
        Ok(updated)
    }

    /// Like `update`, but does nothing and returns `None` if the identifier is not visible
    fn update_if_exists<F>(&self, identifier: &str, f: F) -> Option<Self::Value>
    where
        F: FnOnce(Self::Value) -> Self::Value,
    {
        let updated = f(self.get_or_null(identifier)?);
        self.set(identifier, updated.clone());
        Some(updated)
    }

    /// Reads the value, hands it to `f`, then removes the entry
    ///
    /// # Errors
    ///
    /// Fails like `get`; nothing is removed in that case.
    fn consume<R, F>(&self, identifier: &str, f: F) -> Result<R, MetadataError>
    where
        F: FnOnce(Self::Value) -> R,
    {
        let result = f(self.get(identifier)?);
        self.remove(identifier);
        Ok(result)
    }

    fn if_exists<R, F>(&self, identifier: &str, f: F) -> Option<R>
    where
        F: FnOnce(Self::Value) -> R,
    {
        self.get_or_null(identifier).map(f)
    }

    /// The subset of `identifiers` visible through this view, with their values
    fn filter_existent<I, S>(&self, identifiers: I) -> HashMap<String, Self::Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .filter_map(|identifier| {
                let identifier = identifier.as_ref();
                self.get(identifier)
                    .ok()
                    .map(|value| (identifier.to_owned(), value))
            })
            .collect()
    }

    fn filter_existent_values<I, S>(&self, identifiers: I) -> Vec<Self::Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .filter_map(|identifier| self.get(identifier.as_ref()).ok())
            .collect()
    }
}
