use crate::access::MetadataAccess;
use crate::error::MetadataError;
use crate::kind::{Kind, Value};
use crate::nullable::NullableMetadataStore;
use crate::store::MetadataStore;
use tracing::debug;

/// What an accessor binding currently believes about its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// No submap owned the identifier when last resolved
    Unbound,
    /// The submap of this kind owned the identifier when last resolved
    Bound(Kind),
    /// The cached submap no longer holds the identifier
    Stale,
}

/// A cached handle for repeated access to one identifier of a [`MetadataStore`]
///
/// Reads go straight to the submap that owned the identifier when the binding
/// last looked. If the identifier has since moved to another kind, the read
/// re-resolves the owner and retries once through the store, so the binding
/// survives type changes without being recreated. Writes always go through
/// the store's dispatch.
///
/// # Examples
///
/// ```
/// use sovran_metadata::{BindingState, Kind, MetadataAccess, MetadataStore, Value};
///
/// let store = MetadataStore::new("example");
/// store.set("level", "high");
///
/// let mut level = store.bind("level");
/// assert_eq!(level.state(), BindingState::Bound(Kind::String));
///
/// store.set("level", 5i32);
/// assert_eq!(level.read()?, Value::Int(5));
/// assert_eq!(level.state(), BindingState::Bound(Kind::Int));
/// # Ok::<(), sovran_metadata::MetadataError>(())
/// ```
#[derive(Debug)]
pub struct AccessorBinding<'a> {
    store: &'a MetadataStore,
    identifier: String,
    state: BindingState,
}

impl<'a> AccessorBinding<'a> {
    pub(crate) fn new(store: &'a MetadataStore, identifier: String) -> Self {
        let mut binding = Self {
            store,
            identifier,
            state: BindingState::Unbound,
        };
        binding.resolve();
        binding
    }

    /// The identifier this binding reads and writes
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The owner cached by the last resolution
    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Reads the bound value
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::UnknownIdentifier` if, after re-resolving, no
    /// submap holds a non-null value for the identifier.
    pub fn read(&mut self) -> Result<Value, MetadataError> {
        if let BindingState::Bound(kind) = self.state {
            let cached = self.store.storage().read_value(kind, &self.identifier);
            if let Some(value) = cached {
                return Ok(value);
            }
            self.state = BindingState::Stale;
        }
        self.resolve();
        self.store.get(&self.identifier)
    }

    /// Writes through the store, so a value of another kind moves the identifier
    ///
    /// The cached owner is refreshed by the next `read`.
    pub fn write(&self, value: impl Into<Value>) {
        self.store.set(&self.identifier, value);
    }

    fn resolve(&mut self) {
        let next = match self.store.locate(&self.identifier) {
            Some(kind) => BindingState::Bound(kind),
            None => BindingState::Unbound,
        };
        if self.state == BindingState::Stale {
            debug!(identifier = %self.identifier, state = ?next, "re-resolved stale binding");
        }
        self.state = next;
    }
}

/// The nullable counterpart of [`AccessorBinding`]
///
/// A null slot is a valid read here; the cache only goes stale when the
/// cached submap has no slot at all for the identifier.
#[derive(Debug)]
pub struct NullableAccessorBinding<'a> {
    store: NullableMetadataStore<'a>,
    identifier: String,
    state: BindingState,
}

impl<'a> NullableAccessorBinding<'a> {
    pub(crate) fn new(store: NullableMetadataStore<'a>, identifier: String) -> Self {
        let mut binding = Self {
            store,
            identifier,
            state: BindingState::Unbound,
        };
        binding.resolve();
        binding
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Reads the bound slot
    ///
    /// # Errors
    ///
    /// Returns the nullable-flavored `MetadataError::UnknownTypedIdentifier`
    /// if, after re-resolving, no submap holds a slot for the identifier.
    pub fn read(&mut self) -> Result<Option<Value>, MetadataError> {
        if let BindingState::Bound(kind) = self.state {
            let cached = self
                .store
                .strict()
                .storage()
                .read_slot(kind, &self.identifier);
            if let Some(slot) = cached {
                return Ok(slot);
            }
            self.state = BindingState::Stale;
        }
        self.resolve();
        self.store.get(&self.identifier)
    }

    /// Writes a slot; `None` nulls it in place without moving ownership
    pub fn write(&self, value: impl Into<Option<Value>>) {
        self.store.set(&self.identifier, value);
    }

    /// Writes a non-null value of any storable type
    pub fn write_value(&self, value: impl Into<Value>) {
        self.store.set_value(&self.identifier, value);
    }

    fn resolve(&mut self) {
        let next = match self.store.locate(&self.identifier) {
            Some(kind) => BindingState::Bound(kind),
            None => BindingState::Unbound,
        };
        if self.state == BindingState::Stale {
            debug!(identifier = %self.identifier, state = ?next, "re-resolved stale binding");
        }
        self.state = next;
    }
}

/// A binding to one identifier of a typed view
///
/// The view only ever reads its own submap, so there is nothing to cache:
/// reads and writes are forwarded as they are.
#[derive(Debug)]
pub struct TypedBinding<M> {
    view: M,
    identifier: String,
}

impl<M: MetadataAccess> TypedBinding<M> {
    pub(crate) fn new(view: M, identifier: String) -> Self {
        Self { view, identifier }
    }

    /// The identifier this binding reads and writes
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Reads through the bound view
    ///
    /// # Errors
    ///
    /// Fails exactly as the view's `get` does.
    pub fn read(&self) -> Result<M::Value, MetadataError> {
        self.view.get(&self.identifier)
    }

    /// Writes through the bound view
    pub fn write(&self, value: impl Into<M::Value>) {
        self.view.set(&self.identifier, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_binding_picks_up_later_write() {
        let store = MetadataStore::new("test");
        let mut binding = store.bind("late");
        assert_eq!(binding.state(), BindingState::Unbound);
        assert_eq!(
            binding.read(),
            Err(MetadataError::UnknownIdentifier("late".to_string()))
        );

        binding.write(7i8);
        assert_eq!(binding.read(), Ok(Value::Byte(7)));
        assert_eq!(binding.state(), BindingState::Bound(Kind::Byte));
    }

    #[test]
    fn test_stale_binding_without_owner_becomes_unbound() {
        let store = MetadataStore::new("test");
        store.set("gone", 1i32);
        let mut binding = store.bind("gone");
        store.remove("gone");

        assert!(binding.read().is_err());
        assert_eq!(binding.state(), BindingState::Unbound);
    }

    #[test]
    fn test_nullable_binding_reads_null() {
        let store = MetadataStore::new("test");
        store.set("maybe", 'm');
        let mut binding = store.nullable().bind("maybe");
        assert_eq!(binding.state(), BindingState::Bound(Kind::Char));

        binding.write(None::<Value>);
        assert_eq!(binding.read(), Ok(None));
        assert_eq!(binding.state(), BindingState::Bound(Kind::Char));

        store.set("maybe", 2i16);
        assert_eq!(binding.read(), Ok(Some(Value::Short(2))));
        assert_eq!(binding.state(), BindingState::Bound(Kind::Short));

        binding.write_value("text");
        assert_eq!(binding.read(), Ok(Some(Value::from("text"))));
        assert_eq!(binding.state(), BindingState::Bound(Kind::String));
    }

    #[test]
    fn test_typed_binding_forwards() {
        let store = MetadataStore::new("test");
        let speed = store.doubles().bind("speed");
        speed.write(1.5f64);
        assert_eq!(speed.read(), Ok(1.5));
        assert_eq!(speed.identifier(), "speed");

        store.set("speed", "fast");
        assert!(speed.read().is_err());
    }
}
