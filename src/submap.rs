use crate::kind::{Storable, Value};
use std::any::Any;
use std::collections::HashMap;

/// Homogeneous storage for one kind
///
/// Every slot is optional: a present key with `None` is a stored null, which
/// the strict views treat as absent and the nullable views treat as existing.
#[derive(Debug)]
pub(crate) struct Submap<T> {
    slots: HashMap<String, Option<T>>,
}

impl<T> Submap<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// The slot for `identifier`, null or not
    pub(crate) fn slot(&self, identifier: &str) -> Option<Option<&T>> {
        self.slots.get(identifier).map(Option::as_ref)
    }

    /// The value for `identifier` if its slot is present and non-null
    pub(crate) fn value(&self, identifier: &str) -> Option<&T> {
        self.slots.get(identifier).and_then(Option::as_ref)
    }

    pub(crate) fn contains_slot(&self, identifier: &str) -> bool {
        self.slots.contains_key(identifier)
    }

    pub(crate) fn contains_value(&self, identifier: &str) -> bool {
        self.value(identifier).is_some()
    }

    /// Installs `value`, overwriting the slot in place if it already exists
    pub(crate) fn insert(&mut self, identifier: &str, value: Option<T>) {
        match self.slots.get_mut(identifier) {
            Some(slot) => *slot = value,
            None => {
                self.slots.insert(identifier.to_owned(), value);
            }
        }
    }

    pub(crate) fn remove(&mut self, identifier: &str) -> Option<Option<T>> {
        self.slots.remove(identifier)
    }

    /// Non-null entries only
    pub(crate) fn values(&self) -> impl Iterator<Item = (&str, &T)> {
        self.slots
            .iter()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (id.as_str(), v)))
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = (&str, Option<&T>)> {
        self.slots.iter().map(|(id, slot)| (id.as_str(), slot.as_ref()))
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Kind-erased access to a `Submap`, used wherever the kind is only known at runtime
pub(crate) trait ErasedSubmap {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn slot_value(&self, identifier: &str) -> Option<Option<Value>>;
    fn contains_value(&self, identifier: &str) -> bool;

    /// Nulls an existing slot in place. Returns false if there was no slot.
    fn null_out(&mut self, identifier: &str) -> bool;
    fn take(&mut self, identifier: &str) -> Option<Option<Value>>;

    fn collect_values(&self, out: &mut HashMap<String, Value>);
    fn collect_slots(&self, out: &mut HashMap<String, Option<Value>>);
    fn value_count(&self) -> usize;
}

impl<T: Storable> ErasedSubmap for Submap<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn slot_value(&self, identifier: &str) -> Option<Option<Value>> {
        self.slot(identifier)
            .map(|slot| slot.cloned().map(Storable::into_value))
    }

    fn contains_value(&self, identifier: &str) -> bool {
        Submap::contains_value(self, identifier)
    }

    fn null_out(&mut self, identifier: &str) -> bool {
        match self.slots.get_mut(identifier) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    fn take(&mut self, identifier: &str) -> Option<Option<Value>> {
        self.remove(identifier)
            .map(|slot| slot.map(Storable::into_value))
    }

    fn collect_values(&self, out: &mut HashMap<String, Value>) {
        out.extend(
            self.values()
                .map(|(id, v)| (id.to_owned(), v.clone().into_value())),
        );
    }

    fn collect_slots(&self, out: &mut HashMap<String, Option<Value>>) {
        out.extend(
            self.slots()
                .map(|(id, v)| (id.to_owned(), v.cloned().map(Storable::into_value))),
        );
    }

    fn value_count(&self) -> usize {
        self.values().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_slot_is_present_but_valueless() {
        let mut map = Submap::<i32>::with_capacity(4);
        map.insert("a", Some(1));
        map.insert("b", None);

        assert_eq!(map.value("a"), Some(&1));
        assert!(map.contains_slot("b"));
        assert!(!map.contains_value("b"));
        assert_eq!(map.slot("b"), Some(None));
        assert_eq!(map.slot("c"), None);
        assert_eq!(map.values().count(), 1);
        assert_eq!(map.slot_count(), 2);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut map = Submap::<String>::with_capacity(0);
        map.insert("a", Some("x".to_string()));
        map.insert("a", None);
        map.insert("a", Some("y".to_string()));
        assert_eq!(map.slot_count(), 1);
        assert_eq!(map.value("a").map(String::as_str), Some("y"));
    }

    #[test]
    fn test_erased_access() {
        let mut map = Submap::<bool>::with_capacity(0);
        map.insert("on", Some(true));
        map.insert("unset", None);

        let erased: &mut dyn ErasedSubmap = &mut map;
        assert_eq!(erased.slot_value("on"), Some(Some(Value::Boolean(true))));
        assert_eq!(erased.slot_value("unset"), Some(None));
        assert_eq!(erased.value_count(), 1);

        assert!(erased.null_out("on"));
        assert!(!erased.null_out("missing"));
        assert_eq!(erased.take("on"), Some(None));
        assert_eq!(erased.take("on"), None);

        let mut slots = HashMap::new();
        erased.collect_slots(&mut slots);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get("unset"), Some(&None));

        assert!(erased.as_any().downcast_ref::<Submap<bool>>().is_some());
        assert!(erased.as_any().downcast_ref::<Submap<i32>>().is_none());
    }
}
