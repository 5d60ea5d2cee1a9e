use crate::any_value::AnyValue;
use crate::index::DispatchIndex;
use crate::kind::{Kind, Storable, Value};
use crate::submap::{ErasedSubmap, Submap};
use std::collections::HashMap;
use strum::{EnumCount, IntoEnumIterator};

/// Where a write landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) kind: Kind,
    /// The previous owner, when the write moved the identifier between submaps
    pub(crate) evicted: Option<Kind>,
}

/// The physical state of a store: one submap per kind plus the dispatch index
///
/// All mutation goes through `install`, `assign` and the `take_*` methods,
/// which keep the index and the submaps consistent before returning.
#[derive(Debug)]
pub(crate) struct Storage {
    bytes: Submap<i8>,
    shorts: Submap<i16>,
    ints: Submap<i32>,
    longs: Submap<i64>,
    floats: Submap<f32>,
    doubles: Submap<f64>,
    booleans: Submap<bool>,
    chars: Submap<char>,
    strings: Submap<String>,
    others: Submap<AnyValue>,
    index: DispatchIndex,
}

impl Storage {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Submap::with_capacity(capacity),
            shorts: Submap::with_capacity(capacity),
            ints: Submap::with_capacity(capacity),
            longs: Submap::with_capacity(capacity),
            floats: Submap::with_capacity(capacity),
            doubles: Submap::with_capacity(capacity),
            booleans: Submap::with_capacity(capacity),
            chars: Submap::with_capacity(capacity),
            strings: Submap::with_capacity(capacity),
            others: Submap::with_capacity(capacity),
            index: DispatchIndex::with_capacity(capacity.saturating_mul(Kind::COUNT)),
        }
    }

    pub(crate) fn submap(&self, kind: Kind) -> &dyn ErasedSubmap {
        match kind {
            Kind::Byte => &self.bytes,
            Kind::Short => &self.shorts,
            Kind::Int => &self.ints,
            Kind::Long => &self.longs,
            Kind::Float => &self.floats,
            Kind::Double => &self.doubles,
            Kind::Boolean => &self.booleans,
            Kind::Char => &self.chars,
            Kind::String => &self.strings,
            Kind::Other => &self.others,
        }
    }

    fn submap_mut(&mut self, kind: Kind) -> &mut dyn ErasedSubmap {
        match kind {
            Kind::Byte => &mut self.bytes,
            Kind::Short => &mut self.shorts,
            Kind::Int => &mut self.ints,
            Kind::Long => &mut self.longs,
            Kind::Float => &mut self.floats,
            Kind::Double => &mut self.doubles,
            Kind::Boolean => &mut self.booleans,
            Kind::Char => &mut self.chars,
            Kind::String => &mut self.strings,
            Kind::Other => &mut self.others,
        }
    }

    pub(crate) fn typed<T: Storable>(&self) -> Option<&Submap<T>> {
        self.submap(T::KIND).as_any().downcast_ref()
    }

    fn typed_mut<T: Storable>(&mut self) -> Option<&mut Submap<T>> {
        self.submap_mut(T::KIND).as_any_mut().downcast_mut()
    }

    /// The owner of `identifier`, whether its slot is null or not
    pub(crate) fn owner(&self, identifier: &str) -> Option<Kind> {
        self.index.owner(identifier)
    }

    /// The owner of `identifier`, only if its slot holds a value
    pub(crate) fn value_owner(&self, identifier: &str) -> Option<Kind> {
        self.owner(identifier)
            .filter(|kind| self.submap(*kind).contains_value(identifier))
    }

    /// Reads a non-null value straight from the submap of `kind`
    pub(crate) fn read_value(&self, kind: Kind, identifier: &str) -> Option<Value> {
        self.submap(kind).slot_value(identifier).flatten()
    }

    /// Reads a slot straight from the submap of `kind`
    pub(crate) fn read_slot(&self, kind: Kind, identifier: &str) -> Option<Option<Value>> {
        self.submap(kind).slot_value(identifier)
    }

    pub(crate) fn value(&self, identifier: &str) -> Option<Value> {
        self.owner(identifier)
            .and_then(|kind| self.read_value(kind, identifier))
    }

    pub(crate) fn slot(&self, identifier: &str) -> Option<Option<Value>> {
        self.owner(identifier)
            .and_then(|kind| self.read_slot(kind, identifier))
    }

    /// Installs a slot in the submap of `T`, moving ownership there
    ///
    /// If another submap owned the identifier, its slot is purged without any
    /// further notification.
    ///
    /// Each kind's submap is built with its own element type, so the downcast
    /// cannot fail; if it ever did, nothing is written and the index is left
    /// untouched.
    pub(crate) fn install<T: Storable>(&mut self, identifier: &str, value: Option<T>) -> Placement {
        let Some(target) = self.typed_mut::<T>() else {
            debug_assert!(false, "submap for {} holds another element type", T::KIND);
            return Placement {
                kind: T::KIND,
                evicted: None,
            };
        };
        target.insert(identifier, value);
        let evicted = match self.index.claim(identifier, T::KIND) {
            Some(previous) if previous != T::KIND => {
                self.submap_mut(previous).take(identifier);
                Some(previous)
            }
            _ => None,
        };
        Placement {
            kind: T::KIND,
            evicted,
        }
    }

    /// Routes a whole-store write by the value's variant
    ///
    /// A null keeps the current owner and nulls its slot in place. Only a null
    /// for an identifier nobody owns yet lands in the fallback submap.
    pub(crate) fn assign(&mut self, identifier: &str, value: Option<Value>) -> Placement {
        match value {
            Some(Value::Byte(v)) => self.install(identifier, Some(v)),
            Some(Value::Short(v)) => self.install(identifier, Some(v)),
            Some(Value::Int(v)) => self.install(identifier, Some(v)),
            Some(Value::Long(v)) => self.install(identifier, Some(v)),
            Some(Value::Float(v)) => self.install(identifier, Some(v)),
            Some(Value::Double(v)) => self.install(identifier, Some(v)),
            Some(Value::Boolean(v)) => self.install(identifier, Some(v)),
            Some(Value::Char(v)) => self.install(identifier, Some(v)),
            Some(Value::String(v)) => self.install(identifier, Some(v)),
            Some(Value::Other(v)) => self.install(identifier, Some(v)),
            None => match self.owner(identifier) {
                Some(kind) => {
                    self.submap_mut(kind).null_out(identifier);
                    Placement {
                        kind,
                        evicted: None,
                    }
                }
                None => self.install::<AnyValue>(identifier, None),
            },
        }
    }

    /// Removes a non-null slot from the submap of `kind`
    ///
    /// Null slots are invisible to the strict views and are left in place.
    pub(crate) fn take_value(&mut self, kind: Kind, identifier: &str) -> Option<Value> {
        if !self.submap(kind).contains_value(identifier) {
            return None;
        }
        self.take_slot(kind, identifier).flatten()
    }

    /// Removes any slot from the submap of `kind`
    pub(crate) fn take_slot(&mut self, kind: Kind, identifier: &str) -> Option<Option<Value>> {
        let slot = self.submap_mut(kind).take(identifier)?;
        self.index.release(identifier, kind);
        Some(slot)
    }

    /// Removes the non-null value of `identifier` from whichever submap owns it
    pub(crate) fn remove_value(&mut self, identifier: &str) -> Option<(Kind, Value)> {
        let kind = self.owner(identifier)?;
        self.take_value(kind, identifier).map(|value| (kind, value))
    }

    /// Removes the slot of `identifier` from whichever submap owns it, null or not
    pub(crate) fn remove_slot(&mut self, identifier: &str) -> Option<(Kind, Option<Value>)> {
        let kind = self.owner(identifier)?;
        self.take_slot(kind, identifier).map(|slot| (kind, slot))
    }

    /// Non-null entries across every submap
    pub(crate) fn values(&self) -> HashMap<String, Value> {
        let mut out = HashMap::with_capacity(self.index.len());
        for kind in Kind::iter() {
            self.submap(kind).collect_values(&mut out);
        }
        out
    }

    /// Every slot across every submap, nulls included
    pub(crate) fn slots(&self) -> HashMap<String, Option<Value>> {
        let mut out = HashMap::with_capacity(self.index.len());
        for kind in Kind::iter() {
            self.submap(kind).collect_slots(&mut out);
        }
        out
    }

    pub(crate) fn value_count(&self) -> usize {
        Kind::iter().map(|kind| self.submap(kind).value_count()).sum()
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.index.len()
    }

    /// Checks that the index and the submaps describe the same ownership
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        for (identifier, kind) in self.index.iter() {
            if self.read_slot(kind, identifier).is_none() {
                return Err(format!("index names {} for '{}' but it has no slot", kind, identifier));
            }
        }
        let mut slots = 0;
        for kind in Kind::iter() {
            let mut held = HashMap::new();
            self.submap(kind).collect_slots(&mut held);
            for identifier in held.keys() {
                if self.index.owner(identifier) != Some(kind) {
                    return Err(format!("'{}' has a slot in {} but the index disagrees", identifier, kind));
                }
            }
            slots += held.len();
        }
        if slots != self.index.len() {
            return Err(format!("{} slots but {} index entries", slots, self.index.len()));
        }
        Ok(())
    }
}
