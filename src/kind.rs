use crate::any_value::AnyValue;
use std::any::Any;
use std::fmt;
use strum::{EnumCount, EnumIter};

/// The kind of value a submap stores
///
/// Every identifier in a store is owned by exactly one kind at a time. The
/// nine primitive kinds each have a dedicated submap; `Other` is the fallback
/// for arbitrary objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumIter, EnumCount)]
pub enum Kind {
    #[strum(to_string = "i8")]
    Byte,
    #[strum(to_string = "i16")]
    Short,
    #[strum(to_string = "i32")]
    Int,
    #[strum(to_string = "i64")]
    Long,
    #[strum(to_string = "f32")]
    Float,
    #[strum(to_string = "f64")]
    Double,
    #[strum(to_string = "bool")]
    Boolean,
    #[strum(to_string = "char")]
    Char,
    #[strum(to_string = "String")]
    String,
    #[strum(to_string = "Any")]
    Other,
}

impl Kind {
    /// Collective name used to label the submap of this kind
    pub fn plural(self) -> &'static str {
        match self {
            Kind::Byte => "bytes",
            Kind::Short => "shorts",
            Kind::Int => "ints",
            Kind::Long => "longs",
            Kind::Float => "floats",
            Kind::Double => "doubles",
            Kind::Boolean => "booleans",
            Kind::Char => "chars",
            Kind::String => "strings",
            Kind::Other => "others",
        }
    }

    /// Returns true for the fallback kind
    pub fn is_fallback(self) -> bool {
        self == Kind::Other
    }
}

/// A value held by a `MetadataStore`
///
/// The variant tag decides which submap a write is routed to. Null is
/// expressed as `Option<Value>::None` on the nullable views.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Other(AnyValue),
}

impl Value {
    /// Wraps an arbitrary object for the fallback submap
    pub fn other<T: Any + Send + Sync>(value: T) -> Self {
        Value::Other(AnyValue::new(value))
    }

    /// The kind that owns this value once stored
    pub fn kind(&self) -> Kind {
        match self {
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::Boolean(_) => Kind::Boolean,
            Value::Char(_) => Kind::Char,
            Value::String(_) => Kind::String,
            Value::Other(_) => Kind::Other,
        }
    }

    /// Converts into the concrete type of kind `T`, or `None` on a kind mismatch
    ///
    /// ```
    /// use sovran_metadata::Value;
    ///
    /// assert_eq!(Value::from(7i64).extract::<i64>(), Some(7));
    /// assert_eq!(Value::from(7i64).extract::<i32>(), None);
    /// ```
    pub fn extract<T: Storable>(self) -> Option<T> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Other(v) => write!(f, "<{}>", v.type_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A type that has its own submap in a `MetadataStore`
///
/// Implemented for the nine primitive types (`i8`, `i16`, `i32`, `i64`, `f32`,
/// `f64`, `bool`, `char`, `String`) and for `AnyValue`, which stands for the
/// fallback submap. The trait is sealed; the set of kinds is closed.
pub trait Storable: sealed::Sealed + Clone + Send + Sync + 'static {
    /// The kind tag of this type's submap
    const KIND: Kind;

    /// Wraps the value in its `Value` variant
    fn into_value(self) -> Value;

    /// Unwraps a `Value` of this kind
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! storable {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl Storable for $ty {
            const KIND: Kind = Kind::$variant;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    };
}

storable!(i8, Byte);
storable!(i16, Short);
storable!(i32, Int);
storable!(i64, Long);
storable!(f32, Float);
storable!(f64, Double);
storable!(bool, Boolean);
storable!(char, Char);
storable!(String, String);
storable!(AnyValue, Other);
