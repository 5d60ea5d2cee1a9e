//! # sovran-metadata
//!
//! A heterogeneous, string-keyed metadata store with typed and nullable views.
//!
//! `sovran-metadata` keeps values of nine primitive kinds (`i8`, `i16`, `i32`,
//! `i64`, `f32`, `f64`, `bool`, `char`, `String`) plus arbitrary objects in a
//! single container. Every identifier is owned by exactly one typed submap at
//! a time, so consumers read values through a strongly-typed view instead of
//! casting.
//!
//! ## Key Features
//!
//! - **Typed views**: `store.ints()`, `store.strings()`, ... read one submap directly
//! - **Ownership transfer**: writing a value of another kind moves the identifier
//! - **Null is not absence**: the nullable façade stores explicit nulls
//! - **Self-healing bindings**: cached accessors survive a type change of their key
//! - **Shared handles**: a cloned store refers to the same storage
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_metadata::{MetadataAccess, MetadataError, MetadataStore, Value};
//!
//! fn main() -> Result<(), MetadataError> {
//!     let store = MetadataStore::new("app");
//!
//!     // Values are routed to the submap of their kind
//!     store.set("retries", 3i32);
//!     store.set("title", "Hello, world!");
//!     store.set("ratio", 0.5f64);
//!
//!     // Typed views hand out concrete types
//!     let retries: i32 = store.ints().get("retries")?;
//!     let title: String = store.strings().get("title")?;
//!     println!("{} retries for {}", retries, title);
//!
//!     // The whole-store view hands out tagged values
//!     assert_eq!(store.get("ratio")?, Value::Double(0.5));
//!
//!     // Reading through the wrong view fails with a typed error
//!     match store.ints().get("title") {
//!         Ok(value) => println!("Value: {}", value),
//!         Err(MetadataError::UnknownTypedIdentifier { kind, .. }) => {
//!             println!("title is not stored as {}", kind)
//!         }
//!         Err(e) => println!("Other error: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Changing the Kind of a Key
//!
//! ```rust
//! use sovran_metadata::{Kind, MetadataAccess, MetadataStore};
//!
//! let store = MetadataStore::new("app");
//! store.set("port", 8080i32);
//! assert_eq!(store.locate("port"), Some(Kind::Int));
//!
//! store.set("port", "8080");
//! assert_eq!(store.locate("port"), Some(Kind::String));
//! assert!(!store.ints().exists("port"));
//! assert!(store.strings().exists("port"));
//! ```
//!
//! ### Storing Nulls
//!
//! ```rust
//! use sovran_metadata::{MetadataAccess, MetadataStore};
//!
//! let store = MetadataStore::new("app");
//! store.set("token", "abc");
//!
//! // A stored null hides the key from the strict view only
//! store.nullable().set_null("token");
//! assert!(!store.exists("token"));
//! assert!(store.nullable().exists("token"));
//! assert_eq!(store.nullable().strings().get("token"), Ok(None));
//!
//! // Removing through the nullable view drops the slot entirely
//! store.nullable().remove("token");
//! assert!(!store.nullable().exists("token"));
//! ```
//!
//! ### Bindings
//!
//! ```rust
//! use sovran_metadata::{MetadataAccess, MetadataStore, Value};
//!
//! let store = MetadataStore::new("app");
//! store.set("mode", "fast");
//!
//! let mut mode = store.bind("mode");
//! assert_eq!(mode.read(), Ok(Value::from("fast")));
//!
//! // Written behind the binding's back, with a different kind
//! store.set("mode", 2i32);
//! assert_eq!(mode.read(), Ok(Value::Int(2)));
//!
//! mode.write(true);
//! assert_eq!(store.booleans().get("mode"), Ok(true));
//! ```

mod access;
mod any_value;
mod binding;
mod error;
mod index;
mod kind;
mod nullable;
mod options;
mod storage;
mod store;
mod submap;
mod typed;

pub use access::MetadataAccess;
pub use any_value::AnyValue;
pub use binding::{AccessorBinding, BindingState, NullableAccessorBinding, TypedBinding};
pub use error::MetadataError;
pub use kind::{Kind, Storable, Value};
pub use nullable::NullableMetadataStore;
pub use options::{StoreOptions, DEFAULT_RESERVED_PREFIX};
pub use store::MetadataStore;
pub use typed::{NullableTypedSubmap, TypedSubmap};
