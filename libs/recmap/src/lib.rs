//! Record ⇄ string map conversion.
//!
//! A record is a flat struct deriving [`Record`]; its map form is a
//! [`RecordMap`] of snake case keys to field text. Field types are coerced
//! through a closed [`TypeTag`] set, naming overrides come from
//! `#[record(key = "...")]`, and inherited fields are reached through a
//! `#[record(parent)]` field.
//!
//! ```ignore
//! #[derive(Record, Default)]
//! struct Order {
//!     order_id: String,
//!     #[record(key = "ref")]
//!     reference_code: String,
//!     created_at: Option<time::PrimitiveDateTime>,
//! }
//!
//! let map = recmap::to_map(&order)?;      // {"order_id", "ref", "created_at"}
//! let back: Option<Order> = recmap::to_record(&map)?;
//! ```

pub mod coerce;
pub mod config;
pub mod convert;
pub mod copy;
pub mod error;
pub mod merge;
pub mod naming;
pub mod record;
pub mod resolve;
pub mod value;

pub use recmap_derive::{Record, RecordEnum};

pub use config::{ConvertOptions, FailurePolicy, NullPolicy};
pub use convert::{Converted, Converter, RecordMap, to_map, to_record};
pub use copy::copy_properties;
pub use error::{CoerceError, ConvertError};
pub use merge::merge_non_null;
pub use record::{FieldDescriptor, Record, RecordType};
pub use value::{EnumInfo, FieldValue, RecordEnum, TypeTag, Value};
