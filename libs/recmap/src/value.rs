use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use time::PrimitiveDateTime;

use crate::error::CoerceError;

/// Closed set of field types a record may declare.
///
/// Anything outside the set is `Opaque`: carried as text and parsed by the
/// field type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    BigDecimal,
    BigInteger,
    Date,
    Enum(EnumInfo),
    Opaque,
}

/// Name and constant names of an enum field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumInfo {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::String => f.write_str("String"),
            TypeTag::Bool => f.write_str("Bool"),
            TypeTag::Byte => f.write_str("Byte"),
            TypeTag::Short => f.write_str("Short"),
            TypeTag::Int => f.write_str("Int"),
            TypeTag::Long => f.write_str("Long"),
            TypeTag::Float => f.write_str("Float"),
            TypeTag::Double => f.write_str("Double"),
            TypeTag::Char => f.write_str("Char"),
            TypeTag::BigDecimal => f.write_str("BigDecimal"),
            TypeTag::BigInteger => f.write_str("BigInteger"),
            TypeTag::Date => f.write_str("Date"),
            TypeTag::Enum(info) => write!(f, "Enum<{}>", info.name),
            TypeTag::Opaque => f.write_str("Opaque"),
        }
    }
}

/// Runtime value of a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    BigDecimal(BigDecimal),
    BigInteger(BigInt),
    Date(PrimitiveDateTime),
    /// Constant name of an enum value.
    Enum(&'static str),
    /// Text form of a type outside the closed set.
    Opaque(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Variant name, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Byte(_) => "Byte",
            Value::Short(_) => "Short",
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Char(_) => "Char",
            Value::BigDecimal(_) => "BigDecimal",
            Value::BigInteger(_) => "BigInteger",
            Value::Date(_) => "Date",
            Value::Enum(_) => "Enum",
            Value::Opaque(_) => "Opaque",
        }
    }

    /// Whether a field of type `tag` would accept this value on write.
    ///
    /// Opaque text is only checked for shape; its own parser may still reject it.
    pub fn fits(&self, tag: TypeTag, nullable: bool) -> bool {
        match (tag, self) {
            (_, Value::Null) => nullable,
            (TypeTag::String | TypeTag::Opaque, Value::String(_) | Value::Opaque(_)) => true,
            (TypeTag::Bool, Value::Bool(_))
            | (TypeTag::Byte, Value::Byte(_))
            | (TypeTag::Short, Value::Short(_))
            | (TypeTag::Int, Value::Int(_))
            | (TypeTag::Long, Value::Long(_))
            | (TypeTag::Float, Value::Float(_))
            | (TypeTag::Double, Value::Double(_))
            | (TypeTag::Char, Value::Char(_))
            | (TypeTag::BigDecimal, Value::BigDecimal(_))
            | (TypeTag::BigInteger, Value::BigInteger(_))
            | (TypeTag::Date, Value::Date(_)) => true,
            (TypeTag::Enum(info), Value::Enum(name)) => info.variants.contains(name),
            (TypeTag::Enum(info), Value::String(name) | Value::Opaque(name)) => {
                info.variants.contains(&name.as_str())
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldValue: Rust field type ↔ TypeTag/Value
// ---------------------------------------------------------------------------

/// A Rust type that can be stored in a record field.
///
/// `#[derive(Record)]` reads and writes every non-opaque field through this
/// trait. `Option<T>` is the nullable form of `T`.
pub trait FieldValue: Sized {
    const TYPE: TypeTag;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, CoerceError>;
}

fn mismatch<T: FieldValue>(found: &Value) -> CoerceError {
    CoerceError::Mismatch {
        target: T::TYPE,
        found: found.kind(),
    }
}

macro_rules! field_value {
    ($ty:ty, $tag:ident, $variant:ident) => {
        impl FieldValue for $ty {
            const TYPE: TypeTag = TypeTag::$tag;

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, CoerceError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

field_value!(bool, Bool, Bool);
field_value!(i8, Byte, Byte);
field_value!(i16, Short, Short);
field_value!(i32, Int, Int);
field_value!(i64, Long, Long);
field_value!(f32, Float, Float);
field_value!(f64, Double, Double);
field_value!(char, Char, Char);
field_value!(BigDecimal, BigDecimal, BigDecimal);
field_value!(BigInt, BigInteger, BigInteger);
field_value!(PrimitiveDateTime, Date, Date);

impl FieldValue for String {
    const TYPE: TypeTag = TypeTag::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::String(v) | Value::Opaque(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const TYPE: TypeTag = T::TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Unit enum usable as a record field. Implemented by `#[derive(RecordEnum)]`.
pub trait RecordEnum: Sized + 'static {
    const INFO: EnumInfo;

    fn name(&self) -> &'static str;

    /// Constant with exactly this name (case-sensitive).
    fn from_name(name: &str) -> Option<Self>;
}

/// `FieldValue::to_value` for enum fields.
pub fn enum_to_value<E: RecordEnum>(value: &E) -> Value {
    Value::Enum(value.name())
}

/// `FieldValue::from_value` for enum fields.
pub fn enum_from_value<E: RecordEnum>(value: Value) -> Result<E, CoerceError> {
    let target = TypeTag::Enum(E::INFO);
    let name = match &value {
        Value::Enum(name) => *name,
        Value::String(name) | Value::Opaque(name) => name.as_str(),
        other => {
            return Err(CoerceError::Mismatch {
                target,
                found: other.kind(),
            });
        }
    };
    E::from_name(name).ok_or_else(|| {
        CoerceError::coercion(target, name, format!("no constant named '{name}'"))
    })
}

// ---------------------------------------------------------------------------
// Opaque fields
// ---------------------------------------------------------------------------

/// Read accessor for `#[record(opaque)]` fields.
pub fn opaque_to_value<T: fmt::Display>(value: &T) -> Value {
    Value::Opaque(value.to_string())
}

/// Write accessor for `#[record(opaque)]` fields.
pub fn opaque_from_value<T>(value: Value) -> Result<T, CoerceError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Value::Opaque(text) | Value::String(text) => text
            .parse()
            .map_err(|e| CoerceError::coercion(TypeTag::Opaque, text, e)),
        other => Err(CoerceError::Mismatch {
            target: TypeTag::Opaque,
            found: other.kind(),
        }),
    }
}

/// Nullable form of [`opaque_to_value`].
pub fn opaque_option_to_value<T: fmt::Display>(value: &Option<T>) -> Value {
    value.as_ref().map_or(Value::Null, opaque_to_value)
}

/// Nullable form of [`opaque_from_value`].
pub fn opaque_option_from_value<T>(value: Value) -> Result<Option<T>, CoerceError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Value::Null => Ok(None),
        v => opaque_from_value(v).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_maps_none_to_null() {
        let none: Option<i32> = None;
        assert_eq!(none.to_value(), Value::Null);
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Int(7)), Ok(Some(7)));
        assert!(<Option<i32> as FieldValue>::NULLABLE);
        assert_eq!(<Option<i32> as FieldValue>::TYPE, TypeTag::Int);
    }

    #[test]
    fn wrong_variant_is_a_mismatch() {
        let err = i64::from_value(Value::String("1".into())).unwrap_err();
        assert_eq!(
            err,
            CoerceError::Mismatch {
                target: TypeTag::Long,
                found: "String"
            }
        );
    }

    #[test]
    fn null_into_non_nullable_is_a_mismatch() {
        assert!(matches!(
            bool::from_value(Value::Null),
            Err(CoerceError::Mismatch { found: "Null", .. })
        ));
    }

    #[test]
    fn opaque_parses_through_from_str() {
        let v: std::net::Ipv4Addr = opaque_from_value(Value::Opaque("10.0.0.1".into())).unwrap();
        assert_eq!(opaque_to_value(&v), Value::Opaque("10.0.0.1".into()));

        let err = opaque_from_value::<std::net::Ipv4Addr>(Value::Opaque("nope".into())).unwrap_err();
        assert!(matches!(err, CoerceError::TypeCoercion { target: TypeTag::Opaque, .. }));
    }

    #[test]
    fn fits_follows_write_acceptance() {
        let info = EnumInfo { name: "Status", variants: &["Open"] };
        assert!(Value::Null.fits(TypeTag::Int, true));
        assert!(!Value::Null.fits(TypeTag::Int, false));
        assert!(Value::Int(1).fits(TypeTag::Int, false));
        assert!(!Value::Int(1).fits(TypeTag::Long, false));
        assert!(!Value::Int(1).fits(TypeTag::String, false));
        assert!(Value::Opaque("x".into()).fits(TypeTag::String, false));
        assert!(Value::Enum("Open").fits(TypeTag::Enum(info), false));
        assert!(!Value::Enum("Shut").fits(TypeTag::Enum(info), false));
    }

    #[test]
    fn type_tag_display() {
        let info = EnumInfo { name: "Status", variants: &["Open"] };
        assert_eq!(TypeTag::Enum(info).to_string(), "Enum<Status>");
        assert_eq!(TypeTag::BigDecimal.to_string(), "BigDecimal");
    }
}
