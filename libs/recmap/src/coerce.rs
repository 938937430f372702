//! Text ⇄ typed value, dispatched on the destination's [`TypeTag`].

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::CoerceError;
use crate::value::{TypeTag, Value};

/// `YYYY-MM-DD HH:MM:SS`, used in both directions.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn parse<T>(text: &str, target: TypeTag) -> Result<T, CoerceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| CoerceError::coercion(target, text, e))
}

/// Coerce `text` into a value of type `tag`.
pub fn from_str(text: &str, tag: TypeTag) -> Result<Value, CoerceError> {
    let value = match tag {
        TypeTag::String => Value::String(text.to_string()),
        TypeTag::Bool => Value::Bool(text.eq_ignore_ascii_case("true")),
        TypeTag::Byte => Value::Byte(parse(text, tag)?),
        TypeTag::Short => Value::Short(parse(text, tag)?),
        TypeTag::Int => Value::Int(parse(text, tag)?),
        TypeTag::Long => Value::Long(parse(text, tag)?),
        TypeTag::Float => Value::Float(parse(text, tag)?),
        TypeTag::Double => Value::Double(parse(text, tag)?),
        TypeTag::Char => match text.chars().next() {
            Some(c) => Value::Char(c),
            None => return Err(CoerceError::EmptyValue { target: tag }),
        },
        TypeTag::BigDecimal => Value::BigDecimal(parse::<BigDecimal>(text, tag)?),
        TypeTag::BigInteger => Value::BigInteger(parse::<BigInt>(text, tag)?),
        TypeTag::Date => Value::Date(
            PrimitiveDateTime::parse(text, DATE_FORMAT)
                .map_err(|e| CoerceError::coercion(tag, text, e))?,
        ),
        TypeTag::Enum(info) => match info.variants.iter().find(|v| **v == text) {
            Some(name) => Value::Enum(*name),
            None => {
                return Err(CoerceError::coercion(
                    tag,
                    text,
                    format!("no constant named '{text}'"),
                ));
            }
        },
        TypeTag::Opaque => Value::Opaque(text.to_string()),
    };
    Ok(value)
}

/// Canonical text of `value`. `None` for [`Value::Null`].
pub fn to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) | Value::Opaque(s) => s.clone(),
        Value::Bool(v) => v.to_string(),
        Value::Byte(v) => v.to_string(),
        Value::Short(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::BigDecimal(v) => v.to_string(),
        Value::BigInteger(v) => v.to_string(),
        // The fixed format only names components every PrimitiveDateTime has.
        Value::Date(v) => v.format(DATE_FORMAT).unwrap_or_else(|_| v.to_string()),
        Value::Enum(name) => (*name).to_string(),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EnumInfo;
    use time::macros::datetime;

    const STATUS: EnumInfo = EnumInfo {
        name: "Status",
        variants: &["Open", "Closed"],
    };

    #[test]
    fn int_parses_and_rejects_text() {
        assert_eq!(from_str("42", TypeTag::Int), Ok(Value::Int(42)));
        let err = from_str("abc", TypeTag::Int).unwrap_err();
        assert!(matches!(err, CoerceError::TypeCoercion { target: TypeTag::Int, ref value, .. } if value == "abc"));
    }

    #[test]
    fn numeric_overflow_is_an_error() {
        assert!(from_str("128", TypeTag::Byte).is_err());
        assert_eq!(from_str("-128", TypeTag::Byte), Ok(Value::Byte(-128)));
        assert!(from_str("40000", TypeTag::Short).is_err());
        assert!(from_str("9223372036854775808", TypeTag::Long).is_err());
    }

    #[test]
    fn bool_is_permissive() {
        assert_eq!(from_str("TRUE", TypeTag::Bool), Ok(Value::Bool(true)));
        assert_eq!(from_str("false", TypeTag::Bool), Ok(Value::Bool(false)));
        assert_eq!(from_str("yes", TypeTag::Bool), Ok(Value::Bool(false)));
        assert_eq!(from_str("", TypeTag::Bool), Ok(Value::Bool(false)));
    }

    #[test]
    fn char_takes_first_character() {
        assert_eq!(from_str("xyz", TypeTag::Char), Ok(Value::Char('x')));
        assert_eq!(
            from_str("", TypeTag::Char),
            Err(CoerceError::EmptyValue { target: TypeTag::Char })
        );
    }

    #[test]
    fn big_numbers() {
        let v = from_str("123456789012345678901234567890", TypeTag::BigInteger).unwrap();
        assert_eq!(to_text(&v).as_deref(), Some("123456789012345678901234567890"));

        let v = from_str("19.99", TypeTag::BigDecimal).unwrap();
        assert_eq!(to_text(&v).as_deref(), Some("19.99"));

        assert!(from_str("1.2.3", TypeTag::BigDecimal).is_err());
        assert!(from_str("12a", TypeTag::BigInteger).is_err());
    }

    #[test]
    fn date_uses_fixed_format() {
        let v = from_str("2021-11-03 14:44:00", TypeTag::Date).unwrap();
        assert_eq!(v, Value::Date(datetime!(2021-11-03 14:44:00)));
        assert_eq!(to_text(&v).as_deref(), Some("2021-11-03 14:44:00"));

        assert!(from_str("2021-11-03T14:44:00", TypeTag::Date).is_err());
        assert!(from_str("2021-11-03", TypeTag::Date).is_err());
    }

    #[test]
    fn enum_lookup_is_case_sensitive() {
        assert_eq!(from_str("Open", TypeTag::Enum(STATUS)), Ok(Value::Enum("Open")));
        assert!(from_str("open", TypeTag::Enum(STATUS)).is_err());
    }

    #[test]
    fn opaque_passes_text_through() {
        assert_eq!(
            from_str("anything at all", TypeTag::Opaque),
            Ok(Value::Opaque("anything at all".into()))
        );
    }

    #[test]
    fn null_has_no_text() {
        assert_eq!(to_text(&Value::Null), None);
        assert_eq!(to_text(&Value::String("null".into())).as_deref(), Some("null"));
    }

    #[test]
    fn float_text_round_trips() {
        let v = from_str("0.1", TypeTag::Double).unwrap();
        assert_eq!(to_text(&v).as_deref(), Some("0.1"));
        assert_eq!(to_text(&Value::Float(2.5)).as_deref(), Some("2.5"));
    }
}
