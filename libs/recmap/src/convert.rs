use std::collections::HashMap;

use crate::coerce;
use crate::config::{ConvertOptions, FailurePolicy, NullPolicy};
use crate::error::ConvertError;
use crate::record::{FieldDescriptor, Record};
use crate::resolve::{self, Direction, MapLookup};
use crate::value::Value;

/// Serialized form of a record: map key → field text.
pub type RecordMap = HashMap<String, String>;

/// Result of a conversion together with the field failures that were skipped.
///
/// `errors` is always empty under [`FailurePolicy::Strict`].
#[derive(Debug)]
pub struct Converted<T> {
    pub value: T,
    pub errors: Vec<ConvertError>,
}

impl<T> Converted<T> {
    /// No field was skipped.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Record ⇄ map converter.
///
/// Holds only options; a single instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Apply the failure policy to one field error.
    pub(crate) fn absorb(
        &self,
        record: &str,
        err: ConvertError,
        errors: &mut Vec<ConvertError>,
    ) -> Result<(), ConvertError> {
        match self.options.failure_policy {
            FailurePolicy::BestEffort if err.is_field_level() => {
                tracing::warn!(record = %record, error = %err, "skipping field");
                errors.push(err);
                Ok(())
            }
            _ => Err(err),
        }
    }

    /// Record → map.
    ///
    /// Every readable property, ancestors included, becomes one entry keyed by
    /// its override key or the snake case form of its identifier.
    pub fn to_map<R: Record>(&self, record: &R) -> Result<Converted<RecordMap>, ConvertError> {
        let ty = R::record_type();
        let properties = R::properties(self.options.max_depth)?;
        resolve::validate(&ty, &properties)?;

        let mut map = RecordMap::with_capacity(properties.len());
        let mut errors = Vec::new();

        for field in properties.iter().filter(|f| f.readable) {
            let key = resolve::key_for(field, Direction::ToMap);
            let Some(value) = record.read_field(field.name) else {
                let err = ConvertError::field_not_found(ty.name, field.name);
                self.absorb(ty.name, err, &mut errors)?;
                continue;
            };
            tracing::trace!(record = %ty.name, field = %field.name, key = %key, "read");

            match coerce::to_text(&value) {
                Some(text) => {
                    map.insert(key, text);
                }
                None => match self.options.null_policy {
                    NullPolicy::Literal => {
                        map.insert(key, self.options.null_token.clone());
                    }
                    NullPolicy::Omit => {}
                },
            }
        }

        tracing::debug!(record = %ty.name, entries = map.len(), skipped = errors.len(), "record to map");
        Ok(Converted {
            value: map,
            errors,
        })
    }

    /// [`to_map`](Self::to_map) for a record that may be absent.
    pub fn to_map_opt<R: Record>(
        &self,
        record: Option<&R>,
    ) -> Result<Option<Converted<RecordMap>>, ConvertError> {
        record.map(|r| self.to_map(r)).transpose()
    }

    /// Map → new record.
    ///
    /// `Ok(None)` for an empty map. Otherwise a fresh instance is built with
    /// [`Record::instantiate`] and every writable property found in the map is
    /// coerced to its declared type and assigned. A property missing from the
    /// map is null input: nullable fields become `None`, the rest keep their
    /// constructed value.
    pub fn to_record<R: Record>(
        &self,
        map: &RecordMap,
    ) -> Result<Option<Converted<R>>, ConvertError> {
        if map.is_empty() {
            return Ok(None);
        }

        let ty = R::record_type();
        let properties = R::properties(self.options.max_depth)?;
        let mut record = R::instantiate()?;
        let lookup = MapLookup::new(map);
        let mut errors = Vec::new();

        for field in properties.iter().filter(|f| f.writable) {
            let coerced = match lookup.get(field) {
                Some(text) => self.coerce_field(field, text),
                None if field.nullable => Ok(Value::Null),
                None => {
                    tracing::trace!(record = %ty.name, field = %field.name, "absent from map");
                    continue;
                }
            };
            let assigned = coerced.and_then(|value| {
                match record.write_field(field.name, value) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(ConvertError::field_not_found(ty.name, field.name)),
                    Err(source) => Err(ConvertError::Coerce {
                        field: field.name.to_string(),
                        source,
                    }),
                }
            });
            if let Err(err) = assigned {
                self.absorb(ty.name, err, &mut errors)?;
            }
        }

        tracing::debug!(record = %ty.name, entries = map.len(), skipped = errors.len(), "map to record");
        Ok(Some(Converted {
            value: record,
            errors,
        }))
    }

    fn coerce_field(&self, field: &FieldDescriptor, text: &str) -> Result<Value, ConvertError> {
        if field.nullable
            && self.options.null_policy == NullPolicy::Literal
            && text == self.options.null_token
        {
            return Ok(Value::Null);
        }
        coerce::from_str(text, field.type_tag).map_err(|source| ConvertError::Coerce {
            field: field.name.to_string(),
            source,
        })
    }
}

/// Record → map with default options.
pub fn to_map<R: Record>(record: &R) -> Result<RecordMap, ConvertError> {
    Converter::default()
        .to_map(record)
        .map(Converted::into_value)
}

/// Map → record with default options. `Ok(None)` for an empty map.
pub fn to_record<R: Record>(map: &RecordMap) -> Result<Option<R>, ConvertError> {
    Ok(Converter::default()
        .to_record(map)?
        .map(Converted::into_value))
}
