use std::collections::HashMap;

use crate::error::ConvertError;
use crate::naming::{to_camel, to_snake};
use crate::record::{FieldDescriptor, RecordType};

/// Which way a key is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Record → map: identifier is converted to snake case.
    ToMap,
    /// Map → record: map keys are converted to camel case and matched against
    /// the identifier.
    FromMap,
}

/// Locate `name` on `ty` or the nearest ancestor that declares it.
pub fn find_field(
    ty: &RecordType,
    name: &str,
    max_depth: usize,
) -> Result<FieldDescriptor, ConvertError> {
    ty.chain(max_depth)?
        .iter()
        .find_map(|t| t.declared(name).copied())
        .ok_or_else(|| ConvertError::field_not_found(ty.name, name))
}

/// Map key of an already located field: its override verbatim, otherwise the
/// convention transform of its identifier.
pub fn key_for(field: &FieldDescriptor, direction: Direction) -> String {
    match (field.override_key(), direction) {
        (Some(key), _) => key.to_string(),
        (None, Direction::ToMap) => to_snake(field.name),
        (None, Direction::FromMap) => to_camel(field.name),
    }
}

/// Resolve the map key of property `name` on `ty`.
pub fn resolve_key(
    ty: &RecordType,
    name: &str,
    direction: Direction,
    max_depth: usize,
) -> Result<String, ConvertError> {
    let field = find_field(ty, name, max_depth)?;
    Ok(key_for(&field, direction))
}

/// Reject descriptor tables where two readable properties would land on the
/// same map key.
pub fn validate(
    ty: &RecordType,
    properties: &[FieldDescriptor],
) -> Result<(), ConvertError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for field in properties.iter().filter(|f| f.readable) {
        let key = key_for(field, Direction::ToMap);
        if let Some(other) = seen.insert(key.clone(), field.name) {
            return Err(ConvertError::introspection(
                ty.name,
                format!("fields '{other}' and '{}' both map to key '{key}'", field.name),
            ));
        }
    }
    Ok(())
}

/// Lookup side of [`Direction::FromMap`] over one input map.
///
/// Override keys are matched verbatim. Otherwise the snake case key wins, then
/// the identifier itself, then any other key whose camel form matches; among
/// those the lexicographically smallest key is taken.
pub struct MapLookup<'a> {
    map: &'a HashMap<String, String>,
    by_camel: HashMap<String, (&'a str, &'a str)>,
}

impl<'a> MapLookup<'a> {
    pub fn new(map: &'a HashMap<String, String>) -> Self {
        let mut by_camel: HashMap<String, (&'a str, &'a str)> = HashMap::new();
        for (key, value) in map {
            let slot = by_camel
                .entry(to_camel(key))
                .or_insert((key.as_str(), value.as_str()));
            if key.as_str() < slot.0 {
                *slot = (key.as_str(), value.as_str());
            }
        }
        Self { map, by_camel }
    }

    /// Raw text for `field`, if the map carries it.
    pub fn get(&self, field: &FieldDescriptor) -> Option<&'a str> {
        if let Some(key) = field.override_key() {
            return self.map.get(key).map(String::as_str);
        }
        let snake = key_for(field, Direction::ToMap);
        let camel = key_for(field, Direction::FromMap);
        self.map
            .get(&snake)
            .or_else(|| self.map.get(&camel))
            .map(String::as_str)
            .or_else(|| self.by_camel.get(&camel).map(|(_, value)| *value))
    }
}
