use crate::error::{CoerceError, ConvertError};
use crate::value::{TypeTag, Value};

/// A single field as declared on one record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Property identifier (`orderId`).
    pub name: &'static str,
    pub type_tag: TypeTag,
    /// Map key declared with `#[record(key = "...")]`.
    pub override_key: Option<&'static str>,
    pub readable: bool,
    pub writable: bool,
    /// `Option<T>` field.
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Declared override key. An empty declaration counts as no override.
    pub fn override_key(&self) -> Option<&'static str> {
        self.override_key.filter(|key| !key.is_empty())
    }
}

/// Field table of one record type plus the link to its ancestor.
///
/// `fields` lists only what the type itself declares; inherited fields are
/// reached through `parent`.
#[derive(Debug, Clone)]
pub struct RecordType {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub parent: Option<fn() -> RecordType>,
}

impl RecordType {
    pub fn declared(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// This type followed by its ancestors, nearest first.
    ///
    /// Fails when the chain is deeper than `max_depth`.
    pub fn chain(&self, max_depth: usize) -> Result<Vec<RecordType>, ConvertError> {
        let mut chain = vec![self.clone()];
        let mut next = self.parent;
        while let Some(parent) = next {
            if chain.len() > max_depth {
                return Err(ConvertError::introspection(
                    self.name,
                    format!("ancestor chain deeper than {max_depth}"),
                ));
            }
            let ty = parent();
            next = ty.parent;
            chain.push(ty);
        }
        Ok(chain)
    }
}

/// A flat structured value whose fields can be enumerated, read and written by
/// name. Implemented by `#[derive(Record)]`.
pub trait Record: Sized {
    fn record_type() -> RecordType;

    /// Value of the readable property `name`, searching ancestors. `None` when
    /// no type in the chain has a readable field of that name.
    fn read_field(&self, name: &str) -> Option<Value>;

    /// Assign the writable property `name`, searching ancestors. `Ok(false)`
    /// when no type in the chain has a writable field of that name.
    fn write_field(&mut self, name: &str, value: Value) -> Result<bool, CoerceError>;

    /// Fresh instance for `to_record`.
    fn instantiate() -> Result<Self, ConvertError>;

    /// Every property of the type with its ancestors flattened in: own fields
    /// in declaration order, then each ancestor's. A field shadows an ancestor
    /// field of the same name.
    fn properties(max_depth: usize) -> Result<Vec<FieldDescriptor>, ConvertError> {
        let mut out: Vec<FieldDescriptor> = Vec::new();
        for ty in Self::record_type().chain(max_depth)? {
            for field in ty.fields {
                if !out.iter().any(|f| f.name == field.name) {
                    out.push(field);
                }
            }
        }
        Ok(out)
    }
}
