use std::collections::HashSet;

use crate::convert::{Converted, Converter};
use crate::error::ConvertError;
use crate::record::Record;

impl Converter {
    /// Names of the readable properties of `source` whose value is `Null`.
    pub fn null_property_names<S: Record>(
        &self,
        source: &S,
    ) -> Result<HashSet<&'static str>, ConvertError> {
        let ty = S::record_type();
        let mut names = HashSet::new();
        for field in S::properties(self.options().max_depth)?
            .iter()
            .filter(|f| f.readable)
        {
            match source.read_field(field.name) {
                Some(value) if value.is_null() => {
                    names.insert(field.name);
                }
                Some(_) => {}
                None => return Err(ConvertError::field_not_found(ty.name, field.name)),
            }
        }
        Ok(names)
    }

    /// Overwrite `target` with every non-null property of `source`.
    ///
    /// Properties that are `None` on `source` keep their value on `target`.
    /// Returns the number of properties written.
    pub fn merge_non_null<S: Record, T: Record>(
        &self,
        source: &S,
        target: &mut T,
    ) -> Result<Converted<usize>, ConvertError> {
        let nulls = self.null_property_names(source)?;
        tracing::trace!(source = %S::record_type().name, nulls = nulls.len(), "merge");
        self.copy_properties(source, target, &nulls)
    }
}

/// [`Converter::merge_non_null`] with default options.
pub fn merge_non_null<S: Record, T: Record>(source: &S, target: &mut T) -> Result<usize, ConvertError> {
    Converter::default()
        .merge_non_null(source, target)
        .map(Converted::into_value)
}
