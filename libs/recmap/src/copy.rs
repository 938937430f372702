use std::collections::HashSet;

use crate::convert::{Converted, Converter};
use crate::error::{CoerceError, ConvertError};
use crate::record::Record;
use crate::value::Value;

impl Converter {
    /// Copy every readable property of `source` onto the same-named writable
    /// property of `target`, except names in `ignore`.
    ///
    /// Source and target may be different record types; properties only one
    /// side declares are left alone. Every value is checked against the target
    /// field before the first write, so a strict failure leaves `target`
    /// untouched. Returns the number of properties written.
    pub fn copy_properties<S: Record, T: Record>(
        &self,
        source: &S,
        target: &mut T,
        ignore: &HashSet<&str>,
    ) -> Result<Converted<usize>, ConvertError> {
        let source_ty = S::record_type();
        let target_ty = T::record_type();
        let max_depth = self.options().max_depth;
        let readable = S::properties(max_depth)?;
        let writable = T::properties(max_depth)?;

        let mut errors = Vec::new();
        let mut pending: Vec<(&'static str, Value)> = Vec::new();

        for field in writable.iter().filter(|f| f.writable) {
            if ignore.contains(field.name) {
                continue;
            }
            if !readable.iter().any(|f| f.readable && f.name == field.name) {
                continue;
            }
            let Some(value) = source.read_field(field.name) else {
                let err = ConvertError::field_not_found(source_ty.name, field.name);
                self.absorb(source_ty.name, err, &mut errors)?;
                continue;
            };
            if !value.fits(field.type_tag, field.nullable) {
                let err = ConvertError::Coerce {
                    field: field.name.to_string(),
                    source: CoerceError::Mismatch {
                        target: field.type_tag,
                        found: value.kind(),
                    },
                };
                self.absorb(target_ty.name, err, &mut errors)?;
                continue;
            }
            pending.push((field.name, value));
        }

        let mut copied = 0;
        for (name, value) in pending {
            let written = match target.write_field(name, value) {
                Ok(true) => Ok(()),
                Ok(false) => Err(ConvertError::field_not_found(target_ty.name, name)),
                Err(cause) => Err(ConvertError::Coerce {
                    field: name.to_string(),
                    source: cause,
                }),
            };
            match written {
                Ok(()) => copied += 1,
                Err(err) => self.absorb(target_ty.name, err, &mut errors)?,
            }
        }

        tracing::debug!(
            source = %source_ty.name,
            target = %target_ty.name,
            copied,
            ignored = ignore.len(),
            "copied properties"
        );
        Ok(Converted {
            value: copied,
            errors,
        })
    }
}

/// [`Converter::copy_properties`] with default options.
pub fn copy_properties<S: Record, T: Record>(
    source: &S,
    target: &mut T,
    ignore: &HashSet<&str>,
) -> Result<usize, ConvertError> {
    Converter::default()
        .copy_properties(source, target, ignore)
        .map(Converted::into_value)
}
