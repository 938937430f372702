use crate::value::TypeTag;

/// Failure to turn text (or a runtime [`Value`](crate::value::Value)) into a
/// field's declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("cannot coerce {value:?} into {target}: {reason}")]
    TypeCoercion {
        target: TypeTag,
        value: String,
        reason: String,
    },

    #[error("empty value cannot be coerced into {target}")]
    EmptyValue { target: TypeTag },

    #[error("expected a {target} value, found {found}")]
    Mismatch { target: TypeTag, found: &'static str },
}

impl CoerceError {
    pub fn coercion(target: TypeTag, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::TypeCoercion {
            target,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Error returned by record ⇄ map conversion, merge and copy operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("field '{field}' not found on {record} or any of its ancestors")]
    FieldNotFound { record: String, field: String },

    #[error("field '{field}': {source}")]
    Coerce {
        field: String,
        #[source]
        source: CoerceError,
    },

    #[error("cannot construct {record}: {reason}")]
    Construction { record: String, reason: String },

    #[error("introspection of {record} failed: {reason}")]
    Introspection { record: String, reason: String },

    #[error("config error: {0}")]
    Config(String),
}

impl ConvertError {
    pub fn field_not_found(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            record: record.into(),
            field: field.into(),
        }
    }

    pub fn introspection(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Introspection {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Whether best-effort conversion may skip the offending field and go on.
    ///
    /// Construction, introspection and config failures leave nothing to
    /// continue with.
    pub fn is_field_level(&self) -> bool {
        matches!(self, Self::FieldNotFound { .. } | Self::Coerce { .. })
    }

    /// Add context to the error.
    ///
    /// Produces `"context: original"` for message-carrying variants; structured
    /// variants prefix the record or field name instead.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Self::Config(msg) => Self::Config(format!("{ctx}: {msg}")),
            Self::Construction { record, reason } => Self::Construction {
                record,
                reason: format!("{ctx}: {reason}"),
            },
            Self::Introspection { record, reason } => Self::Introspection {
                record,
                reason: format!("{ctx}: {reason}"),
            },
            Self::Coerce { field, source } => Self::Coerce {
                field: format!("{ctx}: {field}"),
                source,
            },
            other => other,
        }
    }
}
