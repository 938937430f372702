#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Json(#[from] recmap_json::JsonError),

    #[error("{0}")]
    Convert(#[from] recmap::ConvertError),

    #[error("{0}")]
    Coerce(#[from] recmap::CoerceError),

    #[error("keys '{first}' and '{second}' both rename to '{target}'")]
    KeyCollision {
        first: String,
        second: String,
        target: String,
    },

    #[error("--type enum needs at least one --enum-variant")]
    NoVariants,

    #[error("'{value}' is not one of: {}", .variants.join(", "))]
    UnknownVariant { value: String, variants: Vec<String> },
}
