use clap::{Args, Parser, Subcommand, ValueEnum};
use recmap::{ConvertOptions, TypeTag};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "recmap", about = "Record map key and value conversion")]
pub struct Cli {
    /// Converter options (TOML)
    #[arg(long, global = true, env = "RECMAP_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite the keys of a flat JSON object to another naming convention
    Keys(KeysArgs),
    /// Coerce a value into a field type and print its canonical text
    Coerce(CoerceArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Convention {
    Snake,
    Camel,
}

#[derive(Args, Clone, Debug)]
pub struct KeysArgs {
    /// Target convention
    #[arg(long, value_enum)]
    pub to: Convention,

    /// Input file; stdin when omitted
    pub file: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
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
    Enum,
    Opaque,
}

#[derive(Args, Clone, Debug)]
pub struct CoerceArgs {
    /// Target field type
    #[arg(long = "type", value_enum)]
    pub type_arg: TypeArg,

    /// Enum constant name (repeatable, `--type enum` only)
    #[arg(long = "enum-variant")]
    pub variants: Vec<String>,

    pub value: String,
}

impl CoerceArgs {
    /// Closed-set tag of `--type`. `None` for `enum`, whose constants come
    /// from `--enum-variant`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        let tag = match self.type_arg {
            TypeArg::String => TypeTag::String,
            TypeArg::Bool => TypeTag::Bool,
            TypeArg::Byte => TypeTag::Byte,
            TypeArg::Short => TypeTag::Short,
            TypeArg::Int => TypeTag::Int,
            TypeArg::Long => TypeTag::Long,
            TypeArg::Float => TypeTag::Float,
            TypeArg::Double => TypeTag::Double,
            TypeArg::Char => TypeTag::Char,
            TypeArg::BigDecimal => TypeTag::BigDecimal,
            TypeArg::BigInteger => TypeTag::BigInteger,
            TypeArg::Date => TypeTag::Date,
            TypeArg::Opaque => TypeTag::Opaque,
            TypeArg::Enum => return None,
        };
        Some(tag)
    }
}

/// Options from `--config`, or defaults.
pub fn load_options(path: Option<&str>) -> Result<ConvertOptions, CliError> {
    match path {
        Some(path) => {
            let options = ConvertOptions::load(path)?;
            tracing::debug!(path = %path, ?options, "loaded options");
            Ok(options)
        }
        None => Ok(ConvertOptions::default()),
    }
}
