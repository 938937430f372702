use recmap::coerce;

use crate::config::CoerceArgs;
use crate::error::CliError;

pub fn run(args: &CoerceArgs) -> Result<(), CliError> {
    let Some(tag) = args.type_tag() else {
        let constant = enum_constant(&args.value, &args.variants)?;
        tracing::debug!(variants = args.variants.len(), "coerced enum");
        println!("{constant}");
        return Ok(());
    };
    let value = coerce::from_str(&args.value, tag)?;
    tracing::debug!(%tag, kind = value.kind(), "coerced");
    // from_str never yields Null.
    println!("{}", coerce::to_text(&value).unwrap_or_default());
    Ok(())
}

/// Exact, case-sensitive constant lookup.
fn enum_constant<'a>(value: &str, variants: &'a [String]) -> Result<&'a str, CliError> {
    if variants.is_empty() {
        return Err(CliError::NoVariants);
    }
    variants
        .iter()
        .find(|v| v.as_str() == value)
        .map(String::as_str)
        .ok_or_else(|| CliError::UnknownVariant {
            value: value.to_string(),
            variants: variants.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_constant_matches_exactly() {
        let variants = vec!["Open".to_string(), "Closed".to_string()];
        assert_eq!(enum_constant("Closed", &variants).unwrap(), "Closed");
        assert!(matches!(
            enum_constant("closed", &variants),
            Err(CliError::UnknownVariant { .. })
        ));
        assert!(matches!(enum_constant("Open", &[]), Err(CliError::NoVariants)));
    }
}
