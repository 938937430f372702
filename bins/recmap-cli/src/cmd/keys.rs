use std::collections::HashMap;
use std::io::Read;

use recmap::naming::{to_camel, to_snake};
use recmap::{ConvertOptions, NullPolicy, RecordMap};

use crate::config::{Convention, KeysArgs};
use crate::error::CliError;

pub fn run(args: &KeysArgs, options: &ConvertOptions) -> Result<(), CliError> {
    let input = read_input(args.file.as_deref())?;
    let value: serde_json::Value =
        serde_json::from_str(&input).map_err(recmap_json::JsonError::from)?;

    let null_token = match options.null_policy {
        NullPolicy::Literal => Some(options.null_token.as_str()),
        NullPolicy::Omit => None,
    };
    let map = recmap_json::map_from_value(value, null_token)?;
    let renamed = rename_keys(map, args.to)?;
    tracing::debug!(entries = renamed.len(), to = ?args.to, "renamed keys");

    println!("{}", recmap_json::map_to_json(&renamed)?);
    Ok(())
}

fn rename_keys(map: RecordMap, to: Convention) -> Result<RecordMap, CliError> {
    let mut entries: Vec<(String, String)> = map.into_iter().collect();
    entries.sort();

    let mut renamed = RecordMap::with_capacity(entries.len());
    let mut sources: HashMap<String, String> = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        let target = match to {
            Convention::Snake => to_snake(&key),
            Convention::Camel => to_camel(&key),
        };
        if let Some(first) = sources.get(&target) {
            return Err(CliError::KeyCollision {
                first: first.clone(),
                second: key,
                target,
            });
        }
        sources.insert(target.clone(), key);
        renamed.insert(target, value);
    }
    Ok(renamed)
}

fn read_input(path: Option<&str>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}
