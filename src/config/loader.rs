//! Configuration loading and environment parsing.

use super::validation::validate_config;
use super::Config;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load configuration, merging sources from lowest to highest precedence:
/// 1) Defaults compiled into the binary
/// 2) config.json next to the executable (application directory)
/// 3) config.json in current working directory
/// 4) File pointed to by the `SIGNAL_RELAY_CONFIG_PATH` env var
/// 5) `SIGNAL_RELAY_CONFIG_JSON` env var containing raw JSON
/// 6) The conventional `PORT` env var
/// 7) Per-field overrides with prefix `SIGNAL_RELAY__` using "__" as a nested
///    separator, e.g. `SIGNAL_RELAY__PORT=8080` or `SIGNAL_RELAY__LOGGING__LEVEL=debug`
///
/// Any errors while reading/parsing are printed to stderr and the offending
/// source is skipped.
///
/// **Note:** Validation errors from [`validate_config`] are logged to stderr but are
/// *not* propagated; `load()` always returns a `Config`. Callers who need hard failure
/// should call [`validate_config()`](super::validation::validate_config) themselves.
#[must_use]
pub fn load() -> Config {
    use std::env;
    use std::path::PathBuf;

    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    if let Ok(exe_path) = env::current_exe() {
        if let Some(mut exe_dir) = exe_path.parent().map(Path::to_path_buf) {
            exe_dir.push("config.json");
            merge_file_source(&mut merged, &exe_dir);
        }
    }

    merge_file_source(&mut merged, &PathBuf::from("config.json"));

    if let Ok(path) = env::var("SIGNAL_RELAY_CONFIG_PATH") {
        merge_file_source(&mut merged, &PathBuf::from(path));
    }

    if let Ok(json) = env::var("SIGNAL_RELAY_CONFIG_JSON") {
        if let Some(value) = parse_json_document(&json, "SIGNAL_RELAY_CONFIG_JSON") {
            merge_values(&mut merged, value);
        }
    }

    if let Ok(port) = env::var("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => set_nested_value(&mut merged, &["port".to_string()], Value::from(port)),
            Err(err) => eprintln!("Ignoring invalid PORT '{port}': {err}"),
        }
    }

    apply_env_overrides(&mut merged);

    let config = match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    };

    // Warn-only here; main.rs validates again and propagates.
    if let Err(e) = validate_config(&config) {
        eprintln!("Configuration validation error: {e}");
    }

    config
}

fn parse_json_document(raw: &str, label: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Failed to parse config from {label}: {err}");
            None
        }
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            if let Some(value) = parse_json_document(&contents, &format!("file {}", path.display()))
            {
                merge_values(target, value);
            }
        }
        Err(err) => {
            eprintln!("Failed to read config from {}: {}", path.display(), err);
        }
    }
}

fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => {
            *target_slot = source_value;
        }
    }
}

fn apply_env_overrides(root: &mut Value) {
    for (key, raw_value) in std::env::vars() {
        let Some(stripped) = key.strip_prefix("SIGNAL_RELAY__") else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if segments.is_empty() {
            continue;
        }

        let value = parse_env_value(&raw_value);
        set_nested_value(root, &segments, value);
    }
}

fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.contains(',') {
        let items = trimmed
            .split(',')
            .map(|segment| parse_scalar(segment.trim()))
            .collect::<Vec<_>>();
        return Value::Array(items);
    }

    parse_scalar(trimmed)
}

fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    let map = ensure_object(target);
    if rest.is_empty() {
        map.insert(head.clone(), value);
        return;
    }

    let entry = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    set_nested_value(entry, rest, value);
}

fn ensure_object(value: &mut Value) -> &mut serde_json::Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(serde_json::Map::new());
    }

    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was coerced into an object above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overrides_nested_fields_only() {
        let mut target = json!({"server": {"static_dir": "public", "outbound_queue_capacity": 64}});
        merge_values(&mut target, json!({"server": {"outbound_queue_capacity": 8}}));
        assert_eq!(
            target,
            json!({"server": {"static_dir": "public", "outbound_queue_capacity": 8}})
        );
    }

    #[test]
    fn env_values_parse_as_json_scalars_and_lists() {
        assert_eq!(parse_env_value("8080"), json!(8080));
        assert_eq!(parse_env_value("false"), json!(false));
        assert_eq!(parse_env_value("debug"), json!("debug"));
        assert_eq!(
            parse_env_value("stun:a.example:3478, stun:b.example:3478"),
            json!(["stun:a.example:3478", "stun:b.example:3478"])
        );
    }

    #[test]
    fn set_nested_value_creates_intermediate_objects() {
        let mut root = json!({});
        set_nested_value(
            &mut root,
            &["logging".to_string(), "level".to_string()],
            json!("debug"),
        );
        assert_eq!(root, json!({"logging": {"level": "debug"}}));
    }
}
