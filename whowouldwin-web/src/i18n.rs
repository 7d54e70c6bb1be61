use serde_json::Value;
use std::collections::BTreeMap;

const EN: &str = include_str!("../i18n/en.json");

thread_local! {
    static STRINGS: Value = serde_json::from_str(EN).unwrap_or_else(|err| {
        log::error!("string table is not valid JSON: {err}");
        Value::Object(serde_json::Map::new())
    });
}

fn get_nested_value<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(obj, |current, k| current.get(k))
}

fn plural_category(count: f64) -> &'static str {
    if (count - 1.0).abs() < f64::EPSILON {
        "one"
    } else if count.abs() < f64::EPSILON {
        "zero"
    } else {
        "other"
    }
}

fn render_value(value: &Value, args: Option<&BTreeMap<&str, &str>>) -> Option<String> {
    let mut text = match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            let category = args
                .and_then(|m| m.get("count"))
                .and_then(|c| c.parse::<f64>().ok())
                .map(plural_category);
            category
                .and_then(|cat| map.get(cat))
                .or_else(|| map.get("_"))
                .and_then(Value::as_str)?
                .to_string()
        }
        _ => return None,
    };

    if let Some(args_map) = args {
        for (k, v) in args_map {
            text = text.replace(&format!("{{{k}}}"), v);
        }
    }
    Some(text)
}

/// Look up a UI string.
///
/// Unknown keys come back verbatim so a missing entry is visible on screen.
#[must_use]
pub fn t(key: &str) -> String {
    tr(key, None)
}

/// Look up a UI string and substitute `{name}` placeholders.
///
/// A `count` argument selects between `one`, `zero` and `other` variants when
/// the entry is an object.
#[must_use]
pub fn tr(key: &str, args: Option<&BTreeMap<&str, &str>>) -> String {
    STRINGS
        .with(|strings| get_nested_value(strings, key).and_then(|v| render_value(v, args)))
        .unwrap_or_else(|| key.to_string())
}

/// Format a pick share for the leaderboard, one decimal place.
#[must_use]
pub fn fmt_share(share_pct: f64) -> String {
    format!("{share_pct:.1}%")
}
