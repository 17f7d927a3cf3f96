use itertools::Itertools;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// File names the list-management panels write next to the application.
pub const SITUATION_TYPES_FILE: &str = "situation_types.json";
pub const TABLES_FILE: &str = "tables.json";
pub const SCREENS_FILE: &str = "screens.json";
pub const LOGS_FILE: &str = "logs.json";

/// A read-only snapshot of the externally-owned lookup vocabularies.
///
/// The lists are owned and edited by the list-management side panels; this
/// crate only consumes them. The registry takes a snapshot at construction
/// time and can be handed a fresh one through
/// [`NodeSchemaRegistry::refresh`](crate::schema::NodeSchemaRegistry::refresh),
/// so no global mutable state is involved.
#[derive(Debug, Clone)]
pub struct LookupLists {
    pub situation_types: Vec<String>,
    pub tables: Vec<String>,
    pub screens: Vec<String>,
    pub logs: Vec<String>,
}

impl Default for LookupLists {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LookupLists {
    /// The built-in vocabularies used when no list files are available.
    pub fn builtin() -> Self {
        Self {
            situation_types: builtin_situation_types(),
            tables: builtin_tables(),
            screens: builtin_screens(),
            logs: builtin_logs(),
        }
    }

    /// Loads every lookup-list file from `dir`.
    ///
    /// Each file is a small JSON object of the form `{"<list-name>": [...]}`.
    /// A missing, unparseable, or empty file falls back to the built-in list
    /// for that vocabulary alone; the other lists are unaffected.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            situation_types: load_list(
                &dir.join(SITUATION_TYPES_FILE),
                "situation_types",
                builtin_situation_types,
            ),
            tables: load_list(&dir.join(TABLES_FILE), "tables", builtin_tables),
            screens: load_list(&dir.join(SCREENS_FILE), "screens", builtin_screens),
            logs: load_list(&dir.join(LOGS_FILE), "logs", builtin_logs),
        }
    }
}

/// Reads one `{key: [...]}` list file, de-duplicated in first-seen order.
fn load_list(path: &Path, key: &str, builtin: fn() -> Vec<String>) -> Vec<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            debug!(path = %path.display(), %error, "lookup list unavailable, using builtin");
            return builtin();
        }
    };
    let parsed: Value = match serde_json::from_str(&text) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(path = %path.display(), %error, "lookup list unparseable, using builtin");
            return builtin();
        }
    };
    let items: Vec<String> = parsed
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .unique()
                .collect()
        })
        .unwrap_or_default();
    if items.is_empty() {
        warn!(path = %path.display(), key, "lookup list empty, using builtin");
        builtin()
    } else {
        items
    }
}

fn builtin_situation_types() -> Vec<String> {
    to_strings(&[
        "transport delay",
        "equipment fault",
        "stock mismatch",
        "sensor anomaly",
        "network outage",
        "other",
    ])
}

fn builtin_tables() -> Vec<String> {
    to_strings(&[
        "TB_MCS_LOG",
        "TB_WMS_STOCK",
        "TB_OHT_STATUS",
        "TB_EQP_ALARM",
        "TB_TRANSPORT",
        "TB_SENSOR",
    ])
}

fn builtin_screens() -> Vec<String> {
    to_strings(&[
        "transport status",
        "equipment status",
        "stock management",
        "alarm monitoring",
        "sensor data",
    ])
}

fn builtin_logs() -> Vec<String> {
    to_strings(&[
        "MCS log",
        "system log",
        "application log",
        "error log",
        "access log",
    ])
}

pub(super) fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
