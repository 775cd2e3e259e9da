//! Reading order, user and locale files.
//!
//! An order file holds either a bare order record or an envelope:
//! ```text
//! { "order": { ...order fields... }, "user": { "email": "..." } }
//! ```
//! A separate `--user` file, when given, replaces the envelope's user.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quill_core::{Catalog, CoreResult, OrderRecord, UserRecord};
use serde_json::Value;
use tracing::debug;

/// The records one invoice is built from.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub order: OrderRecord,
    pub user: UserRecord,
}

/// Reads the order file and the optional user file.
pub fn load_inputs(order_path: &Path, user_path: Option<&Path>) -> Result<Inputs> {
    let value = read_json(order_path)?;
    let (order, envelope_user) = split_envelope(value)
        .with_context(|| format!("invalid order file {}", order_path.display()))?;

    let user = match user_path {
        Some(path) => UserRecord::from_json_value(read_json(path)?)
            .with_context(|| format!("invalid user file {}", path.display()))?,
        None => envelope_user.unwrap_or_default(),
    };

    Ok(Inputs { order, user })
}

/// Reads a nested JSON locale catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("could not read locale file {}", path.display()))?;
    let catalog = Catalog::from_json_str(&contents)
        .with_context(|| format!("invalid locale file {}", path.display()))?;

    let missing = catalog.missing_keys();
    debug!(
        path = %path.display(),
        entries = catalog.len(),
        missing = missing.len(),
        "locale catalog loaded"
    );
    Ok(catalog)
}

/// Splits an envelope into its order and user; a bare record is the order.
pub fn split_envelope(value: Value) -> CoreResult<(OrderRecord, Option<UserRecord>)> {
    match value {
        Value::Object(mut map) if map.get("order").is_some_and(Value::is_object) => {
            let order = map.remove("order").unwrap_or_default();
            let user = map
                .remove("user")
                .filter(|u| !u.is_null())
                .map(UserRecord::from_json_value)
                .transpose()?;
            Ok((OrderRecord::from_json_value(order)?, user))
        }
        other => Ok((OrderRecord::from_json_value(other)?, None)),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("{} is not JSON", path.display()))
}
