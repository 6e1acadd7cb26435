//! # Catalog
//!
//! The product catalog as served by `GET /api/catalogo`, plus the two
//! lookup tables derived from it when a session starts.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog (insertion order)                                              │
//! │    A2  → { nombre: "Aritos Rango de precio 2" }                        │
//! │    A1  → { nombre: "Aritos Rango de precio 1" }                        │
//! │    AN1 → { nombre: "Anillos 1" }                                       │
//! │    x-9 → { nombre: "Suelto" }          (id does not parse: skipped)    │
//! │         │                                                               │
//! │         ▼  parse id  ^([A-Z]+)(\d+)$   normalize nombre                 │
//! │                                                                         │
//! │  TypeToGroup                   GroupToIds (sorted by number)            │
//! │    "Aritos"  → A                 A  → [A1, A2]                          │
//! │    "Anillos" → AN                AN → [AN1]                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first group seen for a type wins, so catalog order matters; the JSON
//! object order is kept all the way from the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use ts_rs::TS;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)(\d+)$").expect("static pattern"));

static PRICE_RANGE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rango\s*de\s*precio\s*\d+").expect("static pattern"));

static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+$").expect("static pattern"));

// =============================================================================
// Catalog ID
// =============================================================================

/// A parsed catalog identifier: letter prefix (the group) plus a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogId {
    raw: String,
    group: String,
    number: u64,
}

impl CatalogId {
    /// Parses `"an12"` / `"AN12"` into group `AN`, number `12`.
    ///
    /// The raw spelling is kept: it is the key the catalog and the backend
    /// know the product by.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.to_uppercase();
        let caps = ID_PATTERN.captures(&upper)?;
        let number = caps[2].parse::<u64>().ok()?;
        Some(CatalogId {
            raw: raw.to_string(),
            group: caps[1].to_string(),
            number,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Leading letters of an id, upper-cased. Used where a partial match is
/// good enough (dashboard grouping).
pub fn id_prefix(id: &str) -> Option<String> {
    let prefix: String = id
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_uppercase())
    }
}

/// Strips price-range annotations and trailing numbers from a product name.
///
/// ```rust
/// use mostrador_core::catalog::normalize_type_name;
///
/// assert_eq!(normalize_type_name("  Aritos Rango de precio 2 "), "Aritos");
/// assert_eq!(normalize_type_name("Collar 3"), "Collar");
/// assert_eq!(normalize_type_name("RANGODEPRECIO1"), "");
/// ```
pub fn normalize_type_name(raw: &str) -> String {
    let name = raw.trim();
    let name = PRICE_RANGE_LABEL.replace_all(name, "");
    let name = name.trim();
    let name = TRAILING_DIGITS.replace(name, "");
    name.trim().to_string()
}

// =============================================================================
// Product Record
// =============================================================================

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRecord {
    #[serde(default)]
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Read-only identifier → product map, in backend order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<(String, ProductRecord)>,
    positions: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from `(id, record)` pairs. Later duplicates replace
    /// the record but keep the first position.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ProductRecord)>,
        S: Into<String>,
    {
        let mut catalog = Catalog::default();
        for (id, record) in entries {
            catalog.insert(id.into(), record);
        }
        catalog
    }

    fn insert(&mut self, id: String, record: ProductRecord) {
        match self.positions.get(&id) {
            Some(&pos) => self.entries[pos].1 = record,
            None => {
                self.positions.insert(id.clone(), self.entries.len());
                self.entries.push((id, record));
            }
        }
    }

    /// Interprets a `/api/catalogo` response body.
    ///
    /// ## Accepted Shapes
    /// - `{"A1": {...}, ...}`
    /// - `{"catalogo": {...}}`
    /// - `{"productos_por_id": {...}}`
    /// - `{"error": "..."}` → [`CoreError::Backend`]
    ///
    /// Records that are not objects get an empty name, which later drops
    /// them from the type index.
    pub fn from_response(body: &Value) -> CoreResult<Self> {
        let map = body.as_object().ok_or_else(|| {
            CoreError::UnexpectedPayload("catalog response is not a JSON object".to_string())
        })?;

        if let Some(message) = map.get("error").and_then(Value::as_str) {
            return Err(CoreError::Backend(message.to_string()));
        }

        let products: &Map<String, Value> = ["productos_por_id", "catalogo"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_object))
            .unwrap_or(map);

        let entries = products.iter().map(|(id, value)| {
            let record = serde_json::from_value::<ProductRecord>(value.clone()).unwrap_or_default();
            (id.clone(), record)
        });
        Ok(Catalog::from_entries(entries))
    }

    /// Looks up a product; falls back to the upper-cased id.
    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        let id = id.trim();
        self.positions
            .get(id)
            .or_else(|| self.positions.get(&id.to_uppercase()))
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in backend order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductRecord)> {
        self.entries.iter().map(|(id, rec)| (id.as_str(), rec))
    }

    /// Product name for display; the id itself when unknown or unnamed.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        match self.get(id) {
            Some(rec) if !rec.nombre.trim().is_empty() => rec.nombre.trim(),
            _ => id,
        }
    }
}

// =============================================================================
// Catalog Index
// =============================================================================

/// TypeToGroup and GroupToIds, derived once per session.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    type_to_group: HashMap<String, String>,
    group_to_ids: HashMap<String, Vec<String>>,
}

impl CatalogIndex {
    /// Derives both tables from the catalog.
    ///
    /// ## Rules
    /// - Ids that do not match `^[A-Z]+[0-9]+$` (after upper-casing) are skipped
    /// - Names that normalize to nothing are skipped
    /// - The first group seen for a type wins
    /// - Ids within a group are sorted by numeric suffix (stable)
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = CatalogIndex::default();
        let mut parsed: HashMap<String, Vec<CatalogId>> = HashMap::new();

        for (raw_id, record) in catalog.iter() {
            let Some(id) = CatalogId::parse(raw_id) else {
                continue;
            };
            let type_name = normalize_type_name(&record.nombre);
            if type_name.is_empty() {
                continue;
            }
            index
                .type_to_group
                .entry(type_name)
                .or_insert_with(|| id.group().to_string());
            parsed.entry(id.group().to_string()).or_default().push(id);
        }

        for (group, mut ids) in parsed {
            ids.sort_by_key(CatalogId::number);
            let ids = ids.into_iter().map(|id| id.raw).collect();
            index.group_to_ids.insert(group, ids);
        }
        index
    }

    /// Group prefix for a product type. Accepts the type as listed by
    /// [`product_types`](Self::product_types) or an un-normalized name.
    pub fn group_for(&self, product_type: &str) -> Option<&str> {
        self.type_to_group
            .get(product_type)
            .or_else(|| self.type_to_group.get(&normalize_type_name(product_type)))
            .map(String::as_str)
    }

    /// Ids of a group in band order; empty for unknown groups.
    pub fn ids_for(&self, group: &str) -> &[String] {
        self.group_to_ids.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct product types, sorted case-insensitively (for pickers).
    pub fn product_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.type_to_group.keys().map(String::as_str).collect();
        types.sort_by_key(|t| (t.to_lowercase(), t.to_string()));
        types
    }

    /// Group prefixes that have at least one id.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.group_to_ids.keys().map(String::as_str)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
