//! Shapes of the items streamed out of upstream catalog responses.
//!
//! Only the identifier fields are modelled; everything else in an item is
//! skipped while parsing.

use serde::Deserialize;
use std::fmt;

/// Entry of `applist.apps` in the Steam app list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SteamApp {
    pub appid: u64,
    #[serde(default)]
    pub name: String,
}

/// GOG product IDs come back as numbers, but strings are accepted too
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

/// Element of the GOG products array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GogProduct {
    pub id: ProductId,
}

/// Element of the umu database array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UmuEntry {
    #[serde(default)]
    pub umu_id: Option<String>,
}

impl UmuEntry {
    /// The ID with the `umu-` prefix removed
    pub fn bare_id(&self) -> Option<&str> {
        let id = self.umu_id.as_deref()?;
        Some(id.strip_prefix(crate::models::UMU_PREFIX).unwrap_or(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_accepts_numbers_and_strings() {
        let products: Vec<GogProduct> =
            serde_json::from_str(r#"[{"id": 1234, "title": "x"}, {"id": "5678"}]"#).unwrap();
        assert_eq!(products[0].id.to_string(), "1234");
        assert_eq!(products[1].id.to_string(), "5678");
    }

    #[test]
    fn test_umu_entry_bare_id() {
        let entry: UmuEntry = serde_json::from_str(r#"{"umu_id": "umu-1207658930"}"#).unwrap();
        assert_eq!(entry.bare_id(), Some("1207658930"));

        let entry: UmuEntry = serde_json::from_str(r#"{"umu_id": null, "store": "gog"}"#).unwrap();
        assert_eq!(entry.bare_id(), None);
    }
}
