use serde::{Deserialize, Serialize};

/// A case in the storefront catalog.
///
/// Catalog order is the order the server returned; nothing here sorts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub price: u64,
}

impl CatalogItem {
    pub fn is_affordable(&self, balance: u64) -> bool {
        self.price <= balance
    }
}
