//! Product Model
//!
//! Catalog entries from the public `/productos` listing. The back-office only
//! reads them to pre-fill order lines.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::util::{null_as_default, string_or_number};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Price in Bs
    #[serde(rename = "precio", default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(rename = "colores", default, deserialize_with = "null_as_default")]
    pub colors: Vec<ProductColor>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
}

impl Product {
    /// First listed color, used when none is chosen explicitly
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(ProductColor::name)
    }

    /// Products without stock tracking count as available
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|n| n > 0)
    }
}

/// Color option; newer records carry a swatch object, older ones a bare name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProductColor {
    Swatch {
        #[serde(rename = "nombre")]
        name: String,
        #[serde(default)]
        hex: Option<String>,
        #[serde(rename = "imagen", default)]
        image: Option<String>,
    },
    Plain(String),
}

impl ProductColor {
    pub fn name(&self) -> &str {
        match self {
            ProductColor::Swatch { name, .. } => name,
            ProductColor::Plain(name) => name,
        }
    }
}
