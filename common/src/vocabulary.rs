//! ファイル名の語彙（スコープ語・製品名）

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const BUILTIN_SCOPES: &[&str] = &[
    "license",
    "licenses",
    "licence",
    "licences",
    "licensing",
    "sla",
    "amc",
    "support",
    "implementation",
    "rollout",
    "migration",
    "upgrade",
    "subscription",
    "consulting",
    "managedservices",
];

const BUILTIN_PRODUCTS: &[&str] = &[
    "sap",
    "saps4hana",
    "s4hana",
    "sapb1",
    "sapbw",
    "successfactors",
    "ariba",
    "concur",
    "hana",
    "qlik",
    "qliksense",
    "qlikview",
    "powerbi",
    "tableau",
    "oracle",
    "dynamics",
    "salesforce",
    "microsoft",
    "azure",
    "aws",
    "odoo",
];

/// スコープ語と製品名の語彙
///
/// 比較は英数字のみの小文字表記で行う（"Managed Services" → "managedservices"）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub scopes: BTreeSet<String>,
    #[serde(default)]
    pub products: BTreeSet<String>,
}

impl Vocabulary {
    pub fn builtin() -> Self {
        Self {
            scopes: BUILTIN_SCOPES.iter().map(|s| s.to_string()).collect(),
            products: BUILTIN_PRODUCTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let vocabulary: Self = serde_json::from_str(json)?;
        Ok(vocabulary)
    }

    /// 語彙を追加する
    pub fn merge(&mut self, other: &Vocabulary) {
        self.scopes.extend(other.scopes.iter().map(|s| compact(s)));
        self.products.extend(other.products.iter().map(|s| compact(s)));
    }

    pub fn is_scope(&self, segment: &str) -> bool {
        let key = compact(segment);
        !key.is_empty() && self.scopes.contains(&key)
    }

    /// 製品名か（"SAPS4HANA" のように既知の製品名で始まるものも含む）
    pub fn is_product(&self, segment: &str) -> bool {
        let key = compact(segment);
        if key.is_empty() {
            return false;
        }
        self.products
            .iter()
            .any(|product| key == *product || (product.len() >= 3 && key.starts_with(product.as_str())))
    }
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
