//! Keyword-based category inference.
//!
//! Rules are evaluated in order and the first rule with any matching keyword
//! wins, so list order is part of the contract: a description mentioning both
//! `impuesto` and `netflix` is a tax.

use serde::{Deserialize, Serialize};

/// Category assigned to both legs of a neutralized internal transfer.
pub const INTERNAL_TRANSFER: &str = "transferencia_interna";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category: String,
    pub subcategory: String,
}

impl Category {
    pub fn new(category: &str, subcategory: &str) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Lowercase substrings; any hit selects this rule.
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub subcategory: &'static str,
}

pub const DEFAULT_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["iva", "percepción", "ganancias", "tax", "impuesto", "sircreb", "arca", "afip"],
        category: "impuestos",
        subcategory: "impuestos y contribuciones",
    },
    CategoryRule {
        keywords: &["netflix", "spotify", "youtube", "primevideo", "disney", "steam"],
        category: "entretenimiento",
        subcategory: "servicios digitales",
    },
    CategoryRule {
        keywords: &["pedidosya", "rappi", "mcdonalds", "burger", "grido", "mostaza"],
        category: "comida",
        subcategory: "delivery",
    },
    CategoryRule {
        keywords: &["metrogas", "aysa", "edenor", "edesur", "personal flow", "claro", "telecom"],
        category: "servicios",
        subcategory: "hogar",
    },
    CategoryRule {
        keywords: &["intereses pagados", "mantenimiento"],
        category: "financiero",
        subcategory: "comisiones/intereses",
    },
    CategoryRule {
        keywords: &["reintegro promoción", "devolucion"],
        category: "ingresos",
        subcategory: "reintegros",
    },
    CategoryRule {
        keywords: &["sueldo", "haberes"],
        category: "ingresos",
        subcategory: "sueldo",
    },
];

/// Evaluate `rules` in order against `description`.
pub fn infer_with(rules: &[CategoryRule], description: &str) -> Option<Category> {
    let desc = description.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| desc.contains(kw)))
        .map(|rule| Category::new(rule.category, rule.subcategory))
}

/// Infer with the built-in rule list.
pub fn infer_category(description: &str) -> Option<Category> {
    infer_with(DEFAULT_RULES, description)
}
