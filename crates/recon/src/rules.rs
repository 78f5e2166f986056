//! User-defined recategorization rules, applied after parsing.
//!
//! Merchant rules run first and match either the merchant or the
//! description; description-keyword rules run second. Within each list the
//! first matching rule wins. Matching is case-insensitive substring search.

use serde::{Deserialize, Serialize};

use ledgerflow_core::{Category, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub keyword: String,
    pub category: String,
    pub subcategory: String,
}

impl Rule {
    pub fn new(keyword: &str, category: &str, subcategory: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        }
    }

    fn category(&self) -> Category {
        Category::new(&self.category, &self.subcategory)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub merchants: Vec<Rule>,
    #[serde(default)]
    pub description_keywords: Vec<Rule>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty() && self.description_keywords.is_empty()
    }

    /// The category the rules assign to `tx`, if any.
    pub fn match_category(&self, tx: &Transaction) -> Option<Category> {
        let desc = tx.description.to_lowercase();
        let merchant = tx.merchant.as_deref().unwrap_or("").to_lowercase();

        let by_merchant = self.merchants.iter().find(|rule| {
            let kw = rule.keyword.to_lowercase();
            merchant.contains(&kw) || desc.contains(&kw)
        });
        let rule = by_merchant.or_else(|| {
            self.description_keywords
                .iter()
                .find(|rule| desc.contains(&rule.keyword.to_lowercase()))
        })?;
        Some(rule.category())
    }

    /// Overwrite category/subcategory wherever a rule matches. Neutralized
    /// rows keep their internal-transfer category. Returns the number of
    /// rows changed.
    pub fn recategorize(&self, transactions: &mut [Transaction]) -> usize {
        if self.is_empty() {
            return 0;
        }

        let mut changed = 0;
        for tx in transactions.iter_mut().filter(|tx| !tx.neutralized) {
            let Some(category) = self.match_category(tx) else {
                continue;
            };
            if tx.category.as_deref() != Some(category.category.as_str())
                || tx.subcategory.as_deref() != Some(category.subcategory.as_str())
            {
                tx.set_category(Some(category));
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(desc: &str, merchant: Option<&str>) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut tx = Transaction::new("mercadopago", "cuenta_digital", date, dec!(-100), "ARS", desc);
        if let Some(m) = merchant {
            tx.set_merchant(m);
        }
        tx
    }

    fn rules() -> RuleSet {
        RuleSet {
            merchants: vec![
                Rule::new("Uber", "transporte", "taxi"),
                Rule::new("rappi", "comida", "restaurantes"),
            ],
            description_keywords: vec![
                Rule::new("alquiler", "vivienda", "alquiler"),
                Rule::new("uber", "never", "reached"),
            ],
        }
    }

    #[test]
    fn merchant_rules_match_merchant_or_description() {
        let rules = rules();
        let by_merchant = rules.match_category(&tx("Pago UBER TRIP", Some("UBER"))).unwrap();
        assert_eq!(by_merchant, Category::new("transporte", "taxi"));

        let by_description = rules.match_category(&tx("Compra Rappi Market", None)).unwrap();
        assert_eq!(by_description, Category::new("comida", "restaurantes"));
    }

    #[test]
    fn merchant_rules_precede_description_rules() {
        let cat = rules().match_category(&tx("uber alquiler", None)).unwrap();
        assert_eq!(cat.category, "transporte");
    }

    #[test]
    fn description_keywords_apply_when_no_merchant_rule_hits() {
        let cat = rules().match_category(&tx("Pago Alquiler Marzo", None)).unwrap();
        assert_eq!(cat, Category::new("vivienda", "alquiler"));
        assert_eq!(rules().match_category(&tx("Compra kiosco", None)), None);
    }

    #[test]
    fn recategorize_keeps_inference_without_a_hit_and_skips_neutralized() {
        let mut kept = tx("Compra kiosco", None);
        kept.set_category(Some(Category::new("comida", "delivery")));
        let mut neutral = tx("Transferencia Uber", None);
        neutral.neutralized = true;
        neutral.category = Some("transferencia_interna".into());

        let mut txs = vec![tx("Pago Uber", None), kept, neutral];
        let changed = rules().recategorize(&mut txs);

        assert_eq!(changed, 1);
        assert_eq!(txs[0].category.as_deref(), Some("transporte"));
        assert_eq!(txs[1].category.as_deref(), Some("comida"));
        assert_eq!(txs[2].category.as_deref(), Some("transferencia_interna"));
        // already applied: second pass is a no-op
        assert_eq!(rules().recategorize(&mut txs), 0);
    }
}
