use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::ident::transaction_id;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Derived from the sign of the amount: money in is a credit, everything
/// else (including zero) is a debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Credit
        } else {
            Self::Debit
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// The canonical record every parser produces, one per source line.
///
/// `description` is the raw source text and is never rewritten. After
/// creation only the ingestion engine (ownership metadata) and the transfer
/// neutralizer (`category`, `neutralized`) mutate a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: Uuid,
    pub upload_id: Uuid,
    pub source: String,
    pub account: String,
    /// Serialized as `YYYY-MM-DD`; ordering is chronological.
    pub date: NaiveDate,
    /// Negative = money leaving the account.
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub direction: Direction,
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub balance: Option<Decimal>,
    pub is_transfer: bool,
    pub is_fee: bool,
    pub is_tax: bool,
    pub neutralized: bool,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Build a transaction with its identity and direction derived from the
    /// given fields. Tags, category and merchant start empty.
    pub fn new(
        source: &str,
        account: &str,
        date: NaiveDate,
        amount: Decimal,
        currency: &str,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            id: transaction_id(source, account, date, amount, &description),
            user_id: Uuid::nil(),
            upload_id: Uuid::nil(),
            source: source.to_string(),
            account: account.to_string(),
            date,
            amount,
            currency: currency.to_string(),
            description,
            direction: Direction::from_amount(amount),
            merchant: None,
            category: None,
            subcategory: None,
            balance: None,
            is_transfer: false,
            is_fee: false,
            is_tax: false,
            neutralized: false,
            processed_at: None,
        }
    }

    /// Set category + subcategory together, or clear both.
    pub fn set_category(&mut self, category: Option<Category>) {
        match category {
            Some(c) => {
                self.category = Some(c.category);
                self.subcategory = Some(c.subcategory);
            }
            None => {
                self.category = None;
                self.subcategory = None;
            }
        }
    }

    /// Attach a merchant token; empty or whitespace-only tokens are dropped.
    pub fn set_merchant(&mut self, merchant: impl Into<String>) {
        let merchant = merchant.into();
        let merchant = merchant.trim();
        self.merchant = if merchant.is_empty() {
            None
        } else {
            Some(merchant.to_string())
        };
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}
