//! Receipt extraction contract.
//!
//! An extractor turns a base64 image into [`ReceiptDetails`]. Every field is
//! nullable and the result is advisory: it only pre-fills an
//! [`ExpenseDraft`], which the user can still edit before saving.

use crate::enums::EXPENSE_CATEGORIES;
use crate::error::ValidationError;
use crate::identity::{EntityId, Money};
use crate::requests::{ExpenseItemInput, NewExpense};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Fields extracted from a receipt image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub category: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// `HH:MM`, 24-hour
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
}

impl ReceiptDetails {
    /// Parse extractor output, tolerating a surrounding markdown code fence.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let body = strip_code_fence(raw);
        serde_json::from_str(body).map_err(|e| ValidationError::InvalidValue {
            field: "receipt".to_string(),
            reason: e.to_string(),
        })
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Editable expense form state.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub account_id: Option<EntityId>,
    pub title: String,
    pub amount: Option<Money>,
    pub category: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub description: Option<String>,
    pub items: Vec<ExpenseItemInput>,
}

impl ExpenseDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            account_id: None,
            title: String::new(),
            amount: None,
            category: "Other".to_string(),
            date,
            time: None,
            description: None,
            items: Vec::new(),
        }
    }

    /// Pre-fill from a receipt. Missing or malformed receipt fields leave the
    /// draft untouched; unknown categories are ignored.
    pub fn apply_receipt(&mut self, receipt: &ReceiptDetails) {
        if let Some(title) = receipt.title.as_deref().filter(|t| !t.trim().is_empty()) {
            self.title = title.trim().to_string();
        }
        if let Some(amount) = receipt.amount.filter(|a| a.is_finite() && *a > 0.0) {
            self.amount = Some(amount);
        }
        if let Some(category) = receipt
            .category
            .as_deref()
            .and_then(|c| EXPENSE_CATEGORIES.iter().find(|k| k.eq_ignore_ascii_case(c)))
        {
            self.category = (*category).to_string();
        }
        if let Some(date) = receipt
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        {
            self.date = date;
        }
        if let Some(time) = receipt
            .time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
        {
            self.time = Some(time.format("%H:%M").to_string());
        }
        if let Some(description) = receipt.description.as_deref().filter(|d| !d.is_empty()) {
            self.description = Some(description.to_string());
        }
        if !receipt.items.is_empty() {
            self.items = receipt
                .items
                .iter()
                .map(|item| ExpenseItemInput {
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity.filter(|q| *q > 0).unwrap_or(1),
                })
                .collect();
        }
    }

    /// Finish the draft. Fails when required fields are still missing.
    pub fn into_new_expense(self) -> Result<NewExpense, ValidationError> {
        let amount = self.amount.ok_or_else(|| ValidationError::RequiredFieldMissing {
            field: "amount".to_string(),
        })?;
        let expense = NewExpense {
            account_id: self.account_id,
            title: self.title,
            amount,
            category: self.category,
            date: self.date,
            time: self.time,
            description: self.description,
            items: self.items,
        };
        expense.validate()?;
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_parse_strips_fence() {
        let raw = "```json\n{\"title\": \"Cafe\", \"amount\": 8.4, \"items\": []}\n```";
        let receipt = ReceiptDetails::parse(raw).unwrap();
        assert_eq!(receipt.title.as_deref(), Some("Cafe"));
        assert_eq!(receipt.amount, Some(8.4));
        assert!(receipt.category.is_none());
    }

    #[test]
    fn test_parse_plain_json_with_nulls() {
        let raw = r#"{"title": null, "amount": null, "category": null, "date": null,
                     "time": null, "description": null, "items": []}"#;
        assert_eq!(ReceiptDetails::parse(raw).unwrap(), ReceiptDetails::default());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ReceiptDetails::parse("I could not read this receipt").is_err());
    }

    #[test]
    fn test_apply_receipt_is_advisory() {
        let mut draft = ExpenseDraft::new(today());
        draft.title = "Typed by user".to_string();
        let receipt = ReceiptDetails {
            title: None,
            amount: Some(23.0),
            category: Some("groceries".to_string()),
            date: Some("31/05/2024".to_string()),
            time: Some("18:05".to_string()),
            description: None,
            items: vec![ReceiptItem {
                name: "Bread".to_string(),
                price: 3.0,
                quantity: None,
            }],
        };
        draft.apply_receipt(&receipt);

        assert_eq!(draft.title, "Typed by user");
        assert_eq!(draft.amount, Some(23.0));
        assert_eq!(draft.category, "Groceries");
        // Malformed date keeps the draft's date.
        assert_eq!(draft.date, today());
        assert_eq!(draft.time.as_deref(), Some("18:05"));
        assert_eq!(draft.items[0].quantity, 1);
    }

    #[test]
    fn test_unknown_category_ignored() {
        let mut draft = ExpenseDraft::new(today());
        draft.apply_receipt(&ReceiptDetails {
            category: Some("Crypto".to_string()),
            ..Default::default()
        });
        assert_eq!(draft.category, "Other");
    }

    #[test]
    fn test_into_new_expense_requires_amount() {
        let mut draft = ExpenseDraft::new(today());
        draft.title = "Taxi".to_string();
        assert!(draft.clone().into_new_expense().is_err());
        draft.amount = Some(15.0);
        let expense = draft.into_new_expense().unwrap();
        assert_eq!(expense.amount, 15.0);
    }
}
