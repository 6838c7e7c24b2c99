//! Provider-side document shape and its conversion to [`Transaction`].
//!
//! Documents come from storage we do not control, so every field is read
//! leniently: amounts may be numbers or strings, dates may be ISO strings or
//! provider timestamps. Resolution happens here, once, so aggregation and the
//! codec only ever see canonical records.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_core::{DateInput, NewTransaction, ProviderTimestamp, Transaction, TransactionType};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDocument {
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub description: String,
    pub date: Option<DateInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<ProviderTimestamp>,
}

impl TransactionDocument {
    pub fn from_new(user_id: &str, txn: &NewTransaction, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: txn.kind.as_str().to_string(),
            category: txn.category.clone(),
            amount: serde_json::json!(txn.amount),
            description: txn.description.clone(),
            date: Some(DateInput::from(txn.date)),
            created_at: Some(ProviderTimestamp::from_datetime(created_at)),
        }
    }

    /// Overwrite the editable fields, keeping owner and creation time.
    pub fn apply_update(&mut self, txn: &NewTransaction) {
        self.kind = txn.kind.as_str().to_string();
        self.category = txn.category.clone();
        self.amount = serde_json::json!(txn.amount);
        self.description = txn.description.clone();
        self.date = Some(DateInput::from(txn.date));
    }

    /// Amount as a number; anything unreadable counts as 0.
    pub fn amount_value(&self) -> f64 {
        let v = match &self.amount {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        if v.is_finite() { v } else { 0.0 }
    }

    /// Resolve into a canonical record. Returns `None` when the date cannot
    /// be resolved; such documents are left out of snapshots.
    pub fn into_transaction(self, id: &str, tz: Tz) -> Option<Transaction> {
        let date = match self.date.as_ref().and_then(|d| d.resolve(tz)) {
            Some(d) => d,
            None => {
                warn!(id, date = ?self.date, "dropping document with unreadable date");
                return None;
            }
        };

        let amount = self.amount_value();
        Some(Transaction {
            id: Some(id.to_string()),
            kind: TransactionType::from(self.kind),
            amount,
            category: self.category,
            description: self.description,
            date,
            created_at: self.created_at.and_then(ProviderTimestamp::to_datetime),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(json: &str) -> TransactionDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_well_formed_document() {
        let d = doc(r#"{"userId":"u1","type":"income","category":"Salary","amount":1000,"description":"Pay","date":"2024-01-01","createdAt":{"seconds":1704067200,"nanoseconds":0}}"#);
        let txn = d.into_transaction("t1", chrono_tz::UTC).unwrap();
        assert_eq!(txn.id.as_deref(), Some("t1"));
        assert_eq!(txn.kind, TransactionType::Income);
        assert_eq!(txn.amount, 1000.0);
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(txn.created_at.is_some());
    }

    #[test]
    fn test_lenient_fields() {
        let d = doc(r#"{"type":"expense","category":"Food","amount":"12.50","description":"x","date":{"seconds":1704067200}}"#);
        assert_eq!(d.amount_value(), 12.5);

        let d = doc(r#"{"type":"expense","category":"Food","amount":null,"date":"2024-01-01"}"#);
        assert_eq!(d.amount_value(), 0.0);

        let d = doc(r#"{"type":"weird","category":"Food","amount":"abc","date":"2024-01-01"}"#);
        let txn = d.into_transaction("t2", chrono_tz::UTC).unwrap();
        assert_eq!(txn.kind, TransactionType::Unrecognized("weird".into()));
        assert_eq!(txn.amount, 0.0);
    }

    #[test]
    fn test_unreadable_date_is_dropped() {
        let d = doc(r#"{"type":"expense","category":"Food","amount":5,"date":"last tuesday"}"#);
        assert!(d.into_transaction("t3", chrono_tz::UTC).is_none());

        let d = doc(r#"{"type":"expense","category":"Food","amount":5}"#);
        assert!(d.into_transaction("t4", chrono_tz::UTC).is_none());
    }
}
