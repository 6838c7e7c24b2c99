//! JSON backup: a direct dump of the records, no schema transformation.

use anyhow::{Context, Result};
use tally_core::Transaction;

pub fn write_json(txns: &[Transaction]) -> Result<String> {
    serde_json::to_string_pretty(txns).context("serializing transactions")
}

pub fn read_json(text: &str) -> Result<Vec<Transaction>> {
    serde_json::from_str(text).context("parsing transaction backup")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_json_backup_restores_records() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let txns = vec![
            Transaction::income("Salary", 1000.0, "Paycheck", date).with_id("a1"),
            Transaction::expense("Food", 9.99, "Lunch", date),
        ];
        let text = write_json(&txns).unwrap();
        assert!(text.contains("\"type\": \"income\""));
        assert_eq!(read_json(&text).unwrap(), txns);
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        assert!(read_json("not json").is_err());
    }
}
