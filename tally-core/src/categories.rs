//! Recommended categories and supported currencies.
//!
//! Categories are suggestions: the data model accepts any non-blank label.

use crate::model::TransactionType;

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Education",
    "Travel",
    "Rent",
    "Utilities",
    "Insurance",
    "Groceries",
    "Fitness",
    "Personal Care",
    "Gifts",
    "Other",
];

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Investment",
    "Business",
    "Rental Income",
    "Gift",
    "Bonus",
    "Refund",
    "Other",
];

/// Recommended categories for a transaction type.
pub fn categories_for(kind: &TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
        TransactionType::Unrecognized(_) => &[],
    }
}

pub fn is_recommended(kind: &TransactionType, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", name: "US Dollar" },
    Currency { code: "EUR", symbol: "€", name: "Euro" },
    Currency { code: "GBP", symbol: "£", name: "British Pound" },
    Currency { code: "INR", symbol: "₹", name: "Indian Rupee" },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar" },
];

pub const DEFAULT_CURRENCY: &str = "USD";

pub fn currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_for_type() {
        assert!(is_recommended(&TransactionType::Expense, "Groceries"));
        assert!(!is_recommended(&TransactionType::Expense, "Salary"));
        assert!(is_recommended(&TransactionType::Income, "Salary"));
        assert!(categories_for(&TransactionType::Unrecognized("x".into())).is_empty());
    }

    #[test]
    fn test_currency_lookup() {
        assert_eq!(currency("eur").map(|c| c.symbol), Some("€"));
        assert!(currency("XYZ").is_none());
        assert!(currency(DEFAULT_CURRENCY).is_some());
    }
}
