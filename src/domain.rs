use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Standard,
    Credit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Always non-negative; direction is carried by `kind`.
    pub amount: Decimal,
    pub kind: TxKind,
    pub category_id: Uuid,
    pub account_id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
    /// Day of month (1-31) a credit account's payment is due. Ignored for
    /// standard accounts.
    #[serde(default)]
    pub payment_day: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: TxKind,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liability {
    pub id: Uuid,
    pub name: String,
    pub current_balance: Decimal,
    /// A malformed stored date degrades to None instead of failing the
    /// whole state load; such a record is never "due soon".
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub installment_amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalSpecies {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalLog {
    pub id: Uuid,
    pub species_id: Uuid,
    pub kind: String,
    #[serde(default)]
    pub note: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub purchase_date: Option<NaiveDate>,
    pub value: Decimal,
}

/// The entire persisted application state. Collections default to empty so
/// older saves keep loading as fields are added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmState {
    pub farm_name: String,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub accounts: Vec<Account>,
    pub animal_species: Vec<AnimalSpecies>,
    pub animal_logs: Vec<AnimalLog>,
    pub inventory_items: Vec<InventoryItem>,
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
}

impl Default for FarmState {
    fn default() -> Self {
        Self {
            farm_name: "My Farm".to_string(),
            transactions: Vec::new(),
            categories: Vec::new(),
            accounts: Vec::new(),
            animal_species: Vec::new(),
            animal_logs: Vec::new(),
            inventory_items: Vec::new(),
            assets: Vec::new(),
            liabilities: Vec::new(),
        }
    }
}

impl FarmState {
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn species_by_name(&self, name: &str) -> Option<&AnimalSpecies> {
        self.animal_species
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Default palette cycled through when a category is created without an
/// explicit color.
pub const CATEGORY_COLORS: &[&str] = &[
    "#10b981", "#3b82f6", "#f59e0b", "#ef4444", "#8b5cf6", "#14b8a6", "#f97316", "#64748b",
];

pub fn parse_tx_kind(raw: &str) -> Option<TxKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "income" => Some(TxKind::Income),
        "expense" => Some(TxKind::Expense),
        _ => None,
    }
}

pub fn parse_account_kind(raw: &str) -> Option<AccountKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "standard" => Some(AccountKind::Standard),
        "credit" => Some(AccountKind::Credit),
        _ => None,
    }
}

pub fn accounts_by_id(accounts: &[Account]) -> HashMap<Uuid, &Account> {
    accounts.iter().map(|a| (a.id, a)).collect()
}

pub fn categories_by_id(categories: &[Category]) -> HashMap<Uuid, &Category> {
    categories.iter().map(|c| (c.id, c)).collect()
}

pub fn species_by_id(species: &[AnimalSpecies]) -> HashMap<Uuid, &AnimalSpecies> {
    species.iter().map(|s| (s.id, s)).collect()
}

fn lenient_date<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.and_then(|s| s.trim().parse::<NaiveDate>().ok()))
}
