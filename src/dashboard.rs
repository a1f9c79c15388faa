use crate::domain::{Account, AccountKind, Category, Liability, Transaction, TxKind};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Forward horizon for payment alerting.
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;

/// Trailing horizon used to infer that a payment was already made.
pub const SUPPRESSION_WINDOW_DAYS: i64 = 28;

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
}

fn clamp_to_month(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| last_day_of_month(year, month))
}

/// Next calendar date, at or after `today`, whose day-of-month equals `day`,
/// clamped to the last day of a short month (day=31 in February resolves to
/// the last day of February).
pub fn next_monthly_occurrence(day: u32, today: NaiveDate) -> NaiveDate {
    let candidate = clamp_to_month(today.year(), today.month(), day);
    if candidate < today {
        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        clamp_to_month(year, month, day)
    } else {
        candidate
    }
}

/// Calendar-day difference; negative when overdue.
pub fn days_until(due: NaiveDate, now: NaiveDate) -> i64 {
    (due - now).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    DueToday,
    DueSoon,
    Scheduled,
}

impl Urgency {
    /// Total over all integers.
    pub fn classify(days: i64) -> Self {
        if days < 0 {
            Urgency::Overdue
        } else if days == 0 {
            Urgency::DueToday
        } else if days <= 7 {
            Urgency::DueSoon
        } else {
            Urgency::Scheduled
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CreditStatus {
    pub balance: Decimal,
    pub has_recent_payment: bool,
}

/// Replays an account's transaction history from `initial_balance`. An
/// expense is a new charge; an income transaction on a credit account is a
/// payment toward the card. Replay order never affects the final balance.
pub fn reconstruct_credit_balance(
    account: &Account,
    transactions: &[Transaction],
    now: NaiveDate,
) -> CreditStatus {
    let window_start = now - Duration::days(SUPPRESSION_WINDOW_DAYS);

    let mut balance = account.initial_balance;
    let mut has_recent_payment = false;
    for t in transactions.iter().filter(|t| t.account_id == account.id) {
        match t.kind {
            TxKind::Expense => balance += t.amount,
            TxKind::Income => {
                balance -= t.amount;
                if t.date >= window_start {
                    has_recent_payment = true;
                }
            }
        }
    }

    CreditStatus {
        balance,
        has_recent_payment,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income posted against a credit account is a card payment, not revenue.
pub fn is_credit_payment(t: &Transaction, accounts: &HashMap<Uuid, &Account>) -> bool {
    t.kind == TxKind::Income
        && accounts
            .get(&t.account_id)
            .is_some_and(|a| a.kind == AccountKind::Credit)
}

pub fn summarize(transactions: &[Transaction], accounts: &HashMap<Uuid, &Account>) -> Summary {
    let mut summary = Summary::default();
    for t in transactions {
        match t.kind {
            TxKind::Income if !is_credit_payment(t, accounts) => summary.income += t.amount,
            TxKind::Expense => summary.expense += t.amount,
            TxKind::Income => {}
        }
    }
    summary
}

/// Percent of revenue retained after expenses; 0 when there is no revenue.
pub fn gross_margin(income: Decimal, expense: Decimal) -> Decimal {
    if income > Decimal::ZERO {
        (income - expense) / income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

/// Expense totals grouped by resolved category name ("Other" when the
/// category no longer exists), descending by total. Ties keep discovery
/// order.
pub fn top_expense_categories(
    transactions: &[Transaction],
    categories: &HashMap<Uuid, &Category>,
    n: usize,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for t in transactions.iter().filter(|t| t.kind == TxKind::Expense) {
        let name = categories
            .get(&t.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("Other");
        match totals.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value += t.amount,
            None => totals.push(CategoryTotal {
                name: name.to_string(),
                value: t.amount,
            }),
        }
    }

    totals.sort_by(|a, b| b.value.cmp(&a.value));
    totals.truncate(n);
    totals
}

#[derive(Debug, Clone)]
pub struct MonthBucket {
    /// "YYYY-MM"; lexicographic order is calendar order.
    pub sort_key: String,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// One bucket per calendar month observed in the transaction set, ascending
/// by sort key. Applies the same credit-payment exclusion as `summarize`.
pub fn monthly_series(
    transactions: &[Transaction],
    accounts: &HashMap<Uuid, &Account>,
) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<String, MonthBucket> = BTreeMap::new();
    for t in transactions {
        let sort_key = format!("{:04}-{:02}", t.date.year(), t.date.month());
        let bucket = buckets.entry(sort_key.clone()).or_insert_with(|| MonthBucket {
            sort_key,
            label: t.date.format("%b %y").to_string(),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        });

        match t.kind {
            TxKind::Income if !is_credit_payment(t, accounts) => bucket.income += t.amount,
            TxKind::Expense => bucket.expense += t.amount,
            TxKind::Income => {}
        }
    }

    buckets.into_values().collect()
}

#[derive(Debug, Clone)]
pub struct UpcomingPayment {
    pub source_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub due: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct DebtSummary {
    /// All liability balances plus all reconstructed credit balances,
    /// unfiltered by due date.
    pub total_outstanding: Decimal,
    pub upcoming: Vec<UpcomingPayment>,
    pub total_due_soon: Decimal,
}

/// Merges manual liabilities and reconstructed credit balances into the
/// upcoming-payments list, ascending by due date. A liability without a due
/// date is never a candidate.
pub fn debt_summary(
    liabilities: &[Liability],
    accounts: &[Account],
    transactions: &[Transaction],
    now: NaiveDate,
) -> DebtSummary {
    let horizon = now + Duration::days(DUE_SOON_WINDOW_DAYS);
    let window_start = now - Duration::days(SUPPRESSION_WINDOW_DAYS);

    let mut total_outstanding: Decimal = liabilities.iter().map(|l| l.current_balance).sum();
    let mut upcoming: Vec<UpcomingPayment> = Vec::new();

    for l in liabilities {
        let Some(due) = l.due_date else {
            continue;
        };
        if l.current_balance <= Decimal::ZERO || due > horizon {
            continue;
        }
        if has_matching_payment(transactions, &l.name, window_start) {
            continue;
        }

        let amount = match l.installment_amount {
            Some(installment) if installment > Decimal::ZERO => installment.min(l.current_balance),
            _ => l.current_balance,
        };
        upcoming.push(UpcomingPayment {
            source_id: l.id,
            name: l.name.clone(),
            amount,
            due,
        });
    }

    for account in accounts.iter().filter(|a| a.kind == AccountKind::Credit) {
        let status = reconstruct_credit_balance(account, transactions, now);
        total_outstanding += status.balance;

        let Some(day) = account.payment_day else {
            continue;
        };
        if status.balance <= Decimal::ZERO || status.has_recent_payment {
            continue;
        }

        let due = next_monthly_occurrence(day, now);
        if due <= horizon {
            upcoming.push(UpcomingPayment {
                source_id: account.id,
                name: format!("{} (Credit)", account.name),
                amount: status.balance,
                due,
            });
        }
    }

    // Stable sort: on equal due dates manual liabilities stay ahead of
    // credit balances, each in original order.
    upcoming.sort_by_key(|p| p.due);
    let total_due_soon = upcoming.iter().map(|p| p.amount).sum();

    DebtSummary {
        total_outstanding,
        upcoming,
        total_due_soon,
    }
}

/// An expense whose description mentions both the liability name and the
/// token "payment" within the trailing window counts as an already-made
/// payment. Plain substring match, case-insensitive.
fn has_matching_payment(
    transactions: &[Transaction],
    liability_name: &str,
    window_start: NaiveDate,
) -> bool {
    let needle = liability_name.to_lowercase();
    transactions.iter().any(|t| {
        if t.kind != TxKind::Expense || t.date < window_start {
            return false;
        }
        let desc = t.description.to_lowercase();
        desc.contains(&needle) && desc.contains("payment")
    })
}
