//! Ledger engine - contribution totals derived from the transaction log.
//!
//! Totals are plain folds over the transaction collection: no rounding happens
//! mid-computation and the result does not depend on insertion order. The
//! fold functions here are pure over slices; thin async wrappers fetch the
//! relevant rows first.

use crate::{
    entities::{Transaction, transaction, transaction::TransactionKind},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};

/// Sums the amounts of every transaction in the slice.
#[must_use]
pub fn sum_amounts(transactions: &[transaction::Model]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}

/// Total of all transactions in the "all contributions" category
/// (deposit, petty cash, medical, last expense, registration fee).
#[must_use]
pub fn contribution_total(transactions: &[transaction::Model]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind.is_contribution())
        .map(|t| t.amount)
        .sum()
}

/// Total of all transactions of one kind.
#[must_use]
pub fn total_for_kind(transactions: &[transaction::Model], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Fetches the whole ledger, newest first.
pub async fn all_transactions(db: &DatabaseConnection) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The group's total contributions across all members.
pub async fn total_contributions(db: &DatabaseConnection) -> Result<f64> {
    let rows = Transaction::find()
        .filter(transaction::Column::Kind.is_in(TransactionKind::CONTRIBUTIONS))
        .all(db)
        .await?;
    Ok(sum_amounts(&rows))
}

/// Total contributed to a single-kind fund category (e.g. the medical fund).
pub async fn fund_contributions(db: &DatabaseConnection, kind: TransactionKind) -> Result<f64> {
    let rows = Transaction::find()
        .filter(transaction::Column::Kind.eq(kind))
        .all(db)
        .await?;
    Ok(sum_amounts(&rows))
}

/// All transactions belonging to one member, newest first.
pub async fn transactions_for_member(
    db: &DatabaseConnection,
    member_id: &str,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::MemberId.eq(member_id))
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// One member's transactions recorded within `[start, end]`, newest first,
/// for statement windows.
pub async fn member_transactions_between(
    db: &DatabaseConnection,
    member_id: &str,
    start: DateTimeUtc,
    end: DateTimeUtc,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::MemberId.eq(member_id))
        .filter(transaction::Column::Date.gte(start))
        .filter(transaction::Column::Date.lte(end))
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All transactions recorded within `[start, end]`, oldest first, for
/// report date-range filtering.
pub async fn transactions_between(
    db: &DatabaseConnection,
    start: DateTimeUtc,
    end: DateTimeUtc,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::Date.gte(start))
        .filter(transaction::Column::Date.lte(end))
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
