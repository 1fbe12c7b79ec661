//! Transaction recording business logic.
//!
//! Transactions are append-only ledger entries; there is no update or delete.
//! Recording one also maintains the owning member's last-payment date (for
//! every kind except withdrawals), so the lifecycle engine sees member
//! activity without scanning the ledger. Both writes happen in one database
//! transaction.

use crate::{
    core::session::Session,
    entities::{
        member,
        member::MemberStatus,
        transaction,
        transaction::TransactionKind,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::debug;
use uuid::Uuid;

/// Records a ledger transaction against a member.
///
/// Amounts must be positive and finite; the direction of money movement is
/// carried by the kind, never by the sign. Payment kinds bump the member's
/// last-payment date and reactivate them.
pub async fn record_transaction(
    db: &DatabaseConnection,
    session: &Session,
    member_id: &str,
    kind: TransactionKind,
    amount: f64,
    description: Option<String>,
) -> Result<transaction::Model> {
    session.require_officer("record transactions")?;

    if !(amount.is_finite() && amount > 0.0) {
        return Err(Error::InvalidAmount { amount });
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let member_model = member::Entity::find_by_id(member_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Member",
            id: member_id.to_string(),
        })?;

    let record = transaction::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        member_id: Set(member_model.id.clone()),
        kind: Set(kind),
        amount: Set(amount),
        date: Set(now),
        description: Set(description.unwrap_or_default()),
        processed_by: Set(session.username.clone()),
    };
    let created = record.insert(&txn).await?;

    if kind.counts_as_payment() {
        let mut active_model: member::ActiveModel = member_model.into();
        active_model.last_payment_date = Set(Some(now));
        active_model.status = Set(MemberStatus::Active);
        active_model.update(&txn).await?;
    }

    txn.commit().await?;
    debug!(member = member_id, ?kind, amount, "recorded transaction");
    Ok(created)
}
