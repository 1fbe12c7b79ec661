//! Disbursement engine - earmarked-fund payouts with a balance rule.
//!
//! Each fund's balance is derived on demand: contributions of the matching
//! ledger kind minus payouts already disbursed. A request that exceeds the
//! balance is rejected outright, and the fund summary at request time is
//! frozen onto the request for audit display. Approval re-checks the amount
//! against the live balance, since contributions may have moved between
//! request and approval.

use crate::{
    core::{ledger, member, session::Session},
    entities::{
        Disbursement, disbursement,
        disbursement::{DisbursementKind, DisbursementStatus},
        member::MemberStatus,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;
use uuid::Uuid;

/// Point-in-time view of one earmarked fund.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundSummary {
    /// Sum of contributions of the matching ledger kind
    pub total_contributed: f64,
    /// Sum of approved amounts over payouts already disbursed
    pub total_disbursed: f64,
    /// Contributed minus disbursed
    pub balance: f64,
}

/// Sum of approved amounts over disbursed payouts of one kind.
#[must_use]
pub fn disbursed_total(disbursements: &[disbursement::Model], kind: DisbursementKind) -> f64 {
    disbursements
        .iter()
        .filter(|d| d.kind == kind && d.status == DisbursementStatus::Disbursed)
        .map(|d| d.approved_amount)
        .sum()
}

/// Computes the current summary of one earmarked fund.
pub async fn fund_summary(db: &DatabaseConnection, kind: DisbursementKind) -> Result<FundSummary> {
    let total_contributed = ledger::fund_contributions(db, kind.contributing_kind()).await?;

    let payouts = Disbursement::find()
        .filter(disbursement::Column::Kind.eq(kind))
        .all(db)
        .await?;
    let total_disbursed = disbursed_total(&payouts, kind);

    Ok(FundSummary {
        total_contributed,
        total_disbursed,
        balance: total_contributed - total_disbursed,
    })
}

/// Records a payout request against an earmarked fund.
///
/// The amount must be positive and within the fund's current balance; on
/// rejection nothing is written. The request starts `pending` with an
/// approved amount of zero and the fund summary frozen onto it.
pub async fn request_disbursement(
    db: &DatabaseConnection,
    session: &Session,
    member_id: &str,
    kind: DisbursementKind,
    request_amount: f64,
) -> Result<disbursement::Model> {
    session.require_self_or_officer(member_id, "request a disbursement for another member")?;

    if !(request_amount.is_finite() && request_amount > 0.0) {
        return Err(Error::InvalidAmount {
            amount: request_amount,
        });
    }

    let requester = member::require_member(db, member_id).await?;
    if requester.status != MemberStatus::Active {
        return Err(Error::Validation {
            message: format!(
                "member '{}' is not active and cannot request a disbursement",
                requester.name
            ),
        });
    }

    let summary = fund_summary(db, kind).await?;
    if request_amount > summary.balance {
        return Err(Error::InsufficientFunds {
            available: summary.balance,
            requested: request_amount,
        });
    }

    let model = disbursement::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        member_id: Set(requester.id),
        kind: Set(kind),
        request_amount: Set(request_amount),
        approved_amount: Set(0.0),
        fund_total_contributed: Set(summary.total_contributed),
        fund_total_disbursed: Set(summary.total_disbursed),
        fund_balance: Set(summary.balance),
        request_date: Set(Utc::now()),
        approval_date: Set(None),
        disbursement_date: Set(None),
        status: Set(DisbursementStatus::Pending),
        approved_by: Set(None),
    };
    let created = model.insert(db).await?;
    info!(disbursement = %created.id, ?kind, request_amount, "disbursement requested");
    Ok(created)
}

async fn require_disbursement(
    db: &DatabaseConnection,
    id: &str,
) -> Result<disbursement::Model> {
    Disbursement::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Disbursement",
            id: id.to_string(),
        })
}

fn reject_transition(from: DisbursementStatus, to: DisbursementStatus) -> Error {
    Error::InvalidTransition {
        entity: "Disbursement",
        from: format!("{from:?}").to_lowercase(),
        to: format!("{to:?}").to_lowercase(),
    }
}

/// Approves a pending request for a concrete amount.
///
/// The approved amount is validated against the fund's balance at approval
/// time, not just the request-time snapshot, so a fund can never be driven
/// negative by contributions shifting between request and approval.
pub async fn approve_disbursement(
    db: &DatabaseConnection,
    session: &Session,
    id: &str,
    approved_amount: f64,
) -> Result<disbursement::Model> {
    session.require_officer("approve disbursements")?;

    if !(approved_amount.is_finite() && approved_amount > 0.0) {
        return Err(Error::InvalidAmount {
            amount: approved_amount,
        });
    }

    let found = require_disbursement(db, id).await?;
    if found.status != DisbursementStatus::Pending {
        return Err(reject_transition(found.status, DisbursementStatus::Approved));
    }

    let current = fund_summary(db, found.kind).await?;
    if approved_amount > current.balance {
        return Err(Error::InsufficientFunds {
            available: current.balance,
            requested: approved_amount,
        });
    }

    let mut active_model: disbursement::ActiveModel = found.into();
    active_model.status = Set(DisbursementStatus::Approved);
    active_model.approved_amount = Set(approved_amount);
    active_model.approval_date = Set(Some(Utc::now()));
    active_model.approved_by = Set(Some(session.username.clone()));
    active_model.update(db).await.map_err(Into::into)
}

/// Marks an approved request as paid out; from then on it counts against the
/// fund balance. Rejects any request not in `approved`.
pub async fn mark_disbursed(
    db: &DatabaseConnection,
    session: &Session,
    id: &str,
) -> Result<disbursement::Model> {
    session.require_officer("disburse funds")?;

    let found = require_disbursement(db, id).await?;
    if found.status != DisbursementStatus::Approved {
        return Err(reject_transition(
            found.status,
            DisbursementStatus::Disbursed,
        ));
    }

    let mut active_model: disbursement::ActiveModel = found.into();
    active_model.status = Set(DisbursementStatus::Disbursed);
    active_model.disbursement_date = Set(Some(Utc::now()));
    active_model.update(db).await.map_err(Into::into)
}

/// Payouts disbursed within `[start, end]` (by payout date), oldest first,
/// for report date-range filtering.
pub async fn disbursed_between(
    db: &DatabaseConnection,
    start: DateTimeUtc,
    end: DateTimeUtc,
) -> Result<Vec<disbursement::Model>> {
    Disbursement::find()
        .filter(disbursement::Column::Status.eq(DisbursementStatus::Disbursed))
        .filter(disbursement::Column::DisbursementDate.gte(start))
        .filter(disbursement::Column::DisbursementDate.lte(end))
        .order_by_asc(disbursement::Column::DisbursementDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All disbursement requests, newest first.
pub async fn all_disbursements(db: &DatabaseConnection) -> Result<Vec<disbursement::Model>> {
    Disbursement::find()
        .order_by_desc(disbursement::Column::RequestDate)
        .all(db)
        .await
        .map_err(Into::into)
}
