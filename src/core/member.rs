//! Member registration and lifecycle business logic.
//!
//! Registration creates the member record and its registration-fee ledger
//! entry in one database transaction. The lifecycle half of this module is
//! the pure derivation of a member's status from elapsed time since their
//! last payment; it is idempotent and safe to re-run at any time, which is
//! exactly what the daily refresh does.

use crate::{
    config::settings::{Settings, StatusThresholds},
    core::{ledger, session::Session},
    entities::{
        Member, member,
        member::MemberStatus,
        transaction,
        transaction::TransactionKind,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;
use uuid::Uuid;

/// Days in the fixed-length "month" used for lifecycle arithmetic.
/// The group counts 30-day blocks, not calendar months.
const DAYS_PER_MONTH: i64 = 30;

/// Registers a new member and records the fixed registration-fee transaction,
/// atomically. The new member starts `active` with the registration counted
/// as their first payment.
pub async fn register_member(
    db: &DatabaseConnection,
    session: &Session,
    settings: &Settings,
    name: String,
    phone: String,
    email: Option<String>,
    national_id: String,
    address: String,
) -> Result<member::Model> {
    session.require_officer("register members")?;

    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Member name cannot be empty".to_string(),
        });
    }
    if national_id.trim().is_empty() {
        return Err(Error::Validation {
            message: "National ID cannot be empty".to_string(),
        });
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let member_model = member::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.trim().to_string()),
        phone: Set(phone),
        email: Set(email),
        national_id: Set(national_id),
        address: Set(address),
        registration_date: Set(now),
        registration_fee: Set(settings.registration_fee),
        status: Set(MemberStatus::Active),
        last_payment_date: Set(Some(now)),
    };
    let created = member_model.insert(&txn).await?;

    let fee = transaction::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        member_id: Set(created.id.clone()),
        kind: Set(TransactionKind::RegistrationFee),
        amount: Set(settings.registration_fee),
        date: Set(now),
        description: Set("Member registration fee".to_string()),
        processed_by: Set(session.username.clone()),
    };
    fee.insert(&txn).await?;

    txn.commit().await?;
    info!(member = %created.name, "registered new member");
    Ok(created)
}

/// Finds a member by id.
pub async fn get_member_by_id(
    db: &DatabaseConnection,
    member_id: &str,
) -> Result<Option<member::Model>> {
    Member::find_by_id(member_id).one(db).await.map_err(Into::into)
}

/// Like [`get_member_by_id`] but turns a miss into [`Error::NotFound`].
pub async fn require_member(db: &DatabaseConnection, member_id: &str) -> Result<member::Model> {
    get_member_by_id(db, member_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Member",
            id: member_id.to_string(),
        })
}

/// All members, ordered alphabetically by name.
pub async fn get_all_members(db: &DatabaseConnection) -> Result<Vec<member::Model>> {
    Member::find()
        .order_by_asc(member::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A member's lifetime contribution total, always derived from the ledger.
/// There is no stored accumulator to drift out of sync.
pub async fn total_contributions_for(db: &DatabaseConnection, member_id: &str) -> Result<f64> {
    let rows = ledger::transactions_for_member(db, member_id).await?;
    Ok(ledger::contribution_total(&rows))
}

/// Whole 30-day months elapsed between two instants.
#[must_use]
pub fn months_between(earlier: DateTimeUtc, now: DateTimeUtc) -> i64 {
    (now - earlier).num_days() / DAYS_PER_MONTH
}

/// Derives a member's lifecycle status from their last payment date.
///
/// No recorded payment means `inactive`. Otherwise the member is `inactive`
/// after the inactive threshold, `dormant` after the dormant threshold, and
/// `active` before either. Pure and idempotent: the same inputs always give
/// the same status.
#[must_use]
pub fn lifecycle_status(
    last_payment: Option<DateTimeUtc>,
    now: DateTimeUtc,
    thresholds: &StatusThresholds,
) -> MemberStatus {
    let Some(last_payment) = last_payment else {
        return MemberStatus::Inactive;
    };

    let months_since_payment = months_between(last_payment, now);
    if months_since_payment >= thresholds.inactive_months {
        MemberStatus::Inactive
    } else if months_since_payment >= thresholds.dormant_months {
        MemberStatus::Dormant
    } else {
        MemberStatus::Active
    }
}

/// Outcome of a bulk status refresh.
#[derive(Debug, Clone, Default)]
pub struct StatusRefreshSummary {
    /// Members whose stored status changed
    pub updated: usize,
    /// Active members after the refresh
    pub active: usize,
    /// Dormant members after the refresh
    pub dormant: usize,
    /// Inactive members after the refresh
    pub inactive: usize,
}

/// Recomputes and stores the lifecycle status of every member.
///
/// Intended to run once at startup and then on a daily cadence; re-running
/// with the same `now` is a no-op for every member whose status already
/// matches.
pub async fn refresh_all_member_statuses(
    db: &DatabaseConnection,
    now: DateTimeUtc,
    thresholds: &StatusThresholds,
) -> Result<StatusRefreshSummary> {
    let members = Member::find().all(db).await?;
    let mut summary = StatusRefreshSummary::default();

    for m in members {
        let status = lifecycle_status(m.last_payment_date, now, thresholds);
        match status {
            MemberStatus::Active => summary.active += 1,
            MemberStatus::Dormant => summary.dormant += 1,
            MemberStatus::Inactive => summary.inactive += 1,
        }
        if m.status != status {
            let mut active_model: member::ActiveModel = m.into();
            active_model.status = Set(status);
            active_model.update(db).await?;
            summary.updated += 1;
        }
    }

    info!(
        updated = summary.updated,
        active = summary.active,
        dormant = summary.dormant,
        inactive = summary.inactive,
        "refreshed member statuses"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    fn thresholds() -> StatusThresholds {
        StatusThresholds::default()
    }

    #[test]
    fn test_no_payment_is_inactive() {
        let now = Utc::now();
        assert_eq!(
            lifecycle_status(None, now, &thresholds()),
            MemberStatus::Inactive
        );
    }

    #[test]
    fn test_status_boundaries_in_days() {
        let now = Utc::now();
        // 200 days -> 6 months at 30-day months -> inactive
        assert_eq!(
            lifecycle_status(Some(now - Duration::days(200)), now, &thresholds()),
            MemberStatus::Inactive
        );
        // 100 days -> 3 months -> dormant
        assert_eq!(
            lifecycle_status(Some(now - Duration::days(100)), now, &thresholds()),
            MemberStatus::Dormant
        );
        // 50 days -> 1 month -> active
        assert_eq!(
            lifecycle_status(Some(now - Duration::days(50)), now, &thresholds()),
            MemberStatus::Active
        );
        // Exactly 90 days is the dormant boundary
        assert_eq!(
            lifecycle_status(Some(now - Duration::days(90)), now, &thresholds()),
            MemberStatus::Dormant
        );
    }

    #[test]
    fn test_lifecycle_is_idempotent() {
        let now = Utc::now();
        let last = Some(now - Duration::days(120));
        let first = lifecycle_status(last, now, &thresholds());
        let second = lifecycle_status(last, now, &thresholds());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_register_member_records_fee() -> Result<()> {
        let db = setup_test_db().await?;
        let member = register_test_member(&db, "Amina").await?;

        assert_eq!(member.name, "Amina");
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.registration_fee, 1000.0);
        assert!(member.last_payment_date.is_some());

        // The fee landed in the ledger and is the member's whole total
        assert_eq!(total_contributions_for(&db, &member.id).await?, 1000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_member_requires_officer() -> Result<()> {
        let db = setup_test_db().await?;
        let session = member_session("m1");
        let result = register_member(
            &db,
            &session,
            &test_settings(),
            "Eve".to_string(),
            "0700000000".to_string(),
            None,
            "123".to_string(),
            "Nairobi".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Unauthorized { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_member_rejects_blank_name() -> Result<()> {
        let db = setup_test_db().await?;
        let result = register_member(
            &db,
            &treasurer_session(),
            &test_settings(),
            "   ".to_string(),
            "0700000000".to_string(),
            None,
            "123".to_string(),
            "Nairobi".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_all_member_statuses() -> Result<()> {
        let db = setup_test_db().await?;
        let fresh = register_test_member(&db, "Fresh").await?;
        let quiet = register_test_member(&db, "Quiet").await?;
        let gone = register_test_member(&db, "Gone").await?;

        let now = Utc::now();
        set_last_payment(&db, &quiet.id, Some(now - Duration::days(100))).await?;
        set_last_payment(&db, &gone.id, None).await?;

        let summary =
            refresh_all_member_statuses(&db, now, &test_settings().member_status_thresholds)
                .await?;
        assert_eq!(summary.active, 1);
        assert_eq!(summary.dormant, 1);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.updated, 2); // fresh member was already active

        assert_eq!(
            require_member(&db, &fresh.id).await?.status,
            MemberStatus::Active
        );
        assert_eq!(
            require_member(&db, &quiet.id).await?.status,
            MemberStatus::Dormant
        );
        assert_eq!(
            require_member(&db, &gone.id).await?.status,
            MemberStatus::Inactive
        );

        // Second run with the same `now` changes nothing
        let again =
            refresh_all_member_statuses(&db, now, &test_settings().member_status_thresholds)
                .await?;
        assert_eq!(again.updated, 0);
        assert_eq!(again.dormant, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_require_member_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_member(&db, "missing").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }
}
