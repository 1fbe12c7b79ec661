//! Loan engine - quoting, lifecycle transitions, and overdue arithmetic.
//!
//! Terms are fixed by loan product at application time and never recomputed.
//! The stored status only ever moves forward along
//! `pending -> approved -> disbursed -> completed`; any other transition
//! attempt is rejected without mutation. "Overdue" is a display state derived
//! from the due date, and the overdue penalty is a pure function so it can be
//! shown without touching the books.

use crate::{
    config::settings::Settings,
    core::{member, session::Session},
    entities::{
        Loan, loan,
        loan::{LoanKind, LoanStatus},
        member::MemberStatus,
    },
    errors::{Error, Result},
};
use chrono::{Months, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;
use uuid::Uuid;

/// Days in the fixed-length month used when counting overdue months.
const DAYS_PER_MONTH: i64 = 30;

/// Accumulated repayments are f64 sums of the monthly payment, which can land
/// a few ulps short of the exact total. Anything within half a cent counts as
/// paid off.
const COMPLETION_TOLERANCE: f64 = 0.005;

/// The computed terms of a prospective loan.
#[derive(Debug, Clone, Copy)]
pub struct LoanQuote {
    /// Loan product quoted
    pub kind: LoanKind,
    /// Principal amount
    pub principal: f64,
    /// Interest rate in percent over the full term
    pub rate_percent: f64,
    /// Term in months
    pub term_months: u32,
    /// Interest charged over the full term
    pub total_interest: f64,
    /// Principal plus interest
    pub total_repayment: f64,
    /// Total repayment spread evenly over the term
    pub monthly_payment: f64,
}

/// Derived display status; identical to the stored status except that a
/// disbursed loan past its due date shows as overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanDisplayStatus {
    /// Awaiting approval
    Pending,
    /// Awaiting payout
    Approved,
    /// Repayment in progress, within the due date
    Disbursed,
    /// Fully repaid
    Completed,
    /// Disbursed and past the due date
    Overdue,
}

/// Computes the terms for a loan of `kind` with the given principal.
///
/// Rates and terms come from [`Settings`]; the principal must be positive and
/// finite. Any minimum-principal policy is the caller's concern, not an
/// engine invariant.
pub fn quote(settings: &Settings, kind: LoanKind, principal: f64) -> Result<LoanQuote> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(Error::InvalidAmount { amount: principal });
    }

    let policy = settings.loan_policy(kind);
    let total_interest = principal * policy.rate_percent / 100.0;
    let total_repayment = principal + total_interest;
    let monthly_payment = total_repayment / f64::from(policy.term_months);

    Ok(LoanQuote {
        kind,
        principal,
        rate_percent: policy.rate_percent,
        term_months: policy.term_months,
        total_interest,
        total_repayment,
        monthly_payment,
    })
}

/// Records a loan application with terms computed by [`quote`].
///
/// The due date is fixed here: application date plus the term in calendar
/// months. Only active members may borrow, and a member-role session may only
/// apply for itself.
pub async fn apply_for_loan(
    db: &DatabaseConnection,
    session: &Session,
    settings: &Settings,
    member_id: &str,
    kind: LoanKind,
    principal: f64,
    purpose: Option<String>,
) -> Result<loan::Model> {
    session.require_self_or_officer(member_id, "apply for a loan for another member")?;

    let borrower = member::require_member(db, member_id).await?;
    if borrower.status != MemberStatus::Active {
        return Err(Error::Validation {
            message: format!("member '{}' is not active and cannot borrow", borrower.name),
        });
    }

    let q = quote(settings, kind, principal)?;
    let now = Utc::now();
    let due_date = now
        .checked_add_months(Months::new(q.term_months))
        .ok_or_else(|| Error::Validation {
            message: "loan term overflows the calendar".to_string(),
        })?;

    let model = loan::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        member_id: Set(borrower.id),
        kind: Set(kind),
        amount: Set(q.principal),
        interest_rate: Set(q.rate_percent),
        term_months: Set(i32::try_from(q.term_months).unwrap_or(i32::MAX)),
        application_date: Set(now),
        approval_date: Set(None),
        disbursement_date: Set(None),
        due_date: Set(Some(due_date)),
        status: Set(LoanStatus::Pending),
        monthly_payment: Set(q.monthly_payment),
        total_repaid: Set(0.0),
        approved_by: Set(None),
        purpose: Set(purpose),
    };
    let created = model.insert(db).await?;
    info!(loan = %created.id, member = %created.member_id, principal, "loan application recorded");
    Ok(created)
}

async fn require_loan(db: &DatabaseConnection, loan_id: &str) -> Result<loan::Model> {
    Loan::find_by_id(loan_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Loan",
            id: loan_id.to_string(),
        })
}

fn reject_transition(from: LoanStatus, to: LoanStatus) -> Error {
    Error::InvalidTransition {
        entity: "Loan",
        from: format!("{from:?}").to_lowercase(),
        to: format!("{to:?}").to_lowercase(),
    }
}

/// Approves a pending loan. Rejects any loan not in `pending`.
pub async fn approve_loan(
    db: &DatabaseConnection,
    session: &Session,
    loan_id: &str,
) -> Result<loan::Model> {
    session.require_officer("approve loans")?;

    let found = require_loan(db, loan_id).await?;
    if found.status != LoanStatus::Pending {
        return Err(reject_transition(found.status, LoanStatus::Approved));
    }

    let mut active_model: loan::ActiveModel = found.into();
    active_model.status = Set(LoanStatus::Approved);
    active_model.approval_date = Set(Some(Utc::now()));
    active_model.approved_by = Set(Some(session.username.clone()));
    active_model.update(db).await.map_err(Into::into)
}

/// Pays out an approved loan. Rejects any loan not in `approved`.
pub async fn disburse_loan(
    db: &DatabaseConnection,
    session: &Session,
    loan_id: &str,
) -> Result<loan::Model> {
    session.require_officer("disburse loans")?;

    let found = require_loan(db, loan_id).await?;
    if found.status != LoanStatus::Approved {
        return Err(reject_transition(found.status, LoanStatus::Disbursed));
    }

    let mut active_model: loan::ActiveModel = found.into();
    active_model.status = Set(LoanStatus::Disbursed);
    active_model.disbursement_date = Set(Some(Utc::now()));
    active_model.update(db).await.map_err(Into::into)
}

/// Records a repayment against a disbursed loan. When the cumulative
/// repayments cover the total repayment the loan completes.
pub async fn record_repayment(
    db: &DatabaseConnection,
    session: &Session,
    loan_id: &str,
    amount: f64,
) -> Result<loan::Model> {
    session.require_officer("record loan repayments")?;

    if !(amount.is_finite() && amount > 0.0) {
        return Err(Error::InvalidAmount { amount });
    }

    let found = require_loan(db, loan_id).await?;
    if found.status != LoanStatus::Disbursed {
        return Err(reject_transition(found.status, LoanStatus::Completed));
    }

    let repaid = found.total_repaid + amount;
    let completed = repaid >= found.total_repayment() - COMPLETION_TOLERANCE;

    let mut active_model: loan::ActiveModel = found.into();
    active_model.total_repaid = Set(repaid);
    if completed {
        active_model.status = Set(LoanStatus::Completed);
    }
    active_model.update(db).await.map_err(Into::into)
}

/// All loans belonging to one member, newest application first.
pub async fn loans_for_member(
    db: &DatabaseConnection,
    member_id: &str,
) -> Result<Vec<loan::Model>> {
    Loan::find()
        .filter(loan::Column::MemberId.eq(member_id))
        .order_by_desc(loan::Column::ApplicationDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether a loan should display as overdue: disbursed and past its due date.
/// The stored status is never changed by this.
#[must_use]
pub fn is_overdue(loan: &loan::Model, now: DateTimeUtc) -> bool {
    loan.status == LoanStatus::Disbursed && loan.due_date.is_some_and(|due| now > due)
}

/// The status a loan should display as at `now`.
#[must_use]
pub fn display_status(loan: &loan::Model, now: DateTimeUtc) -> LoanDisplayStatus {
    if is_overdue(loan, now) {
        return LoanDisplayStatus::Overdue;
    }
    match loan.status {
        LoanStatus::Pending => LoanDisplayStatus::Pending,
        LoanStatus::Approved => LoanDisplayStatus::Approved,
        LoanStatus::Disbursed => LoanDisplayStatus::Disbursed,
        LoanStatus::Completed => LoanDisplayStatus::Completed,
    }
}

/// Whole 30-day months a loan is past due; zero when not overdue.
#[must_use]
pub fn months_overdue(loan: &loan::Model, now: DateTimeUtc) -> i64 {
    if !is_overdue(loan, now) {
        return 0;
    }
    loan.due_date
        .map_or(0, |due| ((now - due).num_days() / DAYS_PER_MONTH).max(0))
}

/// Penalty interest on an overdue loan.
///
/// Simple (non-compounding) interest: `rate_percent` of the outstanding
/// balance per whole overdue month, accruing for at most `max_months` months.
#[must_use]
pub fn overdue_penalty(
    outstanding: f64,
    months_overdue: i64,
    rate_percent: f64,
    max_months: u32,
) -> f64 {
    let charged_months = months_overdue.clamp(0, i64::from(max_months));
    // Cast safety: charged_months is in [0, max_months], a small number.
    #[allow(clippy::cast_precision_loss)]
    let charged_months = charged_months as f64;
    outstanding * rate_percent / 100.0 * charged_months
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    #[test]
    fn test_quote_short_term_is_deterministic() {
        let q = quote(&test_settings(), LoanKind::ShortTerm, 10_000.0).unwrap();
        assert_eq!(q.rate_percent, 10.0);
        assert_eq!(q.term_months, 1);
        assert_eq!(q.total_interest, 1_000.0);
        assert_eq!(q.total_repayment, 11_000.0);
        assert_eq!(q.monthly_payment, 11_000.0);
    }

    #[test]
    fn test_quote_bridge_and_long_term() {
        let bridge = quote(&test_settings(), LoanKind::Bridge, 8_000.0).unwrap();
        assert_eq!(bridge.rate_percent, 8.0);
        assert_eq!(bridge.term_months, 4);
        assert_eq!(bridge.total_repayment, 8_640.0);
        assert_eq!(bridge.monthly_payment, 2_160.0);

        let long = quote(&test_settings(), LoanKind::LongTerm, 9_000.0).unwrap();
        assert_eq!(long.term_months, 3);
        assert_eq!(long.total_repayment, 9_900.0);
        assert_eq!(long.monthly_payment, 3_300.0);
    }

    #[test]
    fn test_quote_rejects_non_positive_principal() {
        for bad in [0.0, -100.0, f64::NAN] {
            let result = quote(&test_settings(), LoanKind::ShortTerm, bad);
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }
    }

    #[test]
    fn test_overdue_penalty_caps_at_max_months() {
        // 10% of 11000 per month
        assert_eq!(overdue_penalty(11_000.0, 1, 10.0, 4), 1_100.0);
        assert_eq!(overdue_penalty(11_000.0, 3, 10.0, 4), 3_300.0);
        // 7 months overdue still charges only 4
        assert_eq!(overdue_penalty(11_000.0, 7, 10.0, 4), 4_400.0);
        assert_eq!(overdue_penalty(11_000.0, 0, 10.0, 4), 0.0);
        assert_eq!(overdue_penalty(11_000.0, -2, 10.0, 4), 0.0);
    }

    #[tokio::test]
    async fn test_apply_sets_terms_and_due_date() -> Result<()> {
        let db = setup_test_db().await?;
        let borrower = register_test_member(&db, "Amina").await?;

        let loan = apply_for_loan(
            &db,
            &treasurer_session(),
            &test_settings(),
            &borrower.id,
            LoanKind::ShortTerm,
            10_000.0,
            Some("stock for kiosk".to_string()),
        )
        .await?;

        assert_eq!(loan.status, LoanStatus::Pending);
        assert_eq!(loan.interest_rate, 10.0);
        assert_eq!(loan.term_months, 1);
        assert_eq!(loan.monthly_payment, 11_000.0);
        assert_eq!(loan.total_repaid, 0.0);
        assert_eq!(loan.total_repayment(), 11_000.0);
        let due = loan.due_date.unwrap();
        assert!(due > loan.application_date);

        Ok(())
    }

    #[tokio::test]
    async fn test_member_cannot_apply_for_someone_else() -> Result<()> {
        let db = setup_test_db().await?;
        let amina = register_test_member(&db, "Amina").await?;
        let brian = register_test_member(&db, "Brian").await?;

        let result = apply_for_loan(
            &db,
            &member_session(&brian.id),
            &test_settings(),
            &amina.id,
            LoanKind::ShortTerm,
            5_000.0,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Unauthorized { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_member_cannot_borrow() -> Result<()> {
        let db = setup_test_db().await?;
        let borrower = register_test_member(&db, "Amina").await?;
        set_member_status(&db, &borrower.id, MemberStatus::Inactive).await?;

        let result = apply_for_loan(
            &db,
            &treasurer_session(),
            &test_settings(),
            &borrower.id,
            LoanKind::Bridge,
            5_000.0,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_forward_transitions_only() -> Result<()> {
        let db = setup_test_db().await?;
        let loan = apply_test_loan(&db, LoanKind::ShortTerm, 10_000.0).await?;
        let session = treasurer_session();

        // Cannot disburse a pending loan
        let result = disburse_loan(&db, &session, &loan.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition { .. }
        ));

        let approved = approve_loan(&db, &session, &loan.id).await?;
        assert_eq!(approved.status, LoanStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("jane"));
        assert!(approved.approval_date.is_some());

        // Cannot approve twice
        let result = approve_loan(&db, &session, &loan.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition { .. }
        ));

        let disbursed = disburse_loan(&db, &session, &loan.id).await?;
        assert_eq!(disbursed.status, LoanStatus::Disbursed);
        assert!(disbursed.disbursement_date.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_transitions_require_officer() -> Result<()> {
        let db = setup_test_db().await?;
        let loan = apply_test_loan(&db, LoanKind::ShortTerm, 10_000.0).await?;

        let result = approve_loan(&db, &member_session("m1"), &loan.id).await;
        assert!(matches!(result.unwrap_err(), Error::Unauthorized { .. }));

        // Status untouched by the refused attempt
        let unchanged = loans_for_member(&db, &loan.member_id).await?;
        assert_eq!(unchanged[0].status, LoanStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_repayment_completes_loan() -> Result<()> {
        let db = setup_test_db().await?;
        let loan = apply_test_loan(&db, LoanKind::ShortTerm, 10_000.0).await?;
        let session = treasurer_session();

        // Repayments only apply to disbursed loans
        let result = record_repayment(&db, &session, &loan.id, 1_000.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition { .. }
        ));

        approve_loan(&db, &session, &loan.id).await?;
        disburse_loan(&db, &session, &loan.id).await?;

        let part = record_repayment(&db, &session, &loan.id, 6_000.0).await?;
        assert_eq!(part.status, LoanStatus::Disbursed);
        assert_eq!(part.outstanding_balance(), 5_000.0);

        let full = record_repayment(&db, &session, &loan.id, 5_000.0).await?;
        assert_eq!(full.status, LoanStatus::Completed);
        assert_eq!(full.total_repaid, 11_000.0);
        assert_eq!(full.outstanding_balance(), 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_exact_monthly_payments_complete_loan() -> Result<()> {
        let db = setup_test_db().await?;
        let loan = apply_test_loan(&db, LoanKind::LongTerm, 10_000.0).await?;
        let session = treasurer_session();
        approve_loan(&db, &session, &loan.id).await?;
        disburse_loan(&db, &session, &loan.id).await?;

        // 11000 over three months; the three f64 installments may sum a hair
        // short of the exact total
        record_repayment(&db, &session, &loan.id, loan.monthly_payment).await?;
        record_repayment(&db, &session, &loan.id, loan.monthly_payment).await?;
        let settled = record_repayment(&db, &session, &loan.id, loan.monthly_payment).await?;

        assert_eq!(settled.status, LoanStatus::Completed);
        assert!(settled.outstanding_balance() < 0.01);

        Ok(())
    }

    #[tokio::test]
    async fn test_overdue_is_display_only() -> Result<()> {
        let db = setup_test_db().await?;
        let loan = apply_test_loan(&db, LoanKind::ShortTerm, 10_000.0).await?;
        let session = treasurer_session();
        approve_loan(&db, &session, &loan.id).await?;
        let disbursed = disburse_loan(&db, &session, &loan.id).await?;

        let due = disbursed.due_date.unwrap();
        let before_due = due - Duration::days(1);
        let after_due = due + Duration::days(65);

        assert_eq!(
            display_status(&disbursed, before_due),
            LoanDisplayStatus::Disbursed
        );
        assert_eq!(
            display_status(&disbursed, after_due),
            LoanDisplayStatus::Overdue
        );
        assert_eq!(months_overdue(&disbursed, after_due), 2);

        // The stored status did not move
        assert_eq!(disbursed.status, LoanStatus::Disbursed);

        Ok(())
    }
}
