//! Loan entity - A member loan with terms fixed at application time.
//!
//! The stored status only walks the forward chain
//! `pending -> approved -> disbursed -> completed`; "overdue" is a display
//! state computed from the due date, never written back.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Opaque unique identifier assigned at application
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// ID of the borrowing member
    pub member_id: String,
    /// Which loan product this is
    pub kind: LoanKind,
    /// Principal amount
    pub amount: f64,
    /// Interest rate in percent, fixed by `kind` at application time
    pub interest_rate: f64,
    /// Term in months, fixed by `kind` at application time
    pub term_months: i32,
    /// When the application was recorded
    pub application_date: DateTimeUtc,
    /// When the loan was approved, if it has been
    pub approval_date: Option<DateTimeUtc>,
    /// When the principal was paid out, if it has been
    pub disbursement_date: Option<DateTimeUtc>,
    /// Repayment due date, application date plus the term
    pub due_date: Option<DateTimeUtc>,
    /// Stored lifecycle status
    pub status: LoanStatus,
    /// Computed monthly payment (total repayment over the term)
    pub monthly_payment: f64,
    /// Cumulative amount repaid so far
    pub total_repaid: f64,
    /// Username of the approving actor, if approved
    pub approved_by: Option<String>,
    /// Free-text purpose given by the applicant
    pub purpose: Option<String>,
}

impl Model {
    /// Principal plus the fixed interest for the full term.
    #[must_use]
    pub fn total_repayment(&self) -> f64 {
        self.amount + self.amount * self.interest_rate / 100.0
    }

    /// What remains to be repaid; never negative.
    #[must_use]
    pub fn outstanding_balance(&self) -> f64 {
        (self.total_repayment() - self.total_repaid).max(0.0)
    }
}

/// The three loan products offered by the group.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum LoanKind {
    /// 1-month loan
    #[sea_orm(string_value = "short_term")]
    ShortTerm,
    /// 4-month bridging loan
    #[sea_orm(string_value = "bridge")]
    Bridge,
    /// 3-month loan
    #[sea_orm(string_value = "long_term")]
    LongTerm,
}

/// Stored loan lifecycle status. Overdue is intentionally absent; it is a
/// derived display state (see [`crate::core::loan::display_status`]).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum LoanStatus {
    /// Applied for, awaiting approval
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved, awaiting payout
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Principal paid out, repayment in progress
    #[sea_orm(string_value = "disbursed")]
    Disbursed,
    /// Fully repaid
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// Defines relationships between Loan and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each loan belongs to one member
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
