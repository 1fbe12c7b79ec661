//! Disbursement entity - An emergency-fund payout request.
//!
//! Each disbursement draws on one of the two earmarked funds (medical or
//! last-expense) and carries a snapshot of that fund's summary taken at
//! request time. The snapshot is frozen for audit display and is never
//! recomputed later.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Disbursement database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disbursements")]
pub struct Model {
    /// Opaque unique identifier assigned at request time
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// ID of the member the payout is for
    pub member_id: String,
    /// Which earmarked fund this draws on
    pub kind: DisbursementKind,
    /// Amount originally requested
    pub request_amount: f64,
    /// Amount approved; zero until approval
    pub approved_amount: f64,
    /// Fund total contributed, snapshotted at request time
    pub fund_total_contributed: f64,
    /// Fund total disbursed, snapshotted at request time
    pub fund_total_disbursed: f64,
    /// Fund balance, snapshotted at request time
    pub fund_balance: f64,
    /// When the request was made
    pub request_date: DateTimeUtc,
    /// When the request was approved, if it has been
    pub approval_date: Option<DateTimeUtc>,
    /// When the money was paid out, if it has been
    pub disbursement_date: Option<DateTimeUtc>,
    /// Stored lifecycle status
    pub status: DisbursementStatus,
    /// Username of the approving actor, if approved
    pub approved_by: Option<String>,
}

/// The two earmarked funds a disbursement can draw on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DisbursementKind {
    /// Medical aid fund
    #[sea_orm(string_value = "medical")]
    Medical,
    /// Last-expense aid fund
    #[sea_orm(string_value = "last_expense")]
    LastExpense,
}

impl DisbursementKind {
    /// The ledger entry kind whose transactions feed this fund.
    #[must_use]
    pub fn contributing_kind(self) -> TransactionKind {
        match self {
            Self::Medical => TransactionKind::Medical,
            Self::LastExpense => TransactionKind::LastExpense,
        }
    }
}

/// Stored disbursement lifecycle status.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DisbursementStatus {
    /// Requested, awaiting approval
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved, awaiting payout
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Paid out; counts against the fund balance
    #[sea_orm(string_value = "disbursed")]
    Disbursed,
}

/// Defines relationships between Disbursement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each disbursement belongs to one member
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
