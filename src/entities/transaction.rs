//! Transaction entity - The append-only ledger of the group's books.
//!
//! Each transaction references exactly one member and is immutable once
//! recorded. All contribution totals and fund balances are derived by folding
//! over this collection; nothing else stores money totals.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Opaque unique identifier assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// ID of the member this transaction belongs to
    pub member_id: String,
    /// What kind of ledger entry this is
    pub kind: TransactionKind,
    /// Transaction amount; always positive, direction is carried by `kind`
    pub amount: f64,
    /// When the transaction was recorded
    pub date: DateTimeUtc,
    /// Free-text description
    pub description: String,
    /// Username of the actor who recorded the transaction
    pub processed_by: String,
}

/// The ledger entry kinds.
///
/// Five of these count toward the group's pooled contributions; `medical` and
/// `last_expense` additionally feed the matching disbursement fund.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TransactionKind {
    /// Ordinary savings deposit
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Withdrawal of savings; the only kind that is not a payment
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
    /// Petty cash contribution
    #[sea_orm(string_value = "petty_cash")]
    PettyCash,
    /// Contribution to the medical aid fund
    #[sea_orm(string_value = "medical")]
    Medical,
    /// Contribution to the last-expense aid fund
    #[sea_orm(string_value = "last_expense")]
    LastExpense,
    /// One-time fee recorded at member registration
    #[sea_orm(string_value = "registration_fee")]
    RegistrationFee,
    /// Annual membership renewal payment
    #[sea_orm(string_value = "membership_renewal")]
    MembershipRenewal,
}

impl TransactionKind {
    /// The kinds that count toward the group's total contributions.
    pub const CONTRIBUTIONS: [Self; 5] = [
        Self::Deposit,
        Self::PettyCash,
        Self::Medical,
        Self::LastExpense,
        Self::RegistrationFee,
    ];

    /// Whether this kind is part of the "all contributions" category.
    #[must_use]
    pub fn is_contribution(self) -> bool {
        Self::CONTRIBUTIONS.contains(&self)
    }

    /// Whether recording this kind counts as a payment by the member for
    /// lifecycle purposes. Everything except withdrawals does.
    #[must_use]
    pub fn counts_as_payment(self) -> bool {
        !matches!(self, Self::Withdrawal)
    }
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one member
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
