//! Member entity - Represents a registered member of the group.
//!
//! Members are created once at registration and never deleted; their lifecycle
//! is carried entirely by the `status` field, which is derived from the time
//! elapsed since `last_payment_date`. Contribution totals are not stored here;
//! they are always recomputed from the transaction ledger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Opaque unique identifier assigned at registration
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Full name of the member
    pub name: String,
    /// Phone number used to reach the member
    pub phone: String,
    /// Optional email address
    pub email: Option<String>,
    /// National identification number
    pub national_id: String,
    /// Physical/postal address
    pub address: String,
    /// When the member was registered
    pub registration_date: DateTimeUtc,
    /// The fixed registration fee paid at registration
    pub registration_fee: f64,
    /// Derived lifecycle status, refreshed from `last_payment_date`
    pub status: MemberStatus,
    /// Date of the member's most recent payment, if any
    pub last_payment_date: Option<DateTimeUtc>,
}

/// Lifecycle status of a member, derived from elapsed time since the last
/// payment rather than set by any user action.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum MemberStatus {
    /// Paid within the dormant threshold
    #[sea_orm(string_value = "active")]
    Active,
    /// No payment for the dormant threshold (default 3 months) or longer
    #[sea_orm(string_value = "dormant")]
    Dormant,
    /// No payment recorded, or none for the inactive threshold (default 6 months)
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One member has many ledger transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One member has many loans
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
    /// One member has many disbursement requests
    #[sea_orm(has_many = "super::disbursement::Entity")]
    Disbursements,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::disbursement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disbursements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
