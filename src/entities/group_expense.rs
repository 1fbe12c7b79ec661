//! Group expense entity - Operating expenses paid from the group's funds.
//!
//! Immutable once recorded, like ledger transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_expenses")]
pub struct Model {
    /// Opaque unique identifier assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Expense category
    pub category: ExpenseCategory,
    /// Amount spent
    pub amount: f64,
    /// Free-text description
    pub description: String,
    /// When the expense was recorded
    pub date: DateTimeUtc,
    /// Username of the actor who recorded the expense
    pub processed_by: String,
}

/// Categories for group operating expenses.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ExpenseCategory {
    /// Travel for group business
    #[sea_orm(string_value = "transport")]
    Transport,
    /// Airtime, postage of notices and similar
    #[sea_orm(string_value = "communication")]
    Communication,
    /// Revenue stamps
    #[sea_orm(string_value = "stamps")]
    Stamps,
    /// Group registration certificate renewal
    #[sea_orm(string_value = "certificate_renewal")]
    CertificateRenewal,
    /// Meeting refreshments
    #[sea_orm(string_value = "beverage")]
    Beverage,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

/// Group expenses reference no other entity
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
