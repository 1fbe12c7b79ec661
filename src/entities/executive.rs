//! Executive entity - A member serving in a group office.
//!
//! Executives are never deleted; leaving office is recorded by setting the
//! end date, which clears the active flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Executive database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "executives")]
pub struct Model {
    /// Opaque unique identifier assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Full name of the office holder
    pub name: String,
    /// Which office is held
    pub position: ExecutivePosition,
    /// When the term started
    pub start_date: DateTimeUtc,
    /// When the term ended, if it has
    pub end_date: Option<DateTimeUtc>,
    /// True iff no end date has been recorded
    pub is_active: bool,
}

/// Offices of the group.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ExecutivePosition {
    /// Chairs meetings and represents the group
    #[sea_orm(string_value = "chairman")]
    Chairman,
    /// Keeps minutes and correspondence
    #[sea_orm(string_value = "secretary")]
    Secretary,
    /// Keeps the books
    #[sea_orm(string_value = "treasurer")]
    Treasurer,
    /// Committee member without a named office
    #[sea_orm(string_value = "member")]
    Member,
}

/// Executives reference no other entity
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
