//! Shared test utilities for `ChamaLedger`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::settings::Settings,
    core::{
        loan,
        member::register_member,
        session::{Role, Session},
        transaction::record_transaction,
    },
    entities::{loan::LoanKind, member, member::MemberStatus, transaction,
        transaction::TransactionKind},
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait, Set, prelude::DateTimeUtc};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Default group policy used throughout the tests.
#[must_use]
pub fn test_settings() -> Settings {
    Settings::default()
}

/// An admin session named `root`.
#[must_use]
pub fn admin_session() -> Session {
    Session::new("root", Role::Admin, None)
}

/// A treasurer session named `jane`.
#[must_use]
pub fn treasurer_session() -> Session {
    Session::new("jane", Role::Treasurer, None)
}

/// A member-role session bound to the given member record.
#[must_use]
pub fn member_session(member_id: &str) -> Session {
    Session::new("wanjiku", Role::Member, Some(member_id.to_string()))
}

/// Registers a member with sensible defaults (default settings, so the
/// registration fee transaction of 1000 is recorded alongside).
pub async fn register_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<member::Model> {
    register_member(
        db,
        &treasurer_session(),
        &test_settings(),
        name.to_string(),
        "0712345678".to_string(),
        None,
        "12345678".to_string(),
        "Ikutha, Kitui".to_string(),
    )
    .await
}

/// Records a transaction as the test treasurer with an empty description.
pub async fn record_test_transaction(
    db: &DatabaseConnection,
    member_id: &str,
    kind: TransactionKind,
    amount: f64,
) -> Result<transaction::Model> {
    record_transaction(db, &treasurer_session(), member_id, kind, amount, None).await
}

/// Registers a fresh member and files a loan application for them.
pub async fn apply_test_loan(
    db: &DatabaseConnection,
    kind: LoanKind,
    principal: f64,
) -> Result<crate::entities::loan::Model> {
    let borrower = register_test_member(db, "Borrower").await?;
    loan::apply_for_loan(
        db,
        &treasurer_session(),
        &test_settings(),
        &borrower.id,
        kind,
        principal,
        None,
    )
    .await
}

/// Overwrites a member's last payment date directly, for lifecycle tests.
pub async fn set_last_payment(
    db: &DatabaseConnection,
    member_id: &str,
    last_payment: Option<DateTimeUtc>,
) -> Result<()> {
    let active_model = member::ActiveModel {
        id: Set(member_id.to_string()),
        last_payment_date: Set(last_payment),
        ..Default::default()
    };
    member::Entity::update(active_model).exec(db).await?;
    Ok(())
}

/// Overwrites a member's stored status directly, for lifecycle tests.
pub async fn set_member_status(
    db: &DatabaseConnection,
    member_id: &str,
    status: MemberStatus,
) -> Result<()> {
    let active_model = member::ActiveModel {
        id: Set(member_id.to_string()),
        status: Set(status),
        ..Default::default()
    };
    member::Entity::update(active_model).exec(db).await?;
    Ok(())
}
