//! Database configuration module for `ChamaLedger`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It uses `SeaORM`'s `Schema::create_table_from_entity` method to generate SQL
//! statements from the entity models, so the schema always matches the Rust
//! struct definitions. Durable storage is not a goal of this system; the
//! default connection is an in-memory `SQLite` database, and a file URL can be
//! supplied through `DATABASE_URL` when a session's books should outlive the
//! process.

use crate::entities::{Disbursement, Executive, GroupExpense, Loan, Member, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// falls back to an in-memory `SQLite` database.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

/// Establishes a database connection and ensures all tables exist.
pub async fn connect_and_init() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    let db = Database::connect(&database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let member_table = schema.create_table_from_entity(Member);
    let transaction_table = schema.create_table_from_entity(Transaction);
    let loan_table = schema.create_table_from_entity(Loan);
    let group_expense_table = schema.create_table_from_entity(GroupExpense);
    let disbursement_table = schema.create_table_from_entity(Disbursement);
    let executive_table = schema.create_table_from_entity(Executive);

    db.execute(builder.build(&member_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&loan_table)).await?;
    db.execute(builder.build(&group_expense_table)).await?;
    db.execute(builder.build(&disbursement_table)).await?;
    db.execute(builder.build(&executive_table)).await?;

    Ok(())
}
