//! Group expense business logic.
//!
//! Operating expenses (transport, stamps, meeting refreshments and the like)
//! are recorded immutably and only ever aggregated for reports.

use crate::{
    core::session::Session,
    entities::{
        GroupExpense, group_expense,
        group_expense::ExpenseCategory,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;
use uuid::Uuid;

/// Records a group operating expense.
pub async fn record_group_expense(
    db: &DatabaseConnection,
    session: &Session,
    category: ExpenseCategory,
    amount: f64,
    description: String,
) -> Result<group_expense::Model> {
    session.require_officer("record group expenses")?;

    if !(amount.is_finite() && amount > 0.0) {
        return Err(Error::InvalidAmount { amount });
    }

    let model = group_expense::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        category: Set(category),
        amount: Set(amount),
        description: Set(description),
        date: Set(Utc::now()),
        processed_by: Set(session.username.clone()),
    };
    let created = model.insert(db).await?;
    debug!(?category, amount, "recorded group expense");
    Ok(created)
}

/// All expenses recorded within `[start, end]`, oldest first.
pub async fn expenses_between(
    db: &DatabaseConnection,
    start: DateTimeUtc,
    end: DateTimeUtc,
) -> Result<Vec<group_expense::Model>> {
    GroupExpense::find()
        .filter(group_expense::Column::Date.gte(start))
        .filter(group_expense::Column::Date.lte(end))
        .order_by_asc(group_expense::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sums the amounts of the given expenses.
#[must_use]
pub fn total_expenses(expenses: &[group_expense::Model]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sums expenses of one category.
#[must_use]
pub fn total_for_category(expenses: &[group_expense::Model], category: ExpenseCategory) -> f64 {
    expenses
        .iter()
        .filter(|e| e.category == category)
        .map(|e| e.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_record_group_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let session = treasurer_session();

        let expense = record_group_expense(
            &db,
            &session,
            ExpenseCategory::Transport,
            350.0,
            "Fare to county registrar".to_string(),
        )
        .await?;

        assert_eq!(expense.category, ExpenseCategory::Transport);
        assert_eq!(expense.amount, 350.0);
        assert_eq!(expense.processed_by, "jane");

        Ok(())
    }

    #[tokio::test]
    async fn test_record_group_expense_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = record_group_expense(
            &db,
            &treasurer_session(),
            ExpenseCategory::Stamps,
            0.0,
            "nothing".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = record_group_expense(
            &db,
            &member_session("m1"),
            ExpenseCategory::Stamps,
            100.0,
            "stamps".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Unauthorized { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_expense_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let session = treasurer_session();

        record_group_expense(&db, &session, ExpenseCategory::Transport, 350.0, String::new())
            .await?;
        record_group_expense(&db, &session, ExpenseCategory::Beverage, 200.0, String::new())
            .await?;
        record_group_expense(&db, &session, ExpenseCategory::Transport, 150.0, String::new())
            .await?;

        let now = Utc::now();
        let expenses = expenses_between(&db, now - Duration::days(1), now).await?;
        assert_eq!(expenses.len(), 3);
        assert_eq!(total_expenses(&expenses), 700.0);
        assert_eq!(
            total_for_category(&expenses, ExpenseCategory::Transport),
            500.0
        );
        assert_eq!(
            total_for_category(&expenses, ExpenseCategory::Stamps),
            0.0
        );

        Ok(())
    }
}
