//! Executive roster business logic.
//!
//! Office holders are never deleted; retirement records an end date and
//! clears the active flag, which is true iff no end date exists.

use crate::{
    core::session::Session,
    entities::{
        Executive, executive,
        executive::ExecutivePosition,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;
use uuid::Uuid;

/// Adds an office holder to the roster. Admin only.
pub async fn add_executive(
    db: &DatabaseConnection,
    session: &Session,
    name: String,
    position: ExecutivePosition,
    start_date: DateTimeUtc,
    end_date: Option<DateTimeUtc>,
) -> Result<executive::Model> {
    session.require_admin("manage the executive roster")?;

    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Executive name cannot be empty".to_string(),
        });
    }

    let model = executive::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.trim().to_string()),
        position: Set(position),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_active: Set(end_date.is_none()),
    };
    let created = model.insert(db).await?;
    info!(executive = %created.name, ?position, "added executive");
    Ok(created)
}

/// Retires an office holder: stamps the end date and clears the active flag.
/// Retiring an already-retired executive is rejected.
pub async fn retire_executive(
    db: &DatabaseConnection,
    session: &Session,
    id: &str,
) -> Result<executive::Model> {
    session.require_admin("manage the executive roster")?;

    let found = Executive::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Executive",
            id: id.to_string(),
        })?;

    if !found.is_active {
        return Err(Error::Validation {
            message: format!("executive '{}' has already left office", found.name),
        });
    }

    let mut active_model: executive::ActiveModel = found.into();
    active_model.end_date = Set(Some(Utc::now()));
    active_model.is_active = Set(false);
    active_model.update(db).await.map_err(Into::into)
}

/// The currently serving executives, ordered by name.
pub async fn active_executives(db: &DatabaseConnection) -> Result<Vec<executive::Model>> {
    Executive::find()
        .filter(executive::Column::IsActive.eq(true))
        .order_by_asc(executive::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
