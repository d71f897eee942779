use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, DeleteResult, EntityTrait,
    QueryFilter, Set,
};

use crate::db::entities::{activity_record, employee};

// --- Employee Service Functions ---

/// Retrieves an employee by internal id.
pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<employee::Model>, DbErr> {
    employee::Entity::find_by_id(id).one(db).await
}

/// Retrieves an employee by their external employee code.
pub async fn find_by_code(
    db: &DatabaseConnection,
    employee_code: &str,
) -> Result<Option<employee::Model>, DbErr> {
    employee::Entity::find()
        .filter(employee::Column::EmployeeCode.eq(employee_code))
        .one(db)
        .await
}

/// Retrieves an employee only if both the employee code and the date of
/// birth match. Used by the password-recovery verification step.
pub async fn find_by_code_and_dob(
    db: &DatabaseConnection,
    employee_code: &str,
    dob: NaiveDate,
) -> Result<Option<employee::Model>, DbErr> {
    employee::Entity::find()
        .filter(employee::Column::EmployeeCode.eq(employee_code))
        .filter(employee::Column::Dob.eq(dob))
        .one(db)
        .await
}

/// Retrieves all employees in store order.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<employee::Model>, DbErr> {
    employee::Entity::find().all(db).await
}

/// Retrieves every employee together with their activity records, in store
/// order. No sort is applied; the rollup output follows this enumeration.
pub async fn all_with_records(
    db: &DatabaseConnection,
) -> Result<Vec<(employee::Model, Vec<activity_record::Model>)>, DbErr> {
    employee::Entity::find()
        .find_with_related(activity_record::Entity)
        .all(db)
        .await
}

/// Creates a new employee. The caller supplies an already-hashed password.
pub async fn insert_employee(
    db: &DatabaseConnection,
    name: &str,
    employee_code: &str,
    password_hash: &str,
    is_admin: bool,
    dob: NaiveDate,
) -> Result<employee::Model, DbErr> {
    let now = Utc::now();
    let new_employee = employee::ActiveModel {
        name: Set(name.to_string()),
        employee_code: Set(employee_code.to_string()),
        password_hash: Set(password_hash.to_string()),
        is_admin: Set(is_admin),
        dob: Set(dob),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    new_employee.insert(db).await
}

/// Field-wise changes for an employee update. `None` leaves the stored value
/// untouched.
#[derive(Debug, Default, Clone)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub employee_code: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

/// Applies a partial update to an employee. Returns `None` when the id is
/// unknown.
pub async fn update_employee(
    db: &DatabaseConnection,
    id: i32,
    changes: EmployeeChanges,
) -> Result<Option<employee::Model>, DbErr> {
    let Some(existing) = employee::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: employee::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(employee_code) = changes.employee_code {
        active.employee_code = Set(employee_code);
    }
    if let Some(password_hash) = changes.password_hash {
        active.password_hash = Set(password_hash);
    }
    if let Some(is_admin) = changes.is_admin {
        active.is_admin = Set(is_admin);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map(Some)
}

/// Replaces an employee's stored password hash. Returns `None` when the
/// employee code is unknown.
pub async fn update_password_hash(
    db: &DatabaseConnection,
    employee_code: &str,
    password_hash: &str,
) -> Result<Option<employee::Model>, DbErr> {
    let Some(existing) = find_by_code(db, employee_code).await? else {
        return Ok(None);
    };

    let mut active: employee::ActiveModel = existing.into();
    active.password_hash = Set(password_hash.to_string());
    active.updated_at = Set(Utc::now());

    active.update(db).await.map(Some)
}

/// Deletes an employee by id. Activity records go with it (cascade).
pub async fn delete_employee(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    employee::Entity::delete_by_id(id).exec(db).await
}
