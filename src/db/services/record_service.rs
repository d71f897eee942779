use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, DeleteResult, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::db::entities::activity_record;

// --- Activity Record Service Functions ---

/// Input for appending a record to an employee's history. Counters arrive
/// already validated (non-negative, absent ones defaulted to 0).
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub date: DateTime<Utc>,
    pub file_name: String,
    pub company_ivr: i32,
    pub direct_dial: i32,
    pub rpc_vm: i32,
    pub not_verified: i32,
}

/// Field-wise changes for a record update. `None` leaves the stored value
/// untouched; `Some(0)` is a real reset, not "no value supplied".
#[derive(Debug, Default, Clone)]
pub struct RecordChanges {
    pub date: Option<DateTime<Utc>>,
    pub file_name: Option<String>,
    pub company_ivr: Option<i32>,
    pub direct_dial: Option<i32>,
    pub rpc_vm: Option<i32>,
    pub not_verified: Option<i32>,
}

/// Retrieves all records for one employee in store order.
pub async fn records_for_employee(
    db: &DatabaseConnection,
    employee_id: i32,
) -> Result<Vec<activity_record::Model>, DbErr> {
    activity_record::Entity::find()
        .filter(activity_record::Column::EmployeeId.eq(employee_id))
        .all(db)
        .await
}

/// Appends a record to an employee's history. The record id is assigned here
/// and stays stable for the record's lifetime.
pub async fn insert_record(
    db: &DatabaseConnection,
    employee_id: i32,
    record: NewRecord,
) -> Result<activity_record::Model, DbErr> {
    let now = Utc::now();
    let new_record = activity_record::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee_id),
        date: Set(record.date),
        file_name: Set(record.file_name),
        company_ivr: Set(record.company_ivr),
        direct_dial: Set(record.direct_dial),
        rpc_vm: Set(record.rpc_vm),
        not_verified: Set(record.not_verified),
        created_at: Set(now),
        updated_at: Set(now),
    };
    new_record.insert(db).await
}

/// Builds the update for a partial record change. Only supplied fields are
/// marked dirty; everything else stays `Unchanged`.
fn merge_changes(
    record: &activity_record::Model,
    changes: RecordChanges,
) -> activity_record::ActiveModel {
    let mut active: activity_record::ActiveModel = record.clone().into();
    if let Some(date) = changes.date {
        active.date = Set(date);
    }
    if let Some(file_name) = changes.file_name {
        active.file_name = Set(file_name);
    }
    if let Some(company_ivr) = changes.company_ivr {
        active.company_ivr = Set(company_ivr);
    }
    if let Some(direct_dial) = changes.direct_dial {
        active.direct_dial = Set(direct_dial);
    }
    if let Some(rpc_vm) = changes.rpc_vm {
        active.rpc_vm = Set(rpc_vm);
    }
    if let Some(not_verified) = changes.not_verified {
        active.not_verified = Set(not_verified);
    }
    active
}

/// Applies a partial update to one of the employee's own records. Returns
/// `None` when the id is unknown or belongs to another employee.
pub async fn update_record(
    db: &DatabaseConnection,
    employee_id: i32,
    record_id: Uuid,
    changes: RecordChanges,
) -> Result<Option<activity_record::Model>, DbErr> {
    let Some(existing) = activity_record::Entity::find_by_id(record_id)
        .filter(activity_record::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let mut active = merge_changes(&existing, changes);
    active.updated_at = Set(Utc::now());

    active.update(db).await.map(Some)
}

/// Deletes one of the employee's own records by id.
pub async fn delete_record(
    db: &DatabaseConnection,
    employee_id: i32,
    record_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    activity_record::Entity::delete_many()
        .filter(activity_record::Column::Id.eq(record_id))
        .filter(activity_record::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::ActiveValue;

    fn sample_record() -> activity_record::Model {
        let created = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        activity_record::Model {
            id: Uuid::new_v4(),
            employee_id: 7,
            date: created,
            file_name: "leads_batch_3.xlsx".to_string(),
            company_ivr: 4,
            direct_dial: 9,
            rpc_vm: 2,
            not_verified: 1,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn absent_fields_stay_unchanged() {
        let record = sample_record();
        let active = merge_changes(&record, RecordChanges::default());

        assert!(matches!(active.date, ActiveValue::Unchanged(_)));
        assert!(matches!(active.file_name, ActiveValue::Unchanged(_)));
        assert!(matches!(active.company_ivr, ActiveValue::Unchanged(4)));
        assert!(matches!(active.direct_dial, ActiveValue::Unchanged(9)));
        assert!(matches!(active.rpc_vm, ActiveValue::Unchanged(2)));
        assert!(matches!(active.not_verified, ActiveValue::Unchanged(1)));
    }

    #[test]
    fn supplied_fields_replace_stored_values() {
        let record = sample_record();
        let new_date = Utc.with_ymd_and_hms(2024, 5, 7, 9, 30, 0).unwrap();
        let changes = RecordChanges {
            date: Some(new_date),
            file_name: Some("leads_batch_4.xlsx".to_string()),
            direct_dial: Some(12),
            ..Default::default()
        };

        let active = merge_changes(&record, changes);

        assert!(matches!(active.date, ActiveValue::Set(d) if d == new_date));
        assert!(matches!(active.file_name, ActiveValue::Set(ref f) if f == "leads_batch_4.xlsx"));
        assert!(matches!(active.direct_dial, ActiveValue::Set(12)));
        assert!(matches!(active.company_ivr, ActiveValue::Unchanged(4)));
    }

    #[test]
    fn zero_counter_is_a_real_update() {
        let record = sample_record();
        let changes = RecordChanges {
            company_ivr: Some(0),
            ..Default::default()
        };

        let active = merge_changes(&record, changes);

        assert!(matches!(active.company_ivr, ActiveValue::Set(0)));
    }
}
