use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::{activity_record, employee};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    pub password: String,
    pub dob: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub name: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    pub dob: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Record creation body. Absent counters default to 0, matching the
/// original schema defaults.
#[derive(Debug, Deserialize)]
pub struct AddRecordRequest {
    pub date: DateTime<Utc>,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "companyIVR", default)]
    pub company_ivr: i32,
    #[serde(rename = "directDial", default)]
    pub direct_dial: i32,
    #[serde(rename = "rpcVM", default)]
    pub rpc_vm: i32,
    #[serde(rename = "notVerified", default)]
    pub not_verified: i32,
}

/// Record update body. Absent fields keep their stored value; a supplied 0
/// is a real reset.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecordRequest {
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "companyIVR")]
    pub company_ivr: Option<i32>,
    #[serde(rename = "directDial")]
    pub direct_dial: Option<i32>,
    #[serde(rename = "rpcVM")]
    pub rpc_vm: Option<i32>,
    #[serde(rename = "notVerified")]
    pub not_verified: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "companyIVR")]
    pub company_ivr: i32,
    #[serde(rename = "directDial")]
    pub direct_dial: i32,
    #[serde(rename = "rpcVM")]
    pub rpc_vm: i32,
    #[serde(rename = "notVerified")]
    pub not_verified: i32,
}

impl From<activity_record::Model> for RecordResponse {
    fn from(model: activity_record::Model) -> Self {
        RecordResponse {
            id: model.id,
            date: model.date,
            file_name: model.file_name,
            company_ivr: model.company_ivr,
            direct_dial: model.direct_dial,
            rpc_vm: model.rpc_vm,
            not_verified: model.not_verified,
        }
    }
}

/// Directory listing visible to any authenticated employee.
#[derive(Debug, Serialize)]
pub struct EmployeeSummary {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    pub dob: NaiveDate,
}

impl From<employee::Model> for EmployeeSummary {
    fn from(model: employee::Model) -> Self {
        EmployeeSummary {
            name: model.name,
            employee_code: model.employee_code,
            dob: model.dob,
        }
    }
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Employee code of the session holder.
    pub sub: String,
    pub user_id: i32,
    pub is_admin: bool,
    pub exp: usize,
}

/// Struct to hold authenticated employee details, passed as a request
/// extension by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub employee_code: String,
}
