use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

use crate::db::entities::employee;
use crate::db::services as db_services;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginRequest, LoginResponse, SignupRequest};

pub async fn register_employee(
    db: &DatabaseConnection,
    req: SignupRequest,
) -> Result<employee::Model, AppError> {
    validate_signup(&req)?;
    create_employee(db, &req.name, &req.employee_code, &req.password, false, req.dob).await
}

/// Hashes the password and inserts the employee. Duplicate employee codes
/// surface as [`AppError::UserAlreadyExists`], whether caught by the
/// pre-check or by the unique constraint on a concurrent insert.
pub async fn create_employee(
    db: &DatabaseConnection,
    name: &str,
    employee_code: &str,
    password: &str,
    is_admin: bool,
    dob: NaiveDate,
) -> Result<employee::Model, AppError> {
    let duplicate_message = || format!("Employee ID {employee_code} is already registered");

    let existing = db_services::find_by_code(db, employee_code).await?;
    if existing.is_some() {
        return Err(AppError::UserAlreadyExists(duplicate_message()));
    }

    let password_hash =
        hash(password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    let employee =
        db_services::insert_employee(db, name, employee_code, &password_hash, is_admin, dob)
            .await
            .map_err(|db_err| match &db_err {
                DbErr::Query(sea_orm::RuntimeErr::SqlxError(sqlx_error_value)) => {
                    if let sqlx::Error::Database(database_error) = sqlx_error_value {
                        if database_error.is_unique_violation() {
                            return AppError::UserAlreadyExists(duplicate_message());
                        }
                    }
                    AppError::DatabaseError(sqlx_error_value.to_string())
                }
                _ => AppError::DatabaseError(db_err.to_string()),
            })?;

    info!(employee = %employee.employee_code, "employee registered");
    Ok(employee)
}

pub async fn login(
    db: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    if req.employee_code.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let employee = db_services::find_by_code(db, &req.employee_code)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid_password = verify(&req.password, &employee.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_employee(&employee, jwt_secret)
}

pub fn create_jwt_for_employee(
    employee: &employee::Model,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let now = Utc::now();
    // Token valid for 24 hours
    let expiration = (now + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: employee.employee_code.clone(),
        user_id: employee.id,
        is_admin: employee.is_admin,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        token,
        name: employee.name.clone(),
        is_admin: employee.is_admin,
    })
}

/// Password-recovery verification: the employee code and date of birth must
/// both match a stored employee.
pub async fn verify_recovery_identity(
    db: &DatabaseConnection,
    employee_code: &str,
    dob: NaiveDate,
) -> Result<employee::Model, AppError> {
    db_services::find_by_code_and_dob(db, employee_code, dob)
        .await?
        .ok_or_else(|| {
            AppError::InvalidInput("Invalid employee ID or date of birth".to_string())
        })
}

pub async fn update_password(
    db: &DatabaseConnection,
    employee_code: &str,
    new_password: &str,
) -> Result<(), AppError> {
    if new_password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters long.".to_string(),
        ));
    }

    let password_hash =
        hash(new_password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    db_services::update_password_hash(db, employee_code, &password_hash)
        .await?
        .ok_or(AppError::UserNotFound)?;

    info!(employee = %employee_code, "password updated");
    Ok(())
}

fn validate_signup(req: &SignupRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() || req.employee_code.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Name and employee ID are required fields.".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters long.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    fn sample_employee(is_admin: bool) -> employee::Model {
        let now = Utc::now();
        employee::Model {
            id: 42,
            name: "Asha".to_string(),
            employee_code: "EMP-042".to_string(),
            password_hash: "unused".to_string(),
            is_admin,
            dob: NaiveDate::from_ymd_opt(1993, 4, 12).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn jwt_round_trip_preserves_identity_and_admin_flag() {
        let secret = "test-secret";
        let response = create_jwt_for_employee(&sample_employee(true), secret).unwrap();

        let decoded = decode::<Claims>(
            &response.token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "EMP-042");
        assert_eq!(decoded.claims.user_id, 42);
        assert!(decoded.claims.is_admin);
        assert!(response.is_admin);
        assert_eq!(response.name, "Asha");
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let response = create_jwt_for_employee(&sample_employee(false), "secret-a").unwrap();

        let result = decode::<Claims>(
            &response.token,
            &DecodingKey::from_secret("secret-b".as_ref()),
            &Validation::default(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn signup_validation_rejects_blank_identity_and_short_passwords() {
        let valid = SignupRequest {
            name: "Asha".to_string(),
            employee_code: "EMP-042".to_string(),
            password: "longenough".to_string(),
            dob: NaiveDate::from_ymd_opt(1993, 4, 12).unwrap(),
        };
        assert!(validate_signup(&valid).is_ok());

        let blank_name = SignupRequest {
            name: "  ".to_string(),
            ..valid.clone()
        };
        assert!(validate_signup(&blank_name).is_err());

        let short_password = SignupRequest {
            password: "short".to_string(),
            ..valid
        };
        assert!(validate_signup(&short_password).is_err());
    }
}
