//! Secret drop: short random codes mapped to a name/message pair.

pub mod routes;

use chrono::Utc;
use rand::Rng;

use crate::database::models::SecretRecord;
use crate::database::Database;
use crate::error::AppError;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const CODE_LENGTH: usize = 8;

/// Attempts before giving up on finding an unused code. At 36^8 combinations
/// the first attempt collides essentially never.
const MAX_CODE_ATTEMPTS: usize = 16;

pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Stores a name/message pair under a fresh random code and returns the
/// stored record. Uniqueness is enforced by the UNIQUE column on the secrets
/// table; a collision shows up as a constraint violation and we retry with a
/// new code, so concurrent creates cannot slip in a duplicate.
pub async fn create_secret(
    database: &Database,
    name: &str,
    message: &str,
) -> Result<SecretRecord, AppError> {
    if name.is_empty() || message.is_empty() {
        return Err(AppError::ValidationError(
            "name and message are required".to_string(),
        ));
    }

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_code(CODE_LENGTH);
        let created_at = Utc::now();

        match database.insert_secret(&code, name, message, created_at).await {
            Ok(()) => {
                return Ok(SecretRecord {
                    secret: code,
                    name: name.to_string(),
                    message: message.to_string(),
                    created_at,
                })
            }
            Err(e) if is_unique_violation(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS))
}

pub async fn get_secret(database: &Database, code: &str) -> Result<SecretRecord, AppError> {
    database
        .find_secret(code)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid or expired secret code".to_string()))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
