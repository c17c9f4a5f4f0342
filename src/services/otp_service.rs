use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::OtpCode;

/// Indonesian mobile numbers: +62/62/0 prefix, then an 8x carrier block.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+62|62|0)8[1-9][0-9]{6,9}$").unwrap());

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_code(code: &str) -> bool {
    CODE_RE.is_match(code)
}

/// sha256 hex of a code; the plaintext never reaches storage.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("Invalid phone number format")]
    InvalidPhone,
    #[error("Invalid OTP code format")]
    InvalidCode,
    #[error("No usable OTP found")]
    NotFound,
    #[error("OTP has expired")]
    Expired,
    #[error("Maximum verification attempts reached")]
    MaxAttempts,
    #[error("OTP code mismatch, {attempts_remaining} attempts remaining")]
    CodeMismatch { attempts_remaining: i32 },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

/// A freshly issued code. `code` is the plaintext; only development
/// surfaces may return it to the caller.
#[derive(Debug)]
pub struct IssuedOtp {
    pub id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// A successful verification, with the claim the OTP was linked to (if
/// any) for the caller to advance.
#[derive(Debug)]
pub struct VerifiedOtp {
    pub otp_id: Uuid,
    pub phone: String,
    pub claim_id: Option<Uuid>,
}

pub struct OtpService {
    pool: PgPool,
}

impl OtpService {
    pub async fn new() -> Result<Self, OtpError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Issue a new code for a phone, optionally linked to a claim whose
    /// verification it completes.
    pub async fn issue(&self, phone: &str, claim_id: Option<Uuid>) -> Result<IssuedOtp, OtpError> {
        if !is_valid_phone(phone) {
            return Err(OtpError::InvalidPhone);
        }

        let otp_config = &config::config().otp;
        let code = generate_code(otp_config.code_length);
        let expires_at = Utc::now() + Duration::minutes(otp_config.expiry_minutes);
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO otp_codes (id, phone, code_hash, claim_id, attempts, verified, expires_at)
            VALUES ($1, $2, $3, $4, 0, false, $5)
            "#,
        )
        .bind(id)
        .bind(phone)
        .bind(hash_code(&code))
        .bind(claim_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::info!("Issued OTP {} for {}", id, phone);
        Ok(IssuedOtp {
            id,
            code,
            expires_at,
        })
    }

    /// Verify a submitted code. Looks up by id when given, otherwise the
    /// most recent unverified row for the phone; enforces expiry and the
    /// maximum attempt count, incrementing the counter on each failed
    /// comparison.
    pub async fn verify(
        &self,
        phone: &str,
        otp_code: &str,
        otp_id: Option<Uuid>,
    ) -> Result<VerifiedOtp, OtpError> {
        if !is_valid_phone(phone) {
            return Err(OtpError::InvalidPhone);
        }
        if !is_valid_code(otp_code) {
            return Err(OtpError::InvalidCode);
        }

        let row = match otp_id {
            Some(id) => {
                sqlx::query_as::<_, OtpCode>(
                    "SELECT * FROM otp_codes WHERE id = $1 AND phone = $2 AND verified = false",
                )
                .bind(id)
                .bind(phone)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OtpCode>(
                    r#"
                    SELECT * FROM otp_codes
                    WHERE phone = $1 AND verified = false
                    ORDER BY created_at DESC
                    LIMIT 1
                    "#,
                )
                .bind(phone)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        let row = row.ok_or(OtpError::NotFound)?;

        let max_attempts = config::config().otp.max_attempts;
        match check_row(&row, otp_code, max_attempts, Utc::now()) {
            RowCheck::Expired => Err(OtpError::Expired),
            RowCheck::MaxAttempts => Err(OtpError::MaxAttempts),
            RowCheck::Mismatch => {
                let (attempts,): (i32,) = sqlx::query_as(
                    "UPDATE otp_codes SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts",
                )
                .bind(row.id)
                .fetch_one(&self.pool)
                .await?;

                if attempts >= max_attempts {
                    Err(OtpError::MaxAttempts)
                } else {
                    Err(OtpError::CodeMismatch {
                        attempts_remaining: max_attempts - attempts,
                    })
                }
            }
            RowCheck::Match => {
                sqlx::query("UPDATE otp_codes SET verified = true WHERE id = $1")
                    .bind(row.id)
                    .execute(&self.pool)
                    .await?;

                tracing::info!("OTP {} verified for {}", row.id, phone);
                Ok(VerifiedOtp {
                    otp_id: row.id,
                    phone: row.phone,
                    claim_id: row.claim_id,
                })
            }
        }
    }

    /// Look up an already-verified code for token issuance.
    pub async fn find_verified(&self, phone: &str, otp_id: Uuid) -> Result<OtpCode, OtpError> {
        sqlx::query_as::<_, OtpCode>(
            "SELECT * FROM otp_codes WHERE id = $1 AND phone = $2 AND verified = true",
        )
        .bind(otp_id)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OtpError::NotFound)
    }
}

/// Outcome of checking a row against a submitted code. Split out of the
/// database path so the precedence rules are unit-testable.
#[derive(Debug, PartialEq, Eq)]
enum RowCheck {
    Expired,
    MaxAttempts,
    Mismatch,
    Match,
}

fn check_row(row: &OtpCode, submitted: &str, max_attempts: i32, now: DateTime<Utc>) -> RowCheck {
    if row.expires_at < now {
        return RowCheck::Expired;
    }
    if row.attempts >= max_attempts {
        return RowCheck::MaxAttempts;
    }
    if row.code_hash != hash_code(submitted) {
        return RowCheck::Mismatch;
    }
    RowCheck::Match
}

fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length).map(|_| rng.gen_range(0..10).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(attempts: i32, expired: bool) -> OtpCode {
        let now = Utc::now();
        OtpCode {
            id: Uuid::new_v4(),
            phone: "081234567890".to_string(),
            code_hash: hash_code("123456"),
            claim_id: None,
            attempts,
            verified: false,
            expires_at: if expired { now - Duration::minutes(1) } else { now + Duration::minutes(5) },
            created_at: now,
        }
    }

    #[test]
    fn accepts_indonesian_mobile_numbers() {
        for phone in ["081234567890", "6281234567890", "+6281234567890", "0895123456"] {
            assert!(is_valid_phone(phone), "{phone} should be valid");
        }
        for phone in ["0712345678", "08123", "62712345678", "8123456789", "081234abc"] {
            assert!(!is_valid_phone(phone), "{phone} should be invalid");
        }
    }

    #[test]
    fn code_must_be_six_digits() {
        assert!(is_valid_code("123456"));
        assert!(!is_valid_code("12345"));
        assert!(!is_valid_code("1234567"));
        assert!(!is_valid_code("12345a"));
    }

    #[test]
    fn expiry_takes_precedence_over_attempts() {
        let r = row(5, true);
        assert_eq!(check_row(&r, "123456", 5, Utc::now()), RowCheck::Expired);
    }

    #[test]
    fn attempt_limit_blocks_even_correct_codes() {
        let r = row(5, false);
        assert_eq!(check_row(&r, "123456", 5, Utc::now()), RowCheck::MaxAttempts);
    }

    #[test]
    fn wrong_code_is_a_mismatch() {
        let r = row(0, false);
        assert_eq!(check_row(&r, "654321", 5, Utc::now()), RowCheck::Mismatch);
        assert_eq!(check_row(&r, "123456", 5, Utc::now()), RowCheck::Match);
    }

    #[test]
    fn generated_codes_have_requested_length() {
        for _ in 0..20 {
            let code = generate_code(6);
            assert!(is_valid_code(&code), "{code} should be a valid code");
        }
    }

    #[test]
    fn hashing_is_stable_and_hex() {
        let h = hash_code("123456");
        assert_eq!(h, hash_code("123456"));
        assert_eq!(h.len(), 64);
        assert_ne!(h, hash_code("123457"));
    }
}
