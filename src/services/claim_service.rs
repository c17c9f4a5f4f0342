use once_cell::sync::Lazy;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Claim;
use crate::format::Nip;
use crate::gate::{ClaimCheck, ClaimSnapshot};
use crate::types::{ClaimStatus, JenisPengajuan};

/// Claim snapshots by user id, shared across requests for the lifetime
/// of the process. The gate consults this on every route evaluation, so
/// a session's claim is fetched once and then served from memory until
/// a mutation or a sign-in invalidates it.
static SNAPSHOT_CACHE: Lazy<Arc<RwLock<HashMap<Uuid, Option<ClaimSnapshot>>>>> =
    Lazy::new(|| Arc::new(RwLock::new(HashMap::new())));

#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    NotFound(Uuid),
    #[error("A live claim already exists for this user")]
    AlreadyExists,
    #[error("Invalid NIP: {0}")]
    InvalidNip(String),
    #[error("Claim cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: ClaimStatus, to: ClaimStatus },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

/// A user's institution claim/registration submission.
#[derive(Debug, Clone)]
pub struct SubmitClaim {
    pub jenis_pengajuan: JenisPengajuan,
    pub pesantren_nama: String,
    /// Required for klaim (the legacy record being claimed)
    pub nip: Option<String>,
    /// Required for pesantren_baru; derived from the NIP for klaim
    pub region_code: Option<String>,
}

pub struct ClaimService {
    pool: PgPool,
    cache: Arc<RwLock<HashMap<Uuid, Option<ClaimSnapshot>>>>,
}

impl ClaimService {
    pub async fn new() -> Result<Self, ClaimError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            pool,
            cache: SNAPSHOT_CACHE.clone(),
        })
    }

    /// Resolve the gate's claim check for a user. Lookup failures are
    /// logged and reported as `Unavailable` so the gate can fall through
    /// to account-status rules; they are never cached.
    pub async fn claim_check(&self, user_id: Uuid) -> ClaimCheck {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&user_id) {
                return match entry {
                    Some(snapshot) => ClaimCheck::Found(*snapshot),
                    None => ClaimCheck::Absent,
                };
            }
        }

        match self.fetch_snapshot(user_id).await {
            Ok(snapshot) => {
                {
                    let mut cache = self.cache.write().await;
                    cache.insert(user_id, snapshot);
                }
                match snapshot {
                    Some(snapshot) => ClaimCheck::Found(snapshot),
                    None => ClaimCheck::Absent,
                }
            }
            Err(e) => {
                tracing::error!("Claim lookup failed for user {}: {}", user_id, e);
                ClaimCheck::Unavailable
            }
        }
    }

    /// Drop the cached snapshot for a user. Called on sign-in and after
    /// every claim mutation.
    pub async fn invalidate(&self, user_id: Uuid) {
        let mut cache = self.cache.write().await;
        cache.remove(&user_id);
    }

    async fn fetch_snapshot(&self, user_id: Uuid) -> Result<Option<ClaimSnapshot>, sqlx::Error> {
        let row: Option<(ClaimStatus, JenisPengajuan)> = sqlx::query_as(
            r#"
            SELECT status, jenis_pengajuan
            FROM claims
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(status, jenis_pengajuan)| ClaimSnapshot {
            status,
            jenis_pengajuan,
        }))
    }

    /// Full claim row for the caller's own view.
    pub async fn claim_for_user(&self, user_id: Uuid) -> Result<Option<Claim>, ClaimError> {
        let claim = sqlx::query_as::<_, Claim>(
            "SELECT * FROM claims WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(claim)
    }

    pub async fn get(&self, claim_id: Uuid) -> Result<Claim, ClaimError> {
        sqlx::query_as::<_, Claim>("SELECT * FROM claims WHERE id = $1")
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ClaimError::NotFound(claim_id))
    }

    /// Submit a new claim for a user. At most one live (non-rejected)
    /// claim per user; klaim submissions must carry a NIP that parses
    /// strictly, and the claim's region is taken from it.
    pub async fn submit(&self, user_id: Uuid, submission: SubmitClaim) -> Result<Claim, ClaimError> {
        let existing: Option<(ClaimStatus,)> = sqlx::query_as(
            "SELECT status FROM claims WHERE user_id = $1 AND status != 'rejected' LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(ClaimError::AlreadyExists);
        }

        let (nip, region_code) = match submission.jenis_pengajuan {
            JenisPengajuan::Klaim => {
                let raw = submission.nip.as_deref().unwrap_or_default();
                let nip = Nip::parse(raw).ok_or_else(|| ClaimError::InvalidNip(raw.to_string()))?;
                let region = nip.region_code().to_string();
                (Some(nip.clean()), region)
            }
            JenisPengajuan::PesantrenBaru => {
                let region = submission
                    .region_code
                    .clone()
                    .unwrap_or_else(|| "00".to_string());
                (None, region)
            }
        };

        let claim = sqlx::query_as::<_, Claim>(
            r#"
            INSERT INTO claims (id, user_id, jenis_pengajuan, status, pesantren_nama, nip, region_code)
            VALUES ($1, $2, $3, 'draft', $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(submission.jenis_pengajuan)
        .bind(&submission.pesantren_nama)
        .bind(&nip)
        .bind(&region_code)
        .fetch_one(&self.pool)
        .await?;

        self.invalidate(user_id).await;
        tracing::info!(
            "Claim {} submitted by user {} ({:?})",
            claim.id,
            user_id,
            claim.jenis_pengajuan
        );
        Ok(claim)
    }

    /// Advance a draft claim to pending once its submitter's phone has
    /// been verified. Returns `None` when the claim is already past
    /// draft; verification stays idempotent in that case.
    pub async fn mark_verified(&self, claim_id: Uuid) -> Result<Option<Claim>, ClaimError> {
        let claim = sqlx::query_as::<_, Claim>(
            r#"
            UPDATE claims
            SET status = 'pending', updated_at = now()
            WHERE id = $1 AND status = 'draft'
            RETURNING *
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(claim) = &claim {
            self.invalidate(claim.user_id).await;
            tracing::info!("Claim {} advanced to pending", claim.id);
        }
        Ok(claim)
    }

    /// Regional sign-off. Only pending claims can be approved; the
    /// actor's id is recorded.
    pub async fn approve(&self, claim_id: Uuid, approved_by: Uuid) -> Result<Claim, ClaimError> {
        let current = self.get(claim_id).await?;
        if current.status != ClaimStatus::Pending {
            return Err(ClaimError::InvalidTransition {
                from: current.status,
                to: ClaimStatus::RegionalApproved,
            });
        }

        let claim = sqlx::query_as::<_, Claim>(
            r#"
            UPDATE claims
            SET status = 'regional_approved', approved_by = $2, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(claim_id)
        .bind(approved_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ClaimError::InvalidTransition {
            from: current.status,
            to: ClaimStatus::RegionalApproved,
        })?;

        self.invalidate(claim.user_id).await;
        tracing::info!("Claim {} approved by {}", claim.id, approved_by);
        Ok(claim)
    }

    pub async fn reject(&self, claim_id: Uuid, rejected_by: Uuid) -> Result<Claim, ClaimError> {
        let current = self.get(claim_id).await?;
        if current.status != ClaimStatus::Pending {
            return Err(ClaimError::InvalidTransition {
                from: current.status,
                to: ClaimStatus::Rejected,
            });
        }

        let claim = sqlx::query_as::<_, Claim>(
            r#"
            UPDATE claims
            SET status = 'rejected', approved_by = $2, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(claim_id)
        .bind(rejected_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ClaimError::InvalidTransition {
            from: current.status,
            to: ClaimStatus::Rejected,
        })?;

        self.invalidate(claim.user_id).await;
        tracing::info!("Claim {} rejected by {}", claim.id, rejected_by);
        Ok(claim)
    }

    /// Listing for the monitoring/validation screens. Regional admins
    /// see their region only; central admins pass no region filter.
    pub async fn list(
        &self,
        status: Option<ClaimStatus>,
        region_code: Option<&str>,
    ) -> Result<Vec<Claim>, ClaimError> {
        let claims = sqlx::query_as::<_, Claim>(
            r#"
            SELECT * FROM claims
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR region_code = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .bind(region_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(claims)
    }
}
