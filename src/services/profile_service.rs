use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Profile;
use crate::types::{AccountStatus, Role};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub async fn new() -> Result<Self, ProfileError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn get(&self, id: Uuid) -> Result<Profile, ProfileError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ProfileError::NotFound(id))
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Profile>, ProfileError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    /// Admin approval action: flip the account status. The gate reads
    /// the result on the next route evaluation.
    pub async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<Profile, ProfileError> {
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET status_account = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProfileError::NotFound(id))?;

        tracing::info!("Profile {} status set to {:?}", id, status);
        Ok(profile)
    }

    /// Seed one fixture account per role tier. Upserts by phone so the
    /// seeder can run repeatedly against the same development database.
    pub async fn seed_dev_users(&self) -> Result<Vec<Profile>, ProfileError> {
        let fixtures: [(&str, &str, Role, AccountStatus, Option<&str>); 5] = [
            ("Admin Pusat", "081100000001", Role::AdminPusat, AccountStatus::Active, None),
            ("Admin Regional 01", "081100000002", Role::AdminRegional, AccountStatus::Active, Some("01")),
            ("Admin Keuangan", "081100000003", Role::AdminFinance, AccountStatus::Active, None),
            ("Santri Aktif", "081100000004", Role::User, AccountStatus::Active, None),
            ("Santri Menunggu", "081100000005", Role::User, AccountStatus::Pending, None),
        ];

        let mut seeded = Vec::with_capacity(fixtures.len());
        for (nama, phone, role, status, region) in fixtures {
            let profile = sqlx::query_as::<_, Profile>(
                r#"
                INSERT INTO profiles (id, nama, phone, role, status_account, region_code)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (phone) DO UPDATE
                SET nama = EXCLUDED.nama,
                    role = EXCLUDED.role,
                    status_account = EXCLUDED.status_account,
                    region_code = EXCLUDED.region_code,
                    updated_at = now()
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(nama)
            .bind(phone)
            .bind(role)
            .bind(status)
            .bind(region)
            .fetch_one(&self.pool)
            .await?;
            seeded.push(profile);
        }

        tracing::info!("Seeded {} development profiles", seeded.len());
        Ok(seeded)
    }
}
