//! Postgres-backed repository. Schema lives in `migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::assessment::models::PerformanceBucket;
use crate::errors::AppError;
use crate::models::activity::{ActivityEvent, ActivityRecord, NewActivity};
use crate::models::assessment_record::AssessmentRecord;
use crate::models::chat::ChatInteraction;
use crate::models::hackathon::{Hackathon, NewHackathon};
use crate::models::user::{DeviceInfo, LoginEvent, LoginLog, Role, UserRecord};
use crate::repository::Repository;

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row types
// ────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    display_name: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    last_login: DateTime<Utc>,
    login_count: i64,
    skills: Vec<String>,
    resume_uploaded: bool,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!("user {}: {e}", row.id)))?;
        Ok(UserRecord {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            role,
            created_at: row.created_at,
            last_login: row.last_login,
            login_count: row.login_count,
            skills: row.skills,
            resume_uploaded: row.resume_uploaded,
        })
    }
}

#[derive(FromRow)]
struct LoginLogRow {
    id: i64,
    user_id: String,
    session_id: Option<String>,
    login_timestamp: DateTime<Utc>,
    ip_address: Option<String>,
    device_info: Json<DeviceInfo>,
}

impl From<LoginLogRow> for LoginLog {
    fn from(row: LoginLogRow) -> Self {
        LoginLog {
            id: row.id,
            user_id: row.user_id,
            session_id: row.session_id,
            login_timestamp: row.login_timestamp,
            ip_address: row.ip_address,
            device: row.device_info.0,
        }
    }
}

#[derive(FromRow)]
struct AssessmentRecordRow {
    id: Uuid,
    user_id: String,
    skill: String,
    title: String,
    difficulty: String,
    score: i32,
    correct_answers: i32,
    total_questions: i32,
    elapsed_seconds: i64,
    performance: String,
    completed_at: DateTime<Utc>,
}

impl TryFrom<AssessmentRecordRow> for AssessmentRecord {
    type Error = AppError;

    fn try_from(row: AssessmentRecordRow) -> Result<Self, Self::Error> {
        let performance = PerformanceBucket::parse(&row.performance).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "assessment {}: unknown performance '{}'",
                row.id,
                row.performance
            ))
        })?;
        Ok(AssessmentRecord {
            id: row.id,
            user_id: row.user_id,
            skill: row.skill,
            title: row.title,
            difficulty: row.difficulty,
            score: row.score.max(0) as u32,
            correct_answers: row.correct_answers.max(0) as u32,
            total_questions: row.total_questions.max(0) as u32,
            elapsed_seconds: row.elapsed_seconds.max(0) as u64,
            performance,
            completed_at: row.completed_at,
        })
    }
}

#[derive(FromRow)]
struct ActivityRow {
    id: i64,
    user_id: Option<String>,
    event: Json<ActivityEvent>,
    created_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, email, display_name, role, created_at, last_login, \
                            login_count, skills, resume_uploaded";

const HACKATHON_SELECT: &str = r#"
    SELECT h.id, h.title, h.description, h.start_date, h.end_date, h.skill_level,
           h.technologies, h.created_at, COUNT(p.user_id) AS participant_count
    FROM hackathons h
    LEFT JOIN hackathon_participants p ON p.hackathon_id = h.id
"#;

// ────────────────────────────────────────────────────────────────────────────
// Repository impl
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Repository for PgRepository {
    async fn record_login(&self, event: &LoginEvent) -> Result<UserRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        // Role is never written here: new rows take the column default.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, display_name, created_at, last_login, login_count)
            VALUES ($1, $2, $3, $4, $4, 1)
            ON CONFLICT (id) DO UPDATE SET
                email        = EXCLUDED.email,
                display_name = COALESCE(EXCLUDED.display_name, users.display_name),
                last_login   = EXCLUDED.last_login,
                login_count  = users.login_count + 1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&event.user_id)
        .bind(&event.email)
        .bind(&event.display_name)
        .bind(event.at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_login_logs
                (user_id, session_id, login_timestamp, ip_address, device_info)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&event.user_id)
        .bind(&event.session_id)
        .bind(event.at)
        .bind(&event.ip_address)
        .bind(Json(&event.device))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Recorded login for user {} (count {})", row.id, row.login_count);
        row.try_into()
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(UserRecord::try_from)
        .collect()
    }

    async fn mark_resume_analyzed(
        &self,
        user_id: &str,
        skills: &[String],
    ) -> Result<Vec<String>, AppError> {
        let mut tx = self.pool.begin().await?;

        let previous =
            sqlx::query_scalar::<_, Vec<String>>("SELECT skills FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

        sqlx::query("UPDATE users SET skills = $2, resume_uploaded = TRUE WHERE id = $1")
            .bind(user_id)
            .bind(skills)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(previous)
    }

    async fn list_login_logs(
        &self,
        user_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LoginLog>, AppError> {
        let rows = sqlx::query_as::<_, LoginLogRow>(
            r#"
            SELECT id, user_id, session_id, login_timestamp, ip_address, device_info
            FROM user_login_logs
            WHERE ($1::TEXT IS NULL OR user_id = $1)
            ORDER BY login_timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LoginLog::from).collect())
    }

    async fn save_assessment_record(&self, record: &AssessmentRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO assessment_records
                (id, user_id, skill, title, difficulty, score, correct_answers,
                 total_questions, elapsed_seconds, performance, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(&record.user_id)
        .bind(&record.skill)
        .bind(&record.title)
        .bind(&record.difficulty)
        .bind(record.score as i32)
        .bind(record.correct_answers as i32)
        .bind(record.total_questions as i32)
        .bind(record.elapsed_seconds as i64)
        .bind(record.performance.as_str())
        .bind(record.completed_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Saved {} assessment {} for user {} (score {})",
            record.skill, record.id, record.user_id, record.score
        );
        Ok(())
    }

    async fn list_assessment_records(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<AssessmentRecord>, AppError> {
        sqlx::query_as::<_, AssessmentRecordRow>(
            r#"
            SELECT id, user_id, skill, title, difficulty, score, correct_answers,
                   total_questions, elapsed_seconds, performance, completed_at
            FROM assessment_records
            WHERE ($1::TEXT IS NULL OR user_id = $1)
            ORDER BY completed_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AssessmentRecord::try_from)
        .collect()
    }

    async fn mark_video_completed(
        &self,
        user_id: &str,
        video_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO completed_videos (user_id, video_id, completed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, video_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_completed_videos(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let videos = sqlx::query_scalar::<_, String>(
            "SELECT video_id FROM completed_videos WHERE user_id = $1 ORDER BY completed_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    async fn record_activity(&self, activity: NewActivity) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO activities (user_id, activity_type, event, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&activity.user_id)
        .bind(activity.event.activity_type())
        .bind(Json(&activity.event))
        .bind(activity.at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_activities(&self, limit: i64) -> Result<Vec<ActivityRecord>, AppError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, user_id, event, created_at
            FROM activities
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActivityRecord {
                id: row.id,
                user_id: row.user_id,
                created_at: row.created_at,
                event: row.event.0,
            })
            .collect())
    }

    async fn create_hackathon(
        &self,
        hackathon: &NewHackathon,
        at: DateTime<Utc>,
    ) -> Result<Hackathon, AppError> {
        let created = sqlx::query_as::<_, Hackathon>(
            r#"
            INSERT INTO hackathons
                (title, description, start_date, end_date, skill_level, technologies, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, start_date, end_date, skill_level,
                      technologies, created_at, 0::BIGINT AS participant_count
            "#,
        )
        .bind(&hackathon.title)
        .bind(&hackathon.description)
        .bind(hackathon.start_date)
        .bind(hackathon.end_date)
        .bind(&hackathon.skill_level)
        .bind(&hackathon.technologies)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        info!("Created hackathon {} '{}'", created.id, created.title);
        Ok(created)
    }

    async fn list_hackathons(&self) -> Result<Vec<Hackathon>, AppError> {
        let hackathons = sqlx::query_as::<_, Hackathon>(&format!(
            "{HACKATHON_SELECT} GROUP BY h.id ORDER BY h.start_date, h.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(hackathons)
    }

    async fn update_hackathon(
        &self,
        hackathon_id: i64,
        hackathon: &NewHackathon,
    ) -> Result<Hackathon, AppError> {
        let updated = sqlx::query_as::<_, Hackathon>(
            r#"
            UPDATE hackathons h SET
                title        = $2,
                description  = $3,
                start_date   = $4,
                end_date     = $5,
                skill_level  = $6,
                technologies = $7
            WHERE h.id = $1
            RETURNING h.id, h.title, h.description, h.start_date, h.end_date, h.skill_level,
                      h.technologies, h.created_at,
                      (SELECT COUNT(*) FROM hackathon_participants p
                       WHERE p.hackathon_id = h.id) AS participant_count
            "#,
        )
        .bind(hackathon_id)
        .bind(&hackathon.title)
        .bind(&hackathon.description)
        .bind(hackathon.start_date)
        .bind(hackathon.end_date)
        .bind(&hackathon.skill_level)
        .bind(&hackathon.technologies)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hackathon {hackathon_id} not found")))?;

        info!("Updated hackathon {} '{}'", updated.id, updated.title);
        Ok(updated)
    }

    async fn delete_hackathon(&self, hackathon_id: i64) -> Result<(), AppError> {
        // Participants go with the row (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM hackathons WHERE id = $1")
            .bind(hackathon_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Hackathon {hackathon_id} not found"
            )));
        }
        info!("Deleted hackathon {hackathon_id}");
        Ok(())
    }

    async fn join_hackathon(
        &self,
        hackathon_id: i64,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM hackathons WHERE id = $1)")
                .bind(hackathon_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(AppError::NotFound(format!(
                "Hackathon {hackathon_id} not found"
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO hackathon_participants (hackathon_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (hackathon_id, user_id) DO NOTHING
            "#,
        )
        .bind(hackathon_id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn save_chat_interaction(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<ChatInteraction, AppError> {
        let interaction = sqlx::query_as::<_, ChatInteraction>(
            r#"
            INSERT INTO chat_interactions (user_id, message, response, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, message, response, timestamp
            "#,
        )
        .bind(user_id)
        .bind(message)
        .bind(response)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        Ok(interaction)
    }

    async fn list_chat_interactions(&self) -> Result<Vec<ChatInteraction>, AppError> {
        let interactions = sqlx::query_as::<_, ChatInteraction>(
            r#"
            SELECT id, user_id, message, response, timestamp
            FROM chat_interactions
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(interactions)
    }
}
