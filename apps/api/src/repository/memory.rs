use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::activity::{ActivityRecord, NewActivity};
use crate::models::assessment_record::AssessmentRecord;
use crate::models::chat::ChatInteraction;
use crate::models::hackathon::{Hackathon, NewHackathon};
use crate::models::user::{LoginEvent, LoginLog, Role, UserRecord};
use crate::repository::Repository;

/// Process-local repository. Data lives as long as the value does.
#[derive(Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
    fail_assessment_saves: AtomicBool,
}

#[derive(Default)]
struct Store {
    users: HashMap<String, UserRecord>,
    login_logs: Vec<LoginLog>,
    assessments: Vec<AssessmentRecord>,
    completed_videos: HashMap<String, Vec<String>>,
    activities: Vec<ActivityRecord>,
    hackathons: Vec<Hackathon>,
    participants: HashSet<(i64, String)>,
    chats: Vec<ChatInteraction>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or overwrites a user, bypassing the login flow.
    pub async fn insert_user(&self, user: UserRecord) {
        self.store.write().await.users.insert(user.id.clone(), user);
    }

    /// While set, `save_assessment_record` fails as if the database were down.
    pub fn set_fail_assessment_saves(&self, fail: bool) {
        self.fail_assessment_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn record_login(&self, event: &LoginEvent) -> Result<UserRecord, AppError> {
        let mut store = self.store.write().await;

        let user = store
            .users
            .entry(event.user_id.clone())
            .and_modify(|u| {
                u.email = event.email.clone();
                if event.display_name.is_some() {
                    u.display_name = event.display_name.clone();
                }
                u.login_count += 1;
                u.last_login = event.at;
            })
            .or_insert_with(|| UserRecord {
                id: event.user_id.clone(),
                email: event.email.clone(),
                display_name: event.display_name.clone(),
                role: Role::User,
                created_at: event.at,
                last_login: event.at,
                login_count: 1,
                skills: Vec::new(),
                resume_uploaded: false,
            })
            .clone();

        let id = store.next_id();
        store.login_logs.push(LoginLog {
            id,
            user_id: event.user_id.clone(),
            session_id: event.session_id.clone(),
            login_timestamp: event.at,
            ip_address: event.ip_address.clone(),
            device: event.device.clone(),
        });

        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.store.read().await.users.get(user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let store = self.store.read().await;
        let mut users: Vec<_> = store.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn mark_resume_analyzed(
        &self,
        user_id: &str,
        skills: &[String],
    ) -> Result<Vec<String>, AppError> {
        let mut store = self.store.write().await;
        let user = store
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        user.resume_uploaded = true;
        Ok(std::mem::replace(&mut user.skills, skills.to_vec()))
    }

    async fn list_login_logs(
        &self,
        user_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LoginLog>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .login_logs
            .iter()
            .rev()
            .filter(|log| user_id.map_or(true, |id| log.user_id == id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn save_assessment_record(&self, record: &AssessmentRecord) -> Result<(), AppError> {
        if self.fail_assessment_saves.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.store.write().await.assessments.push(record.clone());
        Ok(())
    }

    async fn list_assessment_records(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<AssessmentRecord>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .assessments
            .iter()
            .filter(|r| user_id.map_or(true, |id| r.user_id == id))
            .cloned()
            .collect())
    }

    async fn mark_video_completed(
        &self,
        user_id: &str,
        video_id: &str,
        _at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut store = self.store.write().await;
        let videos = store.completed_videos.entry(user_id.to_string()).or_default();
        if videos.iter().any(|v| v == video_id) {
            return Ok(false);
        }
        videos.push(video_id.to_string());
        Ok(true)
    }

    async fn list_completed_videos(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let store = self.store.read().await;
        Ok(store.completed_videos.get(user_id).cloned().unwrap_or_default())
    }

    async fn record_activity(&self, activity: NewActivity) -> Result<(), AppError> {
        let mut store = self.store.write().await;
        let id = store.next_id();
        store.activities.push(ActivityRecord {
            id,
            user_id: activity.user_id,
            created_at: activity.at,
            event: activity.event,
        });
        Ok(())
    }

    async fn list_activities(&self, limit: i64) -> Result<Vec<ActivityRecord>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .activities
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create_hackathon(
        &self,
        hackathon: &NewHackathon,
        at: DateTime<Utc>,
    ) -> Result<Hackathon, AppError> {
        let mut store = self.store.write().await;
        let created = Hackathon {
            id: store.next_id(),
            title: hackathon.title.clone(),
            description: hackathon.description.clone(),
            start_date: hackathon.start_date,
            end_date: hackathon.end_date,
            skill_level: hackathon.skill_level.clone(),
            technologies: hackathon.technologies.clone(),
            created_at: at,
            participant_count: 0,
        };
        store.hackathons.push(created.clone());
        Ok(created)
    }

    async fn list_hackathons(&self) -> Result<Vec<Hackathon>, AppError> {
        let store = self.store.read().await;
        let mut hackathons = store.hackathons.clone();
        hackathons.sort_by_key(|h| (h.start_date, h.id));
        Ok(hackathons)
    }

    async fn update_hackathon(
        &self,
        hackathon_id: i64,
        hackathon: &NewHackathon,
    ) -> Result<Hackathon, AppError> {
        let mut store = self.store.write().await;
        let existing = store
            .hackathons
            .iter_mut()
            .find(|h| h.id == hackathon_id)
            .ok_or_else(|| AppError::NotFound(format!("Hackathon {hackathon_id} not found")))?;

        existing.title = hackathon.title.clone();
        existing.description = hackathon.description.clone();
        existing.start_date = hackathon.start_date;
        existing.end_date = hackathon.end_date;
        existing.skill_level = hackathon.skill_level.clone();
        existing.technologies = hackathon.technologies.clone();
        Ok(existing.clone())
    }

    async fn delete_hackathon(&self, hackathon_id: i64) -> Result<(), AppError> {
        let mut store = self.store.write().await;
        let before = store.hackathons.len();
        store.hackathons.retain(|h| h.id != hackathon_id);
        if store.hackathons.len() == before {
            return Err(AppError::NotFound(format!(
                "Hackathon {hackathon_id} not found"
            )));
        }
        store.participants.retain(|(id, _)| *id != hackathon_id);
        Ok(())
    }

    async fn join_hackathon(
        &self,
        hackathon_id: i64,
        user_id: &str,
        _at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut store = self.store.write().await;
        if !store.hackathons.iter().any(|h| h.id == hackathon_id) {
            return Err(AppError::NotFound(format!(
                "Hackathon {hackathon_id} not found"
            )));
        }

        let joined = store.participants.insert((hackathon_id, user_id.to_string()));
        if joined {
            if let Some(h) = store.hackathons.iter_mut().find(|h| h.id == hackathon_id) {
                h.participant_count += 1;
            }
        }
        Ok(joined)
    }

    async fn save_chat_interaction(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<ChatInteraction, AppError> {
        let mut store = self.store.write().await;
        let interaction = ChatInteraction {
            id: store.next_id(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            response: response.to_string(),
            timestamp: at,
        };
        store.chats.push(interaction.clone());
        Ok(interaction)
    }

    async fn list_chat_interactions(&self) -> Result<Vec<ChatInteraction>, AppError> {
        let store = self.store.read().await;
        Ok(store.chats.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityEvent;
    use crate::models::user::DeviceInfo;
    use chrono::Duration;

    fn login(user_id: &str, at: DateTime<Utc>) -> LoginEvent {
        LoginEvent {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            display_name: None,
            session_id: Some("s-1".to_string()),
            ip_address: Some("10.0.0.1".to_string()),
            device: DeviceInfo::default(),
            at,
        }
    }

    #[tokio::test]
    async fn test_first_login_creates_plain_user() {
        let repo = InMemoryRepository::new();
        let user = repo.record_login(&login("u1", Utc::now())).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.login_count, 1);
        assert!(!user.resume_uploaded);
    }

    #[tokio::test]
    async fn test_repeat_login_bumps_count_and_keeps_role() {
        let repo = InMemoryRepository::new();
        let t0 = Utc::now();
        let mut admin = repo.record_login(&login("u1", t0)).await.unwrap();
        admin.role = Role::Admin;
        repo.insert_user(admin).await;

        let t1 = t0 + Duration::hours(1);
        let user = repo.record_login(&login("u1", t1)).await.unwrap();
        assert_eq!(user.login_count, 2);
        assert_eq!(user.last_login, t1);
        assert_eq!(user.created_at, t0);
        assert_eq!(user.role, Role::Admin);

        let logs = repo.list_login_logs(Some("u1"), 10).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].login_timestamp, t1);
    }

    #[tokio::test]
    async fn test_login_logs_respect_limit_and_user_filter() {
        let repo = InMemoryRepository::new();
        let now = Utc::now();
        for user in ["a", "b", "a"] {
            repo.record_login(&login(user, now)).await.unwrap();
        }
        assert_eq!(repo.list_login_logs(None, 2).await.unwrap().len(), 2);
        assert_eq!(repo.list_login_logs(Some("b"), 100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_resume_analyzed_returns_previous_skills() {
        let repo = InMemoryRepository::new();
        repo.record_login(&login("u1", Utc::now())).await.unwrap();

        let first = repo
            .mark_resume_analyzed("u1", &["Rust".to_string()])
            .await
            .unwrap();
        assert!(first.is_empty());
        let second = repo.mark_resume_analyzed("u1", &[]).await.unwrap();
        assert_eq!(second, vec!["Rust".to_string()]);

        let user = repo.get_user("u1").await.unwrap().unwrap();
        assert!(user.resume_uploaded);
    }

    #[tokio::test]
    async fn test_mark_resume_analyzed_unknown_user_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.mark_resume_analyzed("ghost", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_video_completion_is_idempotent() {
        let repo = InMemoryRepository::new();
        let now = Utc::now();
        assert!(repo.mark_video_completed("u1", "react-beginner", now).await.unwrap());
        assert!(!repo.mark_video_completed("u1", "react-beginner", now).await.unwrap());
        assert_eq!(
            repo.list_completed_videos("u1").await.unwrap(),
            vec!["react-beginner".to_string()]
        );
    }

    #[tokio::test]
    async fn test_join_hackathon() {
        let repo = InMemoryRepository::new();
        let now = Utc::now();
        let h = repo
            .create_hackathon(
                &NewHackathon {
                    title: "Spring Jam".to_string(),
                    description: None,
                    start_date: now,
                    end_date: now + Duration::days(2),
                    skill_level: None,
                    technologies: vec!["Rust".to_string()],
                },
                now,
            )
            .await
            .unwrap();

        assert!(repo.join_hackathon(h.id, "u1", now).await.unwrap());
        assert!(!repo.join_hackathon(h.id, "u1", now).await.unwrap());
        assert_eq!(repo.list_hackathons().await.unwrap()[0].participant_count, 1);

        let err = repo.join_hackathon(h.id + 100, "u1", now).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_hackathon() {
        let repo = InMemoryRepository::new();
        let now = Utc::now();
        let mut draft = NewHackathon {
            title: "Spring Jam".to_string(),
            description: None,
            start_date: now,
            end_date: now + Duration::days(2),
            skill_level: None,
            technologies: vec![],
        };
        let h = repo.create_hackathon(&draft, now).await.unwrap();
        repo.join_hackathon(h.id, "u1", now).await.unwrap();

        draft.title = "Summer Jam".to_string();
        draft.technologies = vec!["Rust".to_string()];
        let updated = repo.update_hackathon(h.id, &draft).await.unwrap();
        assert_eq!(updated.title, "Summer Jam");
        assert_eq!(updated.participant_count, 1);
        assert_eq!(updated.created_at, h.created_at);

        repo.delete_hackathon(h.id).await.unwrap();
        assert!(repo.list_hackathons().await.unwrap().is_empty());
        assert!(matches!(
            repo.delete_hackathon(h.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.update_hackathon(h.id, &draft).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_activities_are_listed_newest_first() {
        let repo = InMemoryRepository::new();
        for skill in ["Git", "SQL"] {
            repo.record_activity(NewActivity::now(
                "u1",
                ActivityEvent::SkillIdentified {
                    skill: skill.to_string(),
                },
            ))
            .await
            .unwrap();
        }
        let activities = repo.list_activities(1).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(
            activities[0].event,
            ActivityEvent::SkillIdentified {
                skill: "SQL".to_string()
            }
        );
    }
}
