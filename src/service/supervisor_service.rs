use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::dto::supervisor_dto::{DashboardResponse, DashboardStats, StudentSummary, SupervisorInfo};
use crate::model::{AccountRecord, AuthContext, Supervisor, User};
use crate::repository::Repositories;
use crate::util::error::ServiceError;

#[async_trait]
pub trait SupervisorService: Send + Sync {
    async fn dashboard(&self, ctx: &AuthContext) -> Result<DashboardResponse, ServiceError>;
    async fn students(&self, ctx: &AuthContext) -> Result<Vec<StudentSummary>, ServiceError>;
}

pub struct SupervisorServiceImpl {
    pub repos: Repositories,
}

impl From<&User> for StudentSummary {
    fn from(user: &User) -> Self {
        StudentSummary {
            id: user.id_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            progress: user.progress,
        }
    }
}

/// Mean progress rounded to the nearest integer, 0 for an empty roster.
pub fn average_progress(students: &[StudentSummary]) -> i64 {
    if students.is_empty() {
        return 0;
    }
    let total: f64 = students.iter().map(|s| s.progress).sum();
    (total / students.len() as f64).round() as i64
}

impl SupervisorServiceImpl {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn load(&self, ctx: &AuthContext) -> Result<(Supervisor, Vec<StudentSummary>), ServiceError> {
        let supervisor = self
            .repos
            .supervisors
            .find_by_id(&ctx.account_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supervisor not found".to_string()))?;
        let students = self.repos.users.find_by_ids(&supervisor.students).await?;
        if students.len() < supervisor.students.len() {
            debug!(
                "{} assigned student ids of {} have no account",
                supervisor.students.len() - students.len(),
                supervisor.email
            );
        }
        let students = students.iter().map(StudentSummary::from).collect();
        Ok((supervisor, students))
    }
}

#[async_trait]
impl SupervisorService for SupervisorServiceImpl {
    #[instrument(skip(self), fields(account_id = %ctx.account_id))]
    async fn dashboard(&self, ctx: &AuthContext) -> Result<DashboardResponse, ServiceError> {
        let (supervisor, students) = self.load(ctx).await?;
        let stats = DashboardStats {
            total_students: students.len(),
            average_progress: average_progress(&students),
        };
        Ok(DashboardResponse {
            supervisor: SupervisorInfo {
                name: supervisor.username,
                email: supervisor.email,
                department: supervisor.department,
                specialization: supervisor.specialization,
            },
            students,
            stats,
        })
    }

    #[instrument(skip(self), fields(account_id = %ctx.account_id))]
    async fn students(&self, ctx: &AuthContext) -> Result<Vec<StudentSummary>, ServiceError> {
        let (_, students) = self.load(ctx).await?;
        Ok(students)
    }
}
