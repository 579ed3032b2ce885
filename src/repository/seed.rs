//! Demo accounts for local development with the in-memory store.

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::model::{Supervisor, User};
use crate::repository::account_repo::AccountRepository;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_USER_EMAIL: &str = "user@example.com";
pub const DEMO_SUPERVISOR_EMAIL: &str = "supervisor@example.com";

const DEMO_STUDENTS: [(&str, &str, f64); 3] = [
    ("Student One", "student1@example.com", 75.0),
    ("Student Two", "student2@example.com", 45.0),
    ("Student Three", "student3@example.com", 90.0),
];

/// Inserts the demo user, three students and a supervisor assigned to them.
/// Accounts whose email already exists are left untouched.
#[instrument(skip_all)]
pub async fn seed_demo_data(
    users: &dyn AccountRepository<User>,
    supervisors: &dyn AccountRepository<Supervisor>,
) -> RepositoryResult<()> {
    let hash = PasswordUtilsImpl::hash_password(DEMO_PASSWORD).map_err(RepositoryError::generic)?;

    let mut demo_user = User::new("Test User".to_string(), DEMO_USER_EMAIL.to_string(), hash.clone(), None);
    demo_user.is_email_verified = true;
    demo_user.user_id = 100001;
    if let Some(profile) = json!({
        "language": "English",
        "level": "Intermediate",
        "interests": ["Reading", "Writing"]
    })
    .as_object()
    {
        demo_user.profile = profile.clone();
    }
    insert_user_if_missing(users, demo_user).await?;

    let mut student_ids = Vec::with_capacity(DEMO_STUDENTS.len());
    for (i, (name, email, progress)) in DEMO_STUDENTS.iter().enumerate() {
        let mut student = User::new(name.to_string(), email.to_string(), hash.clone(), None);
        student.is_email_verified = true;
        student.progress = *progress;
        student.user_id = 100002 + i as u32;
        let stored = insert_user_if_missing(users, student).await?;
        if let Some(id) = stored.id {
            student_ids.push(id);
        }
    }

    if supervisors.find_by_email(DEMO_SUPERVISOR_EMAIL).await?.is_none() {
        let mut supervisor = Supervisor::new("Test Supervisor".to_string(), DEMO_SUPERVISOR_EMAIL.to_string(), hash);
        supervisor.is_email_verified = true;
        supervisor.user_id = 200001;
        supervisor.supervisor_id = 300001;
        supervisor.department = Some("Education".to_string());
        supervisor.specialization = Some("Language Learning".to_string());
        supervisor.students = student_ids;
        supervisors.insert(supervisor).await?;
    }

    info!("Demo accounts seeded");
    Ok(())
}

async fn insert_user_if_missing(users: &dyn AccountRepository<User>, user: User) -> RepositoryResult<User> {
    match users.find_by_email(&user.email).await? {
        Some(existing) => {
            debug!("Demo user {} already present", existing.email);
            Ok(existing)
        }
        None => users.insert(user).await,
    }
}
