use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorInfo {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    /// Mean student progress, rounded; 0 without students
    pub average_progress: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub supervisor: SupervisorInfo,
    pub students: Vec<StudentSummary>,
    pub stats: DashboardStats,
}
