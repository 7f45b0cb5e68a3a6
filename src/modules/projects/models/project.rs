use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery stage a project is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStage {
    #[serde(rename = "ONBOARDING")]
    Onboarding,
    #[serde(rename = "2D")]
    Design2D,
    #[serde(rename = "3D")]
    Design3D,
    #[serde(rename = "EXEC")]
    Execution,
    #[serde(rename = "HANDOVER")]
    Handover,
    /// Stage-agnostic, used by milestone gates
    #[serde(rename = "ANY")]
    Any,
}

impl std::fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStage::Onboarding => write!(f, "ONBOARDING"),
            ProjectStage::Design2D => write!(f, "2D"),
            ProjectStage::Design3D => write!(f, "3D"),
            ProjectStage::Execution => write!(f, "EXEC"),
            ProjectStage::Handover => write!(f, "HANDOVER"),
            ProjectStage::Any => write!(f, "ANY"),
        }
    }
}

impl std::str::FromStr for ProjectStage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ONBOARDING" => Ok(ProjectStage::Onboarding),
            "2D" => Ok(ProjectStage::Design2D),
            "3D" => Ok(ProjectStage::Design3D),
            "EXEC" => Ok(ProjectStage::Execution),
            "HANDOVER" => Ok(ProjectStage::Handover),
            "ANY" => Ok(ProjectStage::Any),
            _ => Err(format!("Invalid project stage: {}", s)),
        }
    }
}

/// A customer project tied to one business model
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i32,
    pub project_code: String,
    pub name: String,
    pub customer_id: Option<i32>,
    pub biz_model_id: i32,
    pub status: String,
    pub stage: ProjectStage,
    pub created_at: Option<DateTime<Utc>>,
}
