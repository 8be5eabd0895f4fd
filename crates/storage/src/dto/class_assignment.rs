use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ClassAssignment;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignClassRequest {
    #[validate(length(min = 1, max = 100, message = "Class name is required"))]
    pub class_name: String,
}

/// Request payload for the legacy single-class reassignment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignClassRequest {
    #[validate(length(min = 1, max = 100, message = "New class is required"))]
    pub new_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriverClassesResponse {
    pub success: bool,
    pub classes: Vec<String>,
    pub assignments: Vec<ClassAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignClassResponse {
    pub success: bool,
    pub message: String,
    pub old_class: Option<String>,
    pub new_class: String,
}
