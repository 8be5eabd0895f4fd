use storage::{
    error::Result,
    models::{ClassAssignment, LegacyClassChange},
    services::class_assignments,
};

use crate::state::AppState;

pub async fn driver_classes(
    state: &AppState,
    league_id: i64,
    cust_id: i64,
) -> Result<Vec<ClassAssignment>> {
    class_assignments::driver_classes(&state.stores, league_id, cust_id).await
}

pub async fn assign_class(
    state: &AppState,
    league_id: i64,
    cust_id: i64,
    class_name: &str,
) -> Result<bool> {
    class_assignments::assign_class(&state.stores, league_id, cust_id, class_name.trim()).await
}

pub async fn unassign_class(
    state: &AppState,
    league_id: i64,
    cust_id: i64,
    class_name: &str,
) -> Result<bool> {
    class_assignments::unassign_class(&state.stores, league_id, cust_id, class_name).await
}

pub async fn reassign_class(
    state: &AppState,
    league_id: i64,
    cust_id: i64,
    new_class: &str,
) -> Result<LegacyClassChange> {
    class_assignments::reassign_class(&state.stores, league_id, cust_id, new_class.trim()).await
}
