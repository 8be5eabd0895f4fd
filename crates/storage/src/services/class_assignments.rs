use chrono::Utc;

use crate::error::Result;
use crate::models::{ClassAssignment, LegacyClassChange};
use crate::repository::Stores;

pub async fn driver_classes(
    stores: &Stores,
    league_id: i64,
    cust_id: i64,
) -> Result<Vec<ClassAssignment>> {
    stores
        .class_assignments
        .list_driver_assignments(league_id, cust_id)
        .await
}

/// Tags the driver with a class. Returns `false` when they already held it.
pub async fn assign_class(
    stores: &Stores,
    league_id: i64,
    cust_id: i64,
    class_name: &str,
) -> Result<bool> {
    let added = stores
        .class_assignments
        .assign(league_id, cust_id, class_name)
        .await?;
    if added {
        stores.championship_cache.invalidate(league_id, None).await?;
        tracing::info!("Driver {cust_id} assigned to class {class_name} in league {league_id}");
    }
    Ok(added)
}

pub async fn unassign_class(
    stores: &Stores,
    league_id: i64,
    cust_id: i64,
    class_name: &str,
) -> Result<bool> {
    let removed = stores
        .class_assignments
        .unassign(league_id, cust_id, class_name)
        .await?;
    if removed {
        stores.championship_cache.invalidate(league_id, None).await?;
        tracing::info!("Driver {cust_id} removed from class {class_name} in league {league_id}");
    }
    Ok(removed)
}

/// Records a legacy single-class reassignment. The previous legacy class, if
/// any, is reported as `old_class`.
pub async fn reassign_class(
    stores: &Stores,
    league_id: i64,
    cust_id: i64,
    new_class: &str,
) -> Result<LegacyClassChange> {
    let old_class = stores
        .class_assignments
        .list_legacy_changes(league_id)
        .await?
        .into_iter()
        .find(|change| change.cust_id == cust_id)
        .map(|change| change.new_class);

    let change = LegacyClassChange {
        league_id,
        cust_id,
        old_class,
        new_class: new_class.to_string(),
        changed_at: Utc::now(),
    };

    stores.class_assignments.record_legacy_change(&change).await?;
    stores.championship_cache.invalidate(league_id, None).await?;

    tracing::info!(
        "Driver {cust_id} reassigned from {:?} to {new_class} in league {league_id}",
        change.old_class
    );
    Ok(change)
}
