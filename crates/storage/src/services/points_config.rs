use crate::error::Result;
use crate::models::PointsConfig;
use crate::repository::Stores;

/// The league's stored configuration, or the standard preset when none is
/// stored or the store cannot be read.
pub async fn load_points_config(stores: &Stores, league_id: i64) -> PointsConfig {
    match stores.points_configs.find(league_id).await {
        Ok(Some(config)) => config,
        Ok(None) => PointsConfig::default(),
        Err(e) => {
            tracing::warn!("Failed to load points config for league {league_id}, using default: {e}");
            PointsConfig::default()
        }
    }
}

pub async fn save_points_config(
    stores: &Stores,
    league_id: i64,
    config: &PointsConfig,
) -> Result<()> {
    stores.points_configs.save(league_id, config).await?;
    stores.championship_cache.invalidate(league_id, None).await?;

    tracing::info!("Saved points config \"{}\" for league {league_id}", config.name);
    Ok(())
}
