// Reward catalog configuration and unlock evaluation

use crate::error::Result;
use crate::models::Reward;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    rewards: Vec<Reward>,
}

/// Set of unlockable rewards with their point thresholds. Thresholds come
/// from an external YAML file, so the default catalog is empty.
#[derive(Debug, Default, Clone)]
pub struct RewardCatalog {
    rewards: Vec<Reward>,
}

impl RewardCatalog {
    /// Catalog with no rewards.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(rewards: Vec<Reward>) -> Self {
        Self { rewards }
    }

    /// Load a catalog from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let file: CatalogFile = serde_yaml::from_str(&text)?;
        debug!(
            path = %path.as_ref().display(),
            count = file.rewards.len(),
            "Loaded reward catalog"
        );
        Ok(Self::new(file.rewards))
    }

    /// Load a catalog if the file exists, otherwise start empty.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::empty())
        }
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// Unlock every still-locked reward whose point cost is covered by the
    /// current balance. Returns how many were newly unlocked.
    pub fn evaluate(&mut self, points: i64, streak: u32) -> usize {
        let mut unlocked = 0;
        for reward in &mut self.rewards {
            if !reward.unlocked && points >= reward.points_cost {
                reward.unlocked = true;
                unlocked += 1;
                info!(reward = %reward.id, points, streak, "Reward unlocked");
            }
        }
        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog_yaml() -> &'static str {
        r#"
rewards:
  - id: bronze_badge
    title: Bronze Badge
    description: Earn your first 50 points
    points_cost: 50
  - id: gold_badge
    title: Gold Badge
    description: Reach 1000 points
    points_cost: 1000
"#
    }

    #[test]
    fn test_load_catalog_from_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rewards.yaml");
        fs::write(&path, catalog_yaml()).unwrap();

        let catalog = RewardCatalog::load(&path).unwrap();
        assert_eq!(catalog.rewards().len(), 2);
        assert_eq!(catalog.rewards()[0].id, "bronze_badge");
        assert_eq!(catalog.rewards()[0].points_cost, 50);
        assert!(!catalog.rewards()[0].unlocked);
    }

    #[test]
    fn test_evaluate_unlocks_affordable_rewards_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rewards.yaml");
        fs::write(&path, catalog_yaml()).unwrap();

        let mut catalog = RewardCatalog::load(&path).unwrap();
        assert_eq!(catalog.evaluate(60, 3), 1);
        assert!(catalog.rewards()[0].unlocked);
        assert!(!catalog.rewards()[1].unlocked);

        assert_eq!(catalog.evaluate(60, 3), 0);
    }

    #[test]
    fn test_missing_catalog_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let catalog = RewardCatalog::load_or_empty(temp.path().join("absent.yaml")).unwrap();
        assert!(catalog.rewards().is_empty());
    }
}
