use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Blueprint, Point};

use super::{BlueprintStore, StoreError, StoreResult};

/// Keeps blueprints in process memory. A point's index in its vector is its ordinal.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blueprints: RwLock<BTreeMap<(String, String), Vec<Point>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

fn to_blueprint(((author, name), points): (&(String, String), &Vec<Point>)) -> Blueprint {
    Blueprint::new(author.clone(), name.clone(), points.clone())
}

#[async_trait]
impl BlueprintStore for MemoryStore {
    async fn save(&self, blueprint: Blueprint) -> StoreResult<()> {
        let mut blueprints = self.blueprints.write().await;
        let key = (blueprint.author, blueprint.name);
        if blueprints.contains_key(&key) {
            return Err(StoreError::already_exists(&key.0, &key.1));
        }
        blueprints.insert(key, blueprint.points);
        Ok(())
    }

    async fn get(&self, author: &str, name: &str) -> StoreResult<Blueprint> {
        let blueprints = self.blueprints.read().await;
        blueprints
            .get_key_value(&(author.to_owned(), name.to_owned()))
            .map(to_blueprint)
            .ok_or_else(|| StoreError::blueprint_not_found(author, name))
    }

    async fn get_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>> {
        let blueprints = self.blueprints.read().await;
        let found: Vec<_> = blueprints
            .iter()
            .filter(|((a, _), _)| a == author)
            .map(to_blueprint)
            .collect();
        if found.is_empty() {
            return Err(StoreError::author_not_found(author));
        }
        Ok(found)
    }

    async fn get_all(&self) -> StoreResult<Vec<Blueprint>> {
        let blueprints = self.blueprints.read().await;
        Ok(blueprints.iter().map(to_blueprint).collect())
    }

    async fn add_point(&self, author: &str, name: &str, x: i32, y: i32) -> StoreResult<()> {
        let mut blueprints = self.blueprints.write().await;
        let points = blueprints
            .get_mut(&(author.to_owned(), name.to_owned()))
            .ok_or_else(|| StoreError::blueprint_not_found(author, name))?;
        points.push(Point::new(x, y));
        Ok(())
    }
}
