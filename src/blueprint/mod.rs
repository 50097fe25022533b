pub mod filters;

use std::sync::Arc;

use crate::{
    db::{BlueprintStore, StoreResult},
    models::Blueprint,
};

use self::filters::BlueprintFilter;

/// Sits between the routes and the store. Writes go straight to the store; everything read
/// back passes through the configured filter first.
#[derive(Clone)]
pub struct BlueprintsService {
    store: Arc<dyn BlueprintStore>,
    filter: BlueprintFilter,
}

impl BlueprintsService {
    pub fn new(store: Arc<dyn BlueprintStore>, filter: BlueprintFilter) -> BlueprintsService {
        BlueprintsService { store, filter }
    }

    pub async fn get_all(&self) -> StoreResult<Vec<Blueprint>> {
        let blueprints = self.store.get_all().await?;
        Ok(self.apply_all(blueprints))
    }

    pub async fn get_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>> {
        let blueprints = self.store.get_by_author(author).await?;
        Ok(self.apply_all(blueprints))
    }

    pub async fn get(&self, author: &str, name: &str) -> StoreResult<Blueprint> {
        let blueprint = self.store.get(author, name).await?;
        Ok(self.filter.apply(blueprint))
    }

    pub async fn add(&self, blueprint: Blueprint) -> StoreResult<()> {
        self.store.save(blueprint).await
    }

    pub async fn add_point(&self, author: &str, name: &str, x: i32, y: i32) -> StoreResult<()> {
        self.store.add_point(author, name, x, y).await
    }

    fn apply_all(&self, blueprints: Vec<Blueprint>) -> Vec<Blueprint> {
        blueprints
            .into_iter()
            .map(|bp| self.filter.apply(bp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{MockBlueprintStore, StoreError},
        models::Point,
    };

    fn raw() -> Blueprint {
        Blueprint::new(
            "john",
            "shape",
            vec![
                Point::new(0, 0),
                Point::new(0, 0),
                Point::new(1, 1),
                Point::new(2, 2),
            ],
        )
    }

    fn reading_store() -> MockBlueprintStore {
        let mut store = MockBlueprintStore::new();
        store.expect_get_all().returning(|| Ok(vec![raw()]));
        store
            .expect_get_by_author()
            .returning(|_| Ok(vec![raw()]));
        store.expect_get().returning(|_, _| Ok(raw()));
        store
    }

    async fn assert_every_read_yields(service: &BlueprintsService, expected: &[Point]) {
        assert_eq!(service.get_all().await.unwrap()[0].points, expected);
        assert_eq!(
            service.get_by_author("john").await.unwrap()[0].points,
            expected
        );
        assert_eq!(service.get("john", "shape").await.unwrap().points, expected);
    }

    #[actix_web::test]
    async fn redundancy_filters_every_read() {
        let service = BlueprintsService::new(Arc::new(reading_store()), BlueprintFilter::Redundancy);

        let expected = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)];
        assert_every_read_yields(&service, &expected).await;
    }

    #[actix_web::test]
    async fn undersampling_filters_every_read() {
        let service =
            BlueprintsService::new(Arc::new(reading_store()), BlueprintFilter::Undersampling);

        let expected = [Point::new(0, 0), Point::new(1, 1)];
        assert_every_read_yields(&service, &expected).await;
    }

    #[actix_web::test]
    async fn identity_passes_reads_through() {
        let service = BlueprintsService::new(Arc::new(reading_store()), BlueprintFilter::Identity);

        assert_every_read_yields(&service, &raw().points).await;
    }

    #[actix_web::test]
    async fn add_saves_unfiltered_blueprint() {
        let mut store = MockBlueprintStore::new();
        store
            .expect_save()
            .withf(|bp| *bp == raw())
            .times(1)
            .returning(|_| Ok(()));
        let service = BlueprintsService::new(Arc::new(store), BlueprintFilter::Redundancy);

        service.add(raw()).await.unwrap();
    }

    #[actix_web::test]
    async fn propagates_store_errors() {
        let mut store = MockBlueprintStore::new();
        store
            .expect_get()
            .returning(|author, name| Err(StoreError::blueprint_not_found(author, name)));
        store
            .expect_save()
            .returning(|bp| Err(StoreError::already_exists(&bp.author, &bp.name)));
        store
            .expect_add_point()
            .withf(|author, name, x, y| author == "john" && name == "shape" && *x == 3 && *y == 4)
            .returning(|author, name, _, _| Err(StoreError::blueprint_not_found(author, name)));
        let service = BlueprintsService::new(Arc::new(store), BlueprintFilter::Identity);

        assert!(matches!(
            service.get("john", "shape").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            service.add(raw()).await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(matches!(
            service.add_point("john", "shape", 3, 4).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
