use std::collections::HashMap;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteError, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::models::{Blueprint, Point};

use super::{BlueprintStore, StoreError, StoreResult};

const BLUEPRINTS_COLLECTION: &str = "blueprints";
const POINTS_COLLECTION: &str = "points";
const DUPLICATE_KEY: i32 = 11000;

/// Header row of a blueprint. `point_count` is the ordinal the next appended point gets.
#[derive(Debug, Serialize, Deserialize, Clone)]
struct BlueprintDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    author: String,
    name: String,
    point_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PointDocument {
    blueprint_id: ObjectId,
    x: i32,
    y: i32,
    point_order: i64,
}

impl From<&PointDocument> for Point {
    fn from(value: &PointDocument) -> Self {
        Point::new(value.x, value.y)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    )
}

/// Stores blueprints in two collections: one header document per blueprint, unique on
/// `(author, name)`, and one document per point carrying its ordinal.
#[derive(Debug, Clone)]
pub struct MongoStore {
    blueprints: Collection<BlueprintDocument>,
    points: Collection<PointDocument>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> StoreResult<MongoStore> {
        let client = Client::with_uri_str(uri).await?;
        let store = MongoStore::new(&client, database);
        store.ensure_indexes().await?;
        Ok(store)
    }

    pub fn new(client: &Client, database: &str) -> MongoStore {
        let db = client.database(database);
        MongoStore {
            blueprints: db.collection(BLUEPRINTS_COLLECTION),
            points: db.collection(POINTS_COLLECTION),
        }
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.blueprints
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "author": 1, "name": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;

        self.points
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "blueprint_id": 1, "point_order": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;

        log::debug!("blueprint indexes are in place");
        Ok(())
    }

    async fn find_headers(&self, filter: Document) -> StoreResult<Vec<BlueprintDocument>> {
        let cursor = self.blueprints.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Assembles blueprints from their headers and every point matching `point_filter`, read in
    /// one query sorted on `(blueprint_id, point_order)`.
    async fn assemble(
        &self,
        headers: Vec<BlueprintDocument>,
        point_filter: Document,
    ) -> StoreResult<Vec<Blueprint>> {
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder()
            .sort(doc! { "blueprint_id": 1, "point_order": 1 })
            .build();
        let points: Vec<PointDocument> = self
            .points
            .find(point_filter, options)
            .await?
            .try_collect()
            .await?;

        let mut by_blueprint: HashMap<ObjectId, Vec<Point>> = HashMap::new();
        for point in &points {
            by_blueprint
                .entry(point.blueprint_id)
                .or_default()
                .push(point.into());
        }

        let blueprints = headers
            .into_iter()
            .map(|header| {
                let points = by_blueprint.remove(&header.id).unwrap_or_default();
                Blueprint::new(header.author, header.name, points)
            })
            .collect();
        Ok(blueprints)
    }

    async fn assemble_listed(
        &self,
        headers: Vec<BlueprintDocument>,
    ) -> StoreResult<Vec<Blueprint>> {
        let ids: Vec<ObjectId> = headers.iter().map(|h| h.id).collect();
        self.assemble(headers, doc! { "blueprint_id": { "$in": ids } })
            .await
    }

    /// Removes a blueprint together with every point stored under it.
    async fn remove(&self, id: ObjectId) -> StoreResult<()> {
        self.points
            .delete_many(doc! { "blueprint_id": id }, None)
            .await?;
        self.blueprints.delete_one(doc! { "_id": id }, None).await?;
        Ok(())
    }
}

#[async_trait]
impl BlueprintStore for MongoStore {
    async fn save(&self, blueprint: Blueprint) -> StoreResult<()> {
        let header = BlueprintDocument {
            id: ObjectId::new(),
            author: blueprint.author,
            name: blueprint.name,
            point_count: blueprint.points.len() as i64,
        };

        if let Err(err) = self.blueprints.insert_one(&header, None).await {
            return Err(if is_duplicate_key(&err) {
                StoreError::already_exists(&header.author, &header.name)
            } else {
                err.into()
            });
        }

        // From here until the points below are written, readers can see the blueprint with a
        // prefix of its points, possibly none.
        if blueprint.points.is_empty() {
            return Ok(());
        }

        let points = blueprint
            .points
            .iter()
            .enumerate()
            .map(|(order, point)| PointDocument {
                blueprint_id: header.id,
                x: point.x,
                y: point.y,
                point_order: order as i64,
            });

        if let Err(err) = self.points.insert_many(points, None).await {
            log::warn!(
                "storing points of {}/{} failed, removing the blueprint: {}",
                header.author,
                header.name,
                err
            );
            // insert_many is ordered, so a prefix of the points may already be stored. Points
            // appended concurrently in the meantime go with them.
            self.remove(header.id).await?;
            return Err(StoreError::Persistence(format!(
                "Could not store points of blueprint {}/{}",
                header.author, header.name
            )));
        }

        Ok(())
    }

    async fn get(&self, author: &str, name: &str) -> StoreResult<Blueprint> {
        let Some(header) = self
            .blueprints
            .find_one(doc! { "author": author, "name": name }, None)
            .await?
        else {
            return Err(StoreError::blueprint_not_found(author, name));
        };

        let mut found = self.assemble_listed(vec![header]).await?;
        found
            .pop()
            .ok_or_else(|| StoreError::blueprint_not_found(author, name))
    }

    async fn get_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>> {
        let headers = self.find_headers(doc! { "author": author }).await?;
        if headers.is_empty() {
            return Err(StoreError::author_not_found(author));
        }
        self.assemble_listed(headers).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Blueprint>> {
        let headers = self.find_headers(doc! {}).await?;
        self.assemble(headers, doc! {}).await
    }

    async fn add_point(&self, author: &str, name: &str, x: i32, y: i32) -> StoreResult<()> {
        // Reserving the ordinal and inserting are separate writes; the $inc alone decides
        // which ordinal each concurrent append gets.
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let header = self
            .blueprints
            .find_one_and_update(
                doc! { "author": author, "name": name },
                doc! { "$inc": { "point_count": 1_i64 } },
                options,
            )
            .await?
            .ok_or_else(|| StoreError::blueprint_not_found(author, name))?;

        let point = PointDocument {
            blueprint_id: header.id,
            x,
            y,
            point_order: header.point_count,
        };
        self.points.insert_one(&point, None).await?;

        log::debug!(
            "appended point {} to {}/{}",
            header.point_count,
            author,
            name
        );
        Ok(())
    }
}
