use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    blueprint::BlueprintsService,
    db::StoreError,
    models::{Blueprint, Point},
    routes::util::{accepted, created, ok},
    util::Result,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_blueprints)
        .service(list_author_blueprints)
        .service(get_blueprint)
        .service(create_blueprint)
        .service(add_point)
        .service(openapi_json);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_blueprints,
        list_author_blueprints,
        get_blueprint,
        create_blueprint,
        add_point
    ),
    components(schemas(
        Point,
        Blueprint,
        NewBlueprint,
        BlueprintsEnvelope,
        BlueprintEnvelope,
        EmptyEnvelope
    )),
    servers((url = "/api/v1")),
    tags((name = "blueprints", description = "Author-owned point blueprints"))
)]
struct ApiDoc;

// Response bodies as they appear in the document. Handlers build them through
// `routes::util::ApiResponse`.
#[allow(dead_code)]
#[derive(ToSchema)]
struct BlueprintsEnvelope {
    #[schema(example = 200)]
    code: u16,
    #[schema(example = "execute ok")]
    message: String,
    data: Vec<Blueprint>,
}

#[allow(dead_code)]
#[derive(ToSchema)]
struct BlueprintEnvelope {
    #[schema(example = 200)]
    code: u16,
    #[schema(example = "execute ok")]
    message: String,
    data: Blueprint,
}

/// Every status other than a successful read; `data` is always `null`.
#[allow(dead_code)]
#[derive(ToSchema)]
struct EmptyEnvelope {
    code: u16,
    message: String,
    data: Option<String>,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Missing `author`/`name` deserialize as empty so they are reported as blank fields.
#[derive(Debug, Deserialize, Validate, ToSchema)]
struct NewBlueprint {
    #[serde(default)]
    #[validate(custom = "not_blank")]
    author: String,
    #[serde(default)]
    #[validate(custom = "not_blank")]
    name: String,
    #[serde(default)]
    points: Option<Vec<Point>>,
}

impl From<NewBlueprint> for Blueprint {
    fn from(value: NewBlueprint) -> Self {
        Blueprint::new(value.author, value.name, value.points.unwrap_or_default())
    }
}

#[utoipa::path(
    tag = "blueprints",
    responses((status = 200, description = "Every stored blueprint, filtered", body = BlueprintsEnvelope))
)]
#[get("/blueprints")]
async fn list_blueprints(service: web::Data<BlueprintsService>) -> Result<impl Responder> {
    let blueprints = service.get_all().await?;
    Ok(ok(blueprints))
}

#[utoipa::path(
    tag = "blueprints",
    params(("author" = String, Path, description = "Author whose blueprints are listed")),
    responses((
        status = 200,
        description = "The author's blueprints, filtered; empty when the author has none",
        body = BlueprintsEnvelope
    ))
)]
#[get("/blueprints/{author}")]
async fn list_author_blueprints(
    service: web::Data<BlueprintsService>,
    author: web::Path<String>,
) -> Result<impl Responder> {
    let blueprints = match service.get_by_author(&author).await {
        Ok(blueprints) => blueprints,
        // Listing an author with nothing stored is an empty result, not a missing resource.
        Err(StoreError::NotFound(_)) => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    Ok(ok(blueprints))
}

#[utoipa::path(
    tag = "blueprints",
    params(
        ("author" = String, Path, description = "Blueprint author"),
        ("name" = String, Path, description = "Blueprint name")
    ),
    responses(
        (status = 200, description = "The blueprint, filtered", body = BlueprintEnvelope),
        (status = 404, description = "No such blueprint", body = EmptyEnvelope)
    )
)]
#[get("/blueprints/{author}/{name}")]
async fn get_blueprint(
    service: web::Data<BlueprintsService>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder> {
    let (author, name) = path.into_inner();
    let blueprint = service.get(&author, &name).await?;
    Ok(ok(blueprint))
}

#[utoipa::path(
    tag = "blueprints",
    request_body = NewBlueprint,
    responses(
        (status = 201, description = "Stored as sent, unfiltered", body = EmptyEnvelope),
        (status = 400, description = "Blank author or name, or an unreadable body", body = EmptyEnvelope),
        (status = 409, description = "A blueprint with this author and name exists", body = EmptyEnvelope)
    )
)]
#[post("/blueprints")]
async fn create_blueprint(
    service: web::Data<BlueprintsService>,
    body: web::Json<NewBlueprint>,
) -> Result<impl Responder> {
    let body = body.into_inner();
    body.validate()?;

    service.add(body.into()).await?;
    Ok(created())
}

#[utoipa::path(
    tag = "blueprints",
    params(
        ("author" = String, Path, description = "Blueprint author"),
        ("name" = String, Path, description = "Blueprint name")
    ),
    request_body = Point,
    responses(
        (status = 202, description = "Point appended after the existing ones", body = EmptyEnvelope),
        (status = 400, description = "Unreadable point", body = EmptyEnvelope),
        (status = 404, description = "No such blueprint", body = EmptyEnvelope)
    )
)]
#[put("/blueprints/{author}/{name}/points")]
async fn add_point(
    service: web::Data<BlueprintsService>,
    path: web::Path<(String, String)>,
    point: web::Json<Point>,
) -> Result<impl Responder> {
    let (author, name) = path.into_inner();
    let Point { x, y } = point.into_inner();
    service.add_point(&author, &name, x, y).await?;
    Ok(accepted("updated"))
}

#[get("/openapi.json")]
async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
