use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};

use crate::{
    api::{AppState, CoauthorsResponse, Params, RestError},
    types::{Caller, PostId},
    utils,
};

fn parse_post_id(raw: &str) -> Result<PostId, RestError> {
    raw.parse::<PostId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(RestError::post_not_found)
}

/// `GET /{namespace}/posts/{id}/authors`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CoauthorsResponse>, RestError> {
    let id = parse_post_id(&id)?;
    let coauthors = state.service.get_coauthors(id)?;
    Ok(Json(CoauthorsResponse::new(coauthors)))
}

/// `PUT /{namespace}/posts/{id}/authors` with `coauthors` and `append`.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<CoauthorsResponse>, RestError> {
    let id = parse_post_id(&id)?;
    if !state
        .service
        .current_user_can_set_authors(&caller, Some(id), false)
    {
        return Err(RestError::forbidden());
    }

    let params = Params::from_request(query, &body)?;
    params.require(&["coauthors"])?;
    let logins: Vec<String> = params
        .list("coauthors")?
        .unwrap_or_default()
        .iter()
        .map(|l| utils::sanitize_text_field(l))
        .filter(|l| !l.is_empty())
        .collect();
    let append = params.bool("append", false)?;

    if !state.service.post_exists(id) {
        return Err(RestError::post_not_found());
    }

    let coauthors = state.service.add_coauthors(id, &logins, append)?;
    state.persist().await;
    Ok(Json(CoauthorsResponse::new(coauthors)))
}

/// `DELETE /{namespace}/posts/{id}/authors/{author_id}`
pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, author)): Path<(String, String)>,
) -> Result<Json<CoauthorsResponse>, RestError> {
    let id = parse_post_id(&id)?;
    if !state
        .service
        .current_user_can_set_authors(&caller, Some(id), false)
    {
        return Err(RestError::forbidden());
    }
    if !state.service.post_exists(id) {
        return Err(RestError::post_not_found());
    }

    let author = author
        .parse::<u64>()
        .map_err(|_| RestError::invalid_param("author_id", "author_id is not of type integer"))?;

    let coauthors = state.service.remove_coauthor(id, author)?;
    state.persist().await;
    Ok(Json(CoauthorsResponse::new(coauthors)))
}
