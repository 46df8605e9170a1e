use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::{AppState, Params, RestError},
    types::{Caller, Capability, GuestAuthor, GuestAuthorFields, Reassign},
    utils,
};

const REQUIRED_ON_CREATE: [&str; 3] = ["display_name", "user_login", "user_email"];

fn authorization(state: &AppState, caller: &Caller) -> Result<(), RestError> {
    if state.service.current_user_can(caller, Capability::ListUsers) {
        Ok(())
    } else {
        Err(RestError::forbidden())
    }
}

fn parse_guest_id(raw: &str) -> Result<u64, RestError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(RestError::guest_not_found)
}

fn guest_fields(params: &Params) -> GuestAuthorFields {
    let text = |key: &str| params.string(key).map(|v| utils::sanitize_text_field(&v));

    GuestAuthorFields {
        display_name: text("display_name"),
        user_login: params.string("user_login").map(|v| utils::sanitize_user(&v)),
        user_email: text("user_email"),
        first_name: text("first_name"),
        last_name: text("last_name"),
        website: params.string("website").map(|v| utils::normalize_url(&v)),
        aim: text("aim"),
        yahooim: text("yahooim"),
        jabber: text("jabber"),
        description: params.string("description").map(|v| v.trim().to_string()),
        linked_account: params
            .nullable_string("linked_account")
            .map(|v| v.map(|l| utils::sanitize_user(&l)).unwrap_or_default()),
    }
}

/// `GET /{namespace}/guests?q=...`
pub async fn search(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<GuestAuthor>>, RestError> {
    authorization(&state, &caller)?;

    let params = Params::from_query(query);
    params.require(&["q"])?;
    let q = utils::sanitize_key(&params.string("q").unwrap_or_default());

    Ok(Json(state.service.guest_authors().search(&q)))
}

/// `POST /{namespace}/guests`
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Vec<GuestAuthor>>), RestError> {
    authorization(&state, &caller)?;

    let params = Params::from_request(query, &body)?;
    params.require(&REQUIRED_ON_CREATE)?;
    let fields = guest_fields(&params);

    let guest = state.service.guest_authors().create(fields)?;
    state.persist().await;
    Ok((StatusCode::CREATED, Json(vec![guest])))
}

/// `GET /{namespace}/guests/{id}`
pub async fn get(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<GuestAuthor>>, RestError> {
    authorization(&state, &caller)?;

    let id = parse_guest_id(&id)?;
    let guest = state
        .service
        .guest_authors()
        .get(id)
        .ok_or_else(RestError::guest_not_found)?;
    Ok(Json(vec![guest]))
}

/// `PUT /{namespace}/guests/{id}`. The login cannot be changed.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<Vec<GuestAuthor>>, RestError> {
    authorization(&state, &caller)?;

    let params = Params::from_request(query, &body)?;
    let id = parse_guest_id(&id)?;
    let fields = GuestAuthorFields {
        user_login: None,
        ..guest_fields(&params)
    };

    let guest = state.service.guest_authors().update(id, fields)?;
    state.persist().await;
    Ok(Json(vec![guest]))
}

/// `DELETE /{namespace}/guests/{id}?reassign=...&leave-assigned-to=...`
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<Vec<GuestAuthor>>, RestError> {
    authorization(&state, &caller)?;

    let params = Params::from_request(query, &body)?;
    params.require(&["reassign"])?;

    let raw = params.string("reassign").unwrap_or_default();
    let reassign = Reassign::parse(&raw).ok_or_else(|| {
        RestError::invalid_param(
            "reassign",
            &format!("reassign is not one of {}", Reassign::ALL.join(", ")),
        )
    })?;

    let target = match reassign {
        Reassign::ReassignAnother => {
            let target = params
                .string("leave-assigned-to")
                .map(|t| utils::sanitize_text_field(&t))
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    RestError::invalid_param(
                        "leave-assigned-to",
                        "leave-assigned-to is required to reassign posts",
                    )
                })?;
            Some(target)
        }
        _ => None,
    };

    let id = parse_guest_id(&id)?;
    let guest = state
        .service
        .guest_authors()
        .delete(id, reassign, target.as_deref())?;
    state.persist().await;
    Ok(Json(vec![guest]))
}
