use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::{
    api::{AppState, Params, RestError},
    types::{AuthorRecord, Caller},
    utils,
};

/// Output shape of a single co-author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoauthorData {
    pub id: u64,
    pub display_name: String,
    pub user_email: String,
    pub user_nicename: String,
}

impl From<AuthorRecord> for CoauthorData {
    fn from(record: AuthorRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            user_email: record.user_email,
            user_nicename: record.user_nicename,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoauthorsResponse {
    pub coauthors: Vec<CoauthorData>,
}

impl CoauthorsResponse {
    pub fn new(records: Vec<AuthorRecord>) -> Self {
        Self {
            coauthors: records.into_iter().map(CoauthorData::from).collect(),
        }
    }
}

/// `GET /{namespace}/authors/?q=...&exclude_authors=a,b`
pub async fn search(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<CoauthorsResponse>, RestError> {
    if !authorization(&state, &caller) {
        return Err(RestError::forbidden());
    }

    let params = Params::from_query(query);
    params.require(&["q"])?;

    let q = utils::sanitize_key(&params.string("q").unwrap_or_default()).to_lowercase();
    let exclude = params
        .string("exclude_authors")
        .map(|raw| utils::split_list(&raw))
        .unwrap_or_default();

    let found = state.service.search_authors(&q, &exclude);
    let coauthors = (state.author_filter)(found);

    Ok(Json(CoauthorsResponse::new(coauthors)))
}

fn authorization(state: &AppState, caller: &Caller) -> bool {
    state.service.current_user_can_set_authors(caller, None, true)
}
