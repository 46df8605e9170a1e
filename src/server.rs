use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Router, extract::Request, middleware::Next, response::Response};

use crate::{
    Res,
    api::{self, AppState},
    config, info,
    management::Directory,
    success,
};

/// Builds the application router with request logging.
pub fn app(namespace: &str, state: AppState) -> Router {
    api::routes(namespace, state).layer(axum::middleware::from_fn(log_request))
}

/// Loads the directory snapshot and serves the API until the process exits.
pub async fn start_api_server() -> Res<()> {
    let data_file = config::data_file();
    let directory = Arc::new(Directory::load_or_default(&data_file).await?);
    info!("Loaded directory from {}", data_file.display());

    let state = AppState::new(directory.clone()).with_snapshot(directory, data_file);
    let namespace = config::namespace();
    let app = app(&namespace, state);

    let addr = SocketAddr::from_str(&config::server_addr())?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    success!("Listening on http://{}/{}", addr, namespace);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let res = next.run(req).await;
    info!("{} {} {}", method, path, res.status().as_u16());
    res
}
