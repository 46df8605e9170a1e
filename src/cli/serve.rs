use crate::{error, server};

pub async fn serve() {
    if let Err(e) = server::start_api_server().await {
        error!("Cannot run API server. Err: {}", e);
    }
}
