use crate::{config, error, management::Directory, success};

/// Issues a bearer token for `login` and stores it in the directory snapshot.
///
/// Any previous token of that user stops working. The token is printed on
/// its own line so it can be captured by scripts.
pub async fn token(login: String) {
    let path = config::data_file();
    let directory = match Directory::load_or_default(&path).await {
        Ok(d) => d,
        Err(e) => error!("Cannot load directory {}. Err: {}", path.display(), e),
    };

    let Some(user) = directory.find_user(&login) else {
        error!("No user with login '{}' in {}", login, path.display());
    };
    let Some(token) = directory.issue_token(user.id) else {
        error!("Cannot issue a token for '{}'", login);
    };

    if let Err(e) = directory.persist(&path).await {
        error!("Cannot write {}. Err: {}", path.display(), e);
    }

    success!("Issued token for {} ({:?})", user.user_login, user.role);
    println!("{}", token);
}
