use tabled::Table;

use crate::{
    config, error,
    management::{CoauthorsService, Directory},
    types::AuthorTableRow,
    utils, warning,
};

/// Searches the directory the way `GET /authors/` does and prints a table.
pub async fn authors(query: String, exclude: Option<String>) {
    let path = config::data_file();
    let directory = match Directory::load_or_default(&path).await {
        Ok(d) => d,
        Err(e) => error!("Cannot load directory {}. Err: {}", path.display(), e),
    };

    let query = utils::sanitize_key(&query);
    let exclude = exclude
        .map(|raw| utils::split_list(&raw))
        .unwrap_or_default();

    let found = directory.search_authors(&query, &exclude);
    if found.is_empty() {
        warning!("No authors match '{}'", query);
        return;
    }

    let rows: Vec<AuthorTableRow> = found.into_iter().map(AuthorTableRow::from).collect();
    println!("{}", Table::new(rows));
}
