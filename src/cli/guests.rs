use tabled::Table;

use crate::{
    config, error,
    management::{Directory, GuestAuthorRepository},
    types::{GuestAuthor, GuestTableRow},
    utils, warning,
};

pub async fn guests(query: Option<String>) {
    let path = config::data_file();
    let directory = match Directory::load_or_default(&path).await {
        Ok(d) => d,
        Err(e) => error!("Cannot load directory {}. Err: {}", path.display(), e),
    };

    let mut found: Vec<GuestAuthor> = match query {
        Some(q) => directory.search(&utils::sanitize_key(&q)),
        None => directory.guests(),
    };
    if found.is_empty() {
        warning!("No guest authors found.");
        return;
    }

    found.sort_by(|a, b| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()));
    let rows: Vec<GuestTableRow> = found.into_iter().map(GuestTableRow::from).collect();
    println!("{}", Table::new(rows));
}
