use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;

use crate::{
    management::{CoauthorsService, DirectoryError, GuestAuthorRepository},
    types::{
        AuthorRecord, Caller, Capability, DirectorySnapshot, GuestAuthor, GuestAuthorFields,
        Post, PostId, Reassign, Role, User, UserId,
    },
    utils,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    guests: Vec<GuestAuthor>,
    posts: Vec<Post>,
    next_id: u64,
}

impl Tables {
    fn from_snapshot(snapshot: DirectorySnapshot) -> Result<Self, DirectoryError> {
        let max_id = snapshot
            .users
            .iter()
            .map(|u| u.id)
            .chain(snapshot.guests.iter().map(|g| g.id))
            .chain(snapshot.posts.iter().map(|p| p.id))
            .max()
            .unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(DirectoryError::IdsExhausted)?;

        Ok(Self {
            users: snapshot.users,
            guests: snapshot.guests,
            posts: snapshot.posts,
            next_id,
        })
    }

    fn allocate_id(&mut self) -> Result<u64, DirectoryError> {
        let id = self.next_id.max(1);
        self.next_id = id.checked_add(1).ok_or(DirectoryError::IdsExhausted)?;
        Ok(id)
    }

    fn user_record(user: &User) -> AuthorRecord {
        AuthorRecord {
            id: user.id,
            user_login: user.user_login.clone(),
            display_name: user.display_name.clone(),
            user_email: user.user_email.clone(),
            user_nicename: user.user_nicename.clone(),
        }
    }

    fn record_for(&self, id: u64) -> Option<AuthorRecord> {
        if let Some(user) = self.users.iter().find(|u| u.id == id) {
            return Some(Self::user_record(user));
        }
        self.guests
            .iter()
            .find(|g| g.id == id)
            .map(GuestAuthor::to_record)
    }

    fn author_id_for_login(&self, login: &str) -> Option<u64> {
        self.users
            .iter()
            .find(|u| {
                u.user_login.eq_ignore_ascii_case(login)
                    || u.user_nicename.eq_ignore_ascii_case(login)
            })
            .map(|u| u.id)
            .or_else(|| {
                self.guests
                    .iter()
                    .find(|g| g.user_login.eq_ignore_ascii_case(login))
                    .map(|g| g.id)
            })
    }

    fn login_in_use(&self, login: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.user_login.eq_ignore_ascii_case(login))
            || self
                .guests
                .iter()
                .any(|g| g.user_login.eq_ignore_ascii_case(login))
    }

    fn post(&self, id: PostId) -> Result<&Post, DirectoryError> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .ok_or(DirectoryError::PostNotFound(id))
    }

    fn post_mut(&mut self, id: PostId) -> Result<&mut Post, DirectoryError> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DirectoryError::PostNotFound(id))
    }

    fn coauthor_records(&self, post: &Post) -> Vec<AuthorRecord> {
        post.coauthors
            .iter()
            .filter_map(|id| self.record_for(*id))
            .collect()
    }

    fn check_email(&self, email: &str, except: Option<u64>) -> Result<(), DirectoryError> {
        if !utils::is_email(email) {
            return Err(DirectoryError::InvalidEmail(email.to_string()));
        }
        let taken = self
            .guests
            .iter()
            .any(|g| Some(g.id) != except && g.user_email.eq_ignore_ascii_case(email));
        if taken {
            return Err(DirectoryError::EmailTaken(email.to_string()));
        }
        Ok(())
    }

    fn check_linked_account(&self, login: &str, except: Option<u64>) -> Result<(), DirectoryError> {
        let exists = self
            .users
            .iter()
            .any(|u| u.user_login.eq_ignore_ascii_case(login));
        let linked_elsewhere = self.guests.iter().any(|g| {
            Some(g.id) != except
                && g
                    .linked_account
                    .as_deref()
                    .is_some_and(|l| l.eq_ignore_ascii_case(login))
        });
        if !exists || linked_elsewhere {
            return Err(DirectoryError::InvalidLinkedAccount(login.to_string()));
        }
        Ok(())
    }
}

/// In-memory host: users, guest authors and posts, with co-author links
/// stored on the posts.
#[derive(Debug, Default)]
pub struct Directory {
    tables: RwLock<Tables>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when the snapshot leaves no room for new ids.
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Result<Self, DirectoryError> {
        Ok(Self {
            tables: RwLock::new(Tables::from_snapshot(snapshot)?),
        })
    }

    pub async fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = async_fs::read_to_string(path).await?;
        let snapshot: DirectorySnapshot = serde_json::from_str(&content)?;
        Self::from_snapshot(snapshot)
    }

    /// Like [`Directory::load`], but a missing file yields an empty directory.
    pub async fn load_or_default(path: &Path) -> Result<Self, DirectoryError> {
        match Self::load(path).await {
            Err(DirectoryError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            other => other,
        }
    }

    /// Writes the snapshot next to `path` first and renames it over the
    /// target, so readers never see a half-written file.
    pub async fn persist(&self, path: &Path) -> Result<(), DirectoryError> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.snapshot())?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        let t = self.read();
        DirectorySnapshot {
            users: t.users.clone(),
            guests: t.guests.clone(),
            posts: t.posts.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn add_user(
        &self,
        login: &str,
        display_name: &str,
        email: &str,
        role: Role,
    ) -> Result<User, DirectoryError> {
        let mut t = self.write();
        let user = User {
            id: t.allocate_id()?,
            user_login: login.to_string(),
            user_nicename: utils::sanitize_title(login),
            display_name: display_name.to_string(),
            user_email: email.to_string(),
            role,
            token: None,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    pub fn find_user(&self, login: &str) -> Option<User> {
        self.read()
            .users
            .iter()
            .find(|u| u.user_login.eq_ignore_ascii_case(login))
            .cloned()
    }

    /// Gives the user a fresh bearer token, replacing any previous one.
    pub fn issue_token(&self, user: UserId) -> Option<String> {
        let mut t = self.write();
        let user = t.users.iter_mut().find(|u| u.id == user)?;
        let token = utils::generate_token();
        user.token = Some(token.clone());
        Some(token)
    }

    pub fn add_post(&self, title: &str, author: UserId) -> Result<PostId, DirectoryError> {
        let mut t = self.write();
        let id = t.allocate_id()?;
        t.posts.push(Post {
            id,
            title: title.to_string(),
            post_author: author,
            coauthors: vec![author],
        });
        Ok(id)
    }

    pub fn guests(&self) -> Vec<GuestAuthor> {
        self.read().guests.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CoauthorsService for Directory {
    fn resolve_caller(&self, token: Option<&str>) -> Caller {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Caller::anonymous();
        };
        let t = self.read();
        Caller {
            user: t
                .users
                .iter()
                .find(|u| u.token.as_deref() == Some(token))
                .cloned(),
        }
    }

    fn current_user_can(&self, caller: &Caller, cap: Capability) -> bool {
        caller.user.as_ref().is_some_and(|u| u.role.has_cap(cap))
    }

    fn current_user_can_set_authors(
        &self,
        caller: &Caller,
        post: Option<PostId>,
        any_post: bool,
    ) -> bool {
        let Some(user) = &caller.user else {
            return false;
        };
        if user.role.has_cap(Capability::EditOthersPosts) {
            return true;
        }
        if any_post || !user.role.has_cap(Capability::EditPosts) {
            return false;
        }

        let t = self.read();
        post.and_then(|id| t.post(id).ok())
            .is_some_and(|p| p.post_author == user.id)
    }

    fn search_authors(&self, query: &str, exclude: &[String]) -> Vec<AuthorRecord> {
        let query = query.to_lowercase();
        let is_match = |r: &AuthorRecord| {
            query.is_empty()
                || [&r.user_login, &r.user_nicename, &r.display_name, &r.user_email]
                    .iter()
                    .any(|f| f.to_lowercase().contains(&query))
        };
        let is_excluded = |r: &AuthorRecord| {
            exclude.iter().any(|e| {
                e.eq_ignore_ascii_case(&r.user_login) || e.eq_ignore_ascii_case(&r.user_nicename)
            })
        };

        let t = self.read();
        let mut found: Vec<AuthorRecord> = t
            .users
            .iter()
            .filter(|u| u.role.has_cap(Capability::EditPosts))
            .map(Tables::user_record)
            .chain(t.guests.iter().map(GuestAuthor::to_record))
            .filter(|r| is_match(r) && !is_excluded(r))
            .collect();

        found.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        found
    }

    fn post_exists(&self, post: PostId) -> bool {
        self.read().post(post).is_ok()
    }

    fn get_coauthors(&self, post: PostId) -> Result<Vec<AuthorRecord>, DirectoryError> {
        let t = self.read();
        let post = t.post(post)?;
        Ok(t.coauthor_records(post))
    }

    fn add_coauthors(
        &self,
        post: PostId,
        logins: &[String],
        append: bool,
    ) -> Result<Vec<AuthorRecord>, DirectoryError> {
        let mut t = self.write();
        let resolved: Vec<u64> = logins
            .iter()
            .filter_map(|l| t.author_id_for_login(l))
            .collect();

        let target = t.post_mut(post)?;
        if !append {
            target.coauthors.clear();
        }
        for id in resolved {
            if !target.coauthors.contains(&id) {
                target.coauthors.push(id);
            }
        }
        if target.coauthors.is_empty() {
            target.coauthors.push(target.post_author);
        }

        let post = t.post(post)?;
        Ok(t.coauthor_records(post))
    }

    fn remove_coauthor(
        &self,
        post: PostId,
        author: u64,
    ) -> Result<Vec<AuthorRecord>, DirectoryError> {
        let mut t = self.write();
        let current = t.post(post)?;
        if !current.coauthors.contains(&author) {
            return Err(DirectoryError::AuthorNotAttached { post, author });
        }
        // Ids left behind by deleted guests do not count as authors.
        let remaining = current
            .coauthors
            .iter()
            .filter(|id| **id != author && t.record_for(**id).is_some())
            .count();
        if remaining == 0 {
            return Err(DirectoryError::LastAuthor(post));
        }

        t.post_mut(post)?.coauthors.retain(|id| *id != author);

        let post = t.post(post)?;
        Ok(t.coauthor_records(post))
    }

    fn guest_authors(&self) -> &dyn GuestAuthorRepository {
        self
    }
}

impl GuestAuthorRepository for Directory {
    fn search(&self, query: &str) -> Vec<GuestAuthor> {
        let query = query.to_lowercase();
        self.read()
            .guests
            .iter()
            .filter(|g| {
                [
                    &g.user_login,
                    &g.display_name,
                    &g.first_name,
                    &g.last_name,
                    &g.user_email,
                ]
                .iter()
                .any(|f| f.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    fn get(&self, id: u64) -> Option<GuestAuthor> {
        self.read().guests.iter().find(|g| g.id == id).cloned()
    }

    fn create(&self, fields: GuestAuthorFields) -> Result<GuestAuthor, DirectoryError> {
        let mut t = self.write();

        let login = fields.user_login.unwrap_or_default().trim().to_string();
        if login.is_empty() {
            return Err(DirectoryError::FieldRequired("user_login"));
        }
        let display_name = fields.display_name.unwrap_or_default().trim().to_string();
        if display_name.is_empty() {
            return Err(DirectoryError::FieldRequired("display_name"));
        }
        if t.login_in_use(&login) {
            return Err(DirectoryError::LoginTaken(login));
        }
        let email = fields.user_email.unwrap_or_default();
        if !email.is_empty() {
            t.check_email(&email, None)?;
        }
        let linked_account = fields.linked_account.filter(|l| !l.is_empty());
        if let Some(linked) = &linked_account {
            t.check_linked_account(linked, None)?;
        }

        let guest = GuestAuthor {
            id: t.allocate_id()?,
            display_name,
            user_login: login,
            user_email: email,
            first_name: fields.first_name.unwrap_or_default(),
            last_name: fields.last_name.unwrap_or_default(),
            website: fields.website.unwrap_or_default(),
            aim: fields.aim.unwrap_or_default(),
            yahooim: fields.yahooim.unwrap_or_default(),
            jabber: fields.jabber.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            linked_account,
        };
        t.guests.push(guest.clone());
        Ok(guest)
    }

    fn update(&self, id: u64, fields: GuestAuthorFields) -> Result<GuestAuthor, DirectoryError> {
        let mut t = self.write();
        if !t.guests.iter().any(|g| g.id == id) {
            return Err(DirectoryError::GuestNotFound(id));
        }

        if let Some(email) = fields.user_email.as_deref().filter(|e| !e.is_empty()) {
            t.check_email(email, Some(id))?;
        }
        let linked_account = fields.linked_account.map(|l| Some(l).filter(|l| !l.is_empty()));
        if let Some(Some(linked)) = &linked_account {
            t.check_linked_account(linked, Some(id))?;
        }
        if let Some(name) = &fields.display_name {
            if name.trim().is_empty() {
                return Err(DirectoryError::FieldRequired("display_name"));
            }
        }

        let guest = t
            .guests
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(DirectoryError::GuestNotFound(id))?;

        let assign = |slot: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *slot = v;
            }
        };
        assign(&mut guest.display_name, fields.display_name.map(|n| n.trim().to_string()));
        assign(&mut guest.user_email, fields.user_email);
        assign(&mut guest.first_name, fields.first_name);
        assign(&mut guest.last_name, fields.last_name);
        assign(&mut guest.website, fields.website);
        assign(&mut guest.aim, fields.aim);
        assign(&mut guest.yahooim, fields.yahooim);
        assign(&mut guest.jabber, fields.jabber);
        assign(&mut guest.description, fields.description);
        if let Some(linked) = linked_account {
            guest.linked_account = linked;
        }

        Ok(guest.clone())
    }

    fn delete(
        &self,
        id: u64,
        reassign: Reassign,
        target: Option<&str>,
    ) -> Result<GuestAuthor, DirectoryError> {
        let mut t = self.write();
        let index = t
            .guests
            .iter()
            .position(|g| g.id == id)
            .ok_or(DirectoryError::GuestNotFound(id))?;

        let replacement = match reassign {
            Reassign::LeaveAssigned => t.guests[index]
                .linked_account
                .clone()
                .and_then(|login| t.author_id_for_login(&login)),
            Reassign::ReassignAnother => {
                let login = target.unwrap_or_default();
                let found = t.author_id_for_login(login).filter(|found| *found != id);
                match found {
                    Some(found) => Some(found),
                    None => return Err(DirectoryError::ReassignTargetNotFound(login.to_string())),
                }
            }
            Reassign::RemoveByline => None,
        };

        let guest = t.guests.remove(index);

        for post in t.posts.iter_mut().filter(|p| p.coauthors.contains(&id)) {
            match (reassign, replacement) {
                (Reassign::LeaveAssigned, None) => {}
                (_, Some(other)) if post.coauthors.contains(&other) => {
                    post.coauthors.retain(|a| *a != id);
                }
                (_, Some(other)) => {
                    for a in post.coauthors.iter_mut().filter(|a| **a == id) {
                        *a = other;
                    }
                }
                (_, None) => {
                    post.coauthors.retain(|a| *a != id);
                    if post.coauthors.is_empty() {
                        post.coauthors.push(post.post_author);
                    }
                }
            }
        }

        Ok(guest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(login: &str, name: &str, email: &str) -> GuestAuthorFields {
        GuestAuthorFields {
            user_login: Some(login.to_string()),
            display_name: Some(name.to_string()),
            user_email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_skips_subscribers_and_honors_exclude() {
        let dir = Directory::new();
        dir.add_user("editor2", "Editor Two", "editor2@example.org", Role::Editor).unwrap();
        dir.add_user("subscriber1", "Sub Editor", "sub@example.org", Role::Subscriber).unwrap();
        dir.add_user("author1", "Author One", "author1@example.org", Role::Author).unwrap();

        let found = dir.search_authors("editor", &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_login, "editor2");

        let found = dir.search_authors("", &["editor2".to_string()]);
        let logins: Vec<&str> = found.iter().map(|r| r.user_login.as_str()).collect();
        assert_eq!(logins, vec!["author1"]);
    }

    #[test]
    fn test_add_coauthors_replace_and_append() {
        let dir = Directory::new();
        let author = dir.add_user("author1", "Author One", "a1@example.org", Role::Author).unwrap();
        let editor = dir.add_user("editor2", "Editor Two", "e2@example.org", Role::Editor).unwrap();
        let post = dir.add_post("Hello", author.id).unwrap();

        let records = dir
            .add_coauthors(post, &["editor2".to_string(), "missing".to_string()], false)
            .unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![editor.id]);

        let records = dir
            .add_coauthors(post, &["author1".to_string(), "editor2".to_string()], true)
            .unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![editor.id, author.id]);

        let records = dir.add_coauthors(post, &[], false).unwrap();
        assert_eq!(records[0].id, author.id);
    }

    #[test]
    fn test_remove_last_author_is_refused() {
        let dir = Directory::new();
        let author = dir.add_user("author1", "Author One", "a1@example.org", Role::Author).unwrap();
        let post = dir.add_post("Hello", author.id).unwrap();

        assert!(matches!(
            dir.remove_coauthor(post, author.id),
            Err(DirectoryError::LastAuthor(_))
        ));
        assert!(matches!(
            dir.remove_coauthor(post, 4242),
            Err(DirectoryError::AuthorNotAttached { .. })
        ));
    }

    #[test]
    fn test_guest_create_rejects_conflicts() {
        let dir = Directory::new();
        dir.add_user("admin", "admin", "admin@example.org", Role::Administrator).unwrap();

        let err = dir.create(fields("admin", "Admin Guest", "x@email.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::LoginTaken(_)));

        let err = dir.create(fields("", "Nobody", "n@email.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::FieldRequired("user_login")));

        dir.create(fields("johndoe", "John Doe", "jdoe@email.com")).unwrap();
        let err = dir.create(fields("janedoe", "Jane Doe", "JDOE@email.com")).unwrap_err();
        assert!(matches!(err, DirectoryError::EmailTaken(_)));

        let err = dir.create(fields("janedoe", "Jane Doe", "not-an-email")).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidEmail(_)));
    }

    #[test]
    fn test_guest_update_keeps_login() {
        let dir = Directory::new();
        let guest = dir.create(fields("johndoe", "John Doe", "jdoe@email.com")).unwrap();

        let updated = dir
            .update(
                guest.id,
                GuestAuthorFields {
                    display_name: Some("Johnny".to_string()),
                    user_login: Some("other".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.display_name, "Johnny");
        assert_eq!(updated.user_login, "johndoe");
        assert_eq!(updated.user_email, "jdoe@email.com");
    }

    #[test]
    fn test_guest_delete_reassigns_bylines() {
        let dir = Directory::new();
        let author = dir.add_user("author1", "Author One", "a1@example.org", Role::Author).unwrap();
        let post = dir.add_post("Hello", author.id).unwrap();
        let john = dir.create(fields("johndoe", "John Doe", "jdoe@email.com")).unwrap();
        let foo = dir.create(fields("foobar", "Foo Bar", "fb@email.com")).unwrap();
        dir.add_coauthors(post, &["johndoe".to_string()], false).unwrap();

        dir.delete(john.id, Reassign::ReassignAnother, Some("foobar"))
            .unwrap();
        let ids: Vec<u64> = dir.get_coauthors(post).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![foo.id]);

        dir.delete(foo.id, Reassign::RemoveByline, None).unwrap();
        let ids: Vec<u64> = dir.get_coauthors(post).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![author.id]);
    }

    #[test]
    fn test_guest_delete_unknown_target() {
        let dir = Directory::new();
        let john = dir.create(fields("johndoe", "John Doe", "jdoe@email.com")).unwrap();

        let err = dir
            .delete(john.id, Reassign::ReassignAnother, Some("9000"))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::ReassignTargetNotFound(_)));
        assert!(dir.get(john.id).is_some());
    }

    #[test]
    fn test_snapshot_keeps_id_sequence() {
        let dir = Directory::new();
        let user = dir.add_user("author1", "Author One", "a1@example.org", Role::Author).unwrap();
        dir.add_post("Hello", user.id).unwrap();

        let restored = Directory::from_snapshot(dir.snapshot()).unwrap();
        let post = restored.add_post("Again", user.id).unwrap();
        assert_eq!(post, 3);
    }

    #[test]
    fn test_dangling_byline_does_not_count_as_author() {
        let dir = Directory::new();
        let author = dir.add_user("author1", "Author One", "a1@example.org", Role::Author).unwrap();
        let post = dir.add_post("Hello", author.id).unwrap();
        let john = dir.create(fields("johndoe", "John Doe", "jdoe@email.com")).unwrap();
        dir.add_coauthors(post, &["johndoe".to_string()], true).unwrap();

        dir.delete(john.id, Reassign::LeaveAssigned, None).unwrap();
        assert!(matches!(
            dir.remove_coauthor(post, author.id),
            Err(DirectoryError::LastAuthor(_))
        ));
        let ids: Vec<u64> = dir.get_coauthors(post).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![author.id]);

        // The dangling id itself can still be detached
        let records = dir.remove_coauthor(post, john.id).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_snapshot_with_exhausted_ids_is_rejected() {
        let snapshot = DirectorySnapshot {
            posts: vec![Post {
                id: u64::MAX,
                title: "Last".to_string(),
                post_author: 1,
                coauthors: vec![],
            }],
            ..Default::default()
        };
        assert!(matches!(
            Directory::from_snapshot(snapshot),
            Err(DirectoryError::IdsExhausted)
        ));

        let snapshot = DirectorySnapshot {
            posts: vec![Post {
                id: u64::MAX - 1,
                title: "Almost".to_string(),
                post_author: 1,
                coauthors: vec![],
            }],
            ..Default::default()
        };
        let dir = Directory::from_snapshot(snapshot).unwrap();
        assert_eq!(dir.add_post("Tail", 1).unwrap_err().to_string(), "no ids left to allocate");
    }

    #[test]
    fn test_linked_account_ignores_case() {
        let dir = Directory::new();
        dir.add_user("editor2", "Editor Two", "e2@example.org", Role::Editor).unwrap();

        let mut first = fields("johndoe", "John Doe", "jdoe@email.com");
        first.linked_account = Some("Editor2".to_string());
        dir.create(first).unwrap();

        let mut second = fields("foobar", "Foo Bar", "fb@email.com");
        second.linked_account = Some("EDITOR2".to_string());
        let err = dir.create(second).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidLinkedAccount(_)));
    }

    #[test]
    fn test_find_user_and_issue_token() {
        let dir = Directory::new();
        let admin = dir.add_user("admin", "admin", "admin@example.org", Role::Administrator).unwrap();

        let found = dir.find_user("ADMIN").unwrap();
        assert_eq!(found.id, admin.id);
        assert!(dir.find_user("nobody").is_none());

        let token = dir.issue_token(admin.id).unwrap();
        let caller = dir.resolve_caller(Some(&token));
        assert_eq!(caller.user.map(|u| u.id), Some(admin.id));
    }
}
