use thiserror::Error;

use crate::types::{
    AuthorRecord, Caller, Capability, GuestAuthor, GuestAuthorFields, PostId, Reassign,
};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("guest author {0} not found")]
    GuestNotFound(u64),
    #[error("post {0} not found")]
    PostNotFound(PostId),
    #[error("field {0} is required")]
    FieldRequired(&'static str),
    #[error("login {0} is already in use")]
    LoginTaken(String),
    #[error("email {0} is invalid")]
    InvalidEmail(String),
    #[error("email {0} is already in use")]
    EmailTaken(String),
    #[error("linked account {0} does not exist or is already linked")]
    InvalidLinkedAccount(String),
    #[error("author {0} not found")]
    ReassignTargetNotFound(String),
    #[error("author {author} is not attached to post {post}")]
    AuthorNotAttached { post: PostId, author: u64 },
    #[error("post {0} must keep at least one author")]
    LastAuthor(PostId),
    #[error("no ids left to allocate")]
    IdsExhausted,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Host operations the REST handlers delegate to. Implementations own
/// matching, persistence and the capability model.
pub trait CoauthorsService: Send + Sync {
    fn resolve_caller(&self, token: Option<&str>) -> Caller;

    fn current_user_can(&self, caller: &Caller, cap: Capability) -> bool;

    /// `any_post` asks whether the caller may set authors on at least one
    /// post, ignoring `post`.
    fn current_user_can_set_authors(
        &self,
        caller: &Caller,
        post: Option<PostId>,
        any_post: bool,
    ) -> bool;

    fn search_authors(&self, query: &str, exclude: &[String]) -> Vec<AuthorRecord>;

    fn post_exists(&self, post: PostId) -> bool;

    fn get_coauthors(&self, post: PostId) -> Result<Vec<AuthorRecord>, DirectoryError>;

    fn add_coauthors(
        &self,
        post: PostId,
        logins: &[String],
        append: bool,
    ) -> Result<Vec<AuthorRecord>, DirectoryError>;

    fn remove_coauthor(
        &self,
        post: PostId,
        author: u64,
    ) -> Result<Vec<AuthorRecord>, DirectoryError>;

    fn guest_authors(&self) -> &dyn GuestAuthorRepository;
}

pub trait GuestAuthorRepository: Send + Sync {
    fn search(&self, query: &str) -> Vec<GuestAuthor>;

    fn get(&self, id: u64) -> Option<GuestAuthor>;

    fn create(&self, fields: GuestAuthorFields) -> Result<GuestAuthor, DirectoryError>;

    fn update(&self, id: u64, fields: GuestAuthorFields) -> Result<GuestAuthor, DirectoryError>;

    /// Removes the guest and rewrites the bylines of its posts according to
    /// `reassign`. `target` is the login used by [`Reassign::ReassignAnother`].
    fn delete(
        &self,
        id: u64,
        reassign: Reassign,
        target: Option<&str>,
    ) -> Result<GuestAuthor, DirectoryError>;
}
