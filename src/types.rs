use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub type UserId = u64;
pub type PostId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Editor,
    Author,
    Contributor,
    Subscriber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    EditPosts,
    EditOthersPosts,
    ListUsers,
}

impl Role {
    pub fn has_cap(&self, cap: Capability) -> bool {
        match cap {
            Capability::EditPosts => !matches!(self, Role::Subscriber),
            Capability::EditOthersPosts => matches!(self, Role::Administrator | Role::Editor),
            Capability::ListUsers => matches!(self, Role::Administrator),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_login: String,
    pub user_nicename: String,
    pub display_name: String,
    pub user_email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// The identity a request runs as. Anonymous callers hold no user.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<User>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

/// Read-only projection of a user or guest author as returned by searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: u64,
    pub user_login: String,
    pub display_name: String,
    pub user_email: String,
    pub user_nicename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestAuthor {
    pub id: PostId,
    pub display_name: String,
    pub user_login: String,
    pub user_email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub aim: String,
    #[serde(default)]
    pub yahooim: String,
    #[serde(default)]
    pub jabber: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub linked_account: Option<String>,
}

impl GuestAuthor {
    pub fn to_record(&self) -> AuthorRecord {
        AuthorRecord {
            id: self.id,
            user_login: self.user_login.clone(),
            display_name: self.display_name.clone(),
            user_email: self.user_email.clone(),
            user_nicename: crate::utils::sanitize_title(&self.user_login),
        }
    }
}

/// Field values for creating or updating a guest author. `None` leaves a
/// field untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestAuthorFields {
    pub display_name: Option<String>,
    pub user_login: Option<String>,
    pub user_email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub website: Option<String>,
    pub aim: Option<String>,
    pub yahooim: Option<String>,
    pub jabber: Option<String>,
    pub description: Option<String>,
    pub linked_account: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reassign {
    LeaveAssigned,
    ReassignAnother,
    RemoveByline,
}

impl Reassign {
    pub const ALL: [&'static str; 3] = ["leave-assigned", "reassign-another", "remove-byline"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "leave-assigned" => Some(Self::LeaveAssigned),
            "reassign-another" => Some(Self::ReassignAnother),
            "remove-byline" => Some(Self::RemoveByline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub post_author: UserId,
    #[serde(default)]
    pub coauthors: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub guests: Vec<GuestAuthor>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Tabled)]
pub struct AuthorTableRow {
    pub id: u64,
    pub login: String,
    pub name: String,
    pub email: String,
}

impl From<AuthorRecord> for AuthorTableRow {
    fn from(a: AuthorRecord) -> Self {
        Self {
            id: a.id,
            login: a.user_login,
            name: a.display_name,
            email: a.user_email,
        }
    }
}

#[derive(Tabled)]
pub struct GuestTableRow {
    pub id: u64,
    pub login: String,
    pub name: String,
    pub email: String,
    pub linked: String,
}

impl From<GuestAuthor> for GuestTableRow {
    fn from(g: GuestAuthor) -> Self {
        Self {
            id: g.id,
            login: g.user_login,
            name: g.display_name,
            email: g.user_email,
            linked: g.linked_account.unwrap_or_default(),
        }
    }
}
