//! Webhook event kinds and payload structures
//!
//! One deserialization entry point (`WebhookEvent::parse`) keyed by the
//! `X-GitHub-Event` header value; handlers dispatch on `EventKind`.

use serde::{Deserialize, Serialize};

/// The webhook event types this listener understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    IssueComment,
    Gollum,
    Fork,
    Watch,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Push,
        EventKind::PullRequest,
        EventKind::Issues,
        EventKind::IssueComment,
        EventKind::Gollum,
        EventKind::Fork,
        EventKind::Watch,
    ];

    /// Maps an `X-GitHub-Event` header value to a kind.
    pub fn from_header(value: &str) -> Option<Self> {
        match value {
            "push" => Some(EventKind::Push),
            "pull_request" => Some(EventKind::PullRequest),
            "issues" => Some(EventKind::Issues),
            "issue_comment" => Some(EventKind::IssueComment),
            "gollum" => Some(EventKind::Gollum),
            "fork" => Some(EventKind::Fork),
            "watch" => Some(EventKind::Watch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Push => "push",
            EventKind::PullRequest => "pull_request",
            EventKind::Issues => "issues",
            EventKind::IssueComment => "issue_comment",
            EventKind::Gollum => "gollum",
            EventKind::Fork => "fork",
            EventKind::Watch => "watch",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pusher {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub username: String,
}

/// A single commit from a push payload. Only the fields the classifier and
/// formatter read are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: CommitAuthor,
    #[serde(default, alias = "added")]
    pub created: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub forced: bool,
    #[serde(default)]
    pub compare: String,
    #[serde(default)]
    pub commits: Vec<Commit>,
    pub repository: Repository,
    pub pusher: Pusher,
}

impl PushEvent {
    /// The short branch or tag name, without the `refs/...` prefix.
    pub fn short_ref(&self) -> &str {
        self.reference
            .strip_prefix("refs/heads/")
            .or_else(|| self.reference.strip_prefix("refs/tags/"))
            .unwrap_or(&self.reference)
    }

    pub fn is_tag(&self) -> bool {
        self.reference.starts_with("refs/tags/")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub merged: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: Issue,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub label: Option<Label>,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub html_url: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WikiPage {
    pub page_name: String,
    pub action: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GollumEvent {
    #[serde(default)]
    pub pages: Vec<WikiPage>,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forkee {
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForkEvent {
    pub forkee: Forkee,
    pub sender: User,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchEvent {
    pub sender: User,
    pub repository: Repository,
}

/// A parsed webhook delivery, tagged by event kind.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    Push(PushEvent),
    PullRequest(PullRequestEvent),
    Issues(IssuesEvent),
    IssueComment(IssueCommentEvent),
    Gollum(GollumEvent),
    Fork(ForkEvent),
    Watch(WatchEvent),
}

impl WebhookEvent {
    /// Deserializes a raw delivery body into the payload for `kind`.
    pub fn parse(kind: EventKind, body: &[u8]) -> serde_json::Result<Self> {
        Ok(match kind {
            EventKind::Push => WebhookEvent::Push(serde_json::from_slice(body)?),
            EventKind::PullRequest => WebhookEvent::PullRequest(serde_json::from_slice(body)?),
            EventKind::Issues => WebhookEvent::Issues(serde_json::from_slice(body)?),
            EventKind::IssueComment => WebhookEvent::IssueComment(serde_json::from_slice(body)?),
            EventKind::Gollum => WebhookEvent::Gollum(serde_json::from_slice(body)?),
            EventKind::Fork => WebhookEvent::Fork(serde_json::from_slice(body)?),
            EventKind::Watch => WebhookEvent::Watch(serde_json::from_slice(body)?),
        })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            WebhookEvent::Push(_) => EventKind::Push,
            WebhookEvent::PullRequest(_) => EventKind::PullRequest,
            WebhookEvent::Issues(_) => EventKind::Issues,
            WebhookEvent::IssueComment(_) => EventKind::IssueComment,
            WebhookEvent::Gollum(_) => EventKind::Gollum,
            WebhookEvent::Fork(_) => EventKind::Fork,
            WebhookEvent::Watch(_) => EventKind::Watch,
        }
    }

    /// Repository name carried by the delivery.
    pub fn repository(&self) -> &str {
        match self {
            WebhookEvent::Push(e) => &e.repository.name,
            WebhookEvent::PullRequest(e) => &e.repository.name,
            WebhookEvent::Issues(e) => &e.repository.name,
            WebhookEvent::IssueComment(e) => &e.repository.name,
            WebhookEvent::Gollum(e) => &e.repository.name,
            WebhookEvent::Fork(e) => &e.repository.name,
            WebhookEvent::Watch(e) => &e.repository.name,
        }
    }
}
