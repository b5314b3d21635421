//! Chat alert rendering, one renderer per webhook event type.

use crate::events::{
    ForkEvent, GollumEvent, IssueCommentEvent, IssuesEvent, PullRequestEvent, PushEvent,
    WatchEvent, WebhookEvent,
};

/// Field truncation limit for titles and comment bodies.
const FIELD_LIMIT: usize = 80;

/// How many commits a push alert lists.
const COMMIT_LINES: usize = 3;

/// Renders an event into zero or more chat-ready messages. A deleted-ref
/// push renders nothing; gollum renders one message per changed page.
pub fn render(event: &WebhookEvent) -> Vec<String> {
    match event {
        WebhookEvent::Push(e) => render_push(e).into_iter().collect(),
        WebhookEvent::PullRequest(e) => vec![render_pull_request(e)],
        WebhookEvent::Issues(e) => vec![render_issues(e)],
        WebhookEvent::IssueComment(e) => vec![render_issue_comment(e)],
        WebhookEvent::Gollum(e) => render_gollum(e),
        WebhookEvent::Fork(e) => vec![render_fork(e)],
        WebhookEvent::Watch(e) => vec![render_watch(e)],
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn render_push(event: &PushEvent) -> Option<String> {
    if event.deleted {
        return None;
    }

    let count = event.commits.len();
    let plural = if count == 1 { "" } else { "s" };
    let force = if event.forced && !event.created {
        "force "
    } else {
        ""
    };
    let newness = if event.created { "new " } else { "" };
    let ref_kind = if event.is_tag() { "tag" } else { "branch" };

    let mut message = format!(
        "{} commit{} {}pushed to {}{} {}:{} by {}. {}",
        count,
        plural,
        force,
        newness,
        ref_kind,
        event.repository.name,
        event.short_ref(),
        event.pusher.name,
        event.compare,
    );

    // Most recent first: the payload lists commits oldest to newest.
    for commit in event.commits.iter().rev().take(COMMIT_LINES) {
        let short_sha = commit.id.get(..7).unwrap_or(&commit.id);
        let headline = commit.message.lines().next().unwrap_or("");
        message.push_str(&format!(
            "\n[{}] {}: {}",
            short_sha, commit.author.username, headline
        ));
    }

    Some(message)
}

fn render_pull_request(event: &PullRequestEvent) -> String {
    let action = if event.action == "closed" && event.pull_request.merged {
        "merged"
    } else {
        &event.action
    };
    format!(
        "Pull request #{} {}: \"{}\"",
        event.pull_request.number,
        action,
        truncate(&event.pull_request.title, FIELD_LIMIT),
    )
}

fn render_issues(event: &IssuesEvent) -> String {
    let qualifier = match event.action.as_str() {
        "assigned" => event
            .assignee
            .as_ref()
            .map(|a| format!(" to {}", a.login))
            .unwrap_or_default(),
        "unassigned" => event
            .assignee
            .as_ref()
            .map(|a| format!(" from {}", a.login))
            .unwrap_or_default(),
        "labeled" | "unlabeled" => event
            .label
            .as_ref()
            .map(|l| format!(" {}", l.name))
            .unwrap_or_default(),
        _ => String::new(),
    };
    format!(
        "Issue #{} {}{}: \"{}\"",
        event.issue.number,
        event.action,
        qualifier,
        truncate(&event.issue.title, FIELD_LIMIT),
    )
}

fn render_issue_comment(event: &IssueCommentEvent) -> String {
    format!(
        "{} commented on issue #{}: \"{}\" {}",
        event.comment.user.login,
        event.issue.number,
        truncate(&event.comment.body, FIELD_LIMIT),
        event.comment.html_url,
    )
}

fn render_gollum(event: &GollumEvent) -> Vec<String> {
    event
        .pages
        .iter()
        .map(|page| format!("Wiki page {} {}. {}", page.page_name, page.action, page.html_url))
        .collect()
}

fn render_fork(event: &ForkEvent) -> String {
    format!(
        "{} forked the repository: {}",
        event.sender.login, event.forkee.html_url
    )
}

fn render_watch(event: &WatchEvent) -> String {
    format!("{} starred the repository.", event.sender.login)
}
