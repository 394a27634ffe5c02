//! Static guidance table for known platform error codes

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::super::error::{CIRCUIT_OPEN_CODE, TIMEOUT_CODE};

/// Operator-facing text for one error code
#[derive(Debug, Clone, Copy)]
pub(super) struct Guidance {
    pub user_message: &'static str,
    pub suggested_action: &'static str,
}

/// Codes that are always considered transient
pub(super) const TRANSIENT_CODES: &[&str] = &[
    "rate_limited",
    "ratelimited",
    "internal_error",
    "fatal_error",
    "service_unavailable",
    "request_timeout",
];

/// Message fragments that mark a failure as transient (matched lowercase)
pub(super) const TRANSIENT_PATTERNS: &[&str] = &[
    "timeout",
    "network",
    "connection",
    "temporary",
    "rate limit",
    "try again",
];

static GUIDANCE: Lazy<HashMap<&'static str, Guidance>> = Lazy::new(|| {
    let entries: [(&'static str, &'static str, &'static str); 24] = [
        (
            "rate_limited",
            "The chat platform is rate limiting requests",
            "Wait a moment before retrying and reduce request frequency",
        ),
        (
            "ratelimited",
            "The chat platform is rate limiting requests",
            "Wait a moment before retrying and reduce request frequency",
        ),
        (
            "internal_error",
            "The chat platform reported an internal error",
            "Retry shortly and check the platform status page if it persists",
        ),
        (
            "fatal_error",
            "The chat platform could not complete the request",
            "Retry the request and contact platform support if it keeps failing",
        ),
        (
            "service_unavailable",
            "The chat platform is temporarily unavailable",
            "Wait a few seconds and try again",
        ),
        (
            "request_timeout",
            "The chat platform did not answer in time",
            "Check network connectivity and try again",
        ),
        (
            "not_authed",
            "No authentication token was provided",
            "Configure a valid API token for the client",
        ),
        (
            "invalid_auth",
            "The authentication token is invalid",
            "Check that the token is correct and has not been revoked",
        ),
        (
            "token_revoked",
            "The authentication token has been revoked",
            "Issue a new token and update the client configuration",
        ),
        (
            "token_expired",
            "The authentication token has expired",
            "Refresh the token and retry the request",
        ),
        (
            "account_inactive",
            "The account behind this token is deactivated",
            "Use a token that belongs to an active account",
        ),
        (
            "missing_scope",
            "The token lacks a permission scope this call needs",
            "Add the required scope to the app and reinstall it",
        ),
        (
            "no_permission",
            "The token is not allowed to perform this action",
            "Ask a workspace administrator to grant the permission",
        ),
        (
            "channel_not_found",
            "The channel does not exist or is not visible to this token",
            "Verify the channel ID and that the app can see the channel",
        ),
        (
            "not_in_channel",
            "The app is not a member of the channel",
            "Invite the app to the channel and try again",
        ),
        (
            "is_archived",
            "The channel has been archived",
            "Unarchive the channel or pick a different one",
        ),
        (
            "user_not_found",
            "The user does not exist",
            "Verify the user ID",
        ),
        (
            "message_not_found",
            "The message does not exist",
            "Verify the channel and message timestamp",
        ),
        (
            "msg_too_long",
            "The message text is too long",
            "Shorten the message or split it into several messages",
        ),
        (
            "no_text",
            "The message has no text",
            "Provide message text or blocks",
        ),
        (
            "invalid_arguments",
            "The request arguments were rejected",
            "Check the arguments against the method's documentation",
        ),
        (
            "invalid_cursor",
            "The pagination cursor is invalid",
            "Restart pagination from the first page",
        ),
        (
            CIRCUIT_OPEN_CODE,
            "The service is temporarily disabled after repeated failures",
            "Wait for the circuit breaker cooldown or reset the breaker",
        ),
        (
            TIMEOUT_CODE,
            "The operation did not finish within its time limit",
            "Try again later or raise the timeout",
        ),
    ];

    entries
        .into_iter()
        .map(|(code, user_message, suggested_action)| {
            (
                code,
                Guidance {
                    user_message,
                    suggested_action,
                },
            )
        })
        .collect()
});

/// Look up guidance for a known code
pub(super) fn lookup(code: &str) -> Option<Guidance> {
    GUIDANCE.get(code).copied()
}
