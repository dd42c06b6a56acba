//! Application constants

/// Delay before an in-flight chat turn shows the thinking indicator (2 s)
pub const THINKING_DELAY_MS: u64 = 2000;

/// Greeting prompt sent to the assistant when a chat session opens
pub const KICKOFF_PROMPT: &str =
    "Introduce yourself briefly and ask what I would like to post about today.";

/// Transcript notice shown when a reply carries neither text nor a post
pub const UNPROCESSABLE_REPLY: &str =
    "I am sorry, looks like I am not able to process any request. Can you please try again?";

/// Transcript notice shown when the assistant hands back a finished post
pub const POST_READY_NOTICE: &str = "Mark has created the post. Click to view.";

/// Minutes ahead of now a fresh draft is scheduled for
pub const DEFAULT_SCHEDULE_OFFSET_MINS: i64 = 15;

/// Timeout for calls to the scheduling backend (60 s)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
