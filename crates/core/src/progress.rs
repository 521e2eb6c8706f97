//! Fixed rotation of progress messages shown while a job is generating.
//!
//! The table is cycled in order and wraps around; the message at rotation
//! index `i` is always `PROGRESS_MESSAGES[i % PROGRESS_MESSAGES.len()]`.

pub const PROGRESS_MESSAGES: &[&str] = &[
    "Santa's digital elves are setting up the studio...",
    "Capturing the festive spirit in cinematic 720p...",
    "Lighting the virtual fireplace for warmth...",
    "Applying holiday stardust to every frame...",
    "Finalizing the magic for your viewing pleasure...",
    "Almost there! Wrapping up the video...",
];

/// Message displayed at the given rotation index.
pub fn message_at(index: usize) -> &'static str {
    PROGRESS_MESSAGES[index % PROGRESS_MESSAGES.len()]
}

/// Message displayed as soon as generation begins.
pub fn first_message() -> &'static str {
    message_at(0)
}
