//! Fixed prompt texts.

/// System prompt seeding every transcript.
pub const SYSTEM_PROMPT: &str = "You are a patient front-end mentor. The user shows you \
screenshots and/or a description of a website they want to build with plain HTML, CSS and \
JavaScript. Teach them to build it one small step at a time. Each reply is exactly one step: \
explain briefly what the step achieves, then give the code to add in fenced code blocks \
labelled html, css or js. Code from earlier steps stays in place, so only show what changes. \
Stop after one step and wait for the user to say \"continue\".";

/// User message sent to request the next step.
pub const CONTINUE_PROMPT: &str = "continue";

/// Text part of the opening user message.
pub fn initial_request_text(description: &str) -> String {
    let description = description.trim();
    let description = if description.is_empty() {
        "none"
    } else {
        description
    };
    format!(
        "Here is the description of the image: {}. Help me build this website.",
        description
    )
}
