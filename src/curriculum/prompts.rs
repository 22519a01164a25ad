//! Prompt text and completion parsing.

/// Prompt asking for `count` categories of `topic`, beginner to advanced.
pub fn categories_prompt(topic: &str, count: usize) -> String {
    format!(
        "Split the topic: {topic}, into {count} categories, arranged from beginner concepts to advanced. \
         Please include a number in front of each category to select it later."
    )
}

/// Prompt asking for `count` subtopics of a (possibly numbered) category.
pub fn subtopics_prompt(category: &str, count: usize) -> String {
    let name = strip_numbering(category);
    format!(
        "Divide the topic {name} into {count} subtopics. \
         Please include a number in front of each subtopic to select it later."
    )
}

/// Prompt asking for a lesson on `subtopic`.
pub fn lesson_prompt(subtopic: &str) -> String {
    format!("Generate a lesson for the subtopic: {subtopic}.")
}

/// Document written for a lesson.
pub fn lesson_document(subtopic: &str, lesson: &str) -> String {
    format!("Lesson for subtopic \"{subtopic}\":\n\n{lesson}")
}

/// Drop a leading list number such as `3.`, `12)` or `4:` from a line.
pub fn strip_numbering(line: &str) -> &str {
    let trimmed = line.trim();
    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == trimmed.len() {
        return trimmed;
    }
    let rest = rest
        .strip_prefix(['.', ')', ':', '-'])
        .unwrap_or(rest)
        .trim_start();
    if rest.is_empty() {
        trimmed
    } else {
        rest
    }
}

/// Split a completion into one entry per non-blank line.
pub fn parse_list(text: &str) -> Vec<String> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}
