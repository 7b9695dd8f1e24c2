//! Prompt construction for AI-generated commit messages.

/// Commit types the model is asked to choose from.
pub const COMMIT_TYPES: [&str; 7] = ["feat", "fix", "docs", "style", "refactor", "test", "chore"];

/// Build the prompt sent to the remote provider.
///
/// `files` are one-line summaries such as `src/auth/login.js (Added)`. The diff
/// is passed through as-is; it is only ever read by the remote service.
pub fn build_commit_prompt(files: &[String], diff: &str, truncated: bool) -> String {
    let files_section = files
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n");

    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    let types = COMMIT_TYPES.join(", ");

    format!(
        r#"Generate a Git commit message following the Conventional Commits format.

## Changed Files
{files_section}

## Diff
```
{diff}
```{truncation_note}

## Rules
- First line: `<type>: <description>`, around 50 characters
- Type: one of {types}
- Description: imperative mood, lowercase after the colon, no period at the end
- Then a blank line and a body of 1-2 sentences describing only what changed
- Do not mention future work, plans, or anything not visible in the diff

Respond with only the commit message, no markdown and no explanation."#
    )
}
