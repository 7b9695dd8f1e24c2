//! Rule-based commit message synthesis.
//!
//! Classification looks only at paths, extensions and change kinds. Rules are
//! checked in a fixed order and the first match wins:
//!
//! 1. any test file → `test`
//! 2. any documentation extension → `docs`
//! 3. any stylesheet extension → `style`
//! 4. any configuration file → `chore` (configuration body)
//! 5. only script files → `feat` when every change is an addition, else `fix`
//! 6. anything else → `chore` (generic body)

use std::fmt;

use crate::commit::changeset::{ChangeProfile, ChangeSet};
use crate::commit::message::{CandidateMessage, MessageSource};
use crate::config::GenerationOptions;

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            CommitType::Feat => "✨",
            CommitType::Fix => "🐛",
            CommitType::Docs => "📝",
            CommitType::Style => "💄",
            CommitType::Refactor => "♻️",
            CommitType::Test => "✅",
            CommitType::Chore => "🔧",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Test,
    Docs,
    Style,
    Config,
    Feature,
    Fix,
    Other,
}

impl Category {
    pub fn commit_type(&self) -> CommitType {
        match self {
            Category::Test => CommitType::Test,
            Category::Docs => CommitType::Docs,
            Category::Style => CommitType::Style,
            Category::Config | Category::Other => CommitType::Chore,
            Category::Feature => CommitType::Feat,
            Category::Fix => CommitType::Fix,
        }
    }
}

/// Pick the first matching category.
pub fn categorize(profile: &ChangeProfile) -> Category {
    if profile.has_tests {
        Category::Test
    } else if profile.has_docs {
        Category::Docs
    } else if profile.has_styles {
        Category::Style
    } else if profile.has_config {
        Category::Config
    } else if profile.all_scripts {
        if profile.all_added {
            Category::Feature
        } else {
            Category::Fix
        }
    } else {
        Category::Other
    }
}

/// Synthesize a commit message from the staged changes alone.
///
/// Deterministic and infallible: the same inputs always give the same message.
pub fn classify(changes: &ChangeSet, options: &GenerationOptions) -> CandidateMessage {
    let profile = changes.profile();
    let category = categorize(&profile);
    let commit_type = category.commit_type();

    let prefix = if options.use_emojis {
        format!("{} {}", commit_type.emoji(), commit_type)
    } else {
        commit_type.to_string()
    };

    CandidateMessage {
        subject: format!("{prefix}: {}", describe(category, &profile)),
        body: body(category, &profile),
        source: MessageSource::RuleBased,
    }
}

fn describe(category: Category, profile: &ChangeProfile) -> String {
    let module = &profile.module;
    match (&profile.single_file, category) {
        (Some(file), Category::Docs) => format!("update {file}"),
        (Some(file), _) => format!("modify {file}"),
        (None, Category::Feature) => format!("add {module} feature"),
        (None, Category::Fix) => format!("add {module} fixes"),
        (None, Category::Docs) => format!("update {module}"),
        (None, _) => format!("modify {module}"),
    }
}

fn body(category: Category, profile: &ChangeProfile) -> String {
    let module = &profile.module;
    let target = profile.single_file.as_deref().unwrap_or(module);
    match category {
        Category::Test => format!("Updated tests in {target}."),
        Category::Docs => format!("Updated documentation in {target}."),
        Category::Style => format!("Updated styles in {target}."),
        Category::Config => match &profile.single_file {
            Some(file) => format!("Updated configuration file {file}."),
            None => format!("Updated configuration files in {module}."),
        },
        Category::Feature => format!("Added new functionality to {module}."),
        Category::Fix => format!("Fixed issues in {module}."),
        Category::Other => {
            let n = profile.file_count;
            let noun = if n == 1 { "file" } else { "files" };
            format!("Modified {n} {noun} in {module}.")
        }
    }
}
