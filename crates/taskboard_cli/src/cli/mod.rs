use clap::{Parser, Subcommand};
use std::collections::HashMap;
use taskboard_core::config::{Config, ConfigOverrides, canonical_key, merge_overrides};
use taskboard_core::error::AppError;
use taskboard_core::model::{Priority, Status, TaskDraft, parse_optional};

#[derive(Parser, Debug)]
#[command(name = "taskboard", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskboard add "Buy milk" -p high -s to-do
    Add {
        title: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        status: Option<Status>,
    },
    /// Edit a task; fields not given keep their value
    ///
    /// Example: taskboard edit <ID> --status in-progress
    /// In interactive mode `edit <ID>` without fields opens the task for
    /// editing with `set`, `save` and `cancel`.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<Status>,
    },
    /// Delete a task after confirmation
    ///
    /// Example: taskboard delete <ID> --yes
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every task after confirmation
    ///
    /// Example: taskboard clear
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List tasks, high priority first
    ///
    /// Example: taskboard list --json
    List,
    /// Show details of a task
    ///
    /// Example: taskboard show <ID>
    Show { id: String },
}

impl Command {
    /// `edit <ID>` with no field flags.
    pub fn is_bare_edit(&self) -> bool {
        matches!(
            self,
            Command::Edit {
                title: None,
                description: None,
                priority: None,
                status: None,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    Notifications,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonical_key(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    match canonical_field.as_str() {
        "theme" | "notifications" => {
            if remainder.is_some() {
                return Err(format!("{canonical_field} override cannot have subfields"));
            }
            let target = if canonical_field == "theme" {
                ConfigOverrideTarget::Theme
            } else {
                ConfigOverrideTarget::Notifications
            };
            Ok(ParsedConfigOverride { target, value })
        }
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            })
        }
        other => Err(format!("unknown config field '{other}'")),
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match canonical_key(value).as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(format!("expected true or false, got '{value}'")),
    }
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::Notifications => {
                overrides.notifications =
                    Some(parse_switch(&parsed.value).map_err(AppError::invalid_input)?);
            }
        }
    }
    Ok(overrides)
}

pub fn effective_config(base: &Config, raw_overrides: &[String]) -> Result<Config, AppError> {
    if raw_overrides.is_empty() {
        return Ok(base.clone());
    }
    Ok(merge_overrides(base, &collect_overrides(raw_overrides)?))
}

/// Splits a line into arguments, honouring double quotes and `\"` escapes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

/// Replaces a leading alias with its expansion.
pub fn expand_alias(
    args: Vec<String>,
    aliases: &HashMap<String, String>,
) -> Result<Vec<String>, AppError> {
    let Some(expansion) = args.first().and_then(|first| aliases.get(first)) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(expansion)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

/// One field assignment from the interactive `set FIELD VALUE` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Description(String),
    Priority(Option<Priority>),
    Status(Option<Status>),
}

impl DraftField {
    pub fn parse(field: &str, value: &str) -> Result<Self, AppError> {
        match canonical_key(field).as_str() {
            "title" => Ok(Self::Title(value.to_string())),
            "description" | "desc" => Ok(Self::Description(value.to_string())),
            "priority" => Ok(Self::Priority(parse_optional(value)?)),
            "status" => Ok(Self::Status(parse_optional(value)?)),
            _ => Err(AppError::invalid_input(format!(
                "unknown field '{field}' (expected title, description, priority or status)"
            ))),
        }
    }

    pub fn apply(self, draft: &mut TaskDraft) {
        match self {
            Self::Title(title) => draft.title = title,
            Self::Description(description) => draft.description = description,
            Self::Priority(priority) => draft.priority = priority,
            Self::Status(status) => draft.status = status,
        }
    }
}
