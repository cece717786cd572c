use rand::{Rng, RngCore};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::effects::EffectKind;
use crate::profile::{Profile, SkillCategory, skill_bar};

pub const CLEAR_KEYWORD: &str = "clear";
pub const EXIT_KEYWORD: &str = "exit";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// What a producer may look at. Passed explicitly so output stays
/// reproducible under a seeded random source and a fixed clock.
pub struct Env<'a> {
    pub now: OffsetDateTime,
    pub rng: &'a mut dyn RngCore,
}

pub type Producer = fn(&mut Env<'_>) -> String;

#[derive(Clone, Debug)]
pub enum Output {
    Fixed(String),
    Computed(Producer),
    Effect(EffectKind),
}

#[derive(Clone, Debug)]
pub struct CommandEntry {
    pub name: String,
    pub description: &'static str,
    pub output: Output,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Text(String),
    Effect(EffectKind),
    NotFound,
}

/// Keywords that change widget state instead of producing text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reserved {
    Clear,
    Exit,
}

impl Reserved {
    pub fn parse(normalized: &str) -> Option<Self> {
        match normalized {
            CLEAR_KEYWORD => Some(Reserved::Clear),
            EXIT_KEYWORD => Some(Reserved::Exit),
            _ => None,
        }
    }
}

pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn not_found_message(command: &str) -> String {
    format!("Command not found: {command}\nType \"help\" for available commands.")
}

#[derive(Clone, Debug, Default)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The command set shown on the portfolio page.
    pub fn portfolio(profile: &Profile) -> Self {
        let mut table = Self::new();
        table.register("about", "About me", Output::Fixed(about_text(profile)));
        table.register(
            "whoami",
            "Who am I?",
            Output::Fixed(format!("{} ({})", profile.handle, profile.title)),
        );
        table.register("skills", "List my skills", Output::Fixed(skills_text(profile)));
        table.register(
            "experience",
            "Work history",
            Output::Fixed(experience_text(profile)),
        );
        table.register("projects", "My projects", Output::Fixed(projects_text(profile)));
        table.register("contact", "Contact information", Output::Fixed(contact_text(profile)));
        table.register("date", "Current date", Output::Computed(current_date));
        table.register("uptime", "System uptime", Output::Computed(fake_uptime));
        table.register(
            "matrix",
            "Toggle matrix rain",
            Output::Fixed("Matrix rain intensity changed! (just pretend it worked)".to_string()),
        );
        table.register(
            "sudo",
            "Try to get root access",
            Output::Fixed("Nice try! But you don't have root access here 😏".to_string()),
        );
        table.register("hack", "???", Output::Effect(EffectKind::Intrusion));
        let help = table.help_text();
        table.register("help", "Show this help message", Output::Fixed(help));
        table
    }

    /// Adds a command, replacing any entry registered under the same name.
    pub fn register(&mut self, name: &str, description: &'static str, output: Output) {
        let name = normalize(name);
        let entry = CommandEntry {
            name: name.clone(),
            description,
            output,
        };
        match self.entries.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, normalized: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == normalized)
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.get(normalized).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, normalized: &str, env: &mut Env<'_>) -> Resolution {
        let Some(entry) = self.get(normalized) else {
            return Resolution::NotFound;
        };
        match &entry.output {
            Output::Fixed(text) => Resolution::Text(text.clone()),
            Output::Computed(producer) => Resolution::Text(producer(env)),
            Output::Effect(kind) => Resolution::Effect(*kind),
        }
    }

    /// The single key starting with `prefix`, if exactly one does.
    pub fn complete(&self, prefix: &str) -> Option<&str> {
        let prefix = prefix.to_lowercase();
        let mut matches = self.names().filter(|name| name.starts_with(&prefix));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn help_text(&self) -> String {
        let mut lines = vec![
            "AVAILABLE COMMANDS:".to_string(),
            RULE.to_string(),
            format!("  {:<11} - {}", "help", "Show this help message"),
        ];
        for entry in self.entries.iter().filter(|entry| entry.name != "help") {
            lines.push(format!("  {:<11} - {}", entry.name, entry.description));
        }
        lines.push(format!("  {:<11} - {}", CLEAR_KEYWORD, "Clear terminal"));
        lines.push(format!("  {:<11} - {}", EXIT_KEYWORD, "Close terminal"));
        lines.push(RULE.to_string());
        lines.push("Type a command and press Enter.".to_string());
        lines.join("\n")
    }
}

fn current_date(env: &mut Env<'_>) -> String {
    let format =
        format_description!("[weekday repr:short] [month repr:short] [day] [year] [hour]:[minute]:[second] UTC");
    env.now
        .format(format)
        .unwrap_or_else(|_| env.now.to_string())
}

fn fake_uptime(env: &mut Env<'_>) -> String {
    let days = env.rng.random_range(200..300);
    let hours = env.rng.random_range(0..24);
    let minutes = env.rng.random_range(0..60);
    format!("System uptime: {days} days, {hours} hours, {minutes} minutes\nUptime: 99.9%")
}

fn about_text(profile: &Profile) -> String {
    let mut lines = vec![
        format!("── ABOUT {} ──", profile.name.to_uppercase()),
        String::new(),
    ];
    lines.extend(profile.summary.iter().map(|line| line.to_string()));
    lines.push(String::new());
    lines.push(format!("🔧 Role:      {}", profile.title));
    lines.push(format!("📍 Location:  {}", profile.location));
    lines.join("\n")
}

fn skills_text(profile: &Profile) -> String {
    let mut lines = vec!["SKILL MATRIX:".to_string(), RULE.to_string()];
    for category in [SkillCategory::Backend, SkillCategory::Database, SkillCategory::DevOps] {
        lines.push(String::new());
        lines.push(format!("[{}]", category.label()));
        for skill in profile.skills_in(category) {
            lines.push(format!(
                "  {:<12} {} {}%",
                skill.name,
                skill_bar(skill.level),
                skill.level
            ));
        }
    }
    lines.join("\n")
}

fn experience_text(profile: &Profile) -> String {
    let mut lines = vec!["WORK HISTORY:".to_string(), RULE.to_string()];
    for role in profile.roles {
        lines.push(String::new());
        lines.push(format!("[{}]", role.period.to_uppercase()));
        lines.push(format!("┃ {} @ {}", role.position, role.company));
        for highlight in role.highlights {
            lines.push(format!("┃ • {highlight}"));
        }
    }
    lines.join("\n")
}

fn projects_text(profile: &Profile) -> String {
    let mut lines = vec!["PROJECT DATABASE:".to_string(), RULE.to_string()];
    for (index, project) in profile.projects.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("[{:03}] {}", index + 1, project.code));
        lines.push(format!("      {}", project.summary));
        lines.push(format!("      Stack: {}", project.stack.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("→ View all: {}", profile.projects_url));
    lines.join("\n")
}

fn contact_text(profile: &Profile) -> String {
    let mut lines = vec!["CONTACT CHANNELS:".to_string(), RULE.to_string()];
    for channel in profile.channels {
        lines.push(format!("  {:<10} {}", format!("{}:", channel.label), channel.value));
    }
    lines.push(RULE.to_string());
    lines.push("STATUS: ● ONLINE".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PROFILE;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use time::macros::datetime;

    fn resolve(table: &CommandTable, command: &str) -> Resolution {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut env = Env {
            now: datetime!(2024-03-09 14:05:00 UTC),
            rng: &mut rng,
        };
        table.resolve(command, &mut env)
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  HeLp \t"), "help");
    }

    #[test]
    fn fixed_and_computed_entries_resolve_to_text() {
        let table = CommandTable::portfolio(&PROFILE);
        assert_eq!(
            resolve(&table, "whoami"),
            Resolution::Text("artem_shkonda (Backend Developer)".to_string())
        );
        assert_eq!(
            resolve(&table, "date"),
            Resolution::Text("Sat Mar 09 2024 14:05:00 UTC".to_string())
        );
        let Resolution::Text(uptime) = resolve(&table, "uptime") else {
            panic!("uptime should produce text");
        };
        assert!(uptime.starts_with("System uptime: 2"));
    }

    #[test]
    fn effect_and_missing_entries() {
        let table = CommandTable::portfolio(&PROFILE);
        assert_eq!(resolve(&table, "hack"), Resolution::Effect(EffectKind::Intrusion));
        assert_eq!(resolve(&table, "rm -rf /"), Resolution::NotFound);
        assert_eq!(resolve(&table, "HELP"), Resolution::NotFound);
    }

    #[test]
    fn register_replaces_existing_key() {
        let mut table = CommandTable::new();
        table.register("Ping", "first", Output::Fixed("one".to_string()));
        table.register("ping", "second", Output::Fixed("two".to_string()));
        assert_eq!(table.len(), 1);
        assert_eq!(resolve(&table, "ping"), Resolution::Text("two".to_string()));
    }

    #[test]
    fn completion_requires_a_unique_match() {
        let table = CommandTable::portfolio(&PROFILE);
        assert_eq!(table.complete("hel"), Some("help"));
        assert_eq!(table.complete("HEL"), Some("help"));
        assert_eq!(table.complete("h"), None);
        assert_eq!(table.complete("zzz"), None);
        assert_eq!(table.complete(""), None);
    }

    #[test]
    fn help_lists_every_command_and_reserved_keyword() {
        let table = CommandTable::portfolio(&PROFILE);
        let Resolution::Text(help) = resolve(&table, "help") else {
            panic!("help should produce text");
        };
        for name in table.names() {
            assert!(help.contains(name), "help is missing {name}");
        }
        assert!(help.contains(CLEAR_KEYWORD));
        assert!(help.contains(EXIT_KEYWORD));
        assert_eq!(help.matches("  help ").count(), 1);
    }

    #[test]
    fn reserved_keywords_are_not_table_entries() {
        let table = CommandTable::portfolio(&PROFILE);
        assert!(!table.contains(CLEAR_KEYWORD));
        assert!(!table.contains(EXIT_KEYWORD));
        assert_eq!(Reserved::parse("clear"), Some(Reserved::Clear));
        assert_eq!(Reserved::parse("exit"), Some(Reserved::Exit));
        assert_eq!(Reserved::parse("quit"), None);
    }

    #[test]
    fn not_found_message_names_command_and_points_to_help() {
        assert_eq!(
            not_found_message("foo"),
            "Command not found: foo\nType \"help\" for available commands."
        );
    }
}
