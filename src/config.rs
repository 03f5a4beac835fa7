use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub search_tools: SearchToolsConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub escalate_deny: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct GuardConfig {
    #[serde(default)]
    pub target_tool: String,
    #[serde(default)]
    pub debug_input_path: String,
    #[serde(default)]
    pub decision_log: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RulesConfig {
    /// Rule names excluded from the registry.
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// What a `git add` must be chained with to pass the add-chain rule.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AddRequires {
    /// A `git commit` must appear somewhere in the command.
    #[default]
    Commit,
    /// Any `&&` chain is enough.
    Chain,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub read_only: Vec<String>,
    #[serde(default)]
    pub global_flags_with_value: Vec<String>,
    #[serde(default)]
    pub add_requires: AddRequires,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SearchToolsConfig {
    #[serde(default)]
    pub required_exclusion: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub transcript_root: String,
    #[serde(default)]
    pub subagent_prefix: String,
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    #[serde(default = "default_excerpt_lead")]
    pub excerpt_lead: usize,
    #[serde(default = "default_excerpt_trail")]
    pub excerpt_trail: usize,
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
}

fn default_context_lines() -> usize {
    2
}

fn default_excerpt_lead() -> usize {
    100
}

fn default_excerpt_trail() -> usize {
    200
}

fn default_context_chars() -> usize {
    200
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            transcript_root: String::new(),
            subagent_prefix: String::new(),
            context_lines: default_context_lines(),
            excerpt_lead: default_excerpt_lead(),
            excerpt_trail: default_excerpt_trail(),
            context_chars: default_context_chars(),
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    guard: GuardOverlay,
    #[serde(default)]
    rules: RulesOverlay,
    #[serde(default)]
    git: GitOverlay,
    #[serde(default)]
    search_tools: SearchToolsOverlay,
    #[serde(default)]
    search: SearchOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    escalate_deny: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct GuardOverlay {
    target_tool: Option<String>,
    debug_input_path: Option<String>,
    decision_log: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RulesOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    remove_disabled: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GitOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    read_only: Vec<String>,
    #[serde(default)]
    global_flags_with_value: Vec<String>,
    add_requires: Option<AddRequires>,
    #[serde(default)]
    remove_read_only: Vec<String>,
    #[serde(default)]
    remove_global_flags_with_value: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchToolsOverlay {
    required_exclusion: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchOverlay {
    transcript_root: Option<String>,
    subagent_prefix: Option<String>,
    context_lines: Option<usize>,
    excerpt_lead: Option<usize>,
    excerpt_trail: Option<usize>,
    context_chars: Option<usize>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

fn override_scalar<T>(base: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *base = v;
    }
}

/// Expand `~` and `$VAR` in a configured path. Falls back to the literal text
/// when expansion fails (e.g. an unset variable).
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/cc-toolkit/config.toml (if exists)
    ///
    /// User config merges with defaults: lists extend, scalars override.
    /// Set `replace = true` in any section to replace its defaults entirely.
    /// Use `remove_<field>` lists to subtract specific items from defaults.
    pub fn load() -> Self {
        match Self::overlay_path() {
            Some(path) => Self::load_with_overlay(&path),
            None => Self::default_config(),
        }
    }

    /// Defaults merged with the overlay at `path`. A missing file means no
    /// overlay; a file that fails to parse is reported and ignored.
    pub fn load_with_overlay(path: &Path) -> Self {
        let mut config = Self::default_config();
        let Ok(content) = std::fs::read_to_string(path) else {
            return config;
        };
        match toml::from_str::<ConfigOverlay>(&content) {
            Ok(overlay) => config.apply_overlay(overlay),
            Err(e) => log::warn!("config parse error in {}: {e}", path.display()),
        }
        config
    }

    fn overlay_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".config/cc-toolkit/config.toml"))
    }

    /// Render the effective configuration as TOML (for `--dump-config`).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("# failed to render config: {e}\n"))
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        override_scalar(&mut self.settings.escalate_deny, overlay.settings.escalate_deny);

        let g = overlay.guard;
        override_scalar(&mut self.guard.target_tool, g.target_tool);
        override_scalar(&mut self.guard.debug_input_path, g.debug_input_path);
        override_scalar(&mut self.guard.decision_log, g.decision_log);

        let r = overlay.rules;
        merge_list(&mut self.rules.disabled, r.disabled, &r.remove_disabled, r.replace);

        let git = overlay.git;
        merge_list(
            &mut self.git.read_only,
            git.read_only,
            &git.remove_read_only,
            git.replace,
        );
        merge_list(
            &mut self.git.global_flags_with_value,
            git.global_flags_with_value,
            &git.remove_global_flags_with_value,
            git.replace,
        );
        override_scalar(&mut self.git.add_requires, git.add_requires);

        override_scalar(
            &mut self.search_tools.required_exclusion,
            overlay.search_tools.required_exclusion,
        );

        let s = overlay.search;
        override_scalar(&mut self.search.transcript_root, s.transcript_root);
        override_scalar(&mut self.search.subagent_prefix, s.subagent_prefix);
        override_scalar(&mut self.search.context_lines, s.context_lines);
        override_scalar(&mut self.search.excerpt_lead, s.excerpt_lead);
        override_scalar(&mut self.search.excerpt_trail, s.excerpt_trail);
        override_scalar(&mut self.search.context_chars, s.context_chars);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert_eq!(config.guard.target_tool, "Bash");
        assert!(!config.git.read_only.is_empty());
        assert!(!config.git.global_flags_with_value.is_empty());
        assert_eq!(config.search_tools.required_exclusion, "node_modules");
        assert_eq!(config.search.subagent_prefix, "agent-");
    }

    #[test]
    fn default_search_windows() {
        let config = Config::default_config();
        assert_eq!(config.search.context_lines, 2);
        assert_eq!(config.search.excerpt_lead, 100);
        assert_eq!(config.search.excerpt_trail, 200);
    }

    #[test]
    fn default_git_lists() {
        let config = Config::default_config();
        assert!(config.git.read_only.contains(&"status".to_string()));
        assert!(config.git.read_only.contains(&"log".to_string()));
        assert!(!config.git.read_only.contains(&"push".to_string()));
        assert!(config.git.global_flags_with_value.contains(&"-C".to_string()));
        assert_eq!(config.git.add_requires, AddRequires::Commit);
    }

    #[test]
    fn default_escalate_deny_is_false() {
        let config = Config::default_config();
        assert!(!config.settings.escalate_deny);
        assert!(config.rules.disabled.is_empty());
    }

    // ── Merge semantics ──

    #[test]
    fn overlay_extends_read_only() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [git]
            read_only = ["fetch"]
        "#,
        );
        assert!(config.git.read_only.contains(&"status".to_string()));
        assert!(config.git.read_only.contains(&"fetch".to_string()));
    }

    #[test]
    fn overlay_removes_from_read_only() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [git]
            remove_read_only = ["branch", "grep"]
        "#,
        );
        assert!(!config.git.read_only.contains(&"branch".to_string()));
        assert!(!config.git.read_only.contains(&"grep".to_string()));
        assert!(config.git.read_only.contains(&"status".to_string()));
    }

    #[test]
    fn overlay_replace_git() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [git]
            replace = true
            read_only = ["status", "log"]
            global_flags_with_value = ["-C"]
        "#,
        );
        assert_eq!(config.git.read_only, vec!["status", "log"]);
        assert_eq!(config.git.global_flags_with_value, vec!["-C"]);
    }

    #[test]
    fn overlay_add_requires_chain() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [git]
            add_requires = "chain"
        "#,
        );
        assert_eq!(config.git.add_requires, AddRequires::Chain);
    }

    #[test]
    fn overlay_disables_rules() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [rules]
            disabled = ["cd", "cd"]
        "#,
        );
        assert_eq!(config.rules.disabled, vec!["cd"]);
    }

    #[test]
    fn overlay_scalars_override() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            escalate_deny = true

            [guard]
            target_tool = "Shell"

            [search]
            transcript_root = "/srv/transcripts"
            context_lines = 4
        "#,
        );
        assert!(config.settings.escalate_deny);
        assert_eq!(config.guard.target_tool, "Shell");
        assert_eq!(config.search.transcript_root, "/srv/transcripts");
        assert_eq!(config.search.context_lines, 4);
        // untouched scalars keep their defaults
        assert_eq!(config.search.excerpt_lead, 100);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let original = Config::default_config();
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert_eq!(config.git.read_only, original.git.read_only);
        assert_eq!(config.guard.decision_log, original.guard.decision_log);
    }

    #[test]
    fn overlay_file_with_bad_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[git\nread_only = ").unwrap();
        let config = Config::load_with_overlay(&path);
        assert_eq!(config.git.read_only, Config::default_config().git.read_only);
    }

    #[test]
    fn overlay_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search_tools]\nrequired_exclusion = \"vendor\"\n").unwrap();
        let config = Config::load_with_overlay(&path);
        assert_eq!(config.search_tools.required_exclusion, "vendor");
    }

    #[test]
    fn missing_overlay_file_uses_defaults() {
        let config = Config::load_with_overlay(Path::new("/nonexistent/cc-toolkit.toml"));
        assert_eq!(config.guard.target_tool, "Bash");
    }

    #[test]
    fn expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/x/y"), home.join("x/y"));
        }
        assert_eq!(expand_path("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn dump_config_round_trips() {
        let config = Config::default_config();
        let rendered = config.to_toml();
        let reparsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.git.read_only, config.git.read_only);
    }
}
