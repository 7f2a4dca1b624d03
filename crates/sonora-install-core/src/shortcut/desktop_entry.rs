//! Desktop entry (.desktop file) generation.
//!
//! Implements the subset of the XDG Desktop Entry Specification needed to put
//! Sonora into the application menu.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::DesktopEntryConfig;
use crate::error::{InstallError, Result};
use crate::platform;
use tracing::debug;

const GROUP_HEADER: &str = "[Desktop Entry]";

/// Characters that force an Exec argument to be quoted.
const EXEC_RESERVED: &[char] = &[
    ' ', '\t', '\n', '\r', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(', ')',
    '`',
];

/// A desktop entry representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: String,
    /// Generic name, e.g. "Music Player".
    pub generic_name: Option<String>,
    /// Comment/description.
    pub comment: Option<String>,
    /// Executable command line, already quoted.
    pub exec: String,
    /// Icon name or absolute path.
    pub icon: String,
    /// Whether to run in a terminal.
    pub terminal: bool,
    /// Entry type (usually "Application").
    pub entry_type: String,
    /// Menu categories.
    pub categories: Vec<String>,
    /// Keywords for search.
    pub keywords: Vec<String>,
    /// Whether this entry should not be displayed.
    pub no_display: bool,
    /// StartupWMClass for window matching.
    pub startup_wm_class: Option<String>,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            generic_name: None,
            comment: None,
            exec: String::new(),
            icon: String::new(),
            terminal: false,
            entry_type: DesktopEntryConfig::ENTRY_TYPE.to_string(),
            categories: Vec::new(),
            keywords: Vec::new(),
            no_display: false,
            startup_wm_class: None,
        }
    }
}

impl DesktopEntry {
    /// Create a new desktop entry builder.
    pub fn builder() -> DesktopEntryBuilder {
        DesktopEntryBuilder::new()
    }

    /// The Sonora menu entry pointing at an installed executable and icon.
    pub fn sonora(executable: &Path, icon: &Path) -> Self {
        Self::builder()
            .name(DesktopEntryConfig::NAME)
            .generic_name(DesktopEntryConfig::GENERIC_NAME)
            .comment(DesktopEntryConfig::COMMENT)
            .exec(quote_exec_arg(&executable.to_string_lossy()))
            .icon(icon.to_string_lossy())
            .terminal(false)
            .categories(to_owned_list(DesktopEntryConfig::CATEGORIES))
            .keywords(to_owned_list(DesktopEntryConfig::KEYWORDS))
            .startup_wm_class(DesktopEntryConfig::STARTUP_WM_CLASS)
            .build()
    }

    /// The program (first argument) of the Exec line, unquoted.
    pub fn exec_program(&self) -> Option<String> {
        split_exec(&self.exec).into_iter().next()
    }

    /// Parse the `[Desktop Entry]` group of a .desktop file.
    ///
    /// Comments, blank lines, localized keys and other groups are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entry = DesktopEntry {
            entry_type: String::new(),
            ..Default::default()
        };
        let mut seen_group = false;
        let mut in_group = false;

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_group = line == GROUP_HEADER;
                seen_group |= in_group;
                continue;
            }
            if !in_group {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "Name" => entry.name = unescape_value(value),
                "GenericName" => entry.generic_name = Some(unescape_value(value)),
                "Comment" => entry.comment = Some(unescape_value(value)),
                "Exec" => entry.exec = value.to_string(),
                "Icon" => entry.icon = unescape_value(value),
                "Terminal" => entry.terminal = parse_bool("Terminal", value)?,
                "Type" => entry.entry_type = value.to_string(),
                "Categories" => entry.categories = parse_list(value),
                "Keywords" => entry.keywords = parse_list(value),
                "NoDisplay" => entry.no_display = parse_bool("NoDisplay", value)?,
                "StartupWMClass" => entry.startup_wm_class = Some(value.to_string()),
                _ => {}
            }
        }

        if !seen_group {
            return Err(InstallError::Validation {
                field: "group".to_string(),
                message: format!("missing {} header", GROUP_HEADER),
            });
        }
        for (field, value) in [("Name", &entry.name), ("Exec", &entry.exec)] {
            if value.is_empty() {
                return Err(InstallError::Validation {
                    field: field.to_string(),
                    message: "required key is missing".to_string(),
                });
            }
        }

        Ok(entry)
    }

    /// Write the desktop entry to a file.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| InstallError::io_action("create directory", parent, e))?;
        }

        fs::write(path, self.to_string())
            .map_err(|e| InstallError::io_action("write desktop file", path, e))?;

        // Some desktops refuse to launch untrusted, non-executable entries
        platform::set_executable(path)?;

        debug!("Wrote desktop entry to {:?}", path);

        Ok(())
    }
}

impl fmt::Display for DesktopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", GROUP_HEADER)?;
        writeln!(f, "Type={}", self.entry_type)?;
        writeln!(f, "Name={}", escape_value(&self.name))?;

        if let Some(ref generic_name) = self.generic_name {
            writeln!(f, "GenericName={}", escape_value(generic_name))?;
        }
        if let Some(ref comment) = self.comment {
            writeln!(f, "Comment={}", escape_value(comment))?;
        }

        writeln!(f, "Exec={}", self.exec)?;
        writeln!(f, "Icon={}", escape_value(&self.icon))?;
        writeln!(f, "Terminal={}", self.terminal)?;

        if !self.categories.is_empty() {
            writeln!(f, "Categories={};", self.categories.join(";"))?;
        }
        if !self.keywords.is_empty() {
            writeln!(f, "Keywords={};", self.keywords.join(";"))?;
        }
        if self.no_display {
            writeln!(f, "NoDisplay=true")?;
        }
        if let Some(ref wm_class) = self.startup_wm_class {
            writeln!(f, "StartupWMClass={}", wm_class)?;
        }

        Ok(())
    }
}

/// Builder for desktop entries.
pub struct DesktopEntryBuilder {
    entry: DesktopEntry,
}

impl DesktopEntryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            entry: DesktopEntry::default(),
        }
    }

    /// Set the entry name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entry.name = name.into();
        self
    }

    /// Set the generic name.
    pub fn generic_name(mut self, generic_name: impl Into<String>) -> Self {
        self.entry.generic_name = Some(generic_name.into());
        self
    }

    /// Set the comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.entry.comment = Some(comment.into());
        self
    }

    /// Set the executable command line. Callers quote arguments themselves.
    pub fn exec(mut self, exec: impl Into<String>) -> Self {
        self.entry.exec = exec.into();
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.entry.icon = icon.into();
        self
    }

    /// Set whether to run in terminal.
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.entry.terminal = terminal;
        self
    }

    /// Set categories.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.entry.categories = categories;
        self
    }

    /// Set keywords.
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.entry.keywords = keywords;
        self
    }

    /// Set whether to hide the entry from menus.
    pub fn no_display(mut self, no_display: bool) -> Self {
        self.entry.no_display = no_display;
        self
    }

    /// Set the StartupWMClass.
    pub fn startup_wm_class(mut self, wm_class: impl Into<String>) -> Self {
        self.entry.startup_wm_class = Some(wm_class.into());
        self
    }

    /// Build the desktop entry.
    pub fn build(self) -> DesktopEntry {
        self.entry
    }
}

impl Default for DesktopEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a single Exec argument.
///
/// Arguments containing reserved characters are wrapped in double quotes with
/// `"`, `` ` ``, `$` and `\` backslash-escaped. The result is then escaped once
/// more as a string value (backslashes and control characters), so the entry
/// always stays on one line. Literal `%` is doubled so it is not read as a
/// field code.
pub fn quote_exec_arg(arg: &str) -> String {
    let arg = arg.replace('%', "%%");
    if !arg.contains(EXEC_RESERVED) {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');

    escape_value(&quoted)
}

/// Split an Exec value into unquoted arguments.
fn split_exec(exec: &str) -> Vec<String> {
    let exec = unescape_value(exec);
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_arg = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_arg = true;
            }
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_arg {
                    args.push(std::mem::take(&mut current));
                    has_arg = false;
                }
            }
            c => {
                current.push(c);
                has_arg = true;
            }
        }
    }
    if has_arg {
        args.push(current);
    }

    args.into_iter().map(|a| a.replace("%%", "%")).collect()
}

fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(InstallError::Validation {
            field: field.to_string(),
            message: format!("expected true or false, got {:?}", other),
        }),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_desktop_entry_builder() {
        let entry = DesktopEntry::builder()
            .name("Sonora")
            .comment("A test application")
            .exec("/opt/sonora/sonora")
            .icon("sonora")
            .terminal(false)
            .build();

        assert_eq!(entry.name, "Sonora");
        assert_eq!(entry.comment, Some("A test application".to_string()));
        assert_eq!(entry.exec, "/opt/sonora/sonora");
        assert_eq!(entry.icon, "sonora");
        assert_eq!(entry.entry_type, "Application");
        assert!(!entry.terminal);
    }

    #[test]
    fn test_sonora_entry_fields() {
        let entry = DesktopEntry::sonora(
            Path::new("/home/u/.local/share/sonora/sonora"),
            Path::new("/home/u/.local/share/sonora/sonora.png"),
        );
        let content = entry.to_string();

        assert!(content.starts_with("[Desktop Entry]\n"));
        assert!(content.contains("Name=Sonora\n"));
        assert!(content.contains("Exec=/home/u/.local/share/sonora/sonora\n"));
        assert!(content.contains("Icon=/home/u/.local/share/sonora/sonora.png\n"));
        assert!(content.contains("Terminal=false\n"));
        assert!(content.contains("Type=Application\n"));
        assert!(content.contains("Categories=AudioVideo;Audio;Player;\n"));
        assert!(!content.contains("NoDisplay"));
    }

    #[test]
    fn test_quote_exec_arg() {
        assert_eq!(quote_exec_arg("/usr/bin/sonora"), "/usr/bin/sonora");
        assert_eq!(
            quote_exec_arg("/home/a b/sonora"),
            "\"/home/a b/sonora\""
        );
        assert_eq!(quote_exec_arg("/opt/100%/sonora"), "/opt/100%%/sonora");
        // `$` is escaped inside quotes, then the backslash is string-escaped
        assert_eq!(quote_exec_arg("/tmp/$x"), "\"/tmp/\\\\$x\"");
    }

    #[test]
    fn test_exec_program_roundtrips_quoting() {
        for path in [
            "/usr/bin/sonora",
            "/home/a b/so$nora",
            "/opt/100%/x",
            "/q\"uote/s",
            "/tmp/line\nbreak/sonora",
            "/tmp/tab\there/sonora",
            "/tmp/cr\rhere/sonora",
        ] {
            let entry = DesktopEntry::builder()
                .name("x")
                .exec(quote_exec_arg(path))
                .build();
            assert_eq!(entry.exec_program().as_deref(), Some(path), "path {:?}", path);
        }
    }

    #[test]
    fn test_parse_reads_back_rendered_entry() {
        let entry = DesktopEntry::sonora(
            Path::new("/home/a b/sonora/sonora"),
            Path::new("/home/a b/sonora/sonora.png"),
        );
        let parsed = DesktopEntry::parse(&entry.to_string()).unwrap();
        assert_eq!(parsed, entry);
        assert_eq!(
            parsed.exec_program().map(PathBuf::from),
            Some(PathBuf::from("/home/a b/sonora/sonora"))
        );
    }

    #[test]
    fn test_control_characters_stay_on_exec_line() {
        let executable = Path::new("/tmp/line\nbreak/sonora");
        let entry = DesktopEntry::sonora(executable, Path::new("/tmp/line\nbreak/sonora.png"));
        let content = entry.to_string();

        let exec_line = content
            .lines()
            .find(|l| l.starts_with("Exec="))
            .unwrap();
        assert_eq!(exec_line, "Exec=\"/tmp/line\\nbreak/sonora\"");
        assert!(content.contains("Icon=/tmp/line\\nbreak/sonora.png\n"));

        let parsed = DesktopEntry::parse(&content).unwrap();
        assert_eq!(parsed.exec_program().map(PathBuf::from), Some(executable.to_path_buf()));
        assert_eq!(parsed.icon, "/tmp/line\nbreak/sonora.png");
    }

    #[test]
    fn test_parse_skips_other_groups_and_comments() {
        let content = "# generated\n\
            [Desktop Entry]\n\
            Name=Sonora\n\
            Name[ru]=Сонора\n\
            Exec=/bin/sonora\n\
            Terminal=false\n\
            \n\
            [Desktop Action Play]\n\
            Name=Play\n\
            Exec=/bin/sonora --play\n";

        let parsed = DesktopEntry::parse(content).unwrap();
        assert_eq!(parsed.name, "Sonora");
        assert_eq!(parsed.exec, "/bin/sonora");
    }

    #[test]
    fn test_parse_rejects_missing_header_and_keys() {
        assert!(matches!(
            DesktopEntry::parse("Name=Sonora\nExec=/bin/sonora\n"),
            Err(InstallError::Validation { .. })
        ));
        assert!(matches!(
            DesktopEntry::parse("[Desktop Entry]\nName=Sonora\n"),
            Err(InstallError::Validation { ref field, .. }) if field == "Exec"
        ));
        assert!(DesktopEntry::parse("[Desktop Entry]\nName=S\nExec=s\nTerminal=yes\n").is_err());
    }

    #[test]
    fn test_write_desktop_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("applications").join("sonora.desktop");

        let entry = DesktopEntry::builder()
            .name("Sonora")
            .exec("/bin/sonora")
            .icon("sonora")
            .build();

        entry.write_to_file(&file_path).unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("Name=Sonora"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o755, 0o755);
        }
    }
}
