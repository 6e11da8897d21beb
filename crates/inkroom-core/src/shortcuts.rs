//! Keyboard shortcut registry.

/// Editing command a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Undo,
    Redo,
    /// Abandon the in-progress gesture.
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key press matches. Letter keys compare case-insensitively
    /// since Shift changes the reported character.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current drawing"),
        ]
    }

    /// Find the command bound to a key press. `ctrl` should also be set
    /// for the platform command key.
    pub fn resolve(key: &str, ctrl: bool, shift: bool) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift))
            .map(|s| s.command)
    }

    /// Human-readable shortcut table, one per line.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|s| format!("{:20} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(ShortcutRegistry::resolve("z", true, false), Some(Command::Undo));
        assert_eq!(ShortcutRegistry::resolve("Z", true, true), Some(Command::Redo));
        assert_eq!(ShortcutRegistry::resolve("y", true, false), Some(Command::Redo));
        assert_eq!(ShortcutRegistry::resolve("Escape", false, false), Some(Command::Cancel));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(ShortcutRegistry::resolve("z", false, false), None);
        assert_eq!(ShortcutRegistry::resolve("y", true, true), None);
        assert_eq!(ShortcutRegistry::resolve("q", true, false), None);
    }

    #[test]
    fn test_format() {
        let redo = Shortcut::new("Z", true, true, Command::Redo, "Redo");
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
        assert!(ShortcutRegistry::describe().contains("Ctrl+Y"));
    }
}
