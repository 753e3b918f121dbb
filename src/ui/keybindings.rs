//! Keyboard shortcuts registry.
//!
//! Single source of truth for the help overlay and the footer hints.

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., letter variant of an arrow key)
    pub alt_key: Option<KeyCode>,
    pub description: &'static str,
    pub category: ShortcutCategory,
    pub context: ShortcutContext,
}

/// Categories for organizing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Actions,
}

/// Contexts where shortcuts are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Steps 1 to 4
    Wizard,
    /// Inline form on step 5 and the quick form
    CaptureForm,
    /// Result overlays
    Overlay,
}

impl ShortcutCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Actions => "Actions",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Actions,
        ]
    }
}

impl ShortcutContext {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Wizard => "Wizard",
            ShortcutContext::CaptureForm => "Contact Form",
            ShortcutContext::Overlay => "Result Overlay",
        }
    }

    /// All contexts in display order
    pub fn all() -> &'static [ShortcutContext] {
        &[
            ShortcutContext::Wizard,
            ShortcutContext::CaptureForm,
            ShortcutContext::Overlay,
        ]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "q", "Tab", "→/n")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for the help overlay (left-padded to 9 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<9}", self.key_display())
    }
}

/// Format a KeyCode for display
fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Wizard Context ===
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        description: "Quit",
        category: ShortcutCategory::General,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        description: "Toggle help",
        category: ShortcutCategory::General,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Char('h'),
        alt_key: None,
        description: "Quick request form",
        category: ShortcutCategory::General,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Right,
        alt_key: Some(KeyCode::Char('n')),
        description: "Next step (when the step is complete)",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Left,
        alt_key: Some(KeyCode::Char('b')),
        description: "Previous step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Up,
        alt_key: Some(KeyCode::Down),
        description: "Move highlight",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Tab,
        alt_key: None,
        description: "Next group or field",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Wizard,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: Some(KeyCode::Char(' ')),
        description: "Select / toggle",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Wizard,
    },
    // === Capture Form Context ===
    Shortcut {
        key: KeyCode::Tab,
        alt_key: Some(KeyCode::BackTab),
        description: "Next / previous field",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::CaptureForm,
    },
    Shortcut {
        key: KeyCode::Left,
        alt_key: Some(KeyCode::Char('b')),
        description: "Previous step (on the Send button)",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::CaptureForm,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Send (name and contact required)",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::CaptureForm,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Close the quick form, or jump to Send on the summary",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::CaptureForm,
    },
    // === Overlay Context ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: Some(KeyCode::Esc),
        description: "Close",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Overlay,
    },
];

/// Get shortcuts grouped by category for a given context
pub fn shortcuts_by_category_for_context(
    context: ShortcutContext,
) -> Vec<(ShortcutCategory, Vec<&'static Shortcut>)> {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = SHORTCUTS
            .iter()
            .filter(|s| s.context == context && s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(
                !shortcut.description.is_empty(),
                "Shortcut {:?} has empty description",
                shortcut.key
            );
        }
    }

    #[test]
    fn test_key_display_with_alt() {
        let shortcut = Shortcut {
            key: KeyCode::Right,
            alt_key: Some(KeyCode::Char('n')),
            description: "Test",
            category: ShortcutCategory::Navigation,
            context: ShortcutContext::Wizard,
        };
        assert_eq!(shortcut.key_display(), "→/n");
        assert_eq!(shortcut.key_display_padded(), "→/n      ");
    }

    #[test]
    fn test_key_display_special_keys() {
        assert_eq!(format_keycode(&KeyCode::Char(' ')), "Space");
        assert_eq!(format_keycode(&KeyCode::BackTab), "Shift+Tab");
        assert_eq!(format_keycode(&KeyCode::Left), "←");
    }

    #[test]
    fn test_every_context_has_shortcuts() {
        for context in ShortcutContext::all() {
            assert!(!shortcuts_by_category_for_context(*context).is_empty());
            assert!(!context.display_name().is_empty());
        }
    }

    #[test]
    fn test_wizard_groups_in_display_order() {
        let grouped = shortcuts_by_category_for_context(ShortcutContext::Wizard);
        let categories: Vec<_> = grouped.iter().map(|(cat, _)| *cat).collect();
        assert_eq!(
            categories,
            vec![
                ShortcutCategory::General,
                ShortcutCategory::Navigation,
                ShortcutCategory::Actions
            ]
        );
    }
}
