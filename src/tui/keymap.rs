use crossterm::event::{KeyCode, KeyModifiers};

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the dashboard can perform in response to a key press.
///
/// Actions are context-free identifiers; the *execution* code in `App`
/// decides what actually happens based on the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    Quit,
    ShowHelp,
    GoHome,
    GoTasks,
    GoProjects,
    NextTab,
    PrevTab,
    Refresh,

    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Select,
    Back,

    // Items
    NewItem,
    Edit,
    Delete,
    ChangeStatus,
    Motivate,
    CopyQuote,
    DeleteProject,
}

// ── Help categories ──────────────────────────────────────────────────

/// Logical groupings shown in the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    Navigation,
    Tasks,
    Projects,
    Board,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Tasks => "Tasks",
            Self::Projects => "Projects",
            Self::Board => "Project Board",
        }
    }

    /// Fixed display order for the help overlay.
    const ORDERED: &[Self] = &[Self::Navigation, Self::Tasks, Self::Projects, Self::Board];
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with metadata for the help overlay.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Human-readable key label shown in help (e.g. `"Ctrl+C"`).
    /// Empty for aliases that share a row with another binding.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

/// A single row in the help overlay.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of every normal-mode key binding.
pub struct KeyMap {
    pub normal: Vec<KeyBinding>,
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            normal: default_normal_bindings(),
        }
    }

    /// Look up a normal-mode action for the given key event. Shifted
    /// characters and BackTab match regardless of the reported SHIFT modifier.
    pub fn lookup_normal(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let modifiers = match code {
            KeyCode::Char(_) | KeyCode::BackTab => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        self.normal
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// Generate grouped help entries in display order.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        let mut out = Vec::new();

        for &cat in HelpCategory::ORDERED {
            let mut entries: Vec<HelpEntry> = Vec::new();
            for kb in &self.normal {
                if kb.category == cat
                    && !kb.description.is_empty()
                    && !entries.iter().any(|e| e.label == kb.label)
                {
                    entries.push(HelpEntry {
                        label: kb.label,
                        description: kb.description,
                    });
                }
            }
            if !entries.is_empty() {
                out.push((cat.label(), entries));
            }
        }

        out
    }
}

// ── Default normal-mode bindings ─────────────────────────────────────

fn bind(
    code: KeyCode,
    action: Action,
    label: &'static str,
    description: &'static str,
    category: HelpCategory,
) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: KeyModifiers::NONE,
        action,
        label,
        description,
        category,
    }
}

fn alias(code: KeyCode, action: Action, category: HelpCategory) -> KeyBinding {
    bind(code, action, "", "", category)
}

#[allow(clippy::enum_glob_use)]
fn default_normal_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        // ── Navigation ───────────────────────────────────────────
        bind(KeyCode::Char('1'), GoHome, "  1/2/3", "Home / Tasks / Projects", Navigation),
        alias(KeyCode::Char('2'), GoTasks, Navigation),
        alias(KeyCode::Char('3'), GoProjects, Navigation),
        bind(KeyCode::Tab, NextTab, "  Tab", "Next screen", Navigation),
        alias(KeyCode::BackTab, PrevTab, Navigation),
        bind(KeyCode::Char('j'), MoveDown, "  j/k", "Move down / up", Navigation),
        alias(KeyCode::Char('k'), MoveUp, Navigation),
        alias(KeyCode::Down, MoveDown, Navigation),
        alias(KeyCode::Up, MoveUp, Navigation),
        bind(KeyCode::Enter, Select, "  Enter", "Open project", Navigation),
        bind(KeyCode::Esc, Back, "  Esc", "Back to projects", Navigation),
        bind(KeyCode::Char('r'), Refresh, "  r", "Reload from server", Navigation),
        bind(KeyCode::Char('?'), ShowHelp, "  ?", "This help screen", Navigation),
        bind(KeyCode::Char('q'), Quit, "  q", "Quit", Navigation),
        KeyBinding {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            action: Quit,
            label: "",
            description: "",
            category: Navigation,
        },
        // ── Tasks ────────────────────────────────────────────────
        bind(KeyCode::Char('n'), NewItem, "  n", "New task / project", Tasks),
        bind(KeyCode::Char('e'), Edit, "  e", "Edit selected", Tasks),
        bind(KeyCode::Char('d'), Delete, "  d", "Delete selected", Tasks),
        bind(KeyCode::Char('s'), ChangeStatus, "  s", "Change status", Tasks),
        bind(KeyCode::Char('m'), Motivate, "  m", "Get motivation", Tasks),
        bind(KeyCode::Char('y'), CopyQuote, "  y", "Copy quote", Tasks),
        // ── Projects ─────────────────────────────────────────────
        bind(KeyCode::Char('x'), DeleteProject, "  x", "Delete open project", Projects),
        // ── Board ────────────────────────────────────────────────
        bind(KeyCode::Char('h'), MoveLeft, "  h/l", "Previous / next column", Board),
        alias(KeyCode::Char('l'), MoveRight, Board),
        alias(KeyCode::Left, MoveLeft, Board),
        alias(KeyCode::Right, MoveRight, Board),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────
