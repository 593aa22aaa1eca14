#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Theme as seen by the UI. Starts unresolved until the stored preference has
/// been read; while unresolved the device scheme is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeState {
    #[default]
    Unresolved,
    Resolved(Theme),
}

impl ThemeState {
    pub fn effective(&self, device: Theme) -> Theme {
        match self {
            Self::Unresolved => device,
            Self::Resolved(theme) => *theme,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Moves out of `Unresolved`. Returns false (and changes nothing) if
    /// already resolved.
    pub fn resolve(&mut self, theme: Theme) -> bool {
        if self.is_resolved() {
            return false;
        }
        *self = Self::Resolved(theme);
        true
    }
}
