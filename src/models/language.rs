use serde::{Deserialize, Serialize};

/// UI language. The app is bilingual, English by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::En,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    /// Label of the toggle button: the language it switches to
    #[must_use]
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Language::En => "हिंदी",
            Language::Hi => "English",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::En.toggled(), Language::Hi);
        assert_eq!(Language::En.toggled().toggled(), Language::En);
        assert_eq!(Language::Hi.toggle_label(), "English");
    }
}
