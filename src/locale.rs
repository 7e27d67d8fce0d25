//! The slice of localization the report engine consumes.

use std::collections::HashMap;

/// Writing direction of the active language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Read-only access to the active locale.
pub trait Localizer {
    /// Direction of the active language.
    fn direction(&self) -> TextDirection;

    /// Translates `message` and substitutes `%s` with `argument`.
    fn translate(&self, message: &str, argument: &str) -> String;
}

/// A fixed locale backed by an in-memory message table.
///
/// Messages without a translation are used verbatim.
#[derive(Clone, Debug, Default)]
pub struct StaticLocale {
    direction: TextDirection,
    messages: HashMap<String, String>,
}

impl StaticLocale {
    /// English, left to right, no translations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the direction and returns the updated locale.
    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Adds a translation and returns the updated locale.
    pub fn with_message(mut self, message: impl Into<String>, translation: impl Into<String>) -> Self {
        self.messages.insert(message.into(), translation.into());
        self
    }
}

impl Localizer for StaticLocale {
    fn direction(&self) -> TextDirection {
        self.direction
    }

    fn translate(&self, message: &str, argument: &str) -> String {
        let template = self
            .messages
            .get(message)
            .map(String::as_str)
            .unwrap_or(message);
        template.replacen("%s", argument, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untranslated_messages_substitute_argument() {
        let locale = StaticLocale::new();
        assert_eq!(locale.translate("Generated by %s", "webtrees 2.0"), "Generated by webtrees 2.0");
        assert_eq!(locale.direction(), TextDirection::Ltr);
    }

    #[test]
    fn translations_take_precedence() {
        let locale = StaticLocale::new()
            .with_direction(TextDirection::Rtl)
            .with_message("Generated by %s", "נוצר על ידי %s");
        assert_eq!(locale.translate("Generated by %s", "webtrees"), "נוצר על ידי webtrees");
        assert_eq!(locale.direction(), TextDirection::Rtl);
    }
}
