//! Message catalogue lookup with positional parameters.

use crate::error::ValidatorError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

const DEFAULT_MESSAGES: &str = include_str!("../resources/messages.toml");

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("Failed to compile placeholder regex"));

#[derive(Debug, Clone)]
pub struct Localiser {
    messages: HashMap<String, String>,
}

impl Localiser {
    /// The embedded English catalogue.
    pub fn english() -> Result<Self, ValidatorError> {
        let messages: HashMap<String, String> = toml::from_str(DEFAULT_MESSAGES)
            .map_err(|e| ValidatorError::Config(format!("message catalogue: {e}")))?;
        Ok(Self { messages })
    }

    /// The English catalogue with domain specific overrides applied on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self, ValidatorError> {
        let mut localiser = Self::english()?;
        localiser
            .messages
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(localiser)
    }

    pub fn localise(&self, key: &str) -> String {
        self.localise_with::<&str>(key, &[])
    }

    /// Resolve `key` replacing `{0}`, `{1}`, ... with `params`. Unknown keys resolve to themselves.
    pub fn localise_with<S: AsRef<str>>(&self, key: &str, params: &[S]) -> String {
        let Some(message) = self.messages.get(key) else {
            return key.to_string();
        };
        if params.is_empty() {
            return message.clone();
        }
        PLACEHOLDER
            .replace_all(message, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| params.get(i))
                    .map(|p| p.as_ref().to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key() {
        let localiser = Localiser::english().unwrap();
        assert_eq!(localiser.localise("validator.label.pageLabel"), "Page");
    }

    #[test]
    fn test_unknown_key_resolves_to_itself() {
        let localiser = Localiser::english().unwrap();
        assert_eq!(localiser.localise("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_parameters_are_substituted() {
        let localiser = Localiser::english().unwrap();
        let text = localiser.localise_with(
            "validator.label.resultFindingsDetailsLabel",
            &["2", "1", "0"],
        );
        assert_eq!(text, "2 error(s), 1 warning(s), 0 message(s)");
    }

    #[test]
    fn test_missing_parameter_keeps_placeholder() {
        let localiser = Localiser::english().unwrap();
        let text = localiser.localise_with("validator.label.resultFindingsDetailsLabel", &["2"]);
        assert_eq!(text, "2 error(s), {1} warning(s), {2} message(s)");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = HashMap::from([("validator.reportTitle".to_string(), "Invoice report".to_string())]);
        let localiser = Localiser::with_overrides(&overrides).unwrap();
        assert_eq!(localiser.localise("validator.reportTitle"), "Invoice report");
        assert!(localiser.contains("validator.label.ofLabel"));
    }
}
