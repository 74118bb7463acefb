//! Primary / variant translator sets.
//!
//! The roster is fixed at startup.  Primaries are raced for the clipboard
//! result; variants only stream to the display.  Both keep configuration
//! order.

use std::sync::Arc;

use super::{ChatTranslator, CustomServerTranslator, EngineTranslator, Translator};
use crate::config::{AppConfig, TranslatorRole};

/// Which set a translator belongs to during a fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterRole {
    Primary,
    Variant,
}

impl From<TranslatorRole> for RosterRole {
    fn from(role: TranslatorRole) -> Self {
        match role {
            TranslatorRole::Primary => RosterRole::Primary,
            TranslatorRole::Variant => RosterRole::Variant,
        }
    }
}

#[derive(Clone, Default)]
pub struct TranslatorRoster {
    primary: Vec<Arc<dyn Translator>>,
    variant: Vec<Arc<dyn Translator>>,
}

impl TranslatorRoster {
    pub fn new(primary: Vec<Arc<dyn Translator>>, variant: Vec<Arc<dyn Translator>>) -> Self {
        Self { primary, variant }
    }

    /// Build every configured translator.  Gateway engines share one HTTP
    /// client; the custom server and chat providers get their own.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut roster = Self::default();
        let gateway_client = super::http_client(config.gateway.timeout_secs);

        for engine in &config.engines {
            let t = EngineTranslator::from_config(engine, &config.gateway, gateway_client.clone());
            roster.push(engine.role.into(), Arc::new(t));
        }
        if let Some(server) = &config.custom_server {
            roster.push(server.role.into(), Arc::new(CustomServerTranslator::from_config(server)));
        }
        for chat in &config.chat {
            roster.push(chat.role.into(), Arc::new(ChatTranslator::from_config(chat)));
        }

        roster
    }

    pub fn push(&mut self, role: RosterRole, translator: Arc<dyn Translator>) {
        match role {
            RosterRole::Primary => self.primary.push(translator),
            RosterRole::Variant => self.variant.push(translator),
        }
    }

    pub fn primary(&self) -> &[Arc<dyn Translator>] {
        &self.primary
    }

    pub fn variant(&self) -> &[Arc<dyn Translator>] {
        &self.variant
    }

    /// Every translator tagged with its role, primaries first.
    pub fn iter(&self) -> impl Iterator<Item = (RosterRole, &Arc<dyn Translator>)> {
        self.primary
            .iter()
            .map(|t| (RosterRole::Primary, t))
            .chain(self.variant.iter().map(|t| (RosterRole::Variant, t)))
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.variant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names per role, for the startup log line.
    pub fn describe(&self) -> String {
        let names = |set: &[Arc<dyn Translator>]| {
            set.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
        };
        format!(
            "primary [{}], variant [{}]",
            names(&self.primary),
            names(&self.variant)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChatConfig, EngineConfig};

    #[test]
    fn default_config_builds_roster() {
        let roster = TranslatorRoster::from_config(&AppConfig::default());

        assert_eq!(roster.primary().len(), 2);
        assert_eq!(roster.variant().len(), 2);
        assert_eq!(
            roster.describe(),
            "primary [Google, Yandex], variant [Custom, GPT]"
        );
    }

    #[test]
    fn roles_follow_config_order() {
        let mut config = AppConfig::default();
        config.custom_server = None;
        config.engines = vec![
            EngineConfig {
                name: "A".into(),
                engine: "a".into(),
                role: TranslatorRole::Variant,
            },
            EngineConfig {
                name: "B".into(),
                engine: "b".into(),
                role: TranslatorRole::Primary,
            },
        ];
        config.chat = vec![ChatConfig {
            name: "C".into(),
            role: TranslatorRole::Primary,
            ..ChatConfig::default()
        }];

        let roster = TranslatorRoster::from_config(&config);
        let order: Vec<(RosterRole, String)> = roster
            .iter()
            .map(|(role, t)| (role, t.name().to_string()))
            .collect();

        assert_eq!(
            order,
            vec![
                (RosterRole::Primary, "B".to_string()),
                (RosterRole::Primary, "C".to_string()),
                (RosterRole::Variant, "A".to_string()),
            ]
        );
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn empty_roster() {
        let roster = TranslatorRoster::default();
        assert!(roster.is_empty());
        assert_eq!(roster.describe(), "primary [], variant []");
    }
}
