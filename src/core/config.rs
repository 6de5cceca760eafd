use crate::core::{
    error::{Error, Result},
    store::CooldownType,
};

const MESSAGE_COOLDOWN: &str = "MESSAGE_COOLDOWN";
const MESSAGE_POINTS: &str = "MESSAGE_POINTS";
const VOICE_COOLDOWN: &str = "VOICE_COOLDOWN";
const VOICE_POINTS: &str = "VOICE_POINTS";

#[derive(Debug, Clone, Copy)]
pub struct RewardRule {
    pub cooldown_ms: u64,
    pub points: u64,
}

/// Reward rules parsed from the environment once at startup. Message
/// rewards are mandatory; voice rewards are on only when both keys are set.
#[derive(Debug, Clone)]
pub struct RewardConfig {
    pub message: RewardRule,
    pub voice: Option<RewardRule>,
}

impl RewardConfig {
    pub fn from_env() -> Result<RewardConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<RewardConfig> {
        let message = RewardRule {
            cooldown_ms: require(MESSAGE_COOLDOWN, &lookup)?,
            points: require(MESSAGE_POINTS, &lookup)?,
        };

        let voice = match (lookup(VOICE_COOLDOWN), lookup(VOICE_POINTS)) {
            (None, None) => None,
            (cooldown, points) => Some(RewardRule {
                cooldown_ms: parse(
                    VOICE_COOLDOWN,
                    cooldown.ok_or(Error::MissingConfig(VOICE_COOLDOWN))?,
                )?,
                points: parse(
                    VOICE_POINTS,
                    points.ok_or(Error::MissingConfig(VOICE_POINTS))?,
                )?,
            }),
        };

        Ok(RewardConfig { message, voice })
    }

    pub fn rule_for(&self, kind: CooldownType) -> Option<RewardRule> {
        match kind {
            CooldownType::Message => Some(self.message),
            CooldownType::Voice => self.voice,
        }
    }
}

fn require(key: &'static str, lookup: &impl Fn(&str) -> Option<String>) -> Result<u64> {
    parse(key, lookup(key).ok_or(Error::MissingConfig(key))?)
}

fn parse(key: &'static str, value: String) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &'static [(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn a_full_environment_parses() {
        let config = RewardConfig::from_lookup(lookup_from(&[
            ("MESSAGE_COOLDOWN", "60000"),
            ("MESSAGE_POINTS", "10"),
            ("VOICE_COOLDOWN", "300000"),
            ("VOICE_POINTS", "25"),
        ]))
        .unwrap();

        assert_eq!(config.message.cooldown_ms, 60_000);
        assert_eq!(config.message.points, 10);

        let voice = config.rule_for(CooldownType::Voice).unwrap();
        assert_eq!(voice.cooldown_ms, 300_000);
        assert_eq!(voice.points, 25);
    }

    #[test]
    fn voice_rewards_default_to_off() {
        let config = RewardConfig::from_lookup(lookup_from(&[
            ("MESSAGE_COOLDOWN", "60000"),
            ("MESSAGE_POINTS", "10"),
        ]))
        .unwrap();

        assert!(config.rule_for(CooldownType::Voice).is_none());
        assert!(config.rule_for(CooldownType::Message).is_some());
    }

    #[test]
    fn half_a_voice_pair_is_an_error() {
        let result = RewardConfig::from_lookup(lookup_from(&[
            ("MESSAGE_COOLDOWN", "60000"),
            ("MESSAGE_POINTS", "10"),
            ("VOICE_POINTS", "25"),
        ]));

        assert!(matches!(result, Err(Error::MissingConfig(VOICE_COOLDOWN))));
    }

    #[test]
    fn a_missing_key_names_itself() {
        let result = RewardConfig::from_lookup(lookup_from(&[("MESSAGE_COOLDOWN", "60000")]));

        assert!(matches!(result, Err(Error::MissingConfig(MESSAGE_POINTS))));
    }

    #[test]
    fn a_non_numeric_value_is_rejected() {
        let result = RewardConfig::from_lookup(lookup_from(&[
            ("MESSAGE_COOLDOWN", "soon"),
            ("MESSAGE_POINTS", "10"),
        ]));

        assert!(matches!(
            result,
            Err(Error::InvalidConfig {
                key: MESSAGE_COOLDOWN,
                ..
            })
        ));
    }

    #[test]
    fn a_negative_value_is_rejected() {
        let result = RewardConfig::from_lookup(lookup_from(&[
            ("MESSAGE_COOLDOWN", "60000"),
            ("MESSAGE_POINTS", "-10"),
        ]));

        assert!(matches!(
            result,
            Err(Error::InvalidConfig {
                key: MESSAGE_POINTS,
                ..
            })
        ));
    }
}
