use crate::game::DEFAULT_REVEAL_DELAY;
use anyhow::{Context, bail};
use std::env;
use std::time::Duration;

const SEED_ENV: &str = "MAGIC_MATCH_SEED";
const DEFAULT_REVEAL_MS: u64 = DEFAULT_REVEAL_DELAY.as_millis() as u64;
const MIN_REVEAL_MS: u64 = 100;
const MAX_REVEAL_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Eq)]
pub struct GameConfig
{
    pub seed: Option<u64>,
    pub reveal_delay: Duration,
}

impl GameConfig
{
    pub fn from_args(args: &[String]) -> anyhow::Result<Self>
    {
        let env_seed = env::var_os(SEED_ENV).map(|value| value.to_string_lossy().into_owned());
        Self::parse(args, env_seed.as_deref())
    }

    /// `env_seed` is only parsed when no `--seed` option is given.
    fn parse(args: &[String], env_seed: Option<&str>) -> anyhow::Result<Self>
    {
        let mut seed: Option<u64> = None;
        let mut reveal_ms: Option<u64> = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--seed" {
                let value = iter.next().context("Expected value after --seed")?;
                seed = Some(parse_seed(value)?);
            } else if let Some(rest) = arg.strip_prefix("--seed=") {
                seed = Some(parse_seed(rest)?);
            } else if arg == "--reveal-ms" {
                let value = iter.next().context("Expected value after --reveal-ms")?;
                reveal_ms = Some(parse_reveal_ms(value)?);
            } else if let Some(rest) = arg.strip_prefix("--reveal-ms=") {
                reveal_ms = Some(parse_reveal_ms(rest)?);
            } else {
                bail!("Unknown option '{arg}'. Run with --help.");
            }
        }

        let seed = match (seed, env_seed) {
            (Some(seed), _) => Some(seed),
            (None, Some(value)) => Some(parse_seed(value).with_context(|| format!("Invalid {SEED_ENV}"))?),
            (None, None) => None,
        };
        let defaults = Self::default();
        Ok(Self {
            seed,
            reveal_delay: reveal_ms
                .map(|ms| Duration::from_millis(ms.clamp(MIN_REVEAL_MS, MAX_REVEAL_MS)))
                .unwrap_or(defaults.reveal_delay),
        })
    }
}

impl Default for GameConfig
{
    fn default() -> Self
    {
        Self {
            seed: None,
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_MS),
        }
    }
}

fn parse_seed(value: &str) -> anyhow::Result<u64>
{
    value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Seed must be a non-negative integer, got '{value}'"))
}

fn parse_reveal_ms(value: &str) -> anyhow::Result<u64>
{
    value
        .parse::<u64>()
        .with_context(|| format!("Reveal delay must be a number of milliseconds, got '{value}'"))
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn args(list: &[&str]) -> Vec<String>
    {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_defaults()
    {
        let config = GameConfig::parse(&[], None).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_both_option_forms()
    {
        let joined = GameConfig::parse(&args(&["--seed=5", "--reveal-ms=400"]), None).unwrap();
        let split = GameConfig::parse(&args(&["--seed", "5", "--reveal-ms", "400"]), None).unwrap();
        assert_eq!(joined, split);
        assert_eq!(joined.seed, Some(5));
        assert_eq!(joined.reveal_delay, Duration::from_millis(400));
    }

    #[test]
    fn test_reveal_delay_is_clamped()
    {
        let low = GameConfig::parse(&args(&["--reveal-ms=1"]), None).unwrap();
        let high = GameConfig::parse(&args(&["--reveal-ms=999999"]), None).unwrap();
        assert_eq!(low.reveal_delay, Duration::from_millis(MIN_REVEAL_MS));
        assert_eq!(high.reveal_delay, Duration::from_millis(MAX_REVEAL_MS));
    }

    #[test]
    fn test_env_seed_is_fallback()
    {
        let from_env = GameConfig::parse(&[], Some("9")).unwrap();
        assert_eq!(from_env.seed, Some(9));
        let from_arg = GameConfig::parse(&args(&["--seed=1"]), Some("9")).unwrap();
        assert_eq!(from_arg.seed, Some(1));
    }

    #[test]
    fn test_seed_option_overrides_bad_env_seed()
    {
        let config = GameConfig::parse(&args(&["--seed=4"]), Some("abc")).unwrap();
        assert_eq!(config.seed, Some(4));
        let split = GameConfig::parse(&args(&["--seed", "4"]), Some("\u{fffd}")).unwrap();
        assert_eq!(split.seed, Some(4));
    }

    #[test]
    fn test_bad_env_seed_rejected_without_option()
    {
        let err = GameConfig::parse(&[], Some("abc")).unwrap_err();
        assert!(format!("{err:#}").contains(SEED_ENV));
        // Non-UTF-8 values arrive lossily converted and must not be ignored.
        assert!(GameConfig::parse(&[], Some("\u{fffd}12")).is_err());
    }

    #[test]
    fn test_rejects_bad_input()
    {
        assert!(GameConfig::parse(&args(&["--wpm=20"]), None).is_err());
        assert!(GameConfig::parse(&args(&["--seed"]), None).is_err());
        assert!(GameConfig::parse(&args(&["--seed=-3"]), None).is_err());
        assert!(GameConfig::parse(&args(&["--reveal-ms=soon"]), None).is_err());
    }
}
