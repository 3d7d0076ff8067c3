//! Game modes and the seed strings that name a round.
//!
//! A seed string is the only thing two players need to share to get the same board. Timed
//! modes bucket wall-clock time (UTC) into slots, so everyone playing in the same slot gets
//! the same seed:
//!
//! | mode       | seed                                          | slot          |
//! |------------|-----------------------------------------------|---------------|
//! | `Random`   | `moggle\|random\|<a>-<b>-<unix_ms>`           | none          |
//! | `Official` | `moggle\|official\|YYYY-MM-DD HH:MMZ`         | 5 minutes     |
//! | `Longest`  | `moggle\|official-longest\|YYYY-MM-DD HH:MMZ` | 2 minutes     |
//! | `Variant`  | `moggle\|variant\|<id>\|YYYY-MM-DD HH:00Z`    | 1 hour        |
//!
//! In `Variant` mode the hour also picks the letter source: `(unix_ms / 1h) % VARIANTS.len()`.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::errors::BoardError;
use crate::letters::{variant_by_id, Variant, VARIANTS};

const SEED_PREFIX: &str = "moggle";
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Label used for seeds that do not follow the `moggle|...` scheme.
pub const CUSTOM_LABEL: &str = "Game";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Fresh board every time, scored by points.
    Random,
    /// Shared board per 5-minute slot, scored by points.
    Official,
    /// Shared board per 2-minute slot; only the longest word counts.
    Longest,
    /// Shared board per hour from the rotating letter source.
    Variant,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [GameMode::Random, GameMode::Official, GameMode::Longest, GameMode::Variant];

    /// Name used on the command line and in the browser bindings.
    pub fn name(self) -> &'static str {
        match self {
            GameMode::Random => "random",
            GameMode::Official => "official",
            GameMode::Longest => "longest",
            GameMode::Variant => "variant",
        }
    }

    /// Tag embedded in the seed string.
    pub fn seed_tag(self) -> &'static str {
        match self {
            GameMode::Random => "random",
            GameMode::Official => "official",
            GameMode::Longest => "official-longest",
            GameMode::Variant => "variant",
        }
    }

    /// Display name at the start of a round label.
    pub fn title(self) -> &'static str {
        match self {
            GameMode::Random => "Random",
            GameMode::Official => "Official",
            GameMode::Longest => "Longest",
            GameMode::Variant => "Variant",
        }
    }

    /// Slot width in minutes, for the timed modes.
    pub fn slot_minutes(self) -> Option<u32> {
        match self {
            GameMode::Random => None,
            GameMode::Official => Some(5),
            GameMode::Longest => Some(2),
            GameMode::Variant => Some(60),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = GameMode::ALL.iter().map(|m| m.name()).collect();
                format!("unknown mode '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A UTC wall-clock instant, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcMinute {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl UtcMinute {
    pub fn from_unix_ms(ms: u64) -> UtcMinute {
        let days = (ms / MS_PER_DAY) as i64;
        let (year, month, day) = civil_from_days(days);
        let minute_of_day = ((ms % MS_PER_DAY) / MS_PER_MINUTE) as u32;
        UtcMinute { year, month, day, hour: minute_of_day / 60, minute: minute_of_day % 60 }
    }

    /// Round the minute down to a multiple of `width` (a width of 60 or more keeps the hour).
    pub fn floor_to(self, width: u32) -> UtcMinute {
        let width = width.clamp(1, 60);
        UtcMinute { minute: self.minute / width * width, ..self }
    }

    /// `"YYYY-MM-DD HH:MMZ"`
    pub fn slot(&self) -> String {
        format!("{:04}-{:02}-{:02} {}Z", self.year, self.month, self.day, self.clock())
    }

    /// `"HH:MM"`
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    let (month, day) = (month as u32, day as u32);
    (year, month, day)
}

/// The variant in rotation during the hour containing `now_ms`.
pub fn variant_for_time(now_ms: u64) -> &'static Variant {
    let idx = ((now_ms / MS_PER_HOUR) % VARIANTS.len() as u64) as usize;
    &VARIANTS[idx]
}

/// Everything needed to start a round: which mode, the seed, its display label and the
/// letter source.
#[derive(Debug, Clone)]
pub struct Round {
    pub mode: GameMode,
    pub seed: String,
    pub label: String,
    pub variant: &'static Variant,
}

impl Round {
    /// The round `mode` would start at `now_ms`. `entropy` only feeds `Random` seeds.
    #[must_use]
    pub fn for_mode(mode: GameMode, now_ms: u64, entropy: [u32; 2]) -> Round {
        let classic = &VARIANTS[0];
        let round = match mode.slot_minutes() {
            None => Round {
                mode,
                seed: format!("{SEED_PREFIX}|{}|{}-{}-{now_ms}", mode.seed_tag(), entropy[0], entropy[1]),
                label: mode.title().to_string(),
                variant: classic,
            },
            Some(width) => {
                let slot = UtcMinute::from_unix_ms(now_ms).floor_to(width);
                if mode == GameMode::Variant {
                    let variant = variant_for_time(now_ms);
                    Round {
                        mode,
                        seed: format!("{SEED_PREFIX}|{}|{}|{}", mode.seed_tag(), variant.id, slot.slot()),
                        label: format!("{} {}", variant.label, slot.clock()),
                        variant,
                    }
                } else {
                    Round {
                        mode,
                        seed: format!("{SEED_PREFIX}|{}|{}", mode.seed_tag(), slot.slot()),
                        label: format!("{} {}", mode.title(), slot.clock()),
                        variant: classic,
                    }
                }
            }
        };
        debug!("Round for {mode} at {now_ms}: seed {:?}, variant {}", round.seed, round.variant.id);
        round
    }

    /// Recover mode, label and letter source from a seed string.
    ///
    /// Seeds outside the `moggle|...` scheme are still playable: they become a classic
    /// board labelled [`CUSTOM_LABEL`] and scored by points.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownVariant`] if a `variant` seed names an unregistered variant.
    pub fn from_seed(seed: &str) -> Result<Round, BoardError> {
        let classic = &VARIANTS[0];
        let custom = || Round {
            mode: GameMode::Random,
            seed: seed.to_string(),
            label: CUSTOM_LABEL.to_string(),
            variant: classic,
        };

        let parts: Vec<&str> = seed.split('|').collect();
        if parts.first() != Some(&SEED_PREFIX) || parts.len() < 3 {
            return Ok(custom());
        }
        let round = match (parts[1], &parts[2..]) {
            ("random", _) => Round { label: GameMode::Random.title().to_string(), ..custom() },
            ("official", [slot]) => Round {
                mode: GameMode::Official,
                label: label_with_clock(GameMode::Official.title(), slot),
                ..custom()
            },
            ("official-longest", [slot]) => Round {
                mode: GameMode::Longest,
                label: label_with_clock(GameMode::Longest.title(), slot),
                ..custom()
            },
            ("variant", [id, slot]) => {
                let variant = variant_by_id(id)?;
                Round {
                    mode: GameMode::Variant,
                    label: label_with_clock(variant.label, slot),
                    variant,
                    ..custom()
                }
            }
            _ => custom(),
        };
        Ok(round)
    }
}

fn label_with_clock(prefix: &str, slot: &str) -> String {
    match slot_clock(slot) {
        Some(clock) => format!("{prefix} {clock}"),
        None => prefix.to_string(),
    }
}

/// `"2024-01-01 10:05Z"` → `"10:05"`
fn slot_clock(slot: &str) -> Option<&str> {
    let time = slot.split_whitespace().nth(1)?.strip_suffix('Z')?;
    let (hh, mm) = time.split_once(':')?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    (two_digits(hh) && two_digits(mm)).then_some(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01 10:07:59Z
    const JAN_1: u64 = 1_704_103_679_000;
    // 2024-06-30 23:58:30Z
    const JUN_30: u64 = 1_719_791_910_000;

    #[test]
    fn test_utc_conversion() {
        let t = UtcMinute::from_unix_ms(JAN_1);
        assert_eq!((t.year, t.month, t.day, t.hour, t.minute), (2024, 1, 1, 10, 7));
        assert_eq!(UtcMinute::from_unix_ms(0).slot(), "1970-01-01 00:00Z");
        // leap day
        assert_eq!(UtcMinute::from_unix_ms(1_709_210_096_000).slot(), "2024-02-29 12:34Z");
        assert_eq!(UtcMinute::from_unix_ms(951_872_399_000).slot(), "2000-03-01 00:59Z");
    }

    #[test]
    fn test_floor_to_slot() {
        let t = UtcMinute::from_unix_ms(JAN_1);
        assert_eq!(t.floor_to(5).clock(), "10:05");
        assert_eq!(t.floor_to(2).clock(), "10:06");
        assert_eq!(t.floor_to(60).clock(), "10:00");
    }

    #[test]
    fn test_official_seed() {
        let round = Round::for_mode(GameMode::Official, JAN_1, [1, 2]);
        assert_eq!(round.seed, "moggle|official|2024-01-01 10:05Z");
        assert_eq!(round.label, "Official 10:05");
        assert_eq!(round.variant.id, "classic");
    }

    #[test]
    fn test_longest_seed() {
        let round = Round::for_mode(GameMode::Longest, JUN_30, [0, 0]);
        assert_eq!(round.seed, "moggle|official-longest|2024-06-30 23:58Z");
        assert_eq!(round.label, "Longest 23:58");
    }

    #[test]
    fn test_random_seed_uses_entropy() {
        let round = Round::for_mode(GameMode::Random, 1234, [7, 9]);
        assert_eq!(round.seed, "moggle|random|7-9-1234");
        assert_eq!(round.label, "Random");
        assert_ne!(round.seed, Round::for_mode(GameMode::Random, 1234, [7, 10]).seed);
    }

    #[test]
    fn test_variant_rotation() {
        assert_eq!(variant_for_time(0).id, "classic");
        assert_eq!(variant_for_time(MS_PER_HOUR - 1).id, "classic");
        assert_eq!(variant_for_time(MS_PER_HOUR).id, "big-bag");
        assert_eq!(variant_for_time(JAN_1).id, "vowel-storm");
        assert_eq!(variant_for_time(JUN_30).id, "centre-vowels");

        let round = Round::for_mode(GameMode::Variant, JAN_1, [0, 0]);
        assert_eq!(round.seed, "moggle|variant|vowel-storm|2024-01-01 10:00Z");
        assert_eq!(round.label, "Vowel Storm 10:00");
    }

    #[test]
    fn test_timed_seeds_are_stable_within_slot() {
        let start = 1_704_103_500_000; // 10:05:00
        for offset in [0, 60_000, 299_999] {
            assert_eq!(
                Round::for_mode(GameMode::Official, start + offset, [0, 0]).seed,
                Round::for_mode(GameMode::Official, start, [0, 0]).seed
            );
        }
        assert_ne!(
            Round::for_mode(GameMode::Official, start + 300_000, [0, 0]).seed,
            Round::for_mode(GameMode::Official, start, [0, 0]).seed
        );
    }

    #[test]
    fn test_from_seed_recovers_mode() {
        for mode in GameMode::ALL {
            let made = Round::for_mode(mode, JUN_30, [3, 4]);
            let parsed = Round::from_seed(&made.seed).unwrap();
            assert_eq!(parsed.mode, mode);
            assert_eq!(parsed.label, made.label);
            assert_eq!(parsed.variant.id, made.variant.id);
            assert_eq!(parsed.seed, made.seed);
        }
    }

    #[test]
    fn test_from_seed_custom_and_unknown_variant() {
        let custom = Round::from_seed("hello world").unwrap();
        assert_eq!(custom.label, CUSTOM_LABEL);
        assert_eq!(custom.variant.id, "classic");

        let partial = Round::from_seed("moggle|official|sometime").unwrap();
        assert_eq!(partial.mode, GameMode::Official);
        assert_eq!(partial.label, "Official");

        let err = Round::from_seed("moggle|variant|nope|2024-01-01 10:00Z").unwrap_err();
        assert_eq!(err.code(), "B007");
    }

    #[test]
    fn test_mode_names_parse() {
        for mode in GameMode::ALL {
            assert_eq!(mode.name().parse::<GameMode>(), Ok(mode));
        }
        assert_eq!("LONGEST".parse::<GameMode>(), Ok(GameMode::Longest));
        assert!("blitz".parse::<GameMode>().is_err());
    }
}
