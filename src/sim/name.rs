//! Name analysis - converts a ball's name into its battle stats
//!
//! Everything derived here is a pure function of the name: the hash, the
//! attribute split, and the ability index are identical on every call. The
//! only randomness is the documented jackpot roll (0.5% chance of a 175 power
//! score for high-quality names) and the passive-tier roll, both drawn from
//! the match RNG so a seeded match stays reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Power score boundaries
pub const POWER_MIN: f32 = 60.0;
pub const POWER_NORMAL: f32 = 100.0;
pub const POWER_MAX: f32 = 150.0;
/// Reachable only through the jackpot roll
pub const POWER_EXTREME: f32 = 175.0;

/// Words that grant quality and power bonuses (mythology, math, speed, power)
pub const SPECIAL_WORDS: &[&str] = &[
    // Myth and deity
    "zeus", "thor", "gaia", "apollo", "titan", "atlas", "odin", "athena", "ares",
    // Math
    "pi", "phi", "omega", "alpha", "beta", "gamma", "delta", "sigma", "infinity",
    // Speed
    "flash", "sonic", "dash", "bolt", "swift", "quick", "speedy", "rapid", "velocity",
    // Power
    "hulk", "giant", "mega", "ultra", "power", "force", "strong", "mighty",
];

/// Rarity bracket gating which ability pool a ball draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Common => "Common",
            Tier::Uncommon => "Uncommon",
            Tier::Rare => "Rare",
            Tier::Epic => "Epic",
            Tier::Legendary => "Legendary",
        }
    }

    /// Display hue band for balls of this tier (degrees)
    pub fn hue_range(&self) -> (f32, f32) {
        match self {
            Tier::Common => (180.0, 240.0),    // cyan/blue
            Tier::Uncommon => (90.0, 150.0),   // green
            Tier::Rare => (270.0, 330.0),      // purple
            Tier::Epic => (30.0, 60.0),        // orange
            Tier::Legendary => (0.0, 30.0),    // red
        }
    }
}

/// Attribute split; the four values sum to exactly 100 at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub hp: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
}

impl Attributes {
    pub fn balanced() -> Self {
        Self {
            hp: 25.0,
            attack: 25.0,
            defense: 25.0,
            speed: 25.0,
        }
    }

    pub fn total(&self) -> f32 {
        self.hp + self.attack + self.defense + self.speed
    }

    /// Coerce any NaN back to the neutral default before it reaches damage math
    pub fn sanitize(&mut self) {
        for value in [
            &mut self.hp,
            &mut self.attack,
            &mut self.defense,
            &mut self.speed,
        ] {
            if value.is_nan() {
                log::warn!("NaN attribute coerced to default");
                *value = 25.0;
            }
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Raw counts and pattern checks extracted from a name
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NameFactors {
    pub vowels: u32,
    pub consonants: u32,
    pub digits: u32,
    pub special_chars: u32,
    pub is_palindrome: bool,
    /// Run-length score: +1 at the third consecutive equal char, +0.5 per extra
    pub repetitions: f32,
    pub has_special_word: bool,
    pub name_length: usize,
}

/// Full result of analyzing a name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameAnalysis {
    pub power_score: f32,
    pub attributes: Attributes,
    pub passive_tier: Tier,
    pub factors: NameFactors,
    pub quality: f32,
}

impl NameAnalysis {
    /// Fixed fallback for empty or whitespace-only names
    pub fn default_characteristics() -> Self {
        Self {
            power_score: POWER_MIN,
            attributes: Attributes::balanced(),
            passive_tier: Tier::Common,
            factors: NameFactors::default(),
            quality: 0.0,
        }
    }
}

/// 32-bit string hash over UTF-16 code units: `h = (h << 5) - h + unit`
pub fn simple_hash(name: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

/// Analyze a name into power score, attribute split, tier, and factors
pub fn analyze_name(name: &str, rng: &mut impl Rng) -> NameAnalysis {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return NameAnalysis::default_characteristics();
    }

    let hash = simple_hash(trimmed);
    let factors = name_factors(trimmed);
    let quality = name_quality(trimmed, &factors);
    let power_score = power_score(quality, &factors, rng);
    let attributes = attribute_distribution(trimmed, hash, &factors, power_score);
    let passive_tier = passive_tier(quality, &factors, rng);

    NameAnalysis {
        power_score,
        attributes,
        passive_tier,
        factors,
        quality,
    }
}

/// Pick a display hue from the tier's band
pub fn ball_hue(tier: Tier, rng: &mut impl Rng) -> f32 {
    let (lo, hi) = tier.hue_range();
    rng.random_range(lo..hi)
}

fn name_factors(name: &str) -> NameFactors {
    let lower = name.to_lowercase();

    let vowels = lower.chars().filter(|c| "aeiou".contains(*c)).count() as u32;
    let letters = lower.chars().filter(char::is_ascii_alphabetic).count() as u32;
    let consonants = letters - vowels;
    let digits = lower.chars().filter(char::is_ascii_digit).count() as u32;
    let special_chars = lower.chars().filter(|c| !c.is_ascii_alphanumeric()).count() as u32;

    NameFactors {
        vowels,
        consonants,
        digits,
        special_chars,
        is_palindrome: is_palindrome(&lower),
        repetitions: char_repetitions(&lower),
        has_special_word: SPECIAL_WORDS.iter().any(|w| lower.contains(w)),
        name_length: name.chars().count(),
    }
}

/// Palindrome check over the alphanumeric-only projection
fn is_palindrome(name: &str) -> bool {
    let processed: Vec<char> = name.chars().filter(char::is_ascii_alphanumeric).collect();
    processed.iter().eq(processed.iter().rev())
}

fn char_repetitions(name: &str) -> f32 {
    let mut repetitions = 0.0;
    let mut current = None;
    let mut run = 1;

    for c in name.chars() {
        if Some(c) == current {
            run += 1;
            if run == 3 {
                repetitions += 1.0;
            } else if run > 3 {
                repetitions += 0.5;
            }
        } else {
            current = Some(c);
            run = 1;
        }
    }

    repetitions
}

/// Score in [0, 100] rating how "interesting" a name is
fn name_quality(name: &str, factors: &NameFactors) -> f32 {
    let len = name.chars().count();
    let mut quality: f32 = 0.0;

    // Short and long names are both a little special
    if len <= 3 {
        quality += 10.0;
    } else if len >= 15 {
        quality += 5.0;
    } else {
        quality += (len as f32 / 2.0).min(8.0);
    }

    if factors.is_palindrome {
        quality += 20.0;
    }

    quality += factors.special_chars as f32 * 2.0;
    quality += factors.digits as f32 * 3.0;
    quality += factors.repetitions * 5.0;

    if factors.has_special_word {
        quality += 15.0;
    }

    // Vowel:consonant ratio near the inverse golden ratio
    if factors.consonants > 0 {
        let ratio = factors.vowels as f32 / factors.consonants as f32;
        let golden = 1.0 / 1.618;
        let distance = (ratio - golden).abs();
        if distance < 0.1 {
            quality += 25.0;
        } else if distance < 0.3 {
            quality += 10.0;
        }
    }

    quality.min(100.0)
}

fn power_score(quality: f32, factors: &NameFactors, rng: &mut impl Rng) -> f32 {
    let mut power = POWER_NORMAL;

    if factors.is_palindrome {
        power += 15.0;
    }
    if factors.has_special_word {
        power += 20.0;
    }
    if factors.name_length <= 3 {
        power += 10.0;
    }
    if factors.repetitions > 2.0 {
        power += 15.0;
    }

    if factors.name_length > 20 {
        power -= 10.0;
    }
    if factors.special_chars > 5 {
        power -= 15.0;
    }

    power = power.clamp(POWER_MIN, POWER_MAX);

    // Jackpot roll: the sole sanctioned randomness besides the tier roll
    if (factors.is_palindrome && factors.has_special_word && quality > 50.0)
        || (quality > 70.0 && rng.random::<f32>() < 0.005)
    {
        power = POWER_EXTREME;
    }

    power
}

fn attribute_distribution(
    name: &str,
    hash: u32,
    factors: &NameFactors,
    power_score: f32,
) -> Attributes {
    let len = name.chars().count().max(1) as f32;
    let hash_mod = hash % 100;

    let mut hp = 25.0;
    let mut attack = 25.0;
    let mut defense = 25.0;
    let mut speed = 25.0;

    // Vowels favor durability, consonants favor aggression
    let vowel_factor = factors.vowels as f32 / len;
    hp += vowel_factor * 20.0;
    defense += vowel_factor * 15.0;

    let consonant_factor = factors.consonants as f32 / len;
    attack += consonant_factor * 20.0;
    speed += consonant_factor * 15.0;

    if factors.digits > 0 {
        let boost = factors.digits as f32 * 2.0;
        hp += boost;
        attack += boost;
        defense += boost;
        speed += boost;
    }

    if factors.special_chars > 0 {
        let boost = factors.special_chars as f32 * 1.5;
        match hash % 4 {
            0 => hp += boost,
            1 => attack += boost,
            2 => defense += boost,
            _ => speed += boost,
        }
    }

    // Hash-derived jitter of +-5 per attribute
    hp += (hash_mod % 10) as f32 - 5.0;
    attack += ((hash_mod >> 1) % 10) as f32 - 5.0;
    defense += ((hash_mod >> 2) % 10) as f32 - 5.0;
    speed += ((hash_mod >> 3) % 10) as f32 - 5.0;

    // The first special word present picks a targeted boost
    if factors.has_special_word {
        let lower = name.to_lowercase();
        for word in SPECIAL_WORDS {
            if lower.contains(word) {
                if ["zeus", "thor", "odin", "ares"].contains(word) {
                    attack += 10.0;
                } else if ["gaia", "atlas", "titan", "hulk"].contains(word) {
                    hp += 10.0;
                } else if ["athena", "shield", "guard"].contains(word) {
                    defense += 10.0;
                } else if ["flash", "sonic", "dash", "swift", "bolt"].contains(word) {
                    speed += 10.0;
                } else {
                    hp += 3.0;
                    attack += 3.0;
                    defense += 3.0;
                    speed += 3.0;
                }
                break;
            }
        }
    }

    let power_factor = power_score / POWER_NORMAL;
    hp *= power_factor;
    attack *= power_factor;
    defense *= power_factor;
    speed *= power_factor;

    // Normalize to a 100 total, correcting the rounding residual onto hp
    let total = hp + attack + defense + speed;
    let mut hp = (hp / total * 100.0).round();
    let attack = (attack / total * 100.0).round();
    let defense = (defense / total * 100.0).round();
    let speed = (speed / total * 100.0).round();

    let adjusted = hp + attack + defense + speed;
    hp += 100.0 - adjusted;

    Attributes {
        hp,
        attack,
        defense,
        speed,
    }
}

fn passive_tier(quality: f32, factors: &NameFactors, rng: &mut impl Rng) -> Tier {
    let mut quality_bonus: f32 = if quality > 60.0 {
        20.0
    } else if quality > 40.0 {
        10.0
    } else if quality > 20.0 {
        5.0
    } else {
        0.0
    };

    if factors.has_special_word {
        quality_bonus += 15.0;
    }
    if factors.is_palindrome {
        quality_bonus += 10.0;
    }
    if factors.name_length <= 3 {
        quality_bonus += 15.0;
    }

    // Base chances 50/30/15/4/1, inflated non-uniformly and capped per tier
    let legendary = (1.0 + quality_bonus * 0.2).min(15.0);
    let epic = (4.0 + quality_bonus * 0.5).min(25.0);
    let rare = (15.0 + quality_bonus * 0.8).min(35.0);
    let uncommon = (30.0 + quality_bonus * 0.5).min(50.0);

    let roll = rng.random_range(0.0..100.0);
    if roll < legendary {
        Tier::Legendary
    } else if roll < legendary + epic {
        Tier::Epic
    } else if roll < legendary + epic + rare {
        Tier::Rare
    } else if roll < legendary + epic + rare + uncommon {
        Tier::Uncommon
    } else {
        Tier::Common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    #[test]
    fn test_empty_name_defaults() {
        for name in ["", "   ", "\t"] {
            let analysis = analyze_name(name, &mut rng());
            assert_eq!(analysis.power_score, POWER_MIN);
            assert_eq!(analysis.attributes, Attributes::balanced());
            assert_eq!(analysis.passive_tier, Tier::Common);
        }
    }

    #[test]
    fn test_special_word_detected() {
        let analysis = analyze_name("Zeus", &mut rng());
        assert!(analysis.factors.has_special_word);
        assert_eq!(analysis.power_score, 120.0);
        // War deity boost lands on attack
        assert!(analysis.attributes.attack > analysis.attributes.hp);
    }

    #[test]
    fn test_palindrome_detected() {
        let analysis = analyze_name("racecar", &mut rng());
        assert!(analysis.factors.is_palindrome);
        assert_eq!(analysis.power_score, 115.0);

        // Palindrome check ignores non-alphanumerics
        let analysis = analyze_name("race car!", &mut rng());
        assert!(analysis.factors.is_palindrome);
    }

    #[test]
    fn test_repetition_scoring() {
        let factors = name_factors("aaa");
        assert_eq!(factors.repetitions, 1.0);
        let factors = name_factors("aaaaa");
        assert_eq!(factors.repetitions, 2.0);
        let factors = name_factors("aaabbb");
        assert_eq!(factors.repetitions, 2.0);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(simple_hash("Zeus"), simple_hash("Zeus"));
        assert_ne!(simple_hash("Zeus"), simple_hash("zeus"));
        // Hash of the empty string is zero, not a panic
        assert_eq!(simple_hash(""), 0);
    }

    #[test]
    fn test_analysis_deterministic_under_fixed_seed() {
        let a = analyze_name("Thunderbolt99", &mut rng());
        let b = analyze_name("Thunderbolt99", &mut rng());
        assert_eq!(a.power_score, b.power_score);
        assert_eq!(a.attributes, b.attributes);
        assert_eq!(a.passive_tier, b.passive_tier);
    }

    #[test]
    fn test_consonant_free_name_skips_golden_ratio() {
        // "aeiou" has zero consonants; the ratio bonus must not divide by zero
        let analysis = analyze_name("aeiou", &mut rng());
        assert!(analysis.power_score >= POWER_MIN);
        assert!(analysis.quality.is_finite());
    }

    #[test]
    fn test_sanitize_coerces_nan() {
        let mut attrs = Attributes {
            hp: f32::NAN,
            ..Attributes::balanced()
        };
        attrs.sanitize();
        assert_eq!(attrs.hp, 25.0);
    }

    proptest! {
        #[test]
        fn prop_attributes_sum_to_100(name in ".{0,40}") {
            let analysis = analyze_name(&name, &mut rng());
            prop_assert_eq!(analysis.attributes.total(), 100.0);
        }

        #[test]
        fn prop_power_score_in_range(name in ".{0,40}") {
            let power = analyze_name(&name, &mut rng()).power_score;
            prop_assert!((POWER_MIN..=POWER_MAX).contains(&power) || power == POWER_EXTREME);
        }
    }
}
