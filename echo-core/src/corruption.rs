//! Stochastic corruption rendering for displayed text.
//!
//! Corrupted sectors and fragments never show stable text: the glitch
//! pattern is redrawn from the RNG on every read, with no caching. Every
//! transform comes in a thread-RNG convenience form and a `_with_rng` form
//! so tests can supply a seeded generator.

use rand::Rng;

/// Glyphs substituted into corrupted description words.
const WORD_GLYPHS: [char; 6] = ['█', '▓', '▒', '░', '?', '*'];

/// Solid block emitted for the heaviest fragment glitches.
const BLOCK_GLYPH: char = '█';

/// Partial-shade glyphs for mid-weight fragment glitches.
const SHADE_GLYPHS: [char; 3] = ['▓', '▒', '░'];

/// Printable noise for the remaining fragment glitches.
const SYMBOL_GLYPHS: [char; 7] = ['?', '#', '@', '$', '%', '&', '*'];

/// Chance that a word in a corrupted description is glitched, as a fraction
/// of the sector's corruption level.
const WORD_CORRUPTION_FACTOR: f64 = 0.3;

/// Chance that a character inside a glitched word is replaced.
const WORD_CHAR_RATE: f64 = 0.4;

/// Corrupt a sector description at word granularity.
///
/// Each word is independently glitched with probability
/// `level * 0.3`; within a glitched word each character is replaced with
/// probability 0.4 by one of `█▓▒░?*`. Whitespace between words survives
/// (collapsed to single spaces, matching word-wise rendering).
pub fn corrupt_description(text: &str, level: f64) -> String {
    corrupt_description_with_rng(text, level, &mut rand::thread_rng())
}

/// Word-granular corruption with a specific RNG (useful for testing).
pub fn corrupt_description_with_rng<R: Rng>(text: &str, level: f64, rng: &mut R) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            if rng.gen::<f64>() < level * WORD_CORRUPTION_FACTOR {
                word.chars()
                    .map(|c| {
                        if rng.gen::<f64>() < WORD_CHAR_RATE {
                            pick(&WORD_GLYPHS, rng)
                        } else {
                            c
                        }
                    })
                    .collect()
            } else {
                word.to_string()
            }
        })
        .collect();
    words.join(" ")
}

/// Corrupt fragment content at character granularity.
///
/// Each character is independently glitched with probability `level`.
/// Spaces are never replaced. A glitched character becomes `█` with
/// probability 0.3; otherwise one of `▓▒░` with probability 0.5; otherwise
/// one of `?#@$%&*`.
pub fn corrupt_content(text: &str, level: f64) -> String {
    corrupt_content_with_rng(text, level, &mut rand::thread_rng())
}

/// Character-granular corruption with a specific RNG (useful for testing).
pub fn corrupt_content_with_rng<R: Rng>(text: &str, level: f64, rng: &mut R) -> String {
    text.chars()
        .map(|c| {
            if rng.gen::<f64>() >= level {
                c
            } else if c == ' ' {
                c
            } else if rng.gen::<f64>() < 0.3 {
                BLOCK_GLYPH
            } else if rng.gen::<f64>() < 0.5 {
                pick(&SHADE_GLYPHS, rng)
            } else {
                pick(&SYMBOL_GLYPHS, rng)
            }
        })
        .collect()
}

fn pick<R: Rng>(glyphs: &[char], rng: &mut R) -> char {
    glyphs[rng.gen_range(0..glyphs.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = "neural matrix diagnostic running on subsystem seven";

    #[test]
    fn test_zero_level_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(corrupt_content_with_rng(SAMPLE, 0.0, &mut rng), SAMPLE);
        assert_eq!(corrupt_description_with_rng(SAMPLE, 0.0, &mut rng), SAMPLE);
    }

    #[test]
    fn test_full_level_replaces_every_non_space() {
        let mut rng = StdRng::seed_from_u64(2);
        let out = corrupt_content_with_rng(SAMPLE, 1.0, &mut rng);
        let glyphs: Vec<char> = [&[BLOCK_GLYPH][..], &SHADE_GLYPHS, &SYMBOL_GLYPHS].concat();
        for (orig, got) in SAMPLE.chars().zip(out.chars()) {
            if orig == ' ' {
                assert_eq!(got, ' ');
            } else {
                assert!(glyphs.contains(&got), "unexpected glyph {got:?}");
            }
        }
    }

    #[test]
    fn test_spaces_survive_content_corruption() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = corrupt_content_with_rng("a b c d e", 1.0, &mut rng);
        let spaces = out.chars().filter(|c| *c == ' ').count();
        assert_eq!(spaces, 4);
        assert_eq!(out.chars().count(), 9);
    }

    #[test]
    fn test_description_preserves_word_count() {
        let mut rng = StdRng::seed_from_u64(4);
        let out = corrupt_description_with_rng(SAMPLE, 1.0, &mut rng);
        assert_eq!(
            out.split_whitespace().count(),
            SAMPLE.split_whitespace().count()
        );
    }

    #[test]
    fn test_description_glyphs_come_from_word_set() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = corrupt_description_with_rng(SAMPLE, 1.0, &mut rng);
        for c in out.chars() {
            assert!(
                c == ' ' || SAMPLE.contains(c) || WORD_GLYPHS.contains(&c),
                "unexpected character {c:?}"
            );
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = corrupt_content_with_rng(SAMPLE, 0.6, &mut StdRng::seed_from_u64(42));
        let b = corrupt_content_with_rng(SAMPLE, 0.6, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_corruption_rate_matches_level() {
        // Letters only, so any substituted glyph differs from the original.
        let text = "abcdefghijklmnopqrstuvwxyz".repeat(4);
        let mut rng = StdRng::seed_from_u64(99);

        let mut corrupted = 0usize;
        let mut total = 0usize;
        for _ in 0..1000 {
            let out = corrupt_content_with_rng(&text, 0.3, &mut rng);
            for (orig, got) in text.chars().zip(out.chars()) {
                total += 1;
                if orig != got {
                    corrupted += 1;
                }
            }
        }

        let rate = corrupted as f64 / total as f64;
        assert!(
            (0.27..=0.33).contains(&rate),
            "expected rate near 0.3, got {rate}"
        );
    }
}
