//! Morse timing
//!
//! Converts text into an absolute on/off step schedule for the torch.
//!
//! ## Timing
//!
//! - dit = 250 ms, dah = 3 dit
//! - gap between symbols of a letter = 1 dit
//! - gap between letters = 3 dit
//! - gap between words = 4 dit on top of the letter gap (7 dit total)
//!
//! For "SOS" the word ends at 7500 ms and the next repetition starts at
//! 8500 ms.

use core::fmt;
use heapless::Vec;

/// Length of a dit
pub const DIT_MS: u32 = 250;
/// Length of a dah
pub const DAH_MS: u32 = 3 * DIT_MS;
/// Gap between two symbols of the same letter
pub const SYMBOL_GAP_MS: u32 = DIT_MS;
/// Gap after each letter
pub const LETTER_GAP_MS: u32 = 3 * DIT_MS;
/// Extra gap after the last letter gap before the word repeats
pub const WORD_GAP_MS: u32 = 4 * DIT_MS;

/// Maximum number of on/off steps in one encoded word
pub const MAX_STEPS: usize = 64;

/// Morse symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dit,
    Dah,
}

impl Symbol {
    pub const fn duration_ms(self) -> u32 {
        match self {
            Symbol::Dit => DIT_MS,
            Symbol::Dah => DAH_MS,
        }
    }
}

use Symbol::{Dah as H, Dit as T};

/// Symbols for a letter or digit
pub fn symbols(c: char) -> Option<&'static [Symbol]> {
    let s: &'static [Symbol] = match c.to_ascii_uppercase() {
        'A' => &[T, H],
        'B' => &[H, T, T, T],
        'C' => &[H, T, H, T],
        'D' => &[H, T, T],
        'E' => &[T],
        'F' => &[T, T, H, T],
        'G' => &[H, H, T],
        'H' => &[T, T, T, T],
        'I' => &[T, T],
        'J' => &[T, H, H, H],
        'K' => &[H, T, H],
        'L' => &[T, H, T, T],
        'M' => &[H, H],
        'N' => &[H, T],
        'O' => &[H, H, H],
        'P' => &[T, H, H, T],
        'Q' => &[H, H, T, H],
        'R' => &[T, H, T],
        'S' => &[T, T, T],
        'T' => &[H],
        'U' => &[T, T, H],
        'V' => &[T, T, T, H],
        'W' => &[T, H, H],
        'X' => &[H, T, T, H],
        'Y' => &[H, T, H, H],
        'Z' => &[H, H, T, T],
        '0' => &[H, H, H, H, H],
        '1' => &[T, H, H, H, H],
        '2' => &[T, T, H, H, H],
        '3' => &[T, T, T, H, H],
        '4' => &[T, T, T, T, H],
        '5' => &[T, T, T, T, T],
        '6' => &[H, T, T, T, T],
        '7' => &[H, H, T, T, T],
        '8' => &[H, H, H, T, T],
        '9' => &[H, H, H, H, T],
        _ => return None,
    };
    Some(s)
}

/// Torch state change at an offset from the start of the word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorchStep {
    pub offset_ms: u32,
    pub on: bool,
}

/// Encoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorseError {
    /// Character has no Morse representation
    Unsupported(char),
    /// Word needs more than [`MAX_STEPS`] steps
    TooLong,
    /// Nothing to encode
    Empty,
}

impl fmt::Display for MorseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MorseError::Unsupported(c) => write!(f, "no Morse code for {:?}", c),
            MorseError::TooLong => write!(f, "word exceeds {} torch steps", MAX_STEPS),
            MorseError::Empty => write!(f, "empty word"),
        }
    }
}

/// A word as an absolute step schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorseWord {
    steps: Vec<TorchStep, MAX_STEPS>,
    /// End of the last letter gap
    end_ms: u32,
}

impl MorseWord {
    /// Encode a single word (no spaces)
    pub fn encode(word: &str) -> Result<Self, MorseError> {
        let mut steps = Vec::new();
        let mut t = 0u32;

        for c in word.chars() {
            let letter = symbols(c).ok_or(MorseError::Unsupported(c))?;
            for (i, symbol) in letter.iter().enumerate() {
                if i > 0 {
                    t += SYMBOL_GAP_MS;
                }
                steps
                    .push(TorchStep { offset_ms: t, on: true })
                    .map_err(|_| MorseError::TooLong)?;
                t += symbol.duration_ms();
                steps
                    .push(TorchStep { offset_ms: t, on: false })
                    .map_err(|_| MorseError::TooLong)?;
            }
            t += LETTER_GAP_MS;
        }

        if steps.is_empty() {
            return Err(MorseError::Empty);
        }

        Ok(Self { steps, end_ms: t })
    }

    /// The SOS distress word
    pub fn sos() -> Self {
        // "SOS" needs 18 steps, well within capacity.
        match Self::encode("SOS") {
            Ok(word) => word,
            Err(_) => unreachable!("SOS is always encodable"),
        }
    }

    pub fn steps(&self) -> &[TorchStep] {
        &self.steps
    }

    /// Duration of the word including the trailing letter gap
    pub fn duration_ms(&self) -> u32 {
        self.end_ms
    }

    /// Offset at which the next repetition of the word starts
    pub fn repeat_after_ms(&self) -> u32 {
        self.end_ms + WORD_GAP_MS
    }
}
