use rand::prelude::*;

pub struct LetterDefinition {
    pub letter: char,
    pub count: u32,
    pub value: u32,
}

const fn def(letter: char, count: u32, value: u32) -> LetterDefinition {
    LetterDefinition {
        letter,
        count,
        value,
    }
}

/// Scrabble-style base distribution: 103 letters.
pub const LETTER_DISTRIBUTION: [LetterDefinition; 26] = [
    def('A', 9, 1),
    def('B', 2, 3),
    def('C', 2, 3),
    def('D', 4, 2),
    def('E', 12, 1),
    def('F', 2, 4),
    def('G', 3, 2),
    def('H', 2, 4),
    def('I', 9, 1),
    def('J', 1, 8),
    def('K', 1, 5),
    def('L', 4, 1),
    def('M', 2, 3),
    def('N', 6, 1),
    def('O', 8, 1),
    def('P', 2, 3),
    def('Q', 1, 10),
    def('R', 6, 1),
    def('S', 4, 1),
    def('T', 6, 1),
    def('U', 4, 1),
    def('V', 2, 4),
    def('W', 2, 4),
    def('X', 1, 8),
    def('Y', 2, 4),
    def('Z', 1, 10),
];

const PADDING_VOWELS: [char; 4] = ['A', 'E', 'I', 'O'];

pub fn standard_total() -> u32 {
    LETTER_DISTRIBUTION.iter().map(|d| d.count).sum()
}

/// Build a shuffled bag of exactly `target_count` letters.
///
/// Every letter's base count is scaled by `target_count / standard_total`,
/// rounded, and kept at a minimum of one. Excess letters are removed at random;
/// a shortfall is padded with common vowels. The result is Fisher-Yates shuffled,
/// so drawing is just `pop()`.
pub fn create_letter_bag<R: Rng + ?Sized>(target_count: usize, rng: &mut R) -> Vec<char> {
    let scale = target_count as f64 / standard_total() as f64;

    let mut bag = Vec::with_capacity(target_count.max(LETTER_DISTRIBUTION.len()));
    for definition in &LETTER_DISTRIBUTION {
        let scaled = ((definition.count as f64 * scale).round() as usize).max(1);
        bag.extend(std::iter::repeat_n(definition.letter, scaled));
    }

    while bag.len() > target_count {
        let index = rng.random_range(0..bag.len());
        bag.swap_remove(index);
    }
    while bag.len() < target_count {
        if let Some(&vowel) = PADDING_VOWELS.choose(rng) {
            bag.push(vowel);
        }
    }

    bag.shuffle(rng);
    bag
}

/// Point value of a letter. Unknown letters are worth 1.
pub fn letter_value(letter: char) -> u32 {
    let letter = letter.to_ascii_uppercase();
    LETTER_DISTRIBUTION
        .iter()
        .find(|d| d.letter == letter)
        .map(|d| d.value)
        .unwrap_or(1)
}

pub fn is_vowel(letter: char) -> bool {
    matches!(letter.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U')
}
