//! Fullwidth to halfwidth conversion ("zenkaku" to "hankaku")
//!
//! Only the code points in [`TABLE`] are converted. Everything else, including
//! fullwidth katakana and ideographic spaces, passes through unchanged.

/// Fullwidth (or typographic) code point and its ASCII replacement.
pub const TABLE: [(char, char); 95] = [
    ('\u{FF11}', '1'),
    ('\u{FF12}', '2'),
    ('\u{FF13}', '3'),
    ('\u{FF14}', '4'),
    ('\u{FF15}', '5'),
    ('\u{FF16}', '6'),
    ('\u{FF17}', '7'),
    ('\u{FF18}', '8'),
    ('\u{FF19}', '9'),
    ('\u{FF10}', '0'),
    ('\u{FF41}', 'a'),
    ('\u{FF42}', 'b'),
    ('\u{FF43}', 'c'),
    ('\u{FF44}', 'd'),
    ('\u{FF45}', 'e'),
    ('\u{FF46}', 'f'),
    ('\u{FF47}', 'g'),
    ('\u{FF48}', 'h'),
    ('\u{FF49}', 'i'),
    ('\u{FF4A}', 'j'),
    ('\u{FF4B}', 'k'),
    ('\u{FF4C}', 'l'),
    ('\u{FF4D}', 'm'),
    ('\u{FF4E}', 'n'),
    ('\u{FF4F}', 'o'),
    ('\u{FF50}', 'p'),
    ('\u{FF51}', 'q'),
    ('\u{FF52}', 'r'),
    ('\u{FF53}', 's'),
    ('\u{FF54}', 't'),
    ('\u{FF55}', 'u'),
    ('\u{FF56}', 'v'),
    ('\u{FF57}', 'w'),
    ('\u{FF58}', 'x'),
    ('\u{FF59}', 'y'),
    ('\u{FF5A}', 'z'),
    ('\u{FF21}', 'A'),
    ('\u{FF22}', 'B'),
    ('\u{FF23}', 'C'),
    ('\u{FF24}', 'D'),
    ('\u{FF25}', 'E'),
    ('\u{FF26}', 'F'),
    ('\u{FF27}', 'G'),
    ('\u{FF28}', 'H'),
    ('\u{FF29}', 'I'),
    ('\u{FF2A}', 'J'),
    ('\u{FF2B}', 'K'),
    ('\u{FF2C}', 'L'),
    ('\u{FF2D}', 'M'),
    ('\u{FF2E}', 'N'),
    ('\u{FF2F}', 'O'),
    ('\u{FF30}', 'P'),
    ('\u{FF31}', 'Q'),
    ('\u{FF32}', 'R'),
    ('\u{FF33}', 'S'),
    ('\u{FF34}', 'T'),
    ('\u{FF35}', 'U'),
    ('\u{FF36}', 'V'),
    ('\u{FF37}', 'W'),
    ('\u{FF38}', 'X'),
    ('\u{FF39}', 'Y'),
    ('\u{FF3A}', 'Z'),
    ('\u{FF0D}', '-'),
    ('\u{FF3E}', '^'),
    ('\u{FFE5}', '\\'),
    ('\u{FF01}', '!'),
    ('\u{201D}', '"'),
    ('\u{FF03}', '#'),
    ('\u{FF04}', '$'),
    ('\u{FF05}', '%'),
    ('\u{FF06}', '&'),
    ('\u{2019}', '\''),
    ('\u{FF08}', '('),
    ('\u{FF09}', ')'),
    ('\u{FF1D}', '='),
    ('\u{FF5E}', '~'),
    ('\u{FF5C}', '|'),
    ('\u{FF40}', '`'),
    ('\u{FF5B}', '{'),
    ('\u{FF0B}', '+'),
    ('\u{FF0A}', '*'),
    ('\u{FF5D}', '}'),
    ('\u{FF1C}', '<'),
    ('\u{FF1E}', '>'),
    ('\u{FF1F}', '?'),
    ('\u{FF3F}', '_'),
    ('\u{FF20}', '@'),
    ('\u{FF3B}', '['),
    ('\u{FF1B}', ';'),
    ('\u{FF1A}', ':'),
    ('\u{FF3D}', ']'),
    ('\u{FF0C}', ','),
    ('\u{FF0E}', '.'),
    ('\u{FF0F}', '/'),
    ('\u{2212}', '-'),
];

/// Halfwidth replacement for a single character, if it is in the table.
pub fn to_halfwidth(c: char) -> Option<char> {
    TABLE
        .iter()
        .find(|(full, _)| *full == c)
        .map(|(_, half)| *half)
}

/// Convert every tabled fullwidth character in `value`.
pub fn zenhan(value: &str) -> String {
    value
        .chars()
        .map(|c| to_halfwidth(c).unwrap_or(c))
        .collect()
}
