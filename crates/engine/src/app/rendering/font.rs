pub(crate) const GLYPH_WIDTH: u32 = 3;
pub(crate) const GLYPH_HEIGHT: u32 = 5;

type Rows = [u8; GLYPH_HEIGHT as usize];

const UNKNOWN: Rows = [0b110, 0b001, 0b010, 0b000, 0b010];

const GLYPHS: &[(char, Rows)] = &[
    (' ', [0, 0, 0, 0, 0]),
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
    ('K', [0b101, 0b101, 0b110, 0b101, 0b101]),
    ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b110, 0b001, 0b010, 0b100, 0b111]),
    ('3', [0b110, 0b001, 0b010, 0b001, 0b110]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b110, 0b001, 0b110]),
    ('6', [0b011, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b010, 0b010, 0b010]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b110]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    (',', [0b000, 0b000, 0b000, 0b010, 0b100]),
    (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    ('!', [0b010, 0b010, 0b010, 0b000, 0b010]),
    ('?', UNKNOWN),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    ('+', [0b000, 0b010, 0b111, 0b010, 0b000]),
    ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
    ('%', [0b101, 0b001, 0b010, 0b100, 0b101]),
    ('(', [0b010, 0b100, 0b100, 0b100, 0b010]),
    (')', [0b010, 0b001, 0b001, 0b001, 0b010]),
    ('\'', [0b010, 0b010, 0b000, 0b000, 0b000]),
];

pub(crate) fn glyph_rows(ch: char) -> Rows {
    let folded = ch.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(glyph_char, _)| *glyph_char == folded)
        .map(|(_, rows)| *rows)
        .unwrap_or(UNKNOWN)
}

pub(crate) fn glyph_scale(size_px: u32) -> u32 {
    (size_px / GLYPH_HEIGHT).max(1)
}

pub(crate) fn glyph_advance(scale: u32) -> u32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn text_extent(text: &str, scale: u32) -> (u32, u32) {
    let count = text.chars().count() as u32;
    let width = (count * glyph_advance(scale)).saturating_sub(scale);
    (width, GLYPH_HEIGHT * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_folds_to_uppercase() {
        assert_eq!(glyph_rows('g'), glyph_rows('G'));
        assert_ne!(glyph_rows('L'), UNKNOWN);
    }

    #[test]
    fn unmapped_characters_use_question_mark() {
        assert_eq!(glyph_rows('~'), UNKNOWN);
        assert_eq!(glyph_rows('é'), UNKNOWN);
    }

    #[test]
    fn loading_label_glyphs_are_all_mapped() {
        for ch in "Loading...".chars() {
            assert_ne!(glyph_rows(ch), UNKNOWN, "ch={ch}");
        }
    }

    #[test]
    fn twenty_pixel_text_uses_scale_four() {
        assert_eq!(glyph_scale(20), 4);
        assert_eq!(glyph_scale(3), 1);
        assert_eq!(text_extent("Loading...", 4), (156, 20));
        assert_eq!(text_extent("", 4), (0, 20));
    }
}
