/// Melodic contour as (scale degree, octave offset from 4).
pub type Motif = [(i32, i32); 8];

/// Prompt keywords and the contour each one seeds the melody with. Checked
/// in this order; the first keyword contained in the prompt wins.
static MOTIFS: [(&str, Motif); 8] = [
    ("spacey", [(0, 0), (3, 0), (4, 0), (0, 1), (6, 0), (3, 0), (4, 0), (0, 0)]),
    ("anthem", [(0, 0), (2, 0), (4, 0), (0, 1), (2, 1), (4, 1), (0, 2), (4, 1)]),
    ("drop", [(0, 1), (0, 1), (0, 1), (0, 1), (6, 0), (5, 0), (4, 0), (3, 0)]),
    ("uplifting", [(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0), (0, 1)]),
    ("dark", [(5, -1), (0, 0), (2, 0), (5, 0), (4, 0), (2, 0), (0, 0), (5, -1)]),
    ("chill", [(0, 0), (2, 0), (4, 0), (6, 0), (0, 1), (6, 0), (4, 0), (2, 0)]),
    ("energetic", [(2, 0), (4, 0), (6, 0), (2, 1), (1, 1), (6, 0), (4, 0), (2, 0)]),
    ("ethereal", [(0, 0), (2, 0), (4, 0), (0, 1), (6, 0), (4, 0), (2, 0), (0, 0)]),
];

/// Motif for the first keyword found in `prompt`, with the keyword.
pub fn prompt_motif(prompt: &str) -> Option<(&'static str, &'static Motif)> {
    let prompt = prompt.to_lowercase();
    MOTIFS
        .iter()
        .find(|(keyword, _)| prompt.contains(keyword))
        .map(|(keyword, motif)| (*keyword, motif))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_table_keyword_wins() {
        let (keyword, motif) = prompt_motif("Dark Anthem for the DROP").unwrap();
        assert_eq!(keyword, "anthem");
        assert_eq!(motif[6], (0, 2));
    }

    #[test]
    fn no_keyword_no_motif() {
        assert!(prompt_motif("underground minimal").is_none());
    }
}
