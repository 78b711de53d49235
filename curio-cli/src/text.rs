//! Display text helpers

/// Title-case a label: the first character of each whitespace-delimited
/// word uppercased, the remaining characters lowercased
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_single_word() {
        assert_eq!(title_case("dog"), "Dog");
    }

    #[test]
    fn test_title_case_multi_word() {
        assert_eq!(title_case("teddy bear"), "Teddy Bear");
        assert_eq!(title_case("traffic light"), "Traffic Light");
    }

    #[test]
    fn test_title_case_lowercases_rest() {
        assert_eq!(title_case("DOG"), "Dog");
        assert_eq!(title_case("hOt dOG"), "Hot Dog");
    }

    #[test]
    fn test_title_case_is_idempotent() {
        for label in ["dog", "teddy bear", "WINE glass", "a"] {
            let once = title_case(label);
            assert_eq!(title_case(&once), once);
        }
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("   "), "");
    }
}
