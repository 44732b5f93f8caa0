/// CPF helpers shared by the form, the HTTP handlers and the CLI.
///
/// A CPF is an 11-digit identifier whose last two digits are modulo-11 check digits
/// over the preceding ones. All functions here accept free-form input (`"111.444.777-35"`,
/// `" 11144477735 "`) and look only at the ASCII digits it contains.

/// Number of digits in a complete CPF.
pub const CPF_LEN: usize = 11;

/// Strip every non-digit character from the input.
pub fn clean_cpf(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a CPF for display.
///
/// Returns `ddd.ddd.ddd-dd` when exactly 11 digits are present, otherwise the bare
/// digits so partial input keeps working while the user types.
pub fn format_cpf(raw: &str) -> String {
    let digits = clean_cpf(raw);
    if digits.len() != CPF_LEN {
        return digits;
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// Validate a CPF: length, repeated digits and both check digits.
pub fn is_valid_cpf(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != CPF_LEN {
        return false;
    }

    // 000.000.000-00, 111.111.111-11, ... pass the checksum but are not real CPFs
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Weighted modulo-11 check digit over `prefix` (9 digits for the first, 10 for the
/// second). Weights start at `prefix.len() + 1` and decrease to 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let top_weight = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        remainder => remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cpf_strips_punctuation() {
        assert_eq!(clean_cpf("111.444.777-35"), "11144477735");
        assert_eq!(clean_cpf(" 111 444 777 35 "), "11144477735");
        assert_eq!(clean_cpf("abc"), "");
    }

    #[test]
    fn test_format_complete_cpf() {
        assert_eq!(format_cpf("11144477735"), "111.444.777-35");
        assert_eq!(format_cpf("111.444.777-35"), "111.444.777-35");
    }

    #[test]
    fn test_format_partial_input_returns_digits() {
        assert_eq!(format_cpf(""), "");
        assert_eq!(format_cpf("1114"), "1114");
        assert_eq!(format_cpf("111.444"), "111444");
        assert_eq!(format_cpf("111444777351"), "111444777351");
    }

    #[test]
    fn test_known_valid_cpf() {
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(is_valid_cpf("529.982.247-25"));
    }

    #[test]
    fn test_invalid_cpfs() {
        assert!(!is_valid_cpf("11111111111"));
        assert!(!is_valid_cpf("12345678900"));
        assert!(!is_valid_cpf("11144477736"));
        assert!(!is_valid_cpf("11144477725"));
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("1114447773"));
        assert!(!is_valid_cpf("111444777355"));
    }

    #[test]
    fn test_check_digit_maps_ten_to_zero() {
        // 1*10 + 0*9 + ... + 0*2 = 10 -> 100 % 11 = 1
        assert_eq!(check_digit(&[1, 0, 0, 0, 0, 0, 0, 0, 0]), 1);
        // 0,0,0,0,0,0,0,0,1 -> 2 -> 20 % 11 = 9
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 1]), 9);
        // 6*2 = 12 -> 120 % 11 = 10 -> 0
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 6]), 0);
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), 0);
    }
}
