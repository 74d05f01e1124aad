//! Check-digit predicates for Brazilian tax ids (CPF / CNPJ) and GTIN barcodes.

/// True when `value` is a valid CPF (11 digits) or CNPJ (14 digits).
///
/// Punctuation is ignored. A 14-digit value is also accepted when it is a CPF
/// left-padded with zeros, which is how CPFs travel in 14-wide CNPJ slots.
pub fn is_valid_tax_id(value: &str) -> bool {
    let digits = digits_of(value);
    match digits.len() {
        11 => is_valid_cpf(&digits),
        14 => {
            is_valid_cnpj(&digits) || (digits[..3].iter().all(|&d| d == 0) && is_valid_cpf(&digits[3..]))
        }
        _ => false,
    }
}

/// True when `value` is a GTIN-8, GTIN-12, GTIN-13 or GTIN-14 with a correct check digit.
pub fn is_valid_gtin(value: &str) -> bool {
    let trimmed = value.trim();
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits = digits_of(trimmed);
    if !matches!(digits.len(), 8 | 12 | 13 | 14) {
        return false;
    }

    let (body, check) = digits.split_at(digits.len() - 1);
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();

    (10 - sum % 10) % 10 == check[0]
}

fn digits_of(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn mod11_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}

fn is_valid_cpf(digits: &[u32]) -> bool {
    if digits.len() != 11 || all_same(digits) {
        return false;
    }
    let first = mod11_digit(&digits[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = mod11_digit(&digits[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits[9] == first && digits[10] == second
}

fn is_valid_cnpj(digits: &[u32]) -> bool {
    if digits.len() != 14 || all_same(digits) {
        return false;
    }
    let first = mod11_digit(&digits[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = mod11_digit(&digits[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    digits[12] == first && digits[13] == second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf() {
        assert!(is_valid_tax_id("50795722052"));
        assert!(is_valid_tax_id("507.957.220-52"));
        assert!(!is_valid_tax_id("50795722053"));
        assert!(!is_valid_tax_id("11111111111"));
    }

    #[test]
    fn test_cnpj() {
        assert!(is_valid_tax_id("66291561000103"));
        assert!(is_valid_tax_id("66.291.561/0001-03"));
        assert!(is_valid_tax_id("99999090910270"));
        assert!(!is_valid_tax_id("66291561000104"));
        assert!(!is_valid_tax_id("00000000000000"));
    }

    #[test]
    fn test_zero_padded_cpf() {
        assert!(is_valid_tax_id("00050795722052"));
    }

    #[test]
    fn test_wrong_length() {
        assert!(!is_valid_tax_id(""));
        assert!(!is_valid_tax_id("123456"));
    }

    #[test]
    fn test_gtin() {
        assert!(is_valid_gtin("7891000315507"));
        assert!(!is_valid_gtin("7891000315508"));
        assert!(!is_valid_gtin("78910003155"));
        assert!(!is_valid_gtin("789100031550A"));
    }
}
