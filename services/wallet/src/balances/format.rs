//! Exact decimal rendering of raw token amounts
//!
//! Splits the raw integer with 256-bit division so no amount ever passes
//! through a float.

use web3::types::U256;

/// Largest power of ten representable in a `U256`
const MAX_EXP10: u8 = 77;

/// Render `raw` with `decimals` fractional digits, e.g. `1,234.567`.
///
/// The whole part is grouped in thousands with commas; trailing fractional
/// zeros are trimmed, and a zero fraction is dropped entirely.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let (whole, fraction) = if decimals > MAX_EXP10 {
        // 10^decimals exceeds every U256, so the whole part is zero
        (U256::zero(), raw)
    } else {
        let divisor = U256::exp10(decimals as usize);
        (raw / divisor, raw % divisor)
    };

    let whole = group_thousands(&whole.to_string());
    if fraction.is_zero() {
        return whole;
    }

    let digits = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let digits = digits.trim_end_matches('0');
    format!("{}.{}", whole, digits)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(value: &str) -> U256 {
        U256::from_dec_str(value).unwrap()
    }

    #[test]
    fn test_reference_values() {
        // 1,234.567 tokens at 18 decimals
        assert_eq!(format_units(raw("1234567000000000000000"), 18), "1,234.567");
        assert_eq!(format_units(raw("1234567000000000000"), 18), "1.234567");
        assert_eq!(format_units(raw("500000"), 6), "0.5");
        assert_eq!(format_units(U256::zero(), 18), "0");
        assert_eq!(format_units(U256::zero(), 0), "0");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_units(raw("999"), 0), "999");
        assert_eq!(format_units(raw("1000"), 0), "1,000");
        assert_eq!(format_units(raw("123456789"), 0), "123,456,789");
        assert_eq!(format_units(raw("1000000000001"), 6), "1,000,000.000001");
    }

    #[test]
    fn test_small_fractions_keep_leading_zeros() {
        assert_eq!(format_units(raw("1"), 6), "0.000001");
        assert_eq!(format_units(raw("1"), 18), "0.000000000000000001");
    }

    #[test]
    fn test_values_beyond_f64_precision() {
        // 2^256 - 1 with no decimals
        assert_eq!(
            format_units(U256::MAX, 0),
            "115,792,089,237,316,195,423,570,985,008,687,907,853,269,984,665,640,564,039,457,584,007,913,129,639,935"
        );
        assert_eq!(format_units(raw("9007199254740993"), 0), "9,007,199,254,740,993");
    }

    #[test]
    fn test_decimals_beyond_u256_range() {
        let formatted = format_units(raw("5"), 80);
        assert_eq!(formatted, format!("0.{}5", "0".repeat(79)));
    }

    proptest! {
        #[test]
        fn prop_digits_are_preserved(value in any::<u128>(), decimals in 0u8..=40) {
            let formatted = format_units(U256::from(value), decimals);

            let (whole, fraction) = match formatted.split_once('.') {
                Some((whole, fraction)) => (whole.to_string(), fraction.to_string()),
                None => (formatted.clone(), String::new()),
            };
            prop_assert!(!fraction.ends_with('0'));
            prop_assert!(fraction.len() <= decimals as usize);

            let padded = format!("{:0<width$}", fraction, width = decimals as usize);
            let rebuilt = format!("{}{}", whole.replace(',', ""), padded);
            prop_assert_eq!(U256::from_dec_str(&rebuilt).unwrap(), U256::from(value));
        }

        #[test]
        fn prop_groups_have_three_digits(value in any::<u64>()) {
            let formatted = format_units(U256::from(value), 0);
            let groups: Vec<&str> = formatted.split(',').collect();
            prop_assert!(!groups[0].is_empty() && groups[0].len() <= 3);
            for group in &groups[1..] {
                prop_assert_eq!(group.len(), 3);
            }
        }
    }
}
