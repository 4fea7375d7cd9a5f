//! Display helpers for addresses and amounts.

use tipy_types::Address;

/// Native base units per whole coin.
pub const LAMPORTS_PER_COIN: u64 = 1_000_000_000;

/// First eight and last eight characters of the base58 form.
pub fn format_address(address: &Address) -> String {
    let text = address.to_string();
    if text.len() <= 16 {
        return text;
    }
    format!("{}...{}", &text[..8], &text[text.len() - 8..])
}

/// Native amounts as whole coins with six decimals; token amounts raw.
pub fn format_amount(amount: u64, is_native: bool) -> String {
    if !is_native {
        return amount.to_string();
    }
    let whole = amount / LAMPORTS_PER_COIN;
    // Round half up at the sixth decimal.
    let micros = ((amount % LAMPORTS_PER_COIN) + 500) / 1_000;
    let (whole, micros) = if micros == 1_000_000 {
        (whole + 1, 0)
    } else {
        (whole, micros)
    };
    format!("{whole}.{micros:06} SOL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_shortened() {
        let address = Address::new([7u8; 32]);
        let full = address.to_string();
        let short = format_address(&address);
        assert_eq!(short.len(), 19);
        assert!(full.starts_with(&short[..8]));
        assert!(full.ends_with(&short[11..]));
        assert_eq!(&short[8..11], "...");
    }

    #[test]
    fn native_amounts_in_coins() {
        assert_eq!(format_amount(1_000_000_000, true), "1.000000 SOL");
        assert_eq!(format_amount(1, true), "0.000000 SOL");
        assert_eq!(format_amount(1_500, true), "0.000002 SOL");
        assert_eq!(format_amount(2_999_999_999, true), "3.000000 SOL");
        assert_eq!(format_amount(123_456_789, true), "0.123457 SOL");
    }

    #[test]
    fn token_amounts_are_raw() {
        assert_eq!(format_amount(999_000, false), "999000");
    }
}
