use thiserror::Error;

/// Money is represented as integer cents so sums stay exact.
/// For INR/EUR/USD, 1 unit = 100 cents, so ₹250.00 = 25000 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
/// Digits past the second decimal place are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, decimal_str) = digits.split_once('.').unwrap_or((digits, ""));
    if (units_str.is_empty() && decimal_str.is_empty())
        || !decimal_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => decimal_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

/// Divide an amount, rounding half away from zero to the nearest cent.
/// A non-positive divisor is treated as 1.
pub fn divide_rounded(cents: Cents, divisor: i64) -> Cents {
    let divisor = divisor.max(1);
    let quotient = cents / divisor;
    let remainder = cents % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + cents.signum()
    } else {
        quotient
    }
}

/// How many whole `unit_price` items fit into `cents`. Zero for a non-positive price.
pub fn whole_units(cents: Cents, unit_price: Cents) -> i64 {
    if unit_price <= 0 || cents <= 0 {
        return 0;
    }
    cents / unit_price
}

/// Round a ratio to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,

    #[error("amount out of range")]
    Overflow,
}
