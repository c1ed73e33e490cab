//! Conversion of dialed numbers to E.164 format (`+` followed by digits).
//!
//! The rules, applied to the number as typed:
//!
//! - a leading `+` means the number is already international;
//! - a leading `00` is the international call prefix and becomes `+`;
//! - a single leading `0` is a national trunk prefix: it is dropped and
//!   the country code is prepended;
//! - anything else is a local number: country code and local area code
//!   are both prepended.
//!
//! All non-digits are discarded, so `+47 915 32 600` and `+4791532600`
//! come out the same.

/// Normalize `number` to E.164 using the given country and local codes.
///
/// `country_code` may itself carry a `+` or `00` prefix, and
/// `local_code` a trunk `0`; both are stripped. Pass empty strings for
/// codes that do not apply.
pub fn to_e164(number: &str, country_code: &str, local_code: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    if number.starts_with('+') {
        return format!("+{digits}");
    }
    if number.starts_with("00") {
        return format!("+{}", &digits[2..]);
    }

    let country = country_code.strip_prefix('+').unwrap_or(country_code);
    let country = country.strip_prefix("00").unwrap_or(country);

    if number.starts_with('0') {
        return format!("+{country}{}", &digits[1..]);
    }

    let local = local_code.strip_prefix('0').unwrap_or(local_code);
    format!("+{country}{local}{digits}")
}
