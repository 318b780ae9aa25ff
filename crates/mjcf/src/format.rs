//! Attribute value formatting.
//!
//! MJCF loaders accept any float syntax, but generated assets are diffed and
//! read by people, so values are written the way C's `%g` prints them: six
//! significant digits with trailing zeros removed.

/// Format a single value like C's `%g`.
#[must_use]
pub fn format_g(value: f32) -> String {
    let v = f64::from(value);
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to six significant digits first so the exponent reflects the
    // rounded value (9.999999 prints as 10, not 9.99999e+00).
    let sci = format!("{v:.5e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs());
    }

    #[allow(clippy::cast_sign_loss)]
    let decimals = (5 - exp) as usize;
    trim_fraction(&format!("{v:.decimals$}")).to_string()
}

/// Format a list of values separated by single spaces.
#[must_use]
pub fn format_vec(values: &[f32]) -> String {
    values.iter().map(|&v| format_g(v)).collect::<Vec<_>>().join(" ")
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_zero() {
        assert_eq!(format_g(0.0), "0");
        assert_eq!(format_g(-0.0), "-0");
        assert_eq!(format_g(100.0), "100");
        assert_eq!(format_g(-45.0), "-45");
    }

    #[test]
    fn fractions_drop_trailing_zeros() {
        assert_eq!(format_g(0.5), "0.5");
        assert_eq!(format_g(0.38), "0.38");
        assert_eq!(format_g(-0.75), "-0.75");
        assert_eq!(format_g(0.0001), "0.0001");
    }

    #[test]
    fn six_significant_digits() {
        assert_eq!(format_g(std::f32::consts::PI), "3.14159");
        assert_eq!(format_g(9.999_999), "10");
    }

    #[test]
    fn scientific_outside_fixed_range() {
        assert_eq!(format_g(0.000_01), "1e-05");
        assert_eq!(format_g(1_234_567.0), "1.23457e+06");
    }

    #[test]
    fn vectors_are_space_separated() {
        assert_eq!(format_vec(&[0.0, 1.0, -0.5]), "0 1 -0.5");
    }
}
