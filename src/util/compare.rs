use std::cmp::Ordering;

/// Compares two strings by their UTF-16 code units.
///
/// Firestore orders strings the way the backend does, which differs from Rust's
/// byte-wise (code point) ordering for characters outside the Basic
/// Multilingual Plane.
pub fn compare_utf16(left: &str, right: &str) -> Ordering {
    left.encode_utf16().cmp(right.encode_utf16())
}

/// Total order over doubles: NaN sorts before every other value, `-0.0` and
/// `0.0` are equal.
pub fn compare_doubles(left: f64, right: f64) -> Ordering {
    match left.partial_cmp(&right) {
        Some(ordering) => ordering,
        None => match (left.is_nan(), right.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            _ => Ordering::Greater,
        },
    }
}

/// Compares a double with a long without losing precision on either side.
pub fn compare_mixed(double: f64, long: i64) -> Ordering {
    // 2^63, exactly representable as a double.
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if double.is_nan() {
        return Ordering::Less;
    }
    if double < -TWO_POW_63 {
        return Ordering::Less;
    }
    if double >= TWO_POW_63 {
        return Ordering::Greater;
    }

    let truncated = double.trunc() as i64;
    match truncated.cmp(&long) {
        Ordering::Equal => compare_doubles(double.fract(), 0.0),
        ordering => ordering,
    }
}
