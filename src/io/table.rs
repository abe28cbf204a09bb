use std::io::{self, Write};

use nalgebra::SVector;

// ---------------------------------------------------------------------------
// Whitespace-separated sample records
// ---------------------------------------------------------------------------
//
// One line per sample: the time in general (shortest fixed/scientific)
// notation with 6 significant digits, then each state component in
// exponential notation with a 16-digit mantissa. Matches the classic
// `printf("%g %.16e ...")` table layout, so downstream tooling that loads
// whitespace columns keeps working.

/// Format `v` like C's `%.*g` with `sig` significant digits: scientific
/// notation when the decimal exponent is below -4 or at least `sig`, fixed
/// notation otherwise, trailing zeros trimmed either way.
pub fn format_general(v: f64, sig: usize) -> String {
    debug_assert!(sig >= 1);
    let sci = format!("{:.*e}", sig - 1, v);
    let (mant, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci, // NaN / inf carry no exponent
    };
    let exp: i32 = match exp.parse() {
        Ok(e) => e,
        Err(_) => return sci,
    };
    if exp < -4 || exp >= sig as i32 {
        let mant = trim_trailing_zeros(mant);
        let (sign, abs) = if exp < 0 { ('-', -exp) } else { ('+', exp) };
        format!("{mant}e{sign}{abs:02}")
    } else {
        let prec = (sig as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{v:.prec$}");
        trim_trailing_zeros(&fixed).to_string()
    }
}

/// Format `v` like C's `%.16e`: 16 fractional mantissa digits and a signed,
/// at-least-two-digit exponent.
pub fn format_scientific(v: f64) -> String {
    let s = format!("{v:.16e}");
    match s.split_once('e') {
        Some((mant, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mant}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Write one sample record: time then state components in index order.
pub fn write_record<W: Write, const N: usize>(
    writer: &mut W,
    t: f64,
    y: &SVector<f64, N>,
) -> io::Result<()> {
    write!(writer, "{}", format_general(t, 6))?;
    for i in 0..N {
        write!(writer, " {}", format_scientific(y[i]))?;
    }
    writeln!(writer)
}

fn trim_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
