//! Display helpers shared by the panels.

use chrono::{TimeZone, Utc};

use crate::config::LAMPORTS_PER_SOL;

/// Lamports as SOL with 9 decimals, e.g. `1.500000000`.
pub fn lamports_to_sol(lamports: u64) -> String {
    format!(
        "{}.{:09}",
        lamports / LAMPORTS_PER_SOL,
        lamports % LAMPORTS_PER_SOL
    )
}

/// Signed lamport delta as SOL, always with a sign.
pub fn signed_lamports_to_sol(delta: i128) -> String {
    let sign = if delta < 0 { '-' } else { '+' };
    let magnitude = delta.unsigned_abs();
    let per_sol = u128::from(LAMPORTS_PER_SOL);
    format!("{sign}{}.{:09}", magnitude / per_sol, magnitude % per_sol)
}

/// SOL to lamports, rounded to the nearest lamport.
///
/// Returns `None` for negative, non-finite, or out-of-range amounts.
pub fn sol_to_lamports(sol: f64) -> Option<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return None;
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if lamports > u64::MAX as f64 {
        return None;
    }
    Some(lamports as u64)
}

/// Keep `keep` characters at each end, joined by `...`.
pub fn shorten(value: &str, keep: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= keep * 2 + 3 {
        return value.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{head}...{tail}")
}

pub fn short_signature(signature: &str) -> String {
    shorten(signature, 8)
}

pub fn short_address(address: &str) -> String {
    shorten(address, 4)
}

/// Unix seconds as a UTC timestamp, or `N/A`.
pub fn block_time(seconds: Option<i64>) -> String {
    seconds
        .and_then(|s| Utc.timestamp_opt(s, 0).single())
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Log lines joined by newlines, or a placeholder when there are none.
pub fn logs_text(logs: &[String]) -> String {
    if logs.is_empty() {
        "No logs available".to_string()
    } else {
        logs.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamports_render_nine_decimals() {
        assert_eq!(lamports_to_sol(0), "0.000000000");
        assert_eq!(lamports_to_sol(5_000), "0.000005000");
        assert_eq!(lamports_to_sol(1_500_000_000), "1.500000000");
    }

    #[test]
    fn signed_delta_has_sign() {
        assert_eq!(signed_lamports_to_sol(-500_005_000), "-0.500005000");
        assert_eq!(signed_lamports_to_sol(2_000_000_000), "+2.000000000");
        assert_eq!(signed_lamports_to_sol(0), "+0.000000000");
    }

    #[test]
    fn sol_to_lamports_rounds() {
        assert_eq!(sol_to_lamports(1.0), Some(1_000_000_000));
        assert_eq!(sol_to_lamports(0.1), Some(100_000_000));
        assert_eq!(sol_to_lamports(0.000_000_000_4), Some(0));
        assert_eq!(sol_to_lamports(-1.0), None);
        assert_eq!(sol_to_lamports(f64::NAN), None);
        assert_eq!(sol_to_lamports(f64::INFINITY), None);
        assert_eq!(sol_to_lamports(1e30), None);
    }

    #[test]
    fn shorten_keeps_ends() {
        let sig = "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv";
        assert_eq!(short_signature(sig), "5h6xBEau...Zyv2sUYv");
        assert_eq!(
            short_address("11111111111111111111111111111111"),
            "1111...1111"
        );
        assert_eq!(shorten("abc", 4), "abc");
    }

    #[test]
    fn block_time_or_placeholder() {
        assert_eq!(block_time(Some(0)), "1970-01-01 00:00:00 UTC");
        assert_eq!(block_time(Some(1_700_000_000)), "2023-11-14 22:13:20 UTC");
        assert_eq!(block_time(None), "N/A");
    }

    #[test]
    fn logs_placeholder() {
        assert_eq!(logs_text(&[]), "No logs available");
        assert_eq!(logs_text(&["a".into(), "b".into()]), "a\nb");
    }
}
