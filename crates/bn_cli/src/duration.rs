use std::str::FromStr;
use std::time::Duration;

/// Durations like `15m`, `1h30m` or `90` (seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut total = 0u64;
        let mut number = String::new();
        let mut seen = false;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c.is_ascii_digit() {
                number.push(c);
                continue;
            }
            let value: u64 = number
                .parse()
                .map_err(|_| format!("Missing number before unit '{}'", c))?;
            let scale = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total = value
                .checked_mul(scale)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| format!("Duration is too large: {}", s))?;
            number.clear();
            seen = true;
        }

        if !number.is_empty() {
            let secs = number.parse::<u64>().map_err(|e| e.to_string())?;
            total = total
                .checked_add(secs)
                .ok_or_else(|| format!("Duration is too large: {}", s))?;
            seen = true;
        }
        if !seen {
            return Err("Duration must include a number".to_string());
        }
        if total == 0 {
            return Err("Duration must be positive".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total)))
    }
}
