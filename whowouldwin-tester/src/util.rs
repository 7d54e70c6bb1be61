use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("invalid seed '{0}': expected an unsigned integer")]
    Invalid(String),
    #[error("no seeds given")]
    Empty,
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse a comma-separated seed list. Accepts decimal or `0x` hex.
pub fn parse_seeds(s: &str) -> Result<Vec<u64>, SeedError> {
    let seeds = split_csv(s)
        .into_iter()
        .map(|token| {
            let parsed = token.strip_prefix("0x").map_or_else(
                || token.parse::<u64>(),
                |hex| u64::from_str_radix(hex, 16),
            );
            parsed.map_err(|_| SeedError::Invalid(token))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if seeds.is_empty() {
        return Err(SeedError::Empty);
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(split_csv(" smoke, ,restart,"), vec!["smoke", "restart"]);
    }

    #[test]
    fn seeds_accept_decimal_and_hex() {
        assert_eq!(parse_seeds("1337, 0xff").unwrap(), vec![1337, 255]);
    }

    #[test]
    fn seeds_reject_garbage() {
        assert_eq!(
            parse_seeds("12,abc"),
            Err(SeedError::Invalid("abc".to_string()))
        );
        assert_eq!(parse_seeds(" , "), Err(SeedError::Empty));
    }
}
