use anyhow::{Context, Result, bail};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a comma-separated stake list, e.g. `5,10,20`.
pub fn parse_stakes(s: &str) -> Result<Vec<f64>> {
    split_csv(s)
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("invalid stake: {token}"))
        })
        .collect()
}

/// Parse a round grid: either a comma-separated list (`10,20,30`) or an
/// inclusive range with step (`10-150:5`).
pub fn parse_grid(s: &str) -> Result<Vec<u32>> {
    let trimmed = s.trim();
    if let Some((range, step)) = trimmed.split_once(':') {
        let Some((start, end)) = range.split_once('-') else {
            bail!("range grid must look like start-end:step, got {trimmed}");
        };
        let start: u32 = start
            .trim()
            .parse()
            .with_context(|| format!("invalid range start: {start}"))?;
        let end: u32 = end
            .trim()
            .parse()
            .with_context(|| format!("invalid range end: {end}"))?;
        let step: u32 = step
            .trim()
            .parse()
            .with_context(|| format!("invalid range step: {step}"))?;
        if step == 0 {
            bail!("range step must be positive");
        }
        if end < start {
            bail!("range end {end} is below start {start}");
        }
        return Ok((start..=end).step_by(step as usize).collect());
    }

    split_csv(trimmed)
        .iter()
        .map(|token| {
            token
                .parse::<u32>()
                .with_context(|| format!("invalid grid value: {token}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" 5, ,10,  20 ");
        assert_eq!(parts, vec!["5", "10", "20"]);
    }

    #[test]
    fn parses_stake_lists() {
        assert_eq!(parse_stakes("5,10,20").unwrap(), vec![5.0, 10.0, 20.0]);
        assert_eq!(parse_stakes("2.5").unwrap(), vec![2.5]);
        assert!(parse_stakes("5,ten").is_err());
    }

    #[test]
    fn parses_grid_lists_and_ranges() {
        assert_eq!(parse_grid("10,20,30").unwrap(), vec![10, 20, 30]);
        assert_eq!(parse_grid("10-30:10").unwrap(), vec![10, 20, 30]);
        let fine = parse_grid("10-150:5").unwrap();
        assert_eq!(fine.len(), 29);
        assert_eq!(fine.first(), Some(&10));
        assert_eq!(fine.last(), Some(&150));
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(parse_grid("10-150:0").is_err());
        assert!(parse_grid("150-10:5").is_err());
        assert!(parse_grid("10:5").is_err());
        assert!(parse_grid("10-x:5").is_err());
    }
}
