use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const DEFAULT_SEED: u64 = 2024;

/// SplitMix64 stream: reproducible sample files for a given seed.
struct SampleRng {
    state: u64,
    /// Second normal deviate left over from the last polar draw.
    spare: Option<f64>,
}

impl SampleRng {
    fn seeded(seed: u64) -> Self {
        SampleRng {
            state: seed,
            spare: None,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal deviate via the Marsaglia polar method.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return mean + std_dev * z;
        }
        loop {
            let u = 2.0 * self.unit() - 1.0;
            let v = 2.0 * self.unit() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let factor = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(v * factor);
                return mean + std_dev * u * factor;
            }
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// outcome_data.csv
// ---------------------------------------------------------------------------

/// (CIP as written in the export, rates stored as 0–1 fractions?)
const OUTCOME_PROGRAMS: [(&str, bool); 3] = [("13.13", true), ("'16.0'", false), ("42", false)];
const OUTCOME_LEVELS: [(&str, f64); 3] = [
    ("Bachelor's", 52_000.0),
    ("Master's", 63_000.0),
    ("Doctor's  ", 78_000.0),
];

fn write_outcomes(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "year",
        "CIP",
        "Degree Level",
        "Total Graduate",
        "Mean Starting Salary",
        "Career Outcome Rate",
        "Employed Overall",
        "Standard Employment Full-time",
        "Continuing Education",
        "Seeking Employment",
        "Seeking Continuing Education",
        "Temp/Contract Employee",
    ])?;

    let mut rows = 0;
    for (cip, fractional) in OUTCOME_PROGRAMS {
        for (level, base_salary) in OUTCOME_LEVELS {
            let mut outcome = rng.normal(0.82, 0.04).clamp(0.5, 0.99);
            for year in 2015..=2024 {
                outcome = (outcome + rng.normal(0.0, 0.015)).clamp(0.5, 0.99);
                let employed = outcome * rng.normal(0.8, 0.03).clamp(0.6, 0.95);
                let full_time = employed * rng.normal(0.85, 0.03).clamp(0.7, 0.98);
                let continuing = outcome - employed;
                let seeking = (1.0 - outcome) * 0.7;
                let seeking_cont = (1.0 - outcome) * 0.2;
                let temp = employed * 0.05;

                let scale = if fractional { 1.0 } else { 100.0 };
                let rate = |v: f64| round_to(v * scale, 4).to_string();
                let salary = base_salary * (1.0 + 0.03 * (year - 2015) as f64)
                    + rng.normal(0.0, 1_500.0);
                let graduates = rng.normal(220.0, 40.0).max(12.0).round();

                // Exports mix integer and float years.
                let year_text = if year % 3 == 0 {
                    format!("{year}.0")
                } else {
                    year.to_string()
                };

                writer.write_record([
                    year_text,
                    cip.to_string(),
                    level.to_string(),
                    graduates.to_string(),
                    round_to(salary, 0).to_string(),
                    rate(outcome),
                    rate(employed),
                    rate(full_time),
                    rate(continuing),
                    rate(seeking),
                    rate(seeking_cont),
                    rate(temp),
                ])?;
                rows += 1;
            }
        }
    }

    // A footnote row the dashboard should silently skip.
    writer.write_record(["n/a", "16", "Bachelor's", "", "", "", "", "", "", "", "", ""])?;
    writer.flush()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// DegreeConferred.csv
// ---------------------------------------------------------------------------

const CONFERRED_SERIES: [(&str, &str, f64); 8] = [
    ("16", "B.A.", 900.0),
    ("16", "M.A.", 260.0),
    ("16", "Ph.D.", 85.0),
    ("30.52", "B.A.", 40.0),
    ("30.52", "M.A.", 25.0),
    ("54.0", "B.A.", 1_400.0),
    ("54.0", "M.A.", 330.0),
    ("54.0", "Ph.D.", 120.0),
];

fn write_conferred(path: &Path, rng: &mut SampleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["year", "cip", "level", "total", "pct_change"])?;

    let mut rows = 0;
    for (cip, level, start) in CONFERRED_SERIES {
        let mut previous: Option<f64> = None;
        let mut total = start;
        for year in 2012..=2023 {
            total = (total * (1.0 + rng.normal(-0.01, 0.06))).max(1.0).round();
            let pct_change = previous
                .map(|p| round_to((total - p) / p * 100.0, 2).to_string())
                .unwrap_or_default();
            writer.write_record([
                year.to_string(),
                cip.to_string(),
                level.to_string(),
                total.to_string(),
                pct_change,
            ])?;
            previous = Some(total);
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Usage: `generate_sample [OUT_DIR] [SEED]`
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("seed must be a non-negative integer, got {raw:?}"))?,
        None => DEFAULT_SEED,
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng::seeded(seed);
    println!("Generating sample data with seed {seed}");

    let outcome_path = out_dir.join("outcome_data.csv");
    let outcome_rows = write_outcomes(&outcome_path, &mut rng)?;
    println!("Wrote {outcome_rows} career outcome rows to {}", outcome_path.display());

    let conferred_path = out_dir.join("DegreeConferred.csv");
    let conferred_rows = write_conferred(&conferred_path, &mut rng)?;
    println!(
        "Wrote {conferred_rows} degree conferral rows to {}",
        conferred_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_stream() {
        let mut a = SampleRng::seeded(7);
        let mut b = SampleRng::seeded(7);
        let mut c = SampleRng::seeded(8);
        let first: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
        let again: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
        let other: Vec<u64> = (0..4).map(|_| c.next_u64()).collect();
        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[test]
    fn normal_draws_center_on_mean() {
        let mut rng = SampleRng::seeded(DEFAULT_SEED);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.normal(5.0, 2.0)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean {mean}");
        assert!((0..1_000).all(|_| (0.0..1.0).contains(&rng.unit())));
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = SampleRng::seeded(DEFAULT_SEED);
        let outcome_rows = write_outcomes(&dir.path().join("outcome_data.csv"), &mut rng).unwrap();
        let conferred_rows =
            write_conferred(&dir.path().join("DegreeConferred.csv"), &mut rng).unwrap();
        assert_eq!(outcome_rows, 3 * 3 * 10);
        assert_eq!(conferred_rows, 8 * 12);
    }
}
