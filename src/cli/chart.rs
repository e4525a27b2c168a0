//! Vertical bar chart of the monthly series, drawn with block characters.

use gasto_core::{bar_heights, format_currency, MonthlyBucket, BAR_MAX_HEIGHT, BAR_MIN_HEIGHT};

const BAR: &str = "███";

/// Renders `series` into `rows` lines of bars, a line of month labels and a
/// line with each month's total.
pub fn render_monthly_chart(series: &[MonthlyBucket], rows: u16) -> Vec<String> {
    if series.is_empty() {
        return Vec::new();
    }
    let rows = usize::from(rows.max(1));
    let labels: Vec<String> = series.iter().map(MonthlyBucket::label).collect();
    let amounts: Vec<String> = series.iter().map(|bucket| format_currency(bucket.total)).collect();
    let column = labels
        .iter()
        .chain(&amounts)
        .map(|text| text.chars().count())
        .max()
        .unwrap_or(0)
        .max(BAR.chars().count())
        + 1;

    let filled: Vec<usize> = bar_heights(series, BAR_MAX_HEIGHT, BAR_MIN_HEIGHT)
        .into_iter()
        .map(|height| ((height / BAR_MAX_HEIGHT) * rows as f64).ceil() as usize)
        .map(|cells| cells.clamp(1, rows))
        .collect();

    let mut lines = Vec::with_capacity(rows + 2);
    for level in (1..=rows).rev() {
        let line: String = filled
            .iter()
            .map(|&cells| {
                let glyph = if cells >= level { BAR } else { "" };
                format!("{glyph:<column$}")
            })
            .collect();
        lines.push(line.trim_end().to_string());
    }
    for row in [&labels, &amounts] {
        lines.push(
            row.iter()
                .map(|text| format!("{text:<column$}"))
                .collect::<String>()
                .trim_end()
                .to_string(),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasto_domain::MonthKey;

    fn bucket(year: i32, month: u32, total: f64) -> MonthlyBucket {
        MonthlyBucket {
            month: MonthKey::new(year, month).unwrap(),
            total,
        }
    }

    #[test]
    fn tallest_bar_fills_every_row() {
        let lines = render_monthly_chart(&[bucket(2023, 12, 10.0), bucket(2024, 1, 150.0)], 4);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "          ███");
        assert_eq!(lines[3], "███       ███");
        assert_eq!(lines[4], "12/2023   1/2024");
    }

    #[test]
    fn totals_are_printed_under_each_month() {
        let lines = render_monthly_chart(&[bucket(2023, 12, 10.0), bucket(2024, 1, 150.0)], 4);
        assert_eq!(lines[5], "R$ 10,00  R$ 150,00");
    }

    #[test]
    fn empty_series_draws_nothing() {
        assert!(render_monthly_chart(&[], 8).is_empty());
    }
}
