use crate::cli::output;

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    pub align_right: bool,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            align_right: false,
        }
    }

    pub fn right(mut self) -> Self {
        self.align_right = true;
        self
    }

    fn pad(&self, cell: &str) -> String {
        let cell = truncate(cell, self.width);
        if self.align_right {
            format!("{:>width$}", cell, width = self.width)
        } else {
            format!("{:<width$}", cell, width = self.width)
        }
    }
}

/// Read-only overview rendered as padded columns.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: Option<&str>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(str::to_string),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn render_lines(&self) -> Vec<String> {
        let width: usize = self.columns.iter().map(|col| col.width + 1).sum();
        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        let header = self
            .columns
            .iter()
            .map(|col| col.pad(&col.header))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(header.trim_end().to_string());
        lines.push("-".repeat(width.saturating_sub(1)));
        for row in &self.rows {
            let line = self
                .columns
                .iter()
                .enumerate()
                .map(|(idx, col)| col.pad(row.get(idx).map(String::as_str).unwrap_or("")))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(line.trim_end().to_string());
        }
        lines
    }

    pub fn print(&self) {
        if let Some(title) = &self.title {
            output::section(title);
        }
        for line in self.render_lines() {
            println!("{line}");
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_padded_and_truncated() {
        let mut table = Table::new(
            None,
            vec![TableColumn::new("Title", 6), TableColumn::new("Amount", 10).right()],
        );
        table.add_row(vec!["Supermercado", "R$ 10,00"]);
        let lines = table.render_lines();
        assert_eq!(lines[0], "Title      Amount");
        assert_eq!(lines[2], "Super…   R$ 10,00");
    }
}
