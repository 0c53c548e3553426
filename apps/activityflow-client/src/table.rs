use console::style;

/// Column-aligned plain text table.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> Vec<String> {
        let widths = self.widths();
        let pad = |cells: Vec<String>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:<w$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![pad(self.headers.iter().map(|h| h.to_string()).collect())];
        lines.extend(self.rows.iter().map(|r| pad(r.clone())));
        lines
    }

    pub fn print(&self) {
        if self.rows.is_empty() {
            println!("{}", style("(none)").dim());
            return;
        }
        let mut lines = self.render().into_iter();
        if let Some(header) = lines.next() {
            println!("{}", style(header).bold());
        }
        for line in lines {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns_to_the_widest_cell() {
        let mut table = Table::new(vec!["ID", "TITLE"]);
        table.row(vec!["1".into(), "Activity 1".into()]);
        table.row(vec!["12".into(), "x".into()]);
        assert_eq!(
            table.render(),
            vec!["ID  TITLE", "1   Activity 1", "12  x"]
        );
    }
}
