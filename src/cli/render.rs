use crate::models::{Article, Comment, ReportTable};

/// Lays out rows as left-aligned columns; row 0 is the header and gets an underline
pub fn text_table(rows: &[Vec<String>]) -> String {
    let Some(header) = rows.first() else {
        return String::new();
    };

    let mut widths = vec![0usize; header.len()];
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(header));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in &rows[1..] {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn report(table: &ReportTable) -> String {
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    format!("{} ({})\n{}", table.kind.title(), table.year, text_table(&rows))
}

pub fn article_list(articles: &[Article]) -> String {
    let mut rows = vec![vec![
        "ID".to_string(),
        "Date".to_string(),
        "Title".to_string(),
        "Author".to_string(),
        "Tags".to_string(),
    ]];
    rows.extend(articles.iter().map(|a| {
        vec![
            a.id.to_string(),
            a.publish_date.to_string(),
            a.title.clone(),
            a.author.clone(),
            a.tags.join(", "),
        ]
    }));
    text_table(&rows)
}

pub fn article_detail(article: &Article, categories: &[String], comments: &[Comment]) -> String {
    let mut out = format!(
        "{}\nBy {} on {}\nTags: {}\nCategories: {}\n\n{}\n",
        article.title,
        article.author,
        article.publish_date,
        article.tags.join(", "),
        categories.join(", "),
        article.content
    );
    out.push_str(&format!("\nComments ({}):\n", comments.len()));
    for comment in comments {
        out.push_str(&format!("  {comment}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_table_aligns_columns() {
        let rows = vec![
            vec!["ID".to_string(), "Title".to_string()],
            vec!["10".to_string(), "Short".to_string()],
            vec!["2".to_string(), "A longer title".to_string()],
        ];

        let text = text_table(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID  Title");
        assert_eq!(lines[1], "--  --------------");
        assert_eq!(lines[2], "10  Short");
        assert_eq!(lines[3], "2   A longer title");
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(text_table(&[]), "");
    }
}
