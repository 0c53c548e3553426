use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const SQL_KEYWORDS: [&str; 5] = ["SELECT ", "INSERT ", "UPDATE ", "DELETE ", "WITH "];

fn source_roots() -> Vec<PathBuf> {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    vec![
        manifest.join("src"),
        manifest.join("../../libs/activityflow-db/src"),
    ]
}

fn collect_rs_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

fn line_number(content: &str, byte_idx: usize) -> usize {
    content[..byte_idx].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Every plain and raw string literal in a file, with its byte offset.
fn string_literals(content: &str) -> Vec<(usize, String)> {
    let bytes = content.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        // Line comments may hold quotes that are not literals.
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        if bytes[i] == b'r' && matches!(bytes.get(i + 1), Some(b'"') | Some(b'#')) {
            let mut j = i + 1;
            let mut hashes = 0usize;
            while j < bytes.len() && bytes[j] == b'#' {
                hashes += 1;
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'"' {
                let start = j + 1;
                let end_marker = format!("\"{}", "#".repeat(hashes));
                if let Some(rel) = content[start..].find(&end_marker) {
                    literals.push((i, content[start..start + rel].to_string()));
                    i = start + rel + end_marker.len();
                    continue;
                }
            }
        }

        if bytes[i] == b'"' {
            let start = i + 1;
            let mut j = start;
            let mut escaped = false;
            while j < bytes.len() {
                let b = bytes[j];
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    break;
                }
                j += 1;
            }
            literals.push((i, content[start..j.min(bytes.len())].to_string()));
            i = j + 1;
            continue;
        }

        i += 1;
    }
    literals
}

fn looks_like_sql(literal: &str) -> bool {
    let upper = literal.trim_start().to_ascii_uppercase();
    SQL_KEYWORDS.iter().any(|k| upper.starts_with(k))
        || upper.contains(" WHERE ")
        || upper.contains(" ORDER BY ")
}

fn sql_literals() -> Vec<(PathBuf, usize, String)> {
    let mut files = Vec::new();
    for root in source_roots() {
        collect_rs_files(&root, &mut files);
    }

    let mut found = Vec::new();
    for file in files {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (byte_idx, literal) in string_literals(&content) {
            if looks_like_sql(&literal) {
                found.push((file.clone(), line_number(&content, byte_idx), literal));
            }
        }
    }
    found
}

/// `$n` placeholder numbers used in a query.
fn placeholders(sql: &str) -> BTreeSet<usize> {
    let bytes = sql.as_bytes();
    let mut numbers = BTreeSet::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let digits: String = sql[i + 1..].chars().take_while(char::is_ascii_digit).collect();
            if let Ok(n) = digits.parse() {
                numbers.insert(n);
            }
            i += 1 + digits.len();
        } else {
            i += 1;
        }
    }
    numbers
}

#[test]
fn scanner_finds_the_repository_queries() {
    let literals = sql_literals();
    assert!(
        literals.iter().any(|(_, _, sql)| sql.contains("FROM activities")),
        "expected to find activity queries in the scanned sources"
    );
}

#[test]
fn queries_use_postgres_placeholders() {
    let violations: Vec<String> = sql_literals()
        .into_iter()
        .filter(|(_, _, sql)| sql.contains('?'))
        .map(|(file, line, _)| format!("{}:{} uses a '?' placeholder", file.display(), line))
        .collect();

    assert!(
        violations.is_empty(),
        "Found non-Postgres placeholders:\n{}",
        violations.join("\n")
    );
}

#[test]
fn placeholders_are_numbered_without_gaps() {
    let mut violations = Vec::new();
    for (file, line, sql) in sql_literals() {
        let used = placeholders(&sql);
        if let Some(&max) = used.iter().next_back() {
            let expected: BTreeSet<usize> = (1..=max).collect();
            if used != expected {
                violations.push(format!("{}:{} skips placeholders {:?}", file.display(), line, used));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found gaps in $n placeholders:\n{}",
        violations.join("\n")
    );
}

#[test]
fn queries_avoid_sqlite_only_syntax() {
    let mut violations = Vec::new();
    for (file, line, sql) in sql_literals() {
        let lower = sql.to_lowercase();
        let has_bad = lower.contains("insert or ignore")
            || lower.contains("insert or replace")
            || lower.contains("autoincrement")
            || lower.contains("strftime(")
            || lower.contains("datetime(");
        if has_bad {
            violations.push(format!("{}:{} contains SQLite-only SQL syntax", file.display(), line));
        }
    }

    assert!(
        violations.is_empty(),
        "Found SQLite-specific SQL in query literals:\n{}",
        violations.join("\n")
    );
}

#[test]
fn placeholder_parser_reads_multi_digit_numbers() {
    let used = placeholders("UPDATE t SET a = $1, b = $10 WHERE id = $2");
    assert_eq!(used.into_iter().collect::<Vec<_>>(), vec![1, 2, 10]);
}
