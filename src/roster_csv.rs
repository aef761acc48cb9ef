//! Roster CSV exchange.
//!
//! Both directions use plain comma-separated text with the fixed column
//! set `name,studentId,classLevel,sex`. Fields are not quoted or escaped;
//! values containing commas are out of contract.

use crate::model::{Student, StudentDraft};

pub const CSV_HEADER: &str = "name,studentId,classLevel,sex";

const HEADER_PATTERNS: [&str; 4] = ["name", "student", "class", "sex"];

fn looks_like_header(fields: &[String]) -> bool {
    fields.len() >= 4
        && fields
            .iter()
            .zip(HEADER_PATTERNS.iter())
            .all(|(field, pat)| field.to_lowercase().contains(pat))
}

/// Parses uploaded roster text into candidate rows.
///
/// Lines are split on CR/LF and trimmed; blank lines and lines with fewer
/// than four comma-separated fields are silently skipped. A first line
/// whose leading four fields look like the column names is treated as a
/// header and skipped.
pub fn parse_roster(text: &str) -> Vec<StudentDraft> {
    let mut rows = Vec::new();
    let lines: Vec<&str> = text
        .split(['\r', '\n'])
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() < 4 {
            continue;
        }
        if i == 0 && looks_like_header(&fields) {
            continue;
        }
        rows.push(StudentDraft {
            name: fields[0].clone(),
            student_id: fields[1].clone(),
            class_level: fields[2].clone(),
            sex: fields[3].clone(),
        });
    }
    rows
}

/// Serializes the current roster, one line per student, header first.
/// Missing classLevel/sex become empty fields.
pub fn serialize_roster(students: &[Student]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for s in students {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            s.name,
            s.student_id,
            s.class_level.as_deref().unwrap_or(""),
            s.sex.as_deref().unwrap_or("")
        ));
    }
    csv
}

/// Sample document offered by the roster screen's template download.
pub fn template() -> String {
    format!(
        "{}\nJohn Doe,student-001,JSS1,M\nJane Smith,student-002,SS2,F\n",
        CSV_HEADER
    )
}
