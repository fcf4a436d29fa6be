//! Three-way status parsing
//!
//! Turns `git status --porcelain=v1 -z` output into [`PathStatus`] entries.
//! Porcelain's `X` column compares the staging area with the last commit and
//! `Y` compares the working tree with the staging area; both are folded into
//! states relative to the last commit. Paths git does not list are clean.

use crate::types::{EntryState, PathStatus};

/// Parse NUL-separated porcelain v1 output
pub fn parse_porcelain(output: &[u8]) -> Vec<PathStatus> {
    let mut statuses = Vec::new();
    let mut records = output.split(|b| *b == 0).filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        if record.len() < 4 {
            continue;
        }
        let x = record[0] as char;
        let y = record[1] as char;
        let path = String::from_utf8_lossy(&record[3..]).into_owned();

        // Rename/copy records are followed by the source path
        if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') {
            records.next();
        }

        if let Some(status) = classify(x, y, path) {
            statuses.push(status);
        }
    }

    statuses
}

fn classify(x: char, y: char, path: String) -> Option<PathStatus> {
    match (x, y) {
        ('!', '!') => None,
        ('?', '?') => Some(PathStatus {
            path,
            in_head: false,
            workdir: EntryState::Changed,
            stage: EntryState::Absent,
        }),
        _ => {
            let stage = match x {
                ' ' => EntryState::Unchanged,
                'D' => EntryState::Absent,
                _ => EntryState::Changed,
            };
            let workdir = match y {
                ' ' => stage,
                'D' => EntryState::Absent,
                _ => EntryState::Changed,
            };
            Some(PathStatus {
                path,
                in_head: !matches!(x, 'A' | 'C'),
                workdir,
                stage,
            })
        }
    }
}
