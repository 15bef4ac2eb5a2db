//! Code 128 encoding.
//!
//! Code sets are chosen automatically: runs of four or more digits (or an
//! even-length digit tail) use set C, control characters force set A and
//! everything else uses set B.

use crate::error::EncodeError;

const START_A: u8 = 103;
const START_B: u8 = 104;
const START_C: u8 = 105;
const STOP: usize = 106;
const SWITCH_A: u8 = 101;
const SWITCH_B: u8 = 100;
const SWITCH_C: u8 = 99;

/// Bar/space widths for symbol values 0..=106, starting with a bar.
const PATTERNS: [&[u8]; 107] = [
    &[2, 1, 2, 2, 2, 2],
    &[2, 2, 2, 1, 2, 2],
    &[2, 2, 2, 2, 2, 1],
    &[1, 2, 1, 2, 2, 3],
    &[1, 2, 1, 3, 2, 2],
    &[1, 3, 1, 2, 2, 2],
    &[1, 2, 2, 2, 1, 3],
    &[1, 2, 2, 3, 1, 2],
    &[1, 3, 2, 2, 1, 2],
    &[2, 2, 1, 2, 1, 3],
    &[2, 2, 1, 3, 1, 2],
    &[2, 3, 1, 2, 1, 2],
    &[1, 1, 2, 2, 3, 2],
    &[1, 2, 2, 1, 3, 2],
    &[1, 2, 2, 2, 3, 1],
    &[1, 1, 3, 2, 2, 2],
    &[1, 2, 3, 1, 2, 2],
    &[1, 2, 3, 2, 2, 1],
    &[2, 2, 3, 2, 1, 1],
    &[2, 2, 1, 1, 3, 2],
    &[2, 2, 1, 2, 3, 1],
    &[2, 1, 3, 2, 1, 2],
    &[2, 2, 3, 1, 1, 2],
    &[3, 1, 2, 1, 3, 1],
    &[3, 1, 1, 2, 2, 2],
    &[3, 2, 1, 1, 2, 2],
    &[3, 2, 1, 2, 2, 1],
    &[3, 1, 2, 2, 1, 2],
    &[3, 2, 2, 1, 1, 2],
    &[3, 2, 2, 2, 1, 1],
    &[2, 1, 2, 1, 2, 3],
    &[2, 1, 2, 3, 2, 1],
    &[2, 3, 2, 1, 2, 1],
    &[1, 1, 1, 3, 2, 3],
    &[1, 3, 1, 1, 2, 3],
    &[1, 3, 1, 3, 2, 1],
    &[1, 1, 2, 3, 1, 3],
    &[1, 3, 2, 1, 1, 3],
    &[1, 3, 2, 3, 1, 1],
    &[2, 1, 1, 3, 1, 3],
    &[2, 3, 1, 1, 1, 3],
    &[2, 3, 1, 3, 1, 1],
    &[1, 1, 2, 1, 3, 3],
    &[1, 1, 2, 3, 3, 1],
    &[1, 3, 2, 1, 3, 1],
    &[1, 1, 3, 1, 2, 3],
    &[1, 1, 3, 3, 2, 1],
    &[1, 3, 3, 1, 2, 1],
    &[3, 1, 3, 1, 2, 1],
    &[2, 1, 1, 3, 3, 1],
    &[2, 3, 1, 1, 3, 1],
    &[2, 1, 3, 1, 1, 3],
    &[2, 1, 3, 3, 1, 1],
    &[2, 1, 3, 1, 3, 1],
    &[3, 1, 1, 1, 2, 3],
    &[3, 1, 1, 3, 2, 1],
    &[3, 3, 1, 1, 2, 1],
    &[3, 1, 2, 1, 1, 3],
    &[3, 1, 2, 3, 1, 1],
    &[3, 3, 2, 1, 1, 1],
    &[3, 1, 4, 1, 1, 1],
    &[2, 2, 1, 4, 1, 1],
    &[4, 3, 1, 1, 1, 1],
    &[1, 1, 1, 2, 2, 4],
    &[1, 1, 1, 4, 2, 2],
    &[1, 2, 1, 1, 2, 4],
    &[1, 2, 1, 4, 2, 1],
    &[1, 4, 1, 1, 2, 2],
    &[1, 4, 1, 2, 2, 1],
    &[1, 1, 2, 2, 1, 4],
    &[1, 1, 2, 4, 1, 2],
    &[1, 2, 2, 1, 1, 4],
    &[1, 2, 2, 4, 1, 1],
    &[1, 4, 2, 1, 1, 2],
    &[1, 4, 2, 2, 1, 1],
    &[2, 4, 1, 2, 1, 1],
    &[2, 2, 1, 1, 1, 4],
    &[4, 1, 3, 1, 1, 1],
    &[2, 4, 1, 1, 1, 2],
    &[1, 3, 4, 1, 1, 1],
    &[1, 1, 1, 2, 4, 2],
    &[1, 2, 1, 1, 4, 2],
    &[1, 2, 1, 2, 4, 1],
    &[1, 1, 4, 2, 1, 2],
    &[1, 2, 4, 1, 1, 2],
    &[1, 2, 4, 2, 1, 1],
    &[4, 1, 1, 2, 1, 2],
    &[4, 2, 1, 1, 1, 2],
    &[4, 2, 1, 2, 1, 1],
    &[2, 1, 2, 1, 4, 1],
    &[2, 1, 4, 1, 2, 1],
    &[4, 1, 2, 1, 2, 1],
    &[1, 1, 1, 1, 4, 3],
    &[1, 1, 1, 3, 4, 1],
    &[1, 3, 1, 1, 4, 1],
    &[1, 1, 4, 1, 1, 3],
    &[1, 1, 4, 3, 1, 1],
    &[4, 1, 1, 1, 1, 3],
    &[4, 1, 1, 3, 1, 1],
    &[1, 1, 3, 1, 4, 1],
    &[1, 1, 4, 1, 3, 1],
    &[3, 1, 1, 1, 4, 1],
    &[4, 1, 1, 1, 3, 1],
    &[2, 1, 1, 4, 1, 2],
    &[2, 1, 1, 2, 1, 4],
    &[2, 1, 1, 2, 3, 2],
    &[2, 3, 3, 1, 1, 1, 2],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

/// Encode `data` as Code 128 modules (1 = bar, 0 = space).
pub fn encode(data: &str) -> Result<Vec<u8>, EncodeError> {
    let values = symbol_values(data)?;
    let mut modules = Vec::with_capacity((values.len() + 2) * 11 + 2);
    for value in values {
        push_pattern(&mut modules, PATTERNS[usize::from(value)]);
    }
    push_pattern(&mut modules, PATTERNS[STOP]);
    Ok(modules)
}

/// Symbol values from the start symbol through the check symbol.
fn symbol_values(data: &str) -> Result<Vec<u8>, EncodeError> {
    if data.is_empty() {
        return Err(EncodeError::InvalidData(
            "Code 128 data must not be empty".to_string(),
        ));
    }
    if let Some(bad) = data.chars().find(|c| !c.is_ascii()) {
        return Err(EncodeError::InvalidData(format!(
            "Code 128 cannot encode character {:?}",
            bad
        )));
    }

    let bytes = data.as_bytes();
    let mut values: Vec<u8> = Vec::with_capacity(bytes.len() + 4);
    let mut current: Option<CodeSet> = None;
    let mut i = 0;

    while i < bytes.len() {
        let run = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        let tail = run == bytes.len() - i;

        if run >= 4 || (tail && run >= 2 && run % 2 == 0) {
            if run % 2 == 1 {
                // Odd run: spend one digit in A/B so the rest pairs up
                let set = match current {
                    Some(CodeSet::A) => CodeSet::A,
                    _ => CodeSet::B,
                };
                select(&mut values, &mut current, set);
                values.push(bytes[i] - 32);
                i += 1;
                continue;
            }
            select(&mut values, &mut current, CodeSet::C);
            for pair in bytes[i..i + run].chunks(2) {
                values.push((pair[0] - b'0') * 10 + (pair[1] - b'0'));
            }
            i += run;
            continue;
        }

        let byte = bytes[i];
        let set = if byte < 32 {
            CodeSet::A
        } else if byte >= 96 {
            CodeSet::B
        } else {
            match current {
                Some(CodeSet::A) => CodeSet::A,
                _ => CodeSet::B,
            }
        };
        select(&mut values, &mut current, set);
        values.push(match set {
            CodeSet::A if byte < 32 => byte + 64,
            _ => byte - 32,
        });
        i += 1;
    }

    let checksum = values
        .iter()
        .enumerate()
        .map(|(pos, &value)| pos.max(1) as u32 * u32::from(value))
        .sum::<u32>()
        % 103;
    values.push(checksum as u8);

    Ok(values)
}

/// Emit a start or code-switch symbol when the set changes.
fn select(values: &mut Vec<u8>, current: &mut Option<CodeSet>, set: CodeSet) {
    match *current {
        None => values.push(match set {
            CodeSet::A => START_A,
            CodeSet::B => START_B,
            CodeSet::C => START_C,
        }),
        Some(active) if active != set => values.push(match set {
            CodeSet::A => SWITCH_A,
            CodeSet::B => SWITCH_B,
            CodeSet::C => SWITCH_C,
        }),
        _ => {}
    }
    *current = Some(set);
}

fn push_pattern(modules: &mut Vec<u8>, widths: &[u8]) {
    for (idx, &width) in widths.iter().enumerate() {
        let module = if idx % 2 == 0 { 1 } else { 0 };
        modules.extend(std::iter::repeat(module).take(usize::from(width)));
    }
}
