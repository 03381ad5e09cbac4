use serde::{Deserialize, Serialize};

/// Sets won by each participant, in the order they appear in the raw score text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScore {
    pub first: u8,
    pub second: u8,
}

/// How convincingly a match was won, independent of which side won it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Margin {
    /// 2-0, 3-0
    Straight,
    /// 2-1, 3-1
    DroppedSet,
    /// 3-2
    Decider,
    Unclassified,
}

impl SetScore {
    /// Accepts either a set count ("2-1", "3:0") or per-set game scores
    /// ("6-4, 7-5", "6-7(5) 6-3 7-6"). Game scores are folded into a set count.
    pub fn parse(raw: &str) -> Option<Self> {
        let pairs = number_pairs(raw);
        match pairs.as_slice() {
            [] => None,
            [(a, b)] if is_set_count(*a, *b) => Some(Self {
                first: *a as u8,
                second: *b as u8,
            }),
            _ => {
                let mut first = 0u8;
                let mut second = 0u8;
                for (a, b) in pairs {
                    if a > b {
                        first = first.saturating_add(1);
                    } else if b > a {
                        second = second.saturating_add(1);
                    }
                }
                if first == 0 && second == 0 {
                    return None;
                }
                Some(Self { first, second })
            }
        }
    }

    pub fn margin(self) -> Margin {
        let won = self.first.max(self.second);
        let lost = self.first.min(self.second);
        match (won, lost) {
            (2, 0) | (3, 0) => Margin::Straight,
            (2, 1) | (3, 1) => Margin::DroppedSet,
            (3, 2) => Margin::Decider,
            _ => Margin::Unclassified,
        }
    }
}

pub fn classify_margin(raw: &str) -> Margin {
    SetScore::parse(raw)
        .map(SetScore::margin)
        .unwrap_or(Margin::Unclassified)
}

// A lone pair is a set count only if neither side could have reached it in games.
fn is_set_count(a: u32, b: u32) -> bool {
    a.max(b) <= 3
}

fn number_pairs(raw: &str) -> Vec<(u32, u32)> {
    // Tiebreak points in parentheses are not games.
    let mut cleaned = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for ch in raw.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => cleaned.push(ch),
            _ => {}
        }
    }

    let mut out = Vec::new();
    let chars: Vec<char> = cleaned.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let Some((a, next)) = read_number(&chars, i) else {
            i += 1;
            continue;
        };
        let mut j = next;
        while j < chars.len() && chars[j] == ' ' {
            j += 1;
        }
        if j < chars.len() && is_separator(chars[j]) {
            let mut k = j + 1;
            while k < chars.len() && chars[k] == ' ' {
                k += 1;
            }
            if let Some((b, after)) = read_number(&chars, k) {
                out.push((a, b));
                i = after;
                continue;
            }
        }
        i = next;
    }
    out
}

fn read_number(chars: &[char], start: usize) -> Option<(u32, usize)> {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end == start {
        return None;
    }
    let digits: String = chars[start..end].iter().collect();
    digits.parse::<u32>().ok().map(|n| (n, end))
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '-' | ':' | '\u{2013}' | '\u{2014}')
}
