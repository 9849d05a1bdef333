/// Text layout rules for the product-name block.
///
/// Names longer than 8 characters wrap into lines of at most 8, preferring a
/// space found scanning backward from the 8th character. Output is capped at
/// 3 lines; anything past a full third line collapses into a 5-character
/// prefix plus an ellipsis.
pub const MAX_LINE_CHARS: usize = 8;
pub const MAX_LINES: usize = 3;
const TRUNCATED_TAIL_CHARS: usize = 5;

pub fn wrap_product_name(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= MAX_LINE_CHARS {
        return vec![name.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut rest: &[char] = &chars;
    loop {
        while rest.first().is_some_and(|c| *c == ' ') {
            rest = &rest[1..];
        }
        if rest.len() <= MAX_LINE_CHARS {
            if !rest.is_empty() {
                lines.push(rest.iter().collect());
            }
            break;
        }
        if lines.len() == MAX_LINES - 1 {
            // A full third line would still leave content over; truncate and
            // discard the remainder.
            let mut tail: String = rest[..TRUNCATED_TAIL_CHARS].iter().collect();
            tail.push('…');
            lines.push(tail);
            break;
        }

        let break_at = (1..=MAX_LINE_CHARS)
            .rev()
            .find(|&i| rest[i - 1] == ' ')
            .map(|i| i - 1);
        match break_at {
            Some(space_idx) if space_idx > 0 => {
                lines.push(rest[..space_idx].iter().collect());
                rest = &rest[space_idx + 1..];
            }
            _ => {
                lines.push(rest[..MAX_LINE_CHARS].iter().collect());
                rest = &rest[MAX_LINE_CHARS..];
            }
        }
    }
    lines
}

/// Vertical draw positions for the wrapped name lines. Lines are centered
/// around the nominal block position (half the canvas height): the first
/// line shifts up by `(lineCount - 1) * fontSize * 0.7`, each following line
/// steps down by `fontSize * 1.2`.
pub fn name_line_positions(line_count: usize, font_size: f32, canvas_height: u32) -> Vec<f32> {
    let base = canvas_height as f32 * 0.5;
    let first = base - (line_count.saturating_sub(1)) as f32 * font_size * 0.7;
    (0..line_count)
        .map(|i| first + i as f32 * font_size * 1.2)
        .collect()
}
