//! Terminal control-sequence stripping.

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';
const C1_CSI: char = '\u{9b}';
const C1_ST: char = '\u{9c}';
const C1_OSC: char = '\u{9d}';

/// Remove CSI, OSC and other escape sequences, leaving printable text.
///
/// CSI (`ESC [` or the single C1 `0x9b`) runs until the first ASCII letter.
/// OSC (`ESC ]` or C1 `0x9d`) runs until BEL, `ESC \` or C1 ST `0x9c`; an
/// unterminated OSC only drops its introducer. Any other `ESC x` pair is
/// dropped whole, as is a stray ST.
pub fn strip(content: &str) -> String {
    if !content.contains([ESC, C1_CSI, C1_OSC, C1_ST]) {
        return content.to_string();
    }

    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            ESC if chars.get(i + 1) == Some(&'[') => {
                i = skip_csi_body(&chars, i + 2);
            }
            ESC if chars.get(i + 1) == Some(&']') => {
                i = match osc_end(&chars, i + 2) {
                    Some(end) => end,
                    None => i + 2,
                };
            }
            ESC => {
                i += 2;
            }
            C1_CSI => {
                i = skip_csi_body(&chars, i + 1);
            }
            C1_OSC => {
                i = osc_end(&chars, i + 1).unwrap_or(i + 1);
            }
            C1_ST => {
                i += 1;
            }
            ch => {
                out.push(ch);
                i += 1;
            }
        }
    }
    out
}

/// Index just past the final letter of a CSI sequence body.
fn skip_csi_body(chars: &[char], start: usize) -> usize {
    let mut j = start;
    while j < chars.len() {
        let done = chars[j].is_ascii_alphabetic();
        j += 1;
        if done {
            break;
        }
    }
    j
}

fn osc_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    while j < chars.len() {
        if chars[j] == BEL || chars[j] == C1_ST {
            return Some(j + 1);
        }
        if chars[j] == ESC && chars.get(j + 1) == Some(&'\\') {
            return Some(j + 2);
        }
        j += 1;
    }
    None
}
