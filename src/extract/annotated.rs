use super::EditEvent;
use crate::layouts::KeyboardLayout;

/// Returns the text between the first `open` and the next `close` after it.
fn enclosed(symbol: &str, open: char, close: char) -> Option<&str> {
    let start = symbol.find(open)? + open.len_utf8();
    let len = symbol[start..].find(close)?;
    Some(&symbol[start..start + len])
}

fn single(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Decodes one tagged log row into an edit event.
///
/// | tag | markup          | meaning                                  |
/// |-----|-----------------|------------------------------------------|
/// | RM  | `(x)`           | `x` was dropped                          |
/// | R2  | `[typo:orig]`   | `orig` was typed as `typo`               |
/// | R1  | `[a/b]`         | clean `b a` was typed as `a b`           |
/// | IN  | `b<x>a`         | `x` was inserted between `b` and `a`     |
///
/// Payload characters go through `layout`. Unknown tags and markup that does
/// not decode to single characters yield `None`.
pub fn decode(operation: &str, symbol: &str, layout: KeyboardLayout) -> Option<EditEvent> {
    let map = |c: char| layout.map_char(c);

    match operation {
        "RM" => {
            let ch = single(enclosed(symbol, '(', ')')?)?;
            Some(EditEvent::Deletion(map(ch)))
        }
        "R2" => {
            let inner = enclosed(symbol, '[', ']')?;
            if inner.contains('_') {
                return None;
            }
            let (typo, original) = inner.split_once(':')?;
            Some(EditEvent::Substitution {
                original: map(single(original)?),
                typo: map(single(typo)?),
            })
        }
        "R1" => {
            let inner = enclosed(symbol, '[', ']')?;
            let (typed_first, typed_second) = inner.split_once('/')?;
            Some(EditEvent::Transposition {
                first: map(single(typed_second)?),
                second: map(single(typed_first)?),
            })
        }
        "IN" => {
            let open = symbol.find('<')?;
            let close = open + symbol[open..].find('>')?;
            let before = symbol[..open].chars().next_back()?;
            let inserted = single(&symbol[open + 1..close])?;
            let after = symbol[close + 1..].chars().next()?;
            Some(EditEvent::Insertion {
                before: map(before),
                inserted: map(inserted),
                after: map(after),
            })
        }
        _ => None,
    }
}
