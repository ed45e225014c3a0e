//! Documentation XML to markdown.
//!
//! The analyzer delivers symbol documentation as XML (`Function`,
//! `Declaration`, `Abstract`, `Para`, `CodeVoice`, …). The converter keeps
//! the prose, renders declarations as fenced Swift code and `CodeVoice`
//! spans as inline code, and suppresses bookkeeping elements. Any
//! structural problem yields `None`; callers fall back to the raw XML.

/// Convert documentation XML to markdown. `None` on malformed input.
pub(crate) fn xml_to_markdown(xml: &str) -> Option<String> {
    let mut out = String::new();
    let mut stack: Vec<String> = Vec::new();
    let mut suppressed = 0usize;
    let mut rest = xml;

    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                if suppressed == 0 {
                    out.push_str(&decode_entities(rest)?);
                }
                break;
            }
            Some(lt) => {
                if suppressed == 0 {
                    out.push_str(&decode_entities(&rest[..lt])?);
                }
                let after = &rest[lt + 1..];
                let gt = after.find('>')?;
                let raw_tag = &after[..gt];
                rest = &after[gt + 1..];

                if let Some(closing) = raw_tag.strip_prefix('/') {
                    let name = element_name(closing)?;
                    let open = stack.pop()?;
                    if open != name {
                        return None;
                    }
                    if is_suppressed(&name) {
                        suppressed = suppressed.checked_sub(1)?;
                    } else if suppressed == 0 {
                        close_element(&mut out, &name);
                    }
                } else if raw_tag.ends_with('/') || raw_tag.starts_with('?') {
                    // Self-closing or prolog; no content, no markdown.
                } else {
                    let name = element_name(raw_tag)?;
                    if is_suppressed(&name) {
                        suppressed += 1;
                    } else if suppressed == 0 {
                        open_element(&mut out, &name);
                    }
                    stack.push(name);
                }
            }
        }
    }

    if !stack.is_empty() {
        return None;
    }
    Some(out.trim().to_owned())
}

fn element_name(tag: &str) -> Option<String> {
    let name = tag.split_whitespace().next()?;
    if name.is_empty() { None } else { Some(name.to_owned()) }
}

/// Bookkeeping elements whose text content is not prose.
fn is_suppressed(name: &str) -> bool {
    matches!(name, "Name" | "USR")
}

fn open_element(out: &mut String, name: &str) {
    match name {
        "Declaration" => out.push_str("```swift\n"),
        "CodeVoice" | "codeVoice" => out.push('`'),
        _ => {}
    }
}

fn close_element(out: &mut String, name: &str) {
    match name {
        "Declaration" => {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n\n");
        }
        "CodeVoice" | "codeVoice" => out.push('`'),
        "Para" => out.push_str("\n\n"),
        _ => {}
    }
}

fn decode_entities(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after.find(';')?;
        let entity = &after[..semi];
        match entity {
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "amp" => out.push('&'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let code = entity.strip_prefix("#x").map(|hex| u32::from_str_radix(hex, 16).ok());
                let code = match code {
                    Some(hex) => hex,
                    None => entity.strip_prefix('#').map(|dec| dec.parse::<u32>().ok())?,
                };
                out.push(char::from_u32(code?)?);
            }
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Some(out)
}
