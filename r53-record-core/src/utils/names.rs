//! 记录名称与记录值的规范化
//!
//! Route53 accepts names with or without the trailing dot, returns them
//! fully qualified, and escapes some characters as octal (`*` comes back as
//! `\052`). Everything here is pure and total.

use r53_record_provider::RecordType;

/// Maximum length of a single TXT character-string.
const TXT_CHUNK_LEN: usize = 255;

/// Expand a possibly relative record name to a fully qualified one (no trailing dot).
///
/// The name is lower-cased; an empty name expands to the zone apex.
pub fn expand_record_name(name: &str, zone: &str) -> String {
    let rn = name.strip_suffix('.').unwrap_or(name).to_lowercase();
    let zone = zone.strip_suffix('.').unwrap_or(zone);
    if rn.ends_with(zone) {
        rn
    } else if name.is_empty() {
        zone.to_string()
    } else {
        format!("{rn}.{zone}")
    }
}

/// Append the trailing dot unless already present or the name is empty.
pub fn fqdn(name: &str) -> String {
    if name.is_empty() || name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Decode the escape sequences Route53 uses in returned names (`\052` → `*`).
///
/// The name is read as the body of a double-quoted literal. Malformed escapes
/// or an unescaped quote leave the input unchanged.
pub fn clean_record_name(name: &str) -> String {
    unquote(name).unwrap_or_else(|| name.to_string())
}

/// Alias target names compare without `dualstack.` and the trailing dot.
pub fn normalize_alias_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let trimmed = lower.strip_prefix("dualstack.").unwrap_or(&lower);
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

/// Convert user record values to wire form.
///
/// TXT/SPF values are quoted; values longer than 255 bytes are split into
/// several quoted strings separated by a space. Already quoted values and
/// every other record type pass through.
pub fn expand_record_values(values: &[String], record_type: RecordType) -> Vec<String> {
    if !record_type.is_quoted_text() {
        return values.to_vec();
    }
    values.iter().map(|v| expand_txt_value(v)).collect()
}

/// Inverse of [`expand_record_values`]: strip TXT/SPF quoting and re-join chunks.
pub fn flatten_record_values(values: &[String], record_type: RecordType) -> Vec<String> {
    if !record_type.is_quoted_text() {
        return values.to_vec();
    }
    values.iter().map(|v| flatten_txt_value(v)).collect()
}

fn expand_txt_value(value: &str) -> String {
    if value.starts_with('"') {
        return value.to_string();
    }
    split_on_char_boundary(value, TXT_CHUNK_LEN)
        .into_iter()
        .map(|chunk| format!("\"{}\"", chunk.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn flatten_txt_value(value: &str) -> String {
    if !value.starts_with('"') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut in_quotes = false;
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            // 引号之外的空白是分段分隔符
            c if !in_quotes && c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

fn split_on_char_boundary(value: &str, max_len: usize) -> Vec<&str> {
    if value.is_empty() {
        return vec![value];
    }
    let mut chunks = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        let mut end = rest.len().min(max_len);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

// ===== 转义解码 =====

fn unquote(body: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => decode_escape(&mut chars, &mut out)?,
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(out).ok()
}

fn decode_escape(chars: &mut std::str::Chars<'_>, out: &mut Vec<u8>) -> Option<()> {
    let simple = |b: u8, out: &mut Vec<u8>| {
        out.push(b);
        Some(())
    };
    match chars.next()? {
        'a' => simple(0x07, out),
        'b' => simple(0x08, out),
        'f' => simple(0x0c, out),
        'n' => simple(b'\n', out),
        'r' => simple(b'\r', out),
        't' => simple(b'\t', out),
        'v' => simple(0x0b, out),
        '\\' => simple(b'\\', out),
        '"' => simple(b'"', out),
        d @ '0'..='7' => {
            let mut value = d.to_digit(8)?;
            for _ in 0..2 {
                value = value * 8 + chars.next()?.to_digit(8)?;
            }
            out.push(u8::try_from(value).ok()?);
            Some(())
        }
        'x' => {
            let value = read_hex(chars, 2)?;
            out.push(u8::try_from(value).ok()?);
            Some(())
        }
        'u' => push_char(read_hex(chars, 4)?, out),
        'U' => push_char(read_hex(chars, 8)?, out),
        _ => None,
    }
}

fn read_hex(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(code: u32, out: &mut Vec<u8>) -> Option<()> {
    let c = char::from_u32(code)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_relative_name() {
        assert_eq!(expand_record_name("www", "example.com"), "www.example.com");
        assert_eq!(expand_record_name("WWW", "example.com."), "www.example.com");
    }

    #[test]
    fn expand_absolute_name_with_trailing_dot() {
        assert_eq!(
            expand_record_name("www.example.com.", "example.com"),
            "www.example.com"
        );
    }

    #[test]
    fn expand_empty_name_is_apex() {
        assert_eq!(expand_record_name("", "example.com"), "example.com");
        assert_eq!(expand_record_name("", "example.com."), "example.com");
    }

    #[test]
    fn expand_is_idempotent() {
        let once = expand_record_name("api", "example.com.");
        assert_eq!(expand_record_name(&once, "example.com."), once);
    }

    #[test]
    fn fqdn_appends_dot_once() {
        assert_eq!(fqdn("example.com"), "example.com.");
        assert_eq!(fqdn("example.com."), "example.com.");
        assert_eq!(fqdn(""), "");
    }

    #[test]
    fn clean_octal_wildcard() {
        assert_eq!(clean_record_name("\\052.example.com"), "*.example.com");
        assert_eq!(clean_record_name("\\100.example.com."), "@.example.com.");
    }

    #[test]
    fn clean_other_escapes() {
        assert_eq!(clean_record_name("a\\\\b"), "a\\b");
        assert_eq!(clean_record_name("\\x41\\u00e9"), "Aé");
        assert_eq!(clean_record_name("\\U0001F600"), "\u{1F600}");
        assert_eq!(clean_record_name("tab\\there"), "tab\there");
    }

    #[test]
    fn clean_plain_name_unchanged() {
        assert_eq!(clean_record_name("www.example.com."), "www.example.com.");
    }

    #[test]
    fn clean_malformed_returns_input() {
        assert_eq!(clean_record_name("bad\\q"), "bad\\q");
        assert_eq!(clean_record_name("\\05"), "\\05");
        assert_eq!(clean_record_name("\\777"), "\\777");
        assert_eq!(clean_record_name("trailing\\"), "trailing\\");
        assert_eq!(clean_record_name("has\"quote"), "has\"quote");
    }

    #[test]
    fn normalize_alias_strips_dualstack_and_dot() {
        assert_eq!(
            normalize_alias_name("dualstack.foo.elb.amazonaws.com."),
            "foo.elb.amazonaws.com"
        );
        assert_eq!(
            normalize_alias_name("DualStack.Foo.ELB.amazonaws.com"),
            "foo.elb.amazonaws.com"
        );
        assert_eq!(normalize_alias_name("d111.cloudfront.net"), "d111.cloudfront.net");
    }

    #[test]
    fn txt_values_are_quoted() {
        let values = vec!["v=spf1 -all".to_string()];
        assert_eq!(
            expand_record_values(&values, RecordType::Txt),
            vec!["\"v=spf1 -all\"".to_string()]
        );
        assert_eq!(expand_record_values(&values, RecordType::A), values);
    }

    #[test]
    fn quoted_txt_value_passes_through() {
        let values = vec!["\"already\" \"split\"".to_string()];
        assert_eq!(expand_record_values(&values, RecordType::Txt), values);
    }

    #[test]
    fn long_txt_value_is_chunked() {
        let long = "a".repeat(300);
        let expanded = expand_record_values(&[long.clone()], RecordType::Txt);
        let expected = format!("\"{}\" \"{}\"", "a".repeat(255), "a".repeat(45));
        assert_eq!(expanded, vec![expected]);
        assert_eq!(flatten_record_values(&expanded, RecordType::Txt), vec![long]);
    }

    #[test]
    fn chunking_respects_char_boundaries() {
        // 254 个 ASCII + 一个 2 字节字符，不能在字符中间切分
        let value = format!("{}é", "a".repeat(254));
        let chunks = split_on_char_boundary(&value, TXT_CHUNK_LEN);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 254);
        assert_eq!(chunks[1], "é");
    }

    #[test]
    fn flatten_unescapes_quotes() {
        let values = vec!["\"say \\\"hi\\\"\"".to_string()];
        assert_eq!(
            flatten_record_values(&values, RecordType::Spf),
            vec!["say \"hi\"".to_string()]
        );
    }

    #[test]
    fn txt_with_quotes_survives_expand_and_flatten() {
        let values = vec!["key=\"value\"".to_string()];
        let expanded = expand_record_values(&values, RecordType::Txt);
        assert_eq!(expanded, vec!["\"key=\\\"value\\\"\"".to_string()]);
        assert_eq!(flatten_record_values(&expanded, RecordType::Txt), values);
    }
}
