use rand::{Rng, distr::Alphanumeric};

/// Lower-cases and keeps only `[a-z0-9_-]`.
pub fn sanitize_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Free-text sanitizer: strips tags and percent-encoded octets, collapses
/// whitespace (line breaks and tabs included) and trims.
pub fn sanitize_text_field(raw: &str) -> String {
    let stripped = strip_octets(&strip_tags(raw));
    collapse_whitespace(&stripped)
}

/// Strict login sanitizer. Keeps `[A-Za-z0-9 _.@-]` once tags, entities and
/// octets are gone.
pub fn sanitize_user(raw: &str) -> String {
    let stripped = strip_entities(&strip_octets(&strip_tags(raw)));
    let kept: String = stripped
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '@' | '-'))
        .collect();
    collapse_whitespace(&kept)
}

/// Slug form of a login, used as the nicename of guest authors.
pub fn sanitize_title(raw: &str) -> String {
    let dashed = collapse_whitespace(&strip_tags(raw)).replace([' ', '.', '@'], "-");
    sanitize_key(&dashed)
}

pub fn is_email(raw: &str) -> bool {
    if raw.len() < 6 || raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| {
            !l.is_empty()
                && !l.starts_with('-')
                && !l.ends_with('-')
                && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

const URL_SCHEMES: [&str; 6] = ["http", "https", "ftp", "ftps", "mailto", "news"];

/// Cleans a URL for storage. Whitespace and control characters are removed,
/// a missing scheme becomes `http://` and unknown schemes yield an empty
/// string.
pub fn normalize_url(raw: &str) -> String {
    let url: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '<' | '>' | '"' | '\\'))
        .collect();
    if url.is_empty() || url.starts_with(['/', '#', '?']) {
        return url;
    }

    let scheme = url.split_once(':').map(|(scheme, _)| scheme).filter(|scheme| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-'))
    });
    match scheme {
        Some(scheme) if URL_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) => url,
        Some(_) => String::new(),
        None => format!("http://{}", url),
    }
}

/// Splits a comma-separated list, sanitizing each fragment as free text and
/// dropping the empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(sanitize_text_field)
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn strip_octets(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%'
            && i + 2 < chars.len()
            && chars[i + 1].is_ascii_hexdigit()
            && chars[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn strip_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';') {
            Some(end)
                if end > 1
                    && tail[1..end]
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '#') =>
            {
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Random alphanumeric bearer token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
