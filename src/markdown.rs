use regex::Regex;

/// Fields read from a post's leading `---` block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub published: Option<bool>,
}

pub fn front_matter(body: &str) -> FrontMatter {
    let block_re = Regex::new(r"\A\s*---\r?\n((?s:.*?))\r?\n---").expect("valid regex");
    let Some(block) = block_re.captures(body).and_then(|c| c.get(1)) else {
        return FrontMatter::default();
    };

    let field_re = Regex::new(r"(?m)^(title|published)[ \t]*:[ \t]*(.*?)[ \t]*\r?$").expect("valid regex");
    let mut out = FrontMatter::default();
    for caps in field_re.captures_iter(block.as_str()) {
        let value = unquote(&caps[2]);
        match &caps[1] {
            "title" if !value.is_empty() => out.title = Some(value.to_string()),
            "published" => out.published = value.parse().ok(),
            _ => {}
        }
    }
    out
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}
