use serde::{Deserialize, Serialize};

/// A single `<Param>` of an engine's search URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParam {
    pub name: String,
    pub value: String,
}

/// Parsed, in-memory representation of one search engine definition
/// (an OpenSearch description document). Not mutated after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// OpenSearch ShortName, the engine's display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Search URL template with `{searchTerms}` placeholder
    pub search_url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub params: Vec<EngineParam>,
    /// JSON suggestions URL template, if the engine provides one
    #[serde(default)]
    pub suggest_url: Option<String>,
    /// Icon location: an URL or a data: URI
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub input_encoding: Option<String>,
    /// Plain search-form URL (the engine's home page)
    #[serde(default)]
    pub search_form: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl EngineDescriptor {
    pub fn new(name: &str, search_url: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            search_url: search_url.to_string(),
            method: default_method(),
            params: Vec::new(),
            suggest_url: None,
            icon: None,
            input_encoding: None,
            search_form: None,
        }
    }

    /// Build a concrete search URL for `query`.
    ///
    /// Substitutes `{searchTerms}` (URL-encoded) and `{inputEncoding}`,
    /// drops optional `{token?}` placeholders, and appends GET params
    /// that the descriptor lists separately from the template.
    pub fn search_url_for(&self, query: &str) -> String {
        let mut url = substitute(&self.search_url, query, self.encoding());

        if self.method.eq_ignore_ascii_case("GET") && !self.params.is_empty() {
            let pairs: Vec<String> = self
                .params
                .iter()
                .map(|p| {
                    format!(
                        "{}={}",
                        p.name,
                        substitute(&p.value, query, self.encoding())
                    )
                })
                .collect();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&pairs.join("&"));
        }

        url
    }

    fn encoding(&self) -> &str {
        self.input_encoding.as_deref().unwrap_or("UTF-8")
    }
}

fn substitute(template: &str, query: &str, encoding: &str) -> String {
    let mut out = template.replace("{searchTerms}", &urlencoding::encode(query));
    out = out.replace("{inputEncoding}", encoding);

    // Optional OpenSearch tokens ({startPage?}, {language?}, ...) default
    // to the empty string when the caller has nothing to supply.
    while let Some(start) = out.find('{') {
        match out[start..].find("?}") {
            Some(rel_end) => out.replace_range(start..start + rel_end + 2, ""),
            None => break,
        }
    }

    out
}
