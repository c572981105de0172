use crate::error::{Result, SengiError};
use crate::models::engine::EngineDescriptor;
use crate::opensearch;
use reqwest::blocking::Client;
use tl::ParserOptions;

/// MIME type a page uses to advertise an OpenSearch descriptor
pub const DESCRIPTOR_CONTENT_TYPE: &str = "application/opensearchdescription+xml";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) \
    Version/18.5 Safari/605.1.15";

/// Fetch a search-engine descriptor from `url`.
///
/// If the response body is a descriptor document it is parsed directly.
/// Otherwise the body is treated as an HTML page and scanned for a
/// `<link rel="search" type="application/opensearchdescription+xml">`
/// advertisement, whose target is fetched and parsed instead.
pub fn fetch_descriptor(url: &str, user_agent: Option<&str>) -> Result<EngineDescriptor> {
    let ua = user_agent.unwrap_or(USER_AGENT);
    let client = Client::builder().user_agent(ua).build()?;

    let (final_url, body) = fetch_bytes(&client, url)?;

    match opensearch::parse_descriptor(&body) {
        Ok(descriptor) => Ok(descriptor),
        Err(descriptor_err) => {
            let html = String::from_utf8_lossy(&body);
            let links = discover_descriptor_links(&html, &final_url)?;
            let link = links.into_iter().next().ok_or_else(|| {
                SengiError::Other(format!(
                    "no OpenSearch descriptor at {} ({})",
                    url, descriptor_err
                ))
            })?;

            log::debug!("following descriptor link {}", link);
            let (_, body) = fetch_bytes(&client, &link)?;
            opensearch::parse_descriptor(&body)
        }
    }
}

fn fetch_bytes(client: &Client, url: &str) -> Result<(String, Vec<u8>)> {
    let resp = client.get(url).send()?;

    let status = resp.status();
    if !status.is_success() {
        // Provide helpful error messages based on status code
        let error_msg = match status.as_u16() {
            403 => {
                "HTTP 403 Forbidden - This is often caused by user-agent blocking.\n\
                 Try customizing the user-agent in ~/.config/sengi/config.yml"
            }
            401 => "HTTP 401 Unauthorized - The website is blocking your request",
            404 => "HTTP 404 Not Found - The URL does not exist",
            429 => "HTTP 429 Too Many Requests - You are being rate limited",
            500..=599 => "HTTP 5xx Server Error - The website is experiencing issues",
            _ => "HTTP request failed with non-success status",
        };
        return Err(SengiError::Other(format!(
            "{} (Status: {})",
            error_msg, status
        )));
    }

    let final_url = resp.url().to_string();
    let body = resp.bytes()?.to_vec();
    Ok((final_url, body))
}

/// Extract descriptor URLs advertised by an HTML page, resolved against
/// `base_url`, in document order.
pub fn discover_descriptor_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let dom = tl::parse(html, ParserOptions::default())?;
    let parser = dom.parser();

    let mut links = Vec::new();
    let handles = match dom.query_selector("link") {
        Some(handles) => handles,
        None => return Ok(links),
    };

    for handle in handles {
        let node = match handle.get(parser) {
            Some(node) => node,
            None => continue,
        };
        let tag = match node.as_tag() {
            Some(tag) => tag,
            None => continue,
        };

        let attr = |name: &str| {
            tag.attributes()
                .get(name)
                .flatten()
                .map(|v| v.as_utf8_str().to_string())
        };

        let rel = attr("rel").unwrap_or_default();
        let link_type = attr("type").unwrap_or_default();
        if !rel.eq_ignore_ascii_case("search") || link_type != DESCRIPTOR_CONTENT_TYPE {
            continue;
        }

        if let Some(href) = attr("href") {
            links.push(resolve_href(base_url, &href));
        }
    }

    Ok(links)
}

/// Resolve a possibly-relative href against the page URL it came from.
pub fn resolve_href(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    let (scheme, rest) = match base_url.split_once("://") {
        Some(parts) => parts,
        None => return href.to_string(),
    };
    let host = rest.split('/').next().unwrap_or(rest);

    if let Some(tail) = href.strip_prefix("//") {
        return format!("{}://{}", scheme, tail);
    }
    if href.starts_with('/') {
        return format!("{}://{}{}", scheme, host, href);
    }

    // Relative to the page's directory
    let base_dir = match base_url.rfind('/') {
        Some(pos) if pos > scheme.len() + 2 => &base_url[..pos],
        _ => base_url,
    };
    format!("{}/{}", base_dir, href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_discover_single_link() {
        let html = r#"<!DOCTYPE html>
        <html><head>
            <title>Example</title>
            <link rel="search" type="application/opensearchdescription+xml"
                  title="Example Search" href="/opensearch.xml">
        </head><body></body></html>"#;

        let links = discover_descriptor_links(html, "https://example.com/page").unwrap();
        assert_eq!(links, ["https://example.com/opensearch.xml"]);
    }

    #[test]
    fn test_discover_keeps_document_order() {
        let html = r#"<html><head>
            <link rel="search" type="application/opensearchdescription+xml" href="https://a.example.com/a.xml">
            <link rel="search" type="application/opensearchdescription+xml" href="https://b.example.com/b.xml">
        </head></html>"#;

        let links = discover_descriptor_links(html, "https://example.com/").unwrap();
        assert_eq!(
            links,
            ["https://a.example.com/a.xml", "https://b.example.com/b.xml"]
        );
    }

    #[rstest]
    #[case(r#"<link rel="stylesheet" href="/style.css">"#)]
    #[case(r#"<link rel="search" type="text/html" href="/search">"#)]
    #[case(r#"<link rel="search" type="application/opensearchdescription+xml">"#)]
    #[case("<html><head><title>No links</title></head></html>")]
    #[case("")]
    fn test_discover_ignores_non_descriptor_links(#[case] html: &str) {
        let links = discover_descriptor_links(html, "https://example.com/").unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_discover_rel_is_case_insensitive() {
        let html =
            r#"<link rel="SEARCH" type="application/opensearchdescription+xml" href="/os.xml">"#;
        let links = discover_descriptor_links(html, "https://example.com/").unwrap();
        assert_eq!(links, ["https://example.com/os.xml"]);
    }

    #[rstest]
    #[case("https://example.com/page", "https://other.org/x.xml", "https://other.org/x.xml")]
    #[case("https://example.com/page", "/opensearch.xml", "https://example.com/opensearch.xml")]
    #[case("https://example.com/a/b/page", "os.xml", "https://example.com/a/b/os.xml")]
    #[case("https://example.com/page", "//cdn.example.com/os.xml", "https://cdn.example.com/os.xml")]
    #[case("http://example.com", "/os.xml", "http://example.com/os.xml")]
    fn test_resolve_href(#[case] base: &str, #[case] href: &str, #[case] expected: &str) {
        assert_eq!(resolve_href(base, href), expected);
    }
}
