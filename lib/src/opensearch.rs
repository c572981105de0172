//! OpenSearch description document codec.
//!
//! Parses descriptor XML into [`EngineDescriptor`] and serializes it back.
//! Accepts both `OpenSearchDescription` and the legacy `SearchPlugin` root,
//! with or without namespace prefixes on child elements.

use crate::error::{Result, SengiError};
use crate::models::engine::{EngineDescriptor, EngineParam};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

const OPENSEARCH_NS: &str = "http://a9.com/-/spec/opensearch/1.1/";
const MOZ_NS: &str = "http://www.mozilla.org/2006/browser/search/";

const HTML_URL_TYPE: &str = "text/html";
const SUGGESTIONS_URL_TYPE: &str = "application/x-suggestions+json";

/// Text-bearing element the parser is currently inside
#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    Name,
    Description,
    InputEncoding,
    Image,
    SearchForm,
}

/// Parse one OpenSearch description document.
///
/// Fails with `Xml` on malformed input and `MissingField` when ShortName
/// or a usable text/html Url template is absent.
pub fn parse_descriptor(bytes: &[u8]) -> Result<EngineDescriptor> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut name = String::new();
    let mut description = String::new();
    let mut input_encoding = String::new();
    let mut icon = String::new();
    let mut search_form = String::new();
    let mut search_url: Option<String> = None;
    let mut method = "GET".to_string();
    let mut params: Vec<EngineParam> = Vec::new();
    let mut suggest_url: Option<String> = None;

    let mut field = Field::None;
    let mut saw_root = false;
    let mut in_html_url = false;
    let mut buf = Vec::new();

    loop {
        let ev = reader.read_event_into(&mut buf)?;
        match ev {
            Event::Start(ref e) | Event::Empty(ref e) => {
                // Self-closing elements cannot carry Param children
                let has_children = matches!(ev, Event::Start(_));
                let local = e.local_name();
                if !saw_root {
                    match local.as_ref() {
                        b"OpenSearchDescription" | b"SearchPlugin" => saw_root = true,
                        other => {
                            return Err(SengiError::Xml(format!(
                                "unexpected root element <{}>, not an OpenSearch description",
                                String::from_utf8_lossy(other)
                            )))
                        }
                    }
                    buf.clear();
                    continue;
                }

                match local.as_ref() {
                    b"ShortName" if has_children => field = Field::Name,
                    b"Description" if has_children => field = Field::Description,
                    b"InputEncoding" if has_children => field = Field::InputEncoding,
                    b"Image" if has_children => field = Field::Image,
                    b"SearchForm" if has_children => field = Field::SearchForm,
                    b"Url" => {
                        let mut url_type = String::new();
                        let mut template = String::new();
                        let mut url_method = String::new();
                        for attr in e.attributes() {
                            let attr = attr?;
                            let value = attr.unescape_value()?;
                            match attr.key.local_name().as_ref() {
                                b"type" => url_type = value.into_owned(),
                                b"template" => template = value.into_owned(),
                                b"method" => url_method = value.into_owned(),
                                _ => {}
                            }
                        }

                        // Only the first text/html Url counts; duplicates in
                        // the wild carry rel="results" variants of the same URL.
                        if url_type == HTML_URL_TYPE && search_url.is_none() {
                            if !template.is_empty() {
                                search_url = Some(template);
                            }
                            if !url_method.is_empty() {
                                method = url_method.to_ascii_uppercase();
                            }
                            in_html_url = has_children;
                        } else if url_type == SUGGESTIONS_URL_TYPE
                            && suggest_url.is_none()
                            && !template.is_empty()
                        {
                            suggest_url = Some(template);
                        }
                    }
                    b"Param" if in_html_url => {
                        let mut p_name = String::new();
                        let mut p_value = String::new();
                        for attr in e.attributes() {
                            let attr = attr?;
                            let value = attr.unescape_value()?;
                            match attr.key.local_name().as_ref() {
                                b"name" => p_name = value.into_owned(),
                                b"value" => p_value = value.into_owned(),
                                _ => {}
                            }
                        }
                        if !p_name.is_empty() {
                            params.push(EngineParam {
                                name: p_name,
                                value: p_value,
                            });
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                let target = match field {
                    Field::Name => Some(&mut name),
                    Field::Description => Some(&mut description),
                    Field::InputEncoding => Some(&mut input_encoding),
                    Field::Image => Some(&mut icon),
                    Field::SearchForm => Some(&mut search_form),
                    Field::None => None,
                };
                if let Some(target) = target {
                    target.push_str(&text);
                }
            }
            Event::CData(e) => {
                if field == Field::Image {
                    icon.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"Url" {
                    in_html_url = false;
                }
                field = Field::None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(SengiError::Xml("empty document".to_string()));
    }
    if name.trim().is_empty() {
        return Err(SengiError::MissingField("ShortName"));
    }
    let search_url = search_url.ok_or(SengiError::MissingField("Url"))?;

    Ok(EngineDescriptor {
        name: name.trim().to_string(),
        description: description.trim().to_string(),
        search_url,
        method,
        params,
        suggest_url,
        icon: non_empty(icon),
        input_encoding: non_empty(input_encoding),
        search_form: non_empty(search_form),
    })
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Serialize a descriptor to OpenSearch description XML.
pub fn serialize_descriptor(descriptor: &EngineDescriptor) -> Result<String> {
    if descriptor.name.trim().is_empty() {
        return Err(SengiError::Serialize("engine has no name".to_string()));
    }
    if descriptor.search_url.trim().is_empty() {
        return Err(SengiError::Serialize(format!(
            "engine '{}' has no search URL template",
            descriptor.name
        )));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("OpenSearchDescription");
    root.push_attribute(("xmlns", OPENSEARCH_NS));
    if descriptor.search_form.is_some() {
        root.push_attribute(("xmlns:moz", MOZ_NS));
    }
    write(&mut writer, Event::Start(root))?;

    text_element(&mut writer, "ShortName", &descriptor.name)?;
    if !descriptor.description.is_empty() {
        text_element(&mut writer, "Description", &descriptor.description)?;
    }
    if let Some(encoding) = &descriptor.input_encoding {
        text_element(&mut writer, "InputEncoding", encoding)?;
    }
    if let Some(icon) = &descriptor.icon {
        let mut image = BytesStart::new("Image");
        image.push_attribute(("width", "16"));
        image.push_attribute(("height", "16"));
        write(&mut writer, Event::Start(image))?;
        write(&mut writer, Event::Text(BytesText::new(icon)))?;
        write(&mut writer, Event::End(BytesEnd::new("Image")))?;
    }

    let mut url = BytesStart::new("Url");
    url.push_attribute(("type", HTML_URL_TYPE));
    url.push_attribute(("method", descriptor.method.as_str()));
    url.push_attribute(("template", descriptor.search_url.as_str()));
    if descriptor.params.is_empty() {
        write(&mut writer, Event::Empty(url))?;
    } else {
        write(&mut writer, Event::Start(url))?;
        for param in &descriptor.params {
            let mut p = BytesStart::new("Param");
            p.push_attribute(("name", param.name.as_str()));
            p.push_attribute(("value", param.value.as_str()));
            write(&mut writer, Event::Empty(p))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("Url")))?;
    }

    if let Some(suggest) = &descriptor.suggest_url {
        let mut url = BytesStart::new("Url");
        url.push_attribute(("type", SUGGESTIONS_URL_TYPE));
        url.push_attribute(("method", "GET"));
        url.push_attribute(("template", suggest.as_str()));
        write(&mut writer, Event::Empty(url))?;
    }

    if let Some(form) = &descriptor.search_form {
        text_element(&mut writer, "moz:SearchForm", form)?;
    }

    write(&mut writer, Event::End(BytesEnd::new("OpenSearchDescription")))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| SengiError::Serialize(e.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SengiError::Serialize(e.to_string()))
}

fn text_element(writer: &mut Writer<Vec<u8>>, tag: &str, value: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(tag)))?;
    write(writer, Event::Text(BytesText::new(value)))?;
    write(writer, Event::End(BytesEnd::new(tag)))
}
