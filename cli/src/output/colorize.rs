use owo_colors::OwoColorize;
use sengi::db::StoredEngine;

pub trait Colorize {
    fn to_colored(&self) -> String;
    fn to_plain(&self) -> String;
}

pub struct ColorizeEngine<'a>(pub &'a StoredEngine);

impl<'a> Colorize for ColorizeEngine<'a> {
    fn to_colored(&self) -> String {
        let mut s = String::new();
        let id = self.0.id.to_string();
        let builtin = if self.0.builtin { " [builtin]" } else { "" };
        s.push_str(&format!(
            "{}. {}{}\n",
            id.bright_blue(),
            self.0.descriptor.name.bold().green(),
            builtin.dimmed(),
        ));
        let padding = id.len() + 3;
        // padding for alignment
        s.push_str(&format!(
            "{:>padding$} {}\n",
            ">".red(),
            self.0.descriptor.search_url.yellow()
        ));

        // Only show description if non-empty
        if !self.0.descriptor.description.trim().is_empty() {
            s.push_str(&format!(
                "{:>padding$} {}\n",
                "+".red(),
                self.0.descriptor.description
            ));
        }
        s
    }

    fn to_plain(&self) -> String {
        let mut s = String::new();
        let id = self.0.id.to_string();
        let builtin = if self.0.builtin { " [builtin]" } else { "" };
        s.push_str(&format!("{}. {}{}\n", id, self.0.descriptor.name, builtin));
        let padding = id.len() + 3;
        s.push_str(&format!(
            "{:>padding$} {}\n",
            ">",
            self.0.descriptor.search_url
        ));
        if !self.0.descriptor.description.trim().is_empty() {
            s.push_str(&format!(
                "{:>padding$} {}\n",
                "+",
                self.0.descriptor.description
            ));
        }
        s
    }
}

/// Full rendering of one engine for `show`
pub fn detail(engine: &StoredEngine, color: bool) -> String {
    let wrapped = ColorizeEngine(engine);
    let mut s = if color {
        wrapped.to_colored()
    } else {
        wrapped.to_plain()
    };

    let padding = engine.id.to_string().len() + 3;
    let mut field = |label: &str, value: &str| {
        s.push_str(&format!("{:>padding$} {}: {}\n", "·", label, value));
    };

    field("method", &engine.descriptor.method);
    for param in &engine.descriptor.params {
        field("param", &format!("{}={}", param.name, param.value));
    }
    if let Some(suggest) = &engine.descriptor.suggest_url {
        field("suggestions", suggest);
    }
    if let Some(encoding) = &engine.descriptor.input_encoding {
        field("encoding", encoding);
    }
    if let Some(form) = &engine.descriptor.search_form {
        field("search form", form);
    }
    if engine.descriptor.icon.is_some() {
        field("icon", "yes");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use sengi::db::EngineDb;
    use sengi::models::engine::EngineDescriptor;

    fn stored(name: &str, builtin: bool) -> StoredEngine {
        let db = EngineDb::init_in_memory().unwrap();
        let mut engine = EngineDescriptor::new(name, "https://example.com/?q={searchTerms}");
        engine.description = "An example engine".to_string();
        db.add_engine(&engine, builtin).unwrap();
        db.get_engine(name).unwrap().unwrap()
    }

    #[test]
    fn test_colorized_line_contains_name_and_url() {
        let engine = stored("Example", false);
        let out = ColorizeEngine(&engine).to_colored();
        assert!(out.contains("Example"));
        assert!(out.contains("https://example.com/?q={searchTerms}"));
        assert!(out.contains("An example engine"));
        assert!(!out.contains("[builtin]"));
    }

    #[test]
    fn test_builtin_marker() {
        let engine = stored("Seeded", true);
        assert!(ColorizeEngine(&engine).to_plain().contains("[builtin]"));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let engine = stored("Example", false);
        assert!(!ColorizeEngine(&engine).to_plain().contains('\x1b'));
    }

    #[test]
    fn test_detail_lists_method() {
        let engine = stored("Example", false);
        let out = detail(&engine, false);
        assert!(out.contains("method: GET"));
    }
}
