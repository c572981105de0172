use crate::browser;
use crate::db::{EngineDb, StoredEngine};
use crate::error::{Result, SengiError};

/// Which registered engines an operation acts on
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSelection {
    /// Every registered engine
    All,
    /// Only user-imported engines (non-builtin)
    Custom,
    /// Engines named explicitly, in the given order
    ByNames(Vec<String>),
}

/// Look up a single engine, failing with `EngineNotFound` when absent.
pub fn find_engine(db: &EngineDb, name: &str) -> Result<StoredEngine> {
    db.get_engine(name)?
        .ok_or_else(|| SengiError::EngineNotFound(name.to_string()))
}

/// Resolve a selection to concrete registry rows.
///
/// `All` and `Custom` come back in registry order; `ByNames` in the order
/// the names were given, failing on the first unknown name.
pub fn resolve_engines(db: &EngineDb, selection: &EngineSelection) -> Result<Vec<StoredEngine>> {
    match selection {
        EngineSelection::All => db.get_all(),
        EngineSelection::Custom => db.get_custom(),
        EngineSelection::ByNames(names) => {
            let mut engines = Vec::with_capacity(names.len());
            for name in names {
                engines.push(find_engine(db, name)?);
            }
            Ok(engines)
        }
    }
}

/// Run a search: build the engine's concrete URL for `query` and open it
/// in the default browser. Returns the URL that was opened.
pub fn open_search(db: &EngineDb, name: &str, query: &str) -> Result<String> {
    let engine = find_engine(db, name)?;
    if engine.descriptor.method.eq_ignore_ascii_case("POST") {
        return Err(SengiError::InvalidInput(format!(
            "engine '{}' submits searches via POST and cannot be opened as a URL",
            engine.descriptor.name
        )));
    }

    let url = engine.descriptor.search_url_for(query);
    browser::open_url(&url)?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::EngineDescriptor;

    fn db_with(names_builtin: &[(&str, bool)]) -> EngineDb {
        let db = EngineDb::init_in_memory().unwrap();
        for (name, builtin) in names_builtin {
            let engine =
                EngineDescriptor::new(name, "https://example.com/?q={searchTerms}");
            db.add_engine(&engine, *builtin).unwrap();
        }
        db
    }

    #[test]
    fn test_find_engine_missing() {
        let db = db_with(&[("Alpha", false)]);
        match find_engine(&db, "Nope") {
            Err(SengiError::EngineNotFound(name)) => assert_eq!(name, "Nope"),
            other => panic!("expected EngineNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_all_and_custom() {
        let db = db_with(&[("Default", true), ("Mine", false), ("Also Mine", false)]);

        let all = resolve_engines(&db, &EngineSelection::All).unwrap();
        assert_eq!(all.len(), 3);

        let custom = resolve_engines(&db, &EngineSelection::Custom).unwrap();
        let names: Vec<&str> = custom.iter().map(|e| e.descriptor.name.as_str()).collect();
        assert_eq!(names, ["Mine", "Also Mine"]);
    }

    #[test]
    fn test_resolve_by_names_keeps_given_order() {
        let db = db_with(&[("Alpha", false), ("Bravo", false)]);

        let selection =
            EngineSelection::ByNames(vec!["Bravo".to_string(), "Alpha".to_string()]);
        let engines = resolve_engines(&db, &selection).unwrap();
        let names: Vec<&str> = engines.iter().map(|e| e.descriptor.name.as_str()).collect();
        assert_eq!(names, ["Bravo", "Alpha"]);
    }

    #[test]
    fn test_resolve_by_names_fails_on_unknown() {
        let db = db_with(&[("Alpha", false)]);
        let selection =
            EngineSelection::ByNames(vec!["Alpha".to_string(), "Ghost".to_string()]);
        assert!(matches!(
            resolve_engines(&db, &selection),
            Err(SengiError::EngineNotFound(_))
        ));
    }
}
