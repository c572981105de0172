use crate::error::{Result, SengiError};
use crate::models::engine::EngineDescriptor;
use crate::utils;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A registry row: a descriptor plus its bookkeeping columns.
#[derive(Debug, Clone)]
pub struct StoredEngine {
    pub id: i64,
    pub descriptor: EngineDescriptor,
    /// Seeded default engine (true) vs user-imported (false)
    pub builtin: bool,
    pub added_at: i64,
}

/// The engine registry, a single-table sqlite database.
///
/// Registration is the only mutation the import pipeline performs; the
/// pipeline runs sequentially, so no cross-connection locking is needed.
pub struct EngineDb {
    conn: Connection,
    db_path: PathBuf,
}

impl EngineDb {
    pub fn init_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        db.setup_tables()?;
        Ok(db)
    }

    pub fn init(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let db = Self {
            conn,
            db_path: db_path.to_path_buf(),
        };
        db.setup_tables()?;
        Ok(db)
    }

    /// Open an existing database without creating tables
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn,
            db_path: db_path.to_path_buf(),
        })
    }

    /// Get the database file path
    pub fn get_path(&self) -> &Path {
        &self.db_path
    }

    fn setup_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE if not exists engines (
                id integer PRIMARY KEY,
                name text NOT NULL UNIQUE COLLATE NOCASE,
                description text default '',
                search_url text NOT NULL,
                method text default 'GET',
                params text default '[]',
                suggest_url text default NULL,
                icon text default NULL,
                input_encoding text default NULL,
                search_form text default NULL,
                builtin integer default 0,
                added_at integer default 0
            )",
            [],
        )?;
        Ok(())
    }

    /// Register an engine. Fails with `DuplicateEngine` if a registered
    /// engine already uses the name, and with `Registry` if the search URL
    /// template is not an http(s) URL.
    pub fn add_engine(&self, descriptor: &EngineDescriptor, builtin: bool) -> Result<i64> {
        if !utils::is_http_url(&descriptor.search_url) {
            return Err(SengiError::Registry(format!(
                "engine '{}' has a non-http search URL template '{}'",
                descriptor.name, descriptor.search_url
            )));
        }

        let params = serde_json::to_string(&descriptor.params)?;
        let added_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let result = self.conn.execute(
            "INSERT INTO engines
                (name, description, search_url, method, params,
                 suggest_url, icon, input_encoding, search_form, builtin, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                descriptor.name,
                descriptor.description,
                descriptor.search_url,
                descriptor.method,
                params,
                descriptor.suggest_url,
                descriptor.icon,
                descriptor.input_encoding,
                descriptor.search_form,
                builtin,
                added_at,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(SengiError::DuplicateEngine(descriptor.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_engine(&self, name: &str) -> Result<Option<StoredEngine>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM engines WHERE name = ?1 COLLATE NOCASE",
            COLUMNS
        ))?;
        let mut rows = stmt.query_map([name], row_to_engine)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn get_all(&self) -> Result<Vec<StoredEngine>> {
        self.select("SELECT {} FROM engines ORDER BY id")
    }

    /// Engines the user imported, as opposed to seeded defaults
    pub fn get_custom(&self) -> Result<Vec<StoredEngine>> {
        self.select("SELECT {} FROM engines WHERE builtin = 0 ORDER BY id")
    }

    pub fn have_custom(&self) -> Result<bool> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM engines WHERE builtin = 0", [], |row| {
                    row.get(0)
                })?;
        Ok(count > 0)
    }

    /// Remove an engine by name. Returns false if no engine matched.
    pub fn delete_engine(&self, name: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM engines WHERE name = ?1 COLLATE NOCASE", [name])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM engines", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn select(&self, query_template: &str) -> Result<Vec<StoredEngine>> {
        let mut stmt = self
            .conn
            .prepare(&query_template.replace("{}", COLUMNS))?;
        let rows = stmt.query_map([], row_to_engine)?;
        let mut engines = Vec::new();
        for row in rows {
            engines.push(row?);
        }
        Ok(engines)
    }
}

const COLUMNS: &str = "id, name, description, search_url, method, params, \
                       suggest_url, icon, input_encoding, search_form, builtin, added_at";

fn row_to_engine(row: &rusqlite::Row) -> rusqlite::Result<StoredEngine> {
    let params_json: String = row.get(5)?;
    let params = serde_json::from_str(&params_json).unwrap_or_default();

    Ok(StoredEngine {
        id: row.get(0)?,
        descriptor: EngineDescriptor {
            name: row.get(1)?,
            description: row.get(2)?,
            search_url: row.get(3)?,
            method: row.get(4)?,
            params,
            suggest_url: row.get(6)?,
            icon: row.get(7)?,
            input_encoding: row.get(8)?,
            search_form: row.get(9)?,
        },
        builtin: row.get(10)?,
        added_at: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::EngineParam;

    fn sample(name: &str) -> EngineDescriptor {
        let mut engine = EngineDescriptor::new(
            name,
            &format!("https://{}.example.com/?q={{searchTerms}}", name.to_lowercase()),
        );
        engine.description = format!("Search {}", name);
        engine.params = vec![EngineParam {
            name: "src".to_string(),
            value: "test".to_string(),
        }];
        engine
    }

    #[test]
    fn test_add_and_get_roundtrip() {
        let db = EngineDb::init_in_memory().unwrap();
        let id = db.add_engine(&sample("Alpha"), false).unwrap();
        assert!(id > 0);

        let stored = db.get_engine("Alpha").unwrap().unwrap();
        assert_eq!(stored.descriptor, sample("Alpha"));
        assert!(!stored.builtin);
    }

    #[test]
    fn test_get_engine_is_case_insensitive() {
        let db = EngineDb::init_in_memory().unwrap();
        db.add_engine(&sample("Alpha"), false).unwrap();
        assert!(db.get_engine("alpha").unwrap().is_some());
        assert!(db.get_engine("ALPHA").unwrap().is_some());
        assert!(db.get_engine("beta").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let db = EngineDb::init_in_memory().unwrap();
        db.add_engine(&sample("Alpha"), false).unwrap();

        match db.add_engine(&sample("Alpha"), false) {
            Err(SengiError::DuplicateEngine(name)) => assert_eq!(name, "Alpha"),
            other => panic!("expected DuplicateEngine, got {:?}", other),
        }
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn test_non_http_template_is_rejected() {
        let db = EngineDb::init_in_memory().unwrap();
        let engine = EngineDescriptor::new("Evil", "javascript:alert(1)");
        assert!(matches!(
            db.add_engine(&engine, false),
            Err(SengiError::Registry(_))
        ));
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn test_custom_vs_builtin() {
        let db = EngineDb::init_in_memory().unwrap();
        db.add_engine(&sample("Default"), true).unwrap();
        assert!(!db.have_custom().unwrap());

        db.add_engine(&sample("Mine"), false).unwrap();
        assert!(db.have_custom().unwrap());

        let custom = db.get_custom().unwrap();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].descriptor.name, "Mine");
        assert_eq!(db.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_engine() {
        let db = EngineDb::init_in_memory().unwrap();
        db.add_engine(&sample("Alpha"), false).unwrap();

        assert!(db.delete_engine("alpha").unwrap());
        assert!(!db.delete_engine("alpha").unwrap());
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn test_get_all_preserves_insertion_order() {
        let db = EngineDb::init_in_memory().unwrap();
        for name in ["Charlie", "Alpha", "Bravo"] {
            db.add_engine(&sample(name), false).unwrap();
        }

        let names: Vec<String> = db
            .get_all()
            .unwrap()
            .into_iter()
            .map(|e| e.descriptor.name)
            .collect();
        assert_eq!(names, ["Charlie", "Alpha", "Bravo"]);
    }
}
