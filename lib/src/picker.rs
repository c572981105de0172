use crate::db::StoredEngine;
use crate::error::{Result, SengiError};
use nucleo_picker::{Picker, Render};

/// Wrapper for rendering engines in the picker
/// Stores only the slice index and display string, the engine is looked
/// up after selection
struct EngineItem {
    index: usize,
    display: String,
}

impl EngineItem {
    fn new(index: usize, engine: &StoredEngine, max_id_width: usize) -> Self {
        // Format with fixed-width ID section to ensure visibility
        // Bold cyan ID | name | search URL
        let id_section = format!(
            "\x1b[1;36m[{:>width$}]\x1b[0m",
            engine.id,
            width = max_id_width
        );

        let max_url_len = 80;
        let url = &engine.descriptor.search_url;
        let url_display = if url.len() > max_url_len {
            &url[..max_url_len]
        } else {
            url
        };

        let display = format!("{} {} | {}", id_section, engine.descriptor.name, url_display);

        Self { index, display }
    }
}

/// Renderer for engine items
struct EngineRenderer;

impl Render<EngineItem> for EngineRenderer {
    type Str<'a> = &'a str;

    fn render<'a>(&self, item: &'a EngineItem) -> Self::Str<'a> {
        &item.display
    }
}

/// Interactively pick one engine. `Ok(None)` means the user cancelled,
/// which callers treat as a silent no-op.
pub fn pick_engine(engines: &[StoredEngine]) -> Result<Option<StoredEngine>> {
    if engines.is_empty() {
        return Ok(None);
    }

    // Calculate the width needed for the largest ID
    let max_id_width = engines
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);

    let mut picker = Picker::new(EngineRenderer);

    let injector = picker.injector();
    for (index, engine) in engines.iter().enumerate() {
        injector.push(EngineItem::new(index, engine, max_id_width));
    }

    match picker.pick() {
        Ok(Some(item)) => Ok(engines.get(item.index).cloned()),
        Ok(None) => Ok(None),
        Err(e) => Err(SengiError::Picker(e.to_string())),
    }
}
