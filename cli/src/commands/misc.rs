use super::{AppContext, SengiCommand};
use crate::output::colorize::{detail, Colorize, ColorizeEngine};
use sengi::error::Result;
use sengi::operations;
use std::io::Write as _;

#[derive(Debug, Clone)]
pub struct ListCommand {
    pub no_color: bool,
}

impl SengiCommand for ListCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let engines = ctx.db.get_all()?;
        if engines.is_empty() {
            eprintln!("No engines registered. Try 'sengi import <files>...' to add some.");
            return Ok(());
        }

        for engine in &engines {
            if self.no_color {
                print!("{}", ColorizeEngine(engine).to_plain());
            } else {
                print!("{}", ColorizeEngine(engine).to_colored());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ShowCommand {
    pub name: String,
    pub no_color: bool,
}

impl SengiCommand for ShowCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let engine = operations::find_engine(ctx.db, &self.name)?;
        print!("{}", detail(&engine, !self.no_color));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RemoveCommand {
    pub names: Vec<String>,
    pub force: bool,
}

impl SengiCommand for RemoveCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        for name in &self.names {
            let engine = match ctx.db.get_engine(name)? {
                Some(engine) => engine,
                None => {
                    eprintln!("No engine named '{}'", name);
                    continue;
                }
            };

            if !self.force
                && !confirm(&format!("Remove engine '{}'?", engine.descriptor.name))?
            {
                continue;
            }

            ctx.db.delete_engine(name)?;
            eprintln!("✓ Removed '{}'", engine.descriptor.name);
        }
        Ok(())
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} (y/N): ", prompt);
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[derive(Debug, Clone)]
pub struct OpenCommand {
    pub name: String,
    pub query: Vec<String>,
}

impl SengiCommand for OpenCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let url = operations::open_search(ctx.db, &self.name, &self.query.join(" "))?;
        eprintln!("Opening: {}", url);
        Ok(())
    }
}
