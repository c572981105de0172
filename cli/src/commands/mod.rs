use sengi::config::Config;
use sengi::db::EngineDb;
use sengi::error::Result;

pub struct AppContext<'a> {
    pub db: &'a EngineDb,
    pub config: &'a Config,
}

pub mod import_export;
pub mod misc;

pub trait SengiCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn SengiCommand>)
pub enum CommandEnum {
    Import(import_export::ImportCommand),
    Export(import_export::ExportCommand),
    ExportAll(import_export::ExportAllCommand),
    ExportCustom(import_export::ExportCustomCommand),
    List(misc::ListCommand),
    Show(misc::ShowCommand),
    Remove(misc::RemoveCommand),
    Open(misc::OpenCommand),
}

impl CommandEnum {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            Self::Import(cmd) => cmd.execute(ctx),
            Self::Export(cmd) => cmd.execute(ctx),
            Self::ExportAll(cmd) => cmd.execute(ctx),
            Self::ExportCustom(cmd) => cmd.execute(ctx),
            Self::List(cmd) => cmd.execute(ctx),
            Self::Show(cmd) => cmd.execute(ctx),
            Self::Remove(cmd) => cmd.execute(ctx),
            Self::Open(cmd) => cmd.execute(ctx),
        }
    }
}
