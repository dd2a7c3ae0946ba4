use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tooldesk_codec::{
    compact_json, decode_base64, encode_base64, format_json, format_xml, xml_to_json,
};
use tooldesk_settings::{ConfigStore, SettingsUpdate, SystemInfo};
use tooldesk_workspace::{expand_home, Entry, Response, ToolScope, WorkspaceStore};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "TOOLDESK_LOG";

#[derive(Parser)]
#[command(
    name = "tooldesk-cli",
    about = "Workspace and conversion commands for ToolDesk",
    author,
    version
)]
struct Cli {
    /// 設定檔路徑；預設為平台設定資料夾。 / Config file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// 本次執行使用的工作區根目錄，不寫回設定。 / Workspace root for this run; not persisted.
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<String>,
    /// 以 JSON 回應格式輸出。 / Print results as a JSON response envelope.
    #[arg(long, global = true)]
    json: bool,
    /// 輸出除錯記錄。 / Emit debug logs on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Workspace(WorkspaceCommand),
    /// 使用者設定。 / User settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// 顯示版本資訊。 / Show build information.
    Info,
}

/// Commands that need an open workspace.
#[derive(Subcommand)]
enum WorkspaceCommand {
    /// 顯示或變更工作區根目錄。 / Show or change the workspace root.
    #[command(subcommand)]
    Root(RootCommand),
    /// 列出工具資料夾內容。 / List the tree of a tool scope.
    Ls {
        #[arg(value_name = "TOOL")]
        tool: ToolScope,
    },
    /// 建立新檔案。 / Create a file, suffixing the name on collision.
    NewFile(CreateArgs),
    /// 建立新資料夾。 / Create a folder, suffixing the name on collision.
    NewFolder(CreateArgs),
    /// 重新命名。 / Rename a file or folder in place.
    Rename {
        path: String,
        new_name: String,
    },
    /// 刪除檔案或資料夾。 / Delete a file or a folder with its contents.
    Rm { path: String },
    /// 複製到指定位置。 / Copy to a destination path.
    Cp { src: String, dst: String },
    /// 在原處建立副本。 / Duplicate next to the original.
    Dup { src: String },
    /// 移動到資料夾。 / Move into an existing folder.
    Mv { src: String, dest_dir: String },
    /// 輸出檔案內容。 / Print a file.
    Cat { path: String },
    /// 寫入檔案內容。 / Write a file from --content or stdin.
    Write {
        path: String,
        #[arg(long, value_name = "TEXT")]
        content: Option<String>,
    },
    /// 跨工具搜尋文字。 / Case-insensitive search across every tool scope.
    Search { query: String },
    /// XML 工具。 / XML tools.
    #[command(subcommand)]
    Xml(XmlCommand),
    /// JSON 工具。 / JSON tools.
    #[command(subcommand)]
    Json(JsonCommand),
    /// Base64 工具。 / Base64 tools.
    #[command(subcommand)]
    Base64(Base64Command),
}

#[derive(Subcommand)]
enum RootCommand {
    Show,
    /// 切換並儲存新的根目錄。 / Switch to and persist a new root.
    Set {
        #[arg(value_name = "DIR")]
        dir: String,
    },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(value_name = "TOOL")]
    tool: ToolScope,
    name: String,
    /// 上層資料夾；預設為工具資料夾。 / Parent folder; defaults to the tool scope.
    #[arg(long, value_name = "PATH", default_value = "")]
    parent: String,
}

/// `FILE` is a workspace path, or `-` for stdin.
#[derive(Subcommand)]
enum XmlCommand {
    /// 重新縮排。 / Re-indent with two spaces.
    Format { file: String },
    /// 轉為 JSON。 / Convert to structural JSON.
    ToJson { file: String },
}

#[derive(Subcommand)]
enum JsonCommand {
    Format { file: String },
    Compact { file: String },
}

#[derive(Subcommand)]
enum Base64Command {
    Encode { file: String },
    Decode { file: String },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    /// 僅更新有提供的欄位。 / Update only the provided fields.
    Set(SettingsSetArgs),
}

#[derive(Args)]
struct SettingsSetArgs {
    #[arg(long)]
    theme: Option<String>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long, value_name = "true|false")]
    auto_save: Option<bool>,
    #[arg(long, value_name = "N")]
    font_size: Option<u32>,
    #[arg(long, value_name = "FAMILY")]
    font_family: Option<String>,
}

impl From<SettingsSetArgs> for SettingsUpdate {
    fn from(args: SettingsSetArgs) -> Self {
        SettingsUpdate {
            theme: args.theme,
            language: args.language,
            auto_save: args.auto_save,
            editor_font_size: args.font_size,
            editor_font_family: args.font_family,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        config,
        root,
        json,
        verbose,
        command,
    } = Cli::parse();
    init_logging(verbose);
    let reporter = Reporter { json };

    let mut settings = match config {
        Some(path) => ConfigStore::load(path),
        None => ConfigStore::load_default()?,
    };

    match command {
        Commands::Settings(subcommand) => execute_settings(subcommand, &mut settings, &reporter),
        Commands::Info => reporter.report(Ok::<_, anyhow::Error>(SystemInfo::current()), |info| {
            println!(
                "{} {} ({}/{}), license {}",
                info.name, info.version, info.platform, info.arch, info.license
            )
        }),
        Commands::Workspace(command) => {
            let root = match root {
                Some(root) => expand_home(&root),
                None => settings.storage_path_or_init()?,
            };
            tracing::debug!(
                root = %root.display(),
                config = %settings.path().display(),
                "opening workspace"
            );
            let mut store = WorkspaceStore::open(&root)
                .with_context(|| format!("open workspace {}", root.display()))?;
            execute_workspace(command, &mut store, &mut settings, &reporter)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Prints results either as plain text or as a [`Response`] envelope.
struct Reporter {
    json: bool,
}

impl Reporter {
    fn report<T, E>(&self, result: Result<T, E>, render: impl FnOnce(&T)) -> Result<()>
    where
        T: Serialize,
        E: Into<anyhow::Error>,
    {
        let result = result.map_err(Into::into);
        if !self.json {
            return result.map(|data| render(&data));
        }
        match result {
            Ok(data) => {
                print_json(&Response::ok(data))?;
                Ok(())
            }
            Err(err) => {
                print_json(&Response::<T>::failure(format!("{err:#}")))?;
                Err(err)
            }
        }
    }
}

fn print_json<T: Serialize>(response: &Response<T>) -> Result<()> {
    let text = serde_json::to_string_pretty(response).context("serialize response")?;
    println!("{text}");
    Ok(())
}

fn execute_workspace(
    command: WorkspaceCommand,
    store: &mut WorkspaceStore,
    settings: &mut ConfigStore,
    reporter: &Reporter,
) -> Result<()> {
    match command {
        WorkspaceCommand::Root(RootCommand::Show) => {
            let root = store.root().display().to_string();
            reporter.report(Ok::<_, anyhow::Error>(root), |root| println!("{root}"))
        }
        WorkspaceCommand::Root(RootCommand::Set { dir }) => {
            let result = set_root(store, settings, &dir);
            reporter.report(result, |root| println!("Workspace root set to {root}"))
        }
        WorkspaceCommand::Ls { tool } => reporter.report(store.list(tool), |entries| {
            if entries.is_empty() {
                println!("(empty)");
            }
            print_tree(entries, 0);
        }),
        WorkspaceCommand::NewFile(args) => reporter.report(
            store.create_file(args.tool, &args.parent, &args.name),
            |entry| println!("Created {}", entry.id),
        ),
        WorkspaceCommand::NewFolder(args) => reporter.report(
            store.create_folder(args.tool, &args.parent, &args.name),
            |entry| println!("Created {}/", entry.id),
        ),
        WorkspaceCommand::Rename { path, new_name } => {
            reporter.report(store.rename(&path, &new_name), |placed| {
                println!("Renamed to {}", placed.id)
            })
        }
        WorkspaceCommand::Rm { path } => {
            let result = store.delete(&path).map(|()| path);
            reporter.report(result, |path| println!("Deleted {path}"))
        }
        WorkspaceCommand::Cp { src, dst } => {
            reporter.report(store.copy(&src, &dst), |placed| {
                println!("Copied to {}", placed.id)
            })
        }
        WorkspaceCommand::Dup { src } => {
            reporter.report(store.duplicate(&src), |placed| {
                println!("Duplicated as {}", placed.id)
            })
        }
        WorkspaceCommand::Mv { src, dest_dir } => {
            reporter.report(store.move_item(&src, &dest_dir), |placed| {
                println!("Moved to {}", placed.id)
            })
        }
        WorkspaceCommand::Cat { path } => {
            reporter.report(store.read(&path), |content| print!("{content}"))
        }
        WorkspaceCommand::Write { path, content } => {
            let result = match content {
                Some(content) => Ok(content),
                None => read_stdin(),
            }
            .and_then(|content| store.write(&path, &content).map_err(Into::into))
            .map(|()| path);
            reporter.report(result, |path| println!("Wrote {path}"))
        }
        WorkspaceCommand::Search { query } => {
            let hits = store.search(&query);
            reporter.report(Ok::<_, anyhow::Error>(hits), |hits| {
                if hits.is_empty() {
                    println!("No matches found.");
                }
                for hit in hits {
                    println!("{} ({} hits)", hit.file_id, hit.count);
                }
            })
        }
        WorkspaceCommand::Xml(XmlCommand::Format { file }) => {
            let result = read_input(store, &file).and_then(|xml| Ok(format_xml(&xml)?));
            reporter.report(result, |text| println!("{text}"))
        }
        WorkspaceCommand::Xml(XmlCommand::ToJson { file }) => {
            let result = read_input(store, &file).and_then(|xml| Ok(xml_to_json(&xml)?));
            reporter.report(result, |text| println!("{text}"))
        }
        WorkspaceCommand::Json(JsonCommand::Format { file }) => {
            let result = read_input(store, &file).and_then(|json| Ok(format_json(&json)?));
            reporter.report(result, |text| println!("{text}"))
        }
        WorkspaceCommand::Json(JsonCommand::Compact { file }) => {
            let result = read_input(store, &file).and_then(|json| Ok(compact_json(&json)?));
            reporter.report(result, |text| println!("{text}"))
        }
        WorkspaceCommand::Base64(Base64Command::Encode { file }) => {
            let result = read_input(store, &file).map(|text| encode_base64(&text));
            reporter.report(result, |text| println!("{text}"))
        }
        WorkspaceCommand::Base64(Base64Command::Decode { file }) => {
            let result = read_input(store, &file).and_then(|text| Ok(decode_base64(&text)?));
            reporter.report(result, |decoded| {
                if !decoded.valid_utf8 {
                    eprintln!("warning: decoded data is not valid UTF-8; shown lossily");
                }
                print!("{}", decoded.text);
            })
        }
    }
}

fn set_root(store: &mut WorkspaceStore, settings: &mut ConfigStore, dir: &str) -> Result<String> {
    store.set_root(dir)?;
    settings.set_storage_path(store.root())?;
    Ok(store.root().display().to_string())
}

fn execute_settings(
    command: SettingsCommand,
    settings: &mut ConfigStore,
    reporter: &Reporter,
) -> Result<()> {
    let result = match command {
        SettingsCommand::Show => Ok(settings.config().user_settings()),
        SettingsCommand::Set(args) => settings
            .update(&SettingsUpdate::from(args))
            .map(|()| settings.config().user_settings()),
    };
    reporter.report(result, |user| {
        println!("theme: {}", user.theme);
        println!("language: {}", user.language);
        println!("autoSave: {}", user.auto_save);
        println!("editorFontSize: {}", user.editor_font_size);
        println!("editorFontFamily: {}", user.editor_font_family);
    })
}

fn print_tree(entries: &[Entry], depth: usize) {
    for entry in entries {
        let indent = "  ".repeat(depth);
        if entry.is_folder() {
            println!("{indent}{}/", entry.name);
            print_tree(entry.children(), depth + 1);
        } else {
            println!("{indent}{}", entry.name);
        }
    }
}

/// Reads a conversion input through the store so it stays inside the root.
fn read_input(store: &WorkspaceStore, file: &str) -> Result<String> {
    if file == "-" {
        return read_stdin();
    }
    Ok(store.read(file)?)
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("read standard input")?;
    Ok(buffer)
}
