use super::print::{preview_prompt, print_messages, print_notebooks, print_notice, print_page};
use super::setup::{init_logging, Cli, Commands, ExportKind};
use clap::Parser;
use console::Term;
use directories::ProjectDirs;
use flexi_logger::LoggerHandle;
use log::debug;
use quire::api::QuireApi;
use quire::commands::pages::DestructivePreview;
use quire::commands::{CmdMessage, Confirmation};
use quire::config::QuireConfig;
use quire::error::{QuireError, Result};
use quire::index::PageIndex;
use quire::slot::fs::FsSlot;
use std::io::Read;
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "QUIRE_HOME";

struct AppContext {
    api: QuireApi<FsSlot>,
    data_dir: PathBuf,
    config: QuireConfig,
    _logger: LoggerHandle,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        None | Some(Commands::List) => handle_list(&mut ctx),
        Some(Commands::New { name }) => handle_new(&mut ctx, name.join(" ")),
        Some(Commands::Select { notebook }) => handle_select(&mut ctx, &notebook),
        Some(Commands::View { page }) => handle_view(&mut ctx, &page),
        Some(Commands::Save {
            page,
            date,
            time,
            title,
            content,
        }) => handle_save(&mut ctx, &page, date, time, title, content),
        Some(Commands::Clear { page, yes }) => handle_clear(&mut ctx, &page, yes),
        Some(Commands::Erase { yes }) => handle_erase(&mut ctx, yes),
        Some(Commands::Export { format, output }) => handle_export(&mut ctx, format, output),
        Some(Commands::Import { file }) => handle_import(&mut ctx, &file),
        Some(Commands::Size) => handle_size(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "quire", "quire")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            QuireError::Api(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = QuireConfig::load(&data_dir)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let logger = init_logging(level)?;
    debug!(
        "event=cli_start module=cli status=ok data_dir={} slot={}",
        data_dir.display(),
        config.slot_key
    );

    let api = QuireApi::open(FsSlot::new(data_dir.clone()), config.slot_key.clone())?
        .with_date_format(config.date_format.clone());
    if let Some(message) = api.load_message() {
        print_notice(&message);
    }

    Ok(AppContext {
        api,
        data_dir,
        config,
        _logger: logger,
    })
}

fn handle_list(ctx: &mut AppContext) -> Result<()> {
    print_notebooks(&ctx.api.list_notebooks());
    Ok(())
}

fn handle_new(ctx: &mut AppContext, name: String) -> Result<()> {
    let result = ctx.api.create_notebook(&name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_select(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let id = ctx
        .api
        .resolve_notebook(selector)
        .ok_or_else(|| QuireError::Api(format!("No notebook matches '{}'", selector)))?;
    let result = ctx.api.select_notebook(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, page: &str) -> Result<()> {
    ctx.api.goto(PageIndex::parse_lenient(page))?;
    let status = ctx.api.status_line()?;
    print_page(&status, ctx.api.page(), ctx.api.buffer());
    Ok(())
}

fn handle_save(
    ctx: &mut AppContext,
    page: &str,
    date: Option<String>,
    time: Option<String>,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let content = match content.as_deref() {
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        _ => content,
    };

    ctx.api.goto(PageIndex::parse_lenient(page))?;
    let buffer = ctx.api.buffer_mut();
    if let Some(date) = date {
        buffer.date = date;
    }
    if let Some(time) = time {
        buffer.time = time;
    }
    if let Some(title) = title {
        buffer.title = title;
    }
    if let Some(content) = content {
        buffer.content = content;
    }

    let result = ctx.api.save_page()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, page: &str, yes: bool) -> Result<()> {
    ctx.api.goto(PageIndex::parse_lenient(page))?;
    let preview = ctx.api.preview_clear()?;
    let confirmation = confirm("Clear", &preview, yes)?;
    let result = ctx.api.clear_page(confirmation)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_erase(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let preview = ctx.api.preview_erase()?;
    let confirmation = confirm("Erase", &preview, yes)?;
    let result = ctx.api.erase_notebook(confirmation)?;
    print_messages(&result.messages);
    Ok(())
}

/// Ask on the terminal unless `--yes` was given. Without a terminal the
/// answer is no.
fn confirm(action: &str, preview: &DestructivePreview, yes: bool) -> Result<Confirmation> {
    if yes {
        return Ok(Confirmation::Confirmed);
    }
    let term = Term::stdout();
    if !term.is_term() {
        return Ok(Confirmation::Declined);
    }
    term.write_str(&preview_prompt(action, preview))?;
    let answer = term.read_line()?;
    Ok(Confirmation::from(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    )))
}

fn handle_export(ctx: &mut AppContext, format: ExportKind, output: Option<String>) -> Result<()> {
    let artifact = match format {
        ExportKind::Csv => ctx.api.export_csv()?,
        ExportKind::Json => ctx.api.export_json()?,
    };

    match output.as_deref() {
        Some("-") => print!("{}", artifact.content),
        other => {
            let path = other
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&artifact.filename));
            write_file(&path, &artifact.content)?;
            debug!(
                "event=export module=cli status=ok format={} path={}",
                artifact.format.mime_type(),
                path.display()
            );
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &str) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let result = ctx.api.import_json(&text)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_size(ctx: &mut AppContext) -> Result<()> {
    println!(
        "{} ({})",
        ctx.api.size_info(),
        ctx.api.repository().location()
    );
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in QuireConfig::KEYS {
                if let Some(value) = ctx.config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
        (Some(key), None) => match ctx.config.get(&key) {
            Some(value) => println!("{}", value),
            None => return Err(QuireError::Api(format!("Unknown config key: {}", key))),
        },
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value).map_err(QuireError::Api)?;
            ctx.config.save(&ctx.data_dir)?;
            print_messages(&[CmdMessage::success(format!(
                "{} set to {}",
                key,
                ctx.config.get(&key).unwrap_or_default()
            ))]);
        }
    }
    Ok(())
}
