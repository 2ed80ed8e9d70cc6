use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use silica::config::ClientConfig;
use silica::controller::Controller;
use silica::error::SilicaError;
use silica::export_sink::SaveTarget;
use silica::gateway::{Gateway, HttpGateway};
use silica::genomes::GenomeCatalog;
use silica::session::SessionStatus;
use silica::shell::{ShellCommand, ShellContext, prepare_job};
use silica::{about, deep_link};
use silica_render::ExportFormat;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, process};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

const LOG_VAR: &str = "SILICA_LOG";

fn usage() {
    eprintln!(
        "Usage:\n  \
  silica_cli --version\n  \
  silica_cli [OPTIONS] submit PARAMS.json [--fasta FILE] [--sample]\n  \
  silica_cli [OPTIONS] retrieve IDENTIFIER\n  \
  silica_cli [OPTIONS] open RESULT-LINK\n  \
  silica_cli [OPTIONS] import silica.json\n  \
  silica_cli [OPTIONS] genomes [--local]\n  \
  silica_cli [OPTIONS] shell [RESULT-LINK]\n\n  \
  Options:\n  \
  --api URL          service API root (env SILICA_API_URL)\n  \
  --link-base URL    result page base for permalinks (env SILICA_API_LINK)\n  \
  --export-dir DIR   where exports are written (env SILICA_EXPORT_DIR)\n  \
  --catalog PATH     genome browser catalog JSON (env SILICA_GENOME_CATALOG)\n  \
  --export FORMAT    after loading, save json|amplicons|primers|all\n  \
  --dialog           ask for export locations with a native save dialog\n  \
  --json             print the result view as JSON\n  \
  --verbose          debug logging (otherwise env SILICA_LOG, default warn)"
    );
}

#[derive(Default)]
struct Options {
    config: ClientConfig,
    exports: Vec<ExportFormat>,
    dialog: bool,
    json: bool,
    verbose: bool,
}

fn take_value<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str> {
    args.get(idx + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing value after {flag}"))
}

/// Leading options; returns them with the index of the command.
fn parse_options(args: &[String]) -> Result<(Options, usize)> {
    let mut options = Options {
        config: ClientConfig::from_env(),
        ..Options::default()
    };
    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--api" => {
                options.config.api_url = take_value(args, idx, "--api")?.to_string();
                idx += 2;
            }
            "--link-base" => {
                options.config.link_base = take_value(args, idx, "--link-base")?.to_string();
                idx += 2;
            }
            "--export-dir" => {
                options.config.export_dir = PathBuf::from(take_value(args, idx, "--export-dir")?);
                idx += 2;
            }
            "--catalog" => {
                options.config.genome_catalog = Some(take_value(args, idx, "--catalog")?.to_string());
                idx += 2;
            }
            "--export" => {
                let name = take_value(args, idx, "--export")?;
                if name == "all" {
                    options.exports = ExportFormat::ALL.to_vec();
                } else {
                    let format = ExportFormat::parse(name)
                        .ok_or_else(|| anyhow!("Unknown export format '{name}'"))?;
                    options.exports.push(format);
                }
                idx += 2;
            }
            "--dialog" => {
                options.dialog = true;
                idx += 1;
            }
            "--json" => {
                options.json = true;
                idx += 1;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
                idx += 1;
            }
            _ => break,
        }
    }
    Ok((options, idx))
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        env::var(LOG_VAR)
            .ok()
            .and_then(|v| Level::from_str(v.trim()).ok())
            .unwrap_or(Level::WARN)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Could not install log subscriber")?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

struct App<G: Gateway + 'static> {
    shell: ShellContext<G>,
    options: Options,
}

impl<G: Gateway + 'static> App<G> {
    /// Print the settled session. Fails when the request failed.
    fn report(&self) -> Result<()> {
        let shell = &self.shell;
        if let SessionStatus::Failed(message) = shell.controller.session().status() {
            bail!("{message}");
        }
        if self.options.json {
            match shell.controller.view(&shell.config, &shell.catalog) {
                Some(view) => print_json(&view)?,
                None => println!("null"),
            }
        } else {
            println!("{}", shell.status_text());
        }
        Ok(())
    }

    fn save_exports(&self) -> Result<()> {
        let shell = &self.shell;
        for format in &self.options.exports {
            let Some(encoded) = shell.controller.export(*format) else {
                eprintln!("Nothing to export: no results loaded.");
                return Ok(());
            };
            let contents = encoded?;
            let file_name = shell.config.export_names.file_name(*format);
            match shell.save_target.save(file_name, &contents)? {
                Some(path) => eprintln!("Saved '{}'", path.display()),
                None => eprintln!("Export of {file_name} cancelled"),
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.shell.controller.session().is_loading() {
            eprintln!("{}", silica::shell::LOADING_TEXT);
        }
        self.shell.controller.wait_settled();
        self.report()?;
        self.save_exports()
    }

    fn repl(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        println!("{}", self.shell.status_text());
        loop {
            print!("silica> ");
            io::stdout().flush().context("Could not write prompt")?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Could not read command")?;
            if line.trim().is_empty() {
                continue;
            }
            match self.shell.execute_line(&line) {
                Ok(result) => {
                    if result.quit {
                        break;
                    }
                    if !result.output.is_empty() {
                        println!("{}", result.output);
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        }
        Ok(())
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }
    let (options, cmd_idx) = parse_options(&args)?;
    if args.len() <= cmd_idx {
        usage();
        bail!("Missing command");
    }
    init_logging(options.verbose)?;

    let config = options.config.clone();
    debug!(api = %config.api_url, "Client configured");
    let catalog =
        GenomeCatalog::load(config.genome_catalog.as_deref()).map_err(SilicaError::Config)?;
    let gateway = HttpGateway::new(&config.api_url, config.request_timeout)?;

    let command = args[cmd_idx].as_str();
    let rest = &args[cmd_idx + 1..];

    if command == "genomes" {
        if rest.iter().any(|a| a == "--local") {
            for name in catalog.list_genomes() {
                let db = catalog.browser_db(&name).unwrap_or("-");
                println!("{name}\t{db}");
            }
        } else {
            let index = gateway.genome_index()?;
            if options.json {
                print_json(&index)?;
            } else {
                for entry in index {
                    println!("{}\t{}", entry.name, entry.file);
                }
            }
        }
        return Ok(());
    }

    let mut shell = ShellContext::new(Controller::new(gateway), config, catalog);
    shell.save_target = SaveTarget::detect(&shell.config.export_dir, options.dialog);
    let mut app = App { shell, options };

    match command {
        "submit" => {
            let mut params_path = None;
            let mut fasta = None;
            let mut sample = false;
            let mut idx = 0usize;
            while idx < rest.len() {
                match rest[idx].as_str() {
                    "--sample" => {
                        sample = true;
                        idx += 1;
                    }
                    "--fasta" => {
                        fasta = Some(PathBuf::from(
                            rest.get(idx + 1)
                                .ok_or_else(|| anyhow!("Missing value after --fasta"))?,
                        ));
                        idx += 2;
                    }
                    other => {
                        params_path = Some(other.to_string());
                        idx += 1;
                    }
                }
            }
            let Some(params_path) = params_path else {
                usage();
                bail!("Missing job parameters file for submit");
            };
            let params = prepare_job(&format!("@{params_path}"), fasta.as_deref(), sample)
                .map_err(|e| anyhow!(e))?;
            app.shell.controller.submit(params);
            app.finish()
        }
        "retrieve" => {
            let [identifier] = rest else {
                usage();
                bail!("Missing identifier for retrieve");
            };
            app.shell.controller.retrieve(identifier);
            app.finish()
        }
        "open" => {
            let [location] = rest else {
                usage();
                bail!("Missing result link for open");
            };
            deep_link::bootstrap(&mut app.shell.controller, Some(location.as_str()))
                .ok_or_else(|| anyhow!("No result identifier in '{location}'"))?;
            app.finish()
        }
        "import" => {
            let [path] = rest else {
                usage();
                bail!("Missing file for import");
            };
            app.shell.controller.import_json_file(Path::new(path))?;
            app.finish()
        }
        "shell" => {
            if let Some(location) = rest.first() {
                let open = ShellCommand::Open {
                    location: location.clone(),
                };
                if let Err(e) = app.shell.execute(&open) {
                    eprintln!("{e}");
                }
            }
            app.repl()
        }
        other => {
            usage();
            Err(anyhow!("Unknown command '{other}'"))
        }
    }
}
