//! Line-oriented terminal session over a [`Controller`].

use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::deep_link;
use crate::export_sink::{SaveTarget, pick_import_file};
use crate::fasta::load_fasta_text;
use crate::gateway::Gateway;
use crate::genomes::GenomeCatalog;
use crate::session::SessionStatus;
use itertools::Itertools;
use silica_protocol::{JobParameters, SAMPLE_FASTA, SAMPLE_GENOME};
use silica_render::text::full_text;
use silica_render::{Collection, ExportFormat};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOADING_TEXT: &str = "Analysis takes a couple of seconds to run, please be patient.";
pub const IDLE_TEXT: &str =
    "No results loaded. Use 'submit', 'retrieve', 'open' or 'import' to load a result set.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Status,
    Show(Collection),
    PageDown(Collection),
    PageUp(Collection),
    Retrieve { identifier: String },
    Open { location: String },
    Submit {
        payload: String,
        fasta: Option<String>,
        sample: bool,
    },
    /// `None` asks through a file dialog.
    Import { path: Option<String> },
    Export { format: ExportFormat },
    Genomes,
    Quit,
}

pub fn shell_help_text() -> &'static str {
    "Silica shell commands:\n\
help\n\
status\n\
show amplicons|primers\n\
amp-up | amp-down | primer-up | primer-down\n\
retrieve IDENTIFIER\n\
open RESULT-LINK\n\
submit <parameters-json-or-@file> [--fasta FILE] [--sample]\n\
import [FILE]\n\
export json|amplicons|primers\n\
genomes\n\
quit"
}

fn token_error(command: &str) -> String {
    format!("Invalid '{command}' usage. Try: help")
}

fn single_arg(tokens: &[String]) -> Result<String, String> {
    if tokens.len() == 2 {
        Ok(tokens[1].clone())
    } else {
        Err(token_error(&tokens[0]))
    }
}

fn no_args(tokens: &[String], command: ShellCommand) -> Result<ShellCommand, String> {
    if tokens.len() == 1 {
        Ok(command)
    } else {
        Err(token_error(&tokens[0]))
    }
}

pub fn parse_shell_tokens(tokens: &[String]) -> Result<ShellCommand, String> {
    if tokens.is_empty() {
        return Err("Missing shell command".to_string());
    }
    let cmd = tokens[0].as_str();
    match cmd {
        "help" | "-h" | "--help" => Ok(ShellCommand::Help),
        "status" => no_args(tokens, ShellCommand::Status),
        "quit" | "exit" => no_args(tokens, ShellCommand::Quit),
        "genomes" => no_args(tokens, ShellCommand::Genomes),
        "amp-down" => no_args(tokens, ShellCommand::PageDown(Collection::Amplicons)),
        "amp-up" => no_args(tokens, ShellCommand::PageUp(Collection::Amplicons)),
        "primer-down" => no_args(tokens, ShellCommand::PageDown(Collection::Primers)),
        "primer-up" => no_args(tokens, ShellCommand::PageUp(Collection::Primers)),
        "show" => {
            let name = single_arg(tokens)?;
            Collection::parse(&name)
                .map(ShellCommand::Show)
                .ok_or_else(|| format!("Unknown collection '{name}', expected 'amplicons' or 'primers'"))
        }
        "retrieve" => Ok(ShellCommand::Retrieve {
            identifier: single_arg(tokens)?,
        }),
        "open" => Ok(ShellCommand::Open {
            location: single_arg(tokens)?,
        }),
        "import" => match tokens.len() {
            1 => Ok(ShellCommand::Import { path: None }),
            2 => Ok(ShellCommand::Import {
                path: Some(tokens[1].clone()),
            }),
            _ => Err(token_error(cmd)),
        },
        "export" => {
            let name = single_arg(tokens)?;
            ExportFormat::parse(&name)
                .map(|format| ShellCommand::Export { format })
                .ok_or_else(|| {
                    format!("Unknown export format '{name}', expected json, amplicons or primers")
                })
        }
        "submit" => {
            let mut fasta = None;
            let mut sample = false;
            let mut parts = vec![];
            let mut idx = 1usize;
            while idx < tokens.len() {
                match tokens[idx].as_str() {
                    "--sample" => {
                        sample = true;
                        idx += 1;
                    }
                    "--fasta" => {
                        if idx + 1 >= tokens.len() {
                            return Err("Missing value after --fasta".to_string());
                        }
                        fasta = Some(tokens[idx + 1].clone());
                        idx += 2;
                    }
                    other => {
                        parts.push(other.to_string());
                        idx += 1;
                    }
                }
            }
            let payload = parts.join(" ");
            if payload.trim().is_empty() {
                return Err("Missing job parameters JSON".to_string());
            }
            Ok(ShellCommand::Submit {
                payload,
                fasta,
                sample,
            })
        }
        other => Err(format!("Unknown shell command '{other}'. Try: help")),
    }
}

pub fn parse_shell_line(line: &str) -> Result<ShellCommand, String> {
    let tokens = split_shell_words(line)?;
    parse_shell_tokens(&tokens)
}

pub fn split_shell_words(line: &str) -> Result<Vec<String>, String> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Normal,
        SingleQuoted,
        DoubleQuoted,
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut mode = Mode::Normal;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (mode, ch) {
            (Mode::Normal, '\'') => mode = Mode::SingleQuoted,
            (Mode::Normal, '"') => mode = Mode::DoubleQuoted,
            (Mode::Normal | Mode::DoubleQuoted, '\\') => current.extend(chars.next()),
            (Mode::Normal, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            (Mode::SingleQuoted, '\'') | (Mode::DoubleQuoted, '"') => mode = Mode::Normal,
            (_, c) => current.push(c),
        }
    }

    if mode != Mode::Normal {
        return Err("Unterminated quoted string in shell command".to_string());
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        return Err("Empty shell command".to_string());
    }
    Ok(out)
}

/// Inline JSON, or `@path` to read it from a file.
pub fn load_json_arg(raw: &str) -> Result<String, String> {
    if let Some(path) = raw.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(raw.to_string())
    }
}

/// Build job parameters from their JSON, optionally replacing the primers
/// with a FASTA file or the whole input with the sample primer pair.
pub fn prepare_job(payload: &str, fasta: Option<&Path>, sample: bool) -> Result<JobParameters, String> {
    let text = load_json_arg(payload)?;
    let mut params =
        JobParameters::from_json_str(&text).map_err(|e| format!("Invalid job parameters: {e}"))?;
    if let Some(path) = fasta {
        params.fasta_text = load_fasta_text(path)?;
    }
    if sample {
        params.fasta_text = SAMPLE_FASTA.to_string();
        params.genome = SAMPLE_GENOME.to_string();
    }
    Ok(params)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRunResult {
    pub output: String,
    pub quit: bool,
}

impl ShellRunResult {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// Everything a terminal session works on.
pub struct ShellContext<G: Gateway + 'static> {
    pub controller: Controller<G>,
    pub config: ClientConfig,
    pub catalog: GenomeCatalog,
    pub save_target: SaveTarget,
    /// Tab picked with `show`; `None` follows the view's default.
    pub tab: Option<Collection>,
}

impl<G: Gateway + 'static> ShellContext<G> {
    pub fn new(controller: Controller<G>, config: ClientConfig, catalog: GenomeCatalog) -> Self {
        let save_target = SaveTarget::Directory(config.export_dir.clone());
        Self {
            controller,
            config,
            catalog,
            save_target,
            tab: None,
        }
    }

    /// The panel for the current session state.
    pub fn status_text(&self) -> String {
        match self.controller.session().status() {
            SessionStatus::Idle => IDLE_TEXT.to_string(),
            SessionStatus::Loading => LOADING_TEXT.to_string(),
            SessionStatus::Failed(message) => format!("Error: {message}"),
            SessionStatus::Loaded(_) => match self.controller.view(&self.config, &self.catalog) {
                Some(view) => full_text(&view, self.tab.unwrap_or(view.active)),
                None => IDLE_TEXT.to_string(),
            },
        }
    }

    fn settle(&mut self) -> ShellRunResult {
        self.tab = None;
        self.controller.wait_settled();
        ShellRunResult::text(self.status_text())
    }

    fn page_result(&self, moved: bool) -> ShellRunResult {
        if moved {
            ShellRunResult::text(self.status_text())
        } else {
            ShellRunResult::text("Already at the edge of this collection.")
        }
    }

    pub fn execute(&mut self, command: &ShellCommand) -> Result<ShellRunResult, String> {
        let result = match command {
            ShellCommand::Help => ShellRunResult::text(shell_help_text()),
            ShellCommand::Status => ShellRunResult::text(self.status_text()),
            ShellCommand::Quit => ShellRunResult {
                output: String::new(),
                quit: true,
            },
            ShellCommand::Show(collection) => {
                self.tab = Some(*collection);
                ShellRunResult::text(self.status_text())
            }
            ShellCommand::PageDown(collection) => {
                let moved = self.controller.page_down(*collection);
                self.tab = Some(*collection);
                self.page_result(moved)
            }
            ShellCommand::PageUp(collection) => {
                let moved = self.controller.page_up(*collection);
                self.tab = Some(*collection);
                self.page_result(moved)
            }
            ShellCommand::Retrieve { identifier } => {
                self.controller.retrieve(identifier);
                self.settle()
            }
            ShellCommand::Open { location } => {
                if deep_link::bootstrap(&mut self.controller, Some(location.as_str())).is_none() {
                    return Err(format!("No result identifier in '{location}'"));
                }
                self.settle()
            }
            ShellCommand::Submit {
                payload,
                fasta,
                sample,
            } => {
                let params = prepare_job(payload, fasta.as_deref().map(Path::new), *sample)?;
                self.controller.submit(params);
                self.settle()
            }
            ShellCommand::Import { path } => {
                let path = match path {
                    Some(path) => PathBuf::from(path),
                    None => match pick_import_file(&self.config.export_dir) {
                        Some(path) => path,
                        None => return Ok(ShellRunResult::text("No file selected.")),
                    },
                };
                self.controller
                    .import_json_file(&path)
                    .map_err(|e| e.to_string())?;
                self.tab = None;
                ShellRunResult::text(self.status_text())
            }
            ShellCommand::Export { format } => match self.controller.export(*format) {
                None => ShellRunResult::text("Nothing to export: no results loaded."),
                Some(encoded) => {
                    let contents = encoded.map_err(|e| e.to_string())?;
                    let file_name = self.config.export_names.file_name(*format);
                    match self
                        .save_target
                        .save(file_name, &contents)
                        .map_err(|e| e.to_string())?
                    {
                        Some(path) => ShellRunResult::text(format!("Saved '{}'", path.display())),
                        None => ShellRunResult::text("Export cancelled."),
                    }
                }
            },
            ShellCommand::Genomes => {
                let index = self
                    .controller
                    .gateway()
                    .genome_index()
                    .map_err(|e| e.to_string())?;
                let text = index
                    .iter()
                    .map(|entry| format!("{}\t{}", entry.name, entry.file))
                    .join("\n");
                ShellRunResult::text(text)
            }
        };
        Ok(result)
    }

    pub fn execute_line(&mut self, line: &str) -> Result<ShellRunResult, String> {
        let command = parse_shell_line(line)?;
        self.execute(&command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{TableGateway, params, sample_payload};
    use tempfile::tempdir;

    fn context(td: &Path) -> ShellContext<TableGateway> {
        let mut gateway = TableGateway::default();
        gateway
            .results
            .insert("abc123".to_string(), Ok(sample_payload("abc123", 45, 0)));
        gateway.results.insert(
            format!("submit:{SAMPLE_GENOME}"),
            Ok(sample_payload("job9", 2, 2)),
        );
        let config = ClientConfig {
            export_dir: td.to_path_buf(),
            ..ClientConfig::default()
        };
        ShellContext::new(Controller::new(gateway), config, GenomeCatalog::default())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_shell_line("amp-down").unwrap(), ShellCommand::PageDown(Collection::Amplicons));
        assert_eq!(parse_shell_line("show primers").unwrap(), ShellCommand::Show(Collection::Primers));
        assert_eq!(
            parse_shell_line("export amplicons").unwrap(),
            ShellCommand::Export {
                format: ExportFormat::AmpliconTable
            }
        );
        assert_eq!(parse_shell_line("import").unwrap(), ShellCommand::Import { path: None });
        assert!(parse_shell_line("export xml").is_err());
        assert!(parse_shell_line("retrieve").is_err());
        assert!(parse_shell_line("amp-down 3").is_err());
        assert!(parse_shell_line("   ").is_err());
    }

    #[test]
    fn test_parse_submit_keeps_json_and_flags() {
        let cmd = parse_shell_line(r#"submit '{"genome": "x"}' --fasta primers.fa --sample"#).unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Submit {
                payload: r#"{"genome": "x"}"#.to_string(),
                fasta: Some("primers.fa".to_string()),
                sample: true,
            }
        );
        assert!(parse_shell_line("submit --sample").is_err());
        assert!(parse_shell_line("submit @p.json --fasta").is_err());
    }

    #[test]
    fn test_split_words_quotes() {
        assert_eq!(
            split_shell_words(r#"import "my results.json""#).unwrap(),
            vec!["import".to_string(), "my results.json".to_string()]
        );
        assert!(split_shell_words("import 'open").is_err());
    }

    #[test]
    fn test_retrieve_page_and_export() {
        let td = tempdir().unwrap();
        let mut ctx = context(td.path());
        assert_eq!(ctx.status_text(), IDLE_TEXT);
        assert_eq!(
            ctx.execute_line("export json").unwrap().output,
            "Nothing to export: no results loaded."
        );

        let out = ctx.execute_line("retrieve abc123").unwrap().output;
        assert!(out.contains("[ok] 45 Amplicons Found!"));
        assert!(out.contains("Amplicons 1-30 of 45"));

        let out = ctx.execute_line("amp-down").unwrap().output;
        assert!(out.contains("Amplicons 31-45 of 45"));
        assert_eq!(
            ctx.execute_line("amp-down").unwrap().output,
            "Already at the edge of this collection."
        );

        let out = ctx.execute_line("export amplicons").unwrap().output;
        assert!(out.starts_with("Saved"));
        let table = fs::read_to_string(td.path().join("silica_amplicons.tsv")).unwrap();
        assert_eq!(table.lines().count(), 46);
    }

    #[test]
    fn test_empty_amplicons_default_to_primer_tab() {
        let td = tempdir().unwrap();
        let mut ctx = context(td.path());
        ctx.controller
            .import_json_str(&silica_render::export_json(&sample_payload("p", 0, 3)).unwrap())
            .unwrap();
        let out = ctx.execute_line("status").unwrap().output;
        assert!(out.contains("No Amplicons Found!"));
        assert!(out.contains("Primer binding sites 1-3 of 3"));
    }

    #[test]
    fn test_failed_retrieval_shows_error_panel() {
        let td = tempdir().unwrap();
        let mut ctx = context(td.path());
        let out = ctx.execute_line("retrieve gone").unwrap().output;
        assert_eq!(out, "Error: Link outdated or invalid!");
    }

    #[test]
    fn test_open_link_and_reimport_export() {
        let td = tempdir().unwrap();
        let mut ctx = context(td.path());
        assert!(ctx.execute_line("open http://0.0.0.0:3300/index.html").is_err());
        let before = ctx
            .execute_line("open http://0.0.0.0:3300/index.html?UUID=abc123")
            .unwrap()
            .output;
        ctx.execute_line("export json").unwrap();

        let mut other = context(td.path());
        let path = td.path().join("silica.json");
        let after = other
            .execute_line(&format!("import '{}'", path.display()))
            .unwrap()
            .output;
        assert_eq!(before, after);
        assert!(other.execute_line("import /no/such/file.json").is_err());
        assert_eq!(other.status_text(), after);
    }

    #[test]
    fn test_open_without_identifier_reports_notice() {
        let td = tempdir().unwrap();
        let mut ctx = context(td.path());
        let open = ShellCommand::Open {
            location: "http://0.0.0.0:3300/index.html?id=abc123".to_string(),
        };
        assert_eq!(
            ctx.execute(&open).unwrap_err(),
            "No result identifier in 'http://0.0.0.0:3300/index.html?id=abc123'"
        );
        assert_eq!(ctx.status_text(), IDLE_TEXT);
        assert!(ctx.controller.gateway().calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_submit_with_sample_and_fasta() {
        let td = tempdir().unwrap();
        let params_path = td.path().join("params.json");
        let mut p = params();
        p.genome = "Other.fa.gz".to_string();
        fs::write(&params_path, serde_json::to_string(&p).unwrap()).unwrap();

        let job = prepare_job(&format!("@{}", params_path.display()), None, true).unwrap();
        assert_eq!(job.genome, SAMPLE_GENOME);
        assert_eq!(job.fasta_text, SAMPLE_FASTA);

        let fasta_path = td.path().join("p.fa");
        fs::write(&fasta_path, ">x\r\nACGT\r\n").unwrap();
        let job = prepare_job(&format!("@{}", params_path.display()), Some(&fasta_path), false).unwrap();
        assert_eq!(job.fasta_text, ">x\nACGT\n");
        assert!(prepare_job("{}", None, false).is_err());

        let mut ctx = context(td.path());
        let out = ctx
            .execute_line(&format!("submit @{} --sample", params_path.display()))
            .unwrap()
            .output;
        assert!(out.contains("[ok] 2 Amplicons Found!"));
        assert!(out.contains("index.html?UUID=job9"));
    }

    #[test]
    fn test_genomes_and_quit() {
        let td = tempdir().unwrap();
        let mut ctx = context(td.path());
        let out = ctx.execute_line("genomes").unwrap().output;
        assert!(out.contains(SAMPLE_GENOME));
        assert!(ctx.execute_line("quit").unwrap().quit);
    }
}
