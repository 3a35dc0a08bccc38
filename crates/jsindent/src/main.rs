//! jsindent - A JavaScript indentation checker with auto-fix support.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jsindent_config::{ConfigLoader, MergedConfig};
use jsindent_diagnostics::Applicability;
use jsindent_linter::{LintError, LintResult, Linter, RuleRegistry, fix_source};
use jsindent_source_file::{LineIndex, SourceCode};
use rayon::prelude::*;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "jsindent")]
#[command(about = "A JavaScript indentation checker with auto-fix support", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for indentation errors
    Check {
        /// Paths to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Path to an ESLint JSON config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Indentation unit, overriding the config: a width or `tab`
        #[arg(long, value_parser = parse_indent)]
        indent: Option<Value>,
    },
    /// Fix indentation in files
    Fix {
        /// Paths to fix
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Path to an ESLint JSON config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Indentation unit, overriding the config: a width or `tab`
        #[arg(long, value_parser = parse_indent)]
        indent: Option<Value>,

        /// Show diff without applying fixes
        #[arg(long)]
        diff: bool,

        /// Apply unsafe fixes
        #[arg(long)]
        r#unsafe: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let has_violations = match cli.command {
        Commands::Check {
            paths,
            config,
            indent,
        } => run_check(&paths, config.as_deref(), indent)?,
        Commands::Fix {
            paths,
            config,
            indent,
            diff,
            r#unsafe: allow_unsafe,
        } => run_fix(&paths, config.as_deref(), indent, diff, allow_unsafe)?,
    };

    if has_violations {
        std::process::exit(1);
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_indent(value: &str) -> Result<Value, String> {
    if value == "tab" {
        return Ok(json!("tab"));
    }
    value
        .parse::<u32>()
        .map(|width| json!(width))
        .map_err(|_| format!("expected a number of spaces or `tab`, got `{value}`"))
}

/// What one file produced: diagnostic lines and counts.
#[derive(Debug, Default)]
struct FileReport {
    lines: Vec<String>,
    violations: usize,
    fixable: usize,
    fixed: usize,
    changed: bool,
    diff: Option<String>,
}

/// Run the check command. Returns whether any violation was found.
fn run_check(paths: &[PathBuf], config_path: Option<&Path>, indent: Option<Value>) -> Result<bool> {
    let (linter, config) = load_linter(config_path, indent)?;

    if linter.is_empty() {
        eprintln!("{}", "Warning: No rules configured".yellow());
        return Ok(false);
    }

    let files = collect_js_files(paths, &config.extensions);
    eprintln!(
        "Checking {} file(s) with: {}",
        files.len(),
        linter.rule_names().collect::<Vec<_>>().join(", ")
    );

    let reports = files
        .par_iter()
        .map(|path| check_file(path, &linter))
        .collect::<Result<Vec<_>>>()?;

    let mut total_violations = 0;
    let mut total_fixable = 0;
    for report in &reports {
        for line in &report.lines {
            println!("{line}");
        }
        total_violations += report.violations;
        total_fixable += report.fixable;
    }

    if total_violations > 0 {
        println!(
            "\nFound {} violations ({} fixable)",
            total_violations.to_string().red(),
            total_fixable.to_string().yellow()
        );
        Ok(true)
    } else {
        println!("{}", "No violations found".green());
        Ok(false)
    }
}

/// Run the fix command. Returns whether violations remain.
fn run_fix(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    indent: Option<Value>,
    diff_only: bool,
    allow_unsafe: bool,
) -> Result<bool> {
    let (linter, config) = load_linter(config_path, indent)?;

    if linter.is_empty() {
        eprintln!("{}", "Warning: No rules configured".yellow());
        return Ok(false);
    }

    let applicability = if allow_unsafe || config.unsafe_fixes {
        Applicability::Unsafe
    } else {
        Applicability::Safe
    };

    let files = collect_js_files(paths, &config.extensions);
    eprintln!(
        "Fixing {} file(s) with: {}",
        files.len(),
        linter.rule_names().collect::<Vec<_>>().join(", ")
    );

    let reports = files
        .par_iter()
        .map(|path| fix_file(path, &linter, applicability, diff_only))
        .collect::<Result<Vec<_>>>()?;

    let mut total_fixed = 0;
    let mut total_remaining = 0;
    let mut files_changed = 0;
    for report in &reports {
        if let Some(diff) = &report.diff {
            print!("{diff}");
        }
        for line in &report.lines {
            println!("{line}");
        }
        total_fixed += report.fixed;
        total_remaining += report.violations;
        if report.changed {
            files_changed += 1;
        }
    }

    if diff_only {
        println!(
            "\n{} fix(es) available in {} file(s)",
            total_fixed.to_string().green(),
            files_changed
        );
    } else if total_fixed > 0 {
        println!(
            "\n{} fix(es) applied in {} file(s)",
            total_fixed.to_string().green(),
            files_changed
        );
    } else {
        println!("{}", "No fixes to apply".green());
    }

    if total_remaining > 0 {
        eprintln!(
            "{} violation(s) could not be fixed automatically",
            total_remaining.to_string().yellow()
        );
    }

    Ok(total_remaining > 0)
}

fn check_file(path: &Path, linter: &Linter) -> Result<FileReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let Some(result) = lint_or_skip(path, linter.lint(&source))? else {
        return Ok(FileReport::default());
    };

    Ok(FileReport {
        lines: format_diagnostics(path, &source, &result),
        violations: result.len(),
        fixable: result.fixable().count(),
        ..FileReport::default()
    })
}

/// Fix a single file, writing it back unless `diff_only` is set.
fn fix_file(
    path: &Path,
    linter: &Linter,
    applicability: Applicability,
    diff_only: bool,
) -> Result<FileReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let Some(outcome) = lint_or_skip(path, fix_source(linter, &source, applicability))? else {
        return Ok(FileReport::default());
    };

    let mut report = FileReport {
        lines: format_diagnostics(path, &outcome.source, &outcome.remaining),
        violations: outcome.remaining.len(),
        fixed: outcome.fixed,
        changed: outcome.changed(),
        ..FileReport::default()
    };

    if !report.changed {
        return Ok(report);
    }

    if diff_only {
        report.diff = Some(render_diff(path, &source, &outcome.source)?);
    } else {
        std::fs::write(path, &outcome.source)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!(
            "{}: {} fix(es) applied in {} pass(es)",
            path.display(),
            outcome.fixed,
            outcome.passes
        );
    }

    Ok(report)
}

/// A file that does not parse is reported and skipped; other failures abort.
fn lint_or_skip<T>(path: &Path, result: Result<T, LintError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ LintError::Syntax { .. }) => {
            eprintln!("{}: {}", path.display(), err.to_string().red());
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("Failed to lint {}", path.display())),
    }
}

fn format_diagnostics(path: &Path, source: &str, result: &LintResult) -> Vec<String> {
    let line_index = LineIndex::from_source_text(source);
    let source_code = SourceCode::new(source, &line_index);

    result
        .diagnostics
        .iter()
        .map(|d| {
            let loc = source_code.line_column(d.diagnostic.range.start());
            format!(
                "{}:{}:{}: {} {}",
                path.display(),
                loc.line.get(),
                loc.column.get(),
                format!("[{}]", d.rule).blue(),
                d.diagnostic.kind.body
            )
        })
        .collect()
}

/// Render a unified-style diff between original and fixed source.
fn render_diff(path: &Path, original: &str, fixed: &str) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    writeln!(output, "--- a/{}", path.display())?;
    writeln!(output, "+++ b/{}", path.display())?;

    // Fixes only rewrite leading whitespace, so lines pair up one to one.
    let original_lines: Vec<&str> = original.lines().collect();
    let fixed_lines: Vec<&str> = fixed.lines().collect();

    let mut hunk = Hunk::default();
    // Unchanged lines since the last change, kept as leading context.
    let mut recent: VecDeque<&str> = VecDeque::with_capacity(DIFF_CONTEXT);
    for i in 0..original_lines.len().max(fixed_lines.len()) {
        match (original_lines.get(i), fixed_lines.get(i)) {
            (Some(&o), Some(&f)) if o == f => {
                if hunk.is_open() {
                    hunk.context(o);
                    if hunk.trailing_context > 2 * DIFF_CONTEXT {
                        hunk.flush(&mut output)?;
                    }
                }
                if recent.len() == DIFF_CONTEXT {
                    recent.pop_front();
                }
                recent.push_back(o);
            }
            (o, f) => {
                if !hunk.is_open() {
                    hunk.open(i + 1 - recent.len(), &recent);
                }
                recent.clear();
                if let Some(o) = o {
                    hunk.removed(o);
                }
                if let Some(f) = f {
                    hunk.added(f);
                }
            }
        }
    }
    hunk.flush(&mut output)?;

    Ok(output)
}

/// Unchanged lines shown around each change.
const DIFF_CONTEXT: usize = 3;

#[derive(Default)]
struct Hunk {
    start: Option<usize>,
    lines: Vec<String>,
    old_len: usize,
    new_len: usize,
    trailing_context: usize,
}

impl Hunk {
    fn is_open(&self) -> bool {
        self.start.is_some()
    }

    fn open(&mut self, line: usize, leading: &VecDeque<&str>) {
        self.start = Some(line);
        for context in leading {
            self.context(context);
        }
    }

    fn context(&mut self, line: &str) {
        self.lines.push(format!(" {line}"));
        self.old_len += 1;
        self.new_len += 1;
        self.trailing_context += 1;
    }

    fn removed(&mut self, line: &str) {
        self.lines.push(format!("{}{line}", "-".red()));
        self.old_len += 1;
        self.trailing_context = 0;
    }

    fn added(&mut self, line: &str) {
        self.lines.push(format!("{}{line}", "+".green()));
        self.new_len += 1;
        self.trailing_context = 0;
    }

    /// Write the hunk, keeping at most [`DIFF_CONTEXT`] lines after the last change.
    fn flush(&mut self, output: &mut String) -> std::fmt::Result {
        let Some(start) = self.start.take() else {
            return Ok(());
        };
        let extra = self.trailing_context.saturating_sub(DIFF_CONTEXT);
        self.lines.truncate(self.lines.len() - extra);

        writeln!(
            output,
            "@@ -{start},{} +{start},{} @@",
            self.old_len - extra,
            self.new_len - extra
        )?;
        for line in self.lines.drain(..) {
            writeln!(output, "{line}")?;
        }
        self.old_len = 0;
        self.new_len = 0;
        self.trailing_context = 0;
        Ok(())
    }
}

/// Build the linter from the discovered configuration.
fn load_linter(config_path: Option<&Path>, indent: Option<Value>) -> Result<(Linter, MergedConfig)> {
    let mut config = load_config(config_path)?;

    if let Some(indent) = indent {
        let mut options = config
            .get_rule("indent")
            .map(|rule| rule.options.clone())
            .unwrap_or_default();
        match options.first_mut() {
            Some(first) => *first = indent,
            None => options.push(indent),
        }
        config.override_options("indent", options);
    }

    let linter = Linter::from_config(&config, &RuleRegistry::builtin())
        .context("Invalid rule configuration")?;
    Ok((linter, config))
}

/// Load `jsindent.toml` and the ESLint config from the working directory.
fn load_config(config_path: Option<&Path>) -> Result<MergedConfig> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;

    let mut loader = ConfigLoader::new().find_overlay(&cwd).find_eslint(&cwd);
    if let Some(path) = config_path {
        loader = loader.eslint(path);
    }
    let config = loader.load().context("Failed to load configuration")?;

    if config.sources.is_empty() {
        eprintln!(
            "{}",
            "No .eslintrc.json found, using default indent rule".yellow()
        );
    }
    for source in &config.sources {
        eprintln!("Loaded config from: {}", source.display());
    }

    Ok(config)
}

/// Files named on the command line, plus every file under named directories
/// whose extension is in `extensions`. Sorted so output is stable.
fn collect_js_files(paths: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let matches = |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
    };

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file() && matches(e.path()))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            eprintln!("{}: {} not found", "Warning".yellow(), path.display());
        }
    }
    files.sort();
    files.dedup();
    files
}
