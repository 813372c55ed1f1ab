//! Texbox CLI
//!
//! Runs the TeX compilation server, or compiles a single document locally.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use texbox::{CompileError, CompileJob, Compiler, Config, EXAMPLE_CONFIG, Runner};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "texbox")]
#[command(about = "Compile TeX documents over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides the configuration)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Compile a document locally
    Compile {
        /// TeX source to compile
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Compiler to use (default: from configuration)
        #[arg(long)]
        compiler: Option<String>,

        /// Auxiliary file as REL=LOCAL, placed at REL beside the source
        #[arg(short, long = "file", value_name = "REL=LOCAL", value_parser = parse_file_arg)]
        files: Vec<(String, PathBuf)>,

        /// Output path (default: FILE with a .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported compilers
    Compilers,

    /// Initialize a new configuration file
    Init {
        /// Output path (default: texbox.toml)
        #[arg(short, long, default_value = "texbox.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let load_config = || -> Result<Config> {
        match cli.config {
            Some(ref path) => info!(?path, "loading configuration"),
            None => debug!("using default configuration with environment overrides"),
        }
        Config::load(cli.config.as_deref()).context("failed to load configuration")
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Serve { listen } => {
            let mut config = load_config()?;
            if let Some(addr) = listen {
                config.listen_addr = addr;
            }
            texbox::serve(config).await.context("server failed")
        }
        Commands::Compile {
            source,
            compiler,
            files,
            output,
        } => run_compile(load_config()?, &source, compiler.as_deref(), &files, output).await,
        Commands::Compilers => {
            list_compilers(&load_config()?);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&load_config()?);
            Ok(())
        }
    }
}

fn parse_file_arg(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((rel, local)) if !rel.is_empty() && !local.is_empty() => {
            Ok((rel.to_string(), PathBuf::from(local)))
        }
        _ => Err(format!("expected REL=LOCAL, got '{arg}'")),
    }
}

async fn run_compile(
    config: Config,
    source: &Path,
    compiler_id: Option<&str>,
    files: &[(String, PathBuf)],
    output: Option<PathBuf>,
) -> Result<()> {
    let compiler = config
        .get_compiler(compiler_id.unwrap_or_default())
        .context("unknown compiler")?;

    let source_content = tokio::fs::read(source)
        .await
        .with_context(|| format!("failed to read source file '{}'", source.display()))?;

    let mut job = CompileJob::new(compiler, source_content);
    for (rel, local) in files {
        let content = tokio::fs::read(local)
            .await
            .with_context(|| format!("failed to read auxiliary file '{}'", local.display()))?;
        job = job.with_file(rel.clone(), &content);
    }

    info!(%compiler, files = job.files.len(), "compiling document");

    let runner = Runner::new(config);
    let result = match runner.run_job(&job).await {
        Ok(result) => result,
        Err(CompileError::Failed { exit_code, output }) => {
            eprintln!("Compilation failed (exit code {exit_code:?})");
            if !output.is_empty() {
                eprintln!("\nCompiler output:\n{output}");
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("compilation failed"),
    };

    let output = output.unwrap_or_else(|| source.with_extension("pdf"));
    tokio::fs::write(&output, &result.artifact)
        .await
        .with_context(|| format!("failed to write '{}'", output.display()))?;

    info!(
        wall_time = format_args!("{:.3}s", result.process.wall_time.as_secs_f64()),
        bytes = result.artifact.len(),
        "compilation finished"
    );
    println!("Wrote {}", output.display());
    Ok(())
}

fn list_compilers(config: &Config) {
    println!("Available compilers:\n");

    for compiler in Compiler::ALL {
        let marker = if compiler == config.default_compiler {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<10} {}{}",
            compiler,
            config.compiler_binary(compiler).display(),
            marker
        );
    }
}

fn show_config(config: &Config) {
    println!("Listen address: {}", config.listen_addr);
    println!("Default compiler: {}", config.default_compiler);
    match config.tex_bin_dir {
        Some(ref dir) => println!("TeX binaries: {}", dir.display()),
        None => println!("TeX binaries: (PATH)"),
    }
    match config.work_root {
        Some(ref dir) => println!("Workspace root: {}", dir.display()),
        None => println!("Workspace root: {}", std::env::temp_dir().display()),
    }
    println!("Keep workspaces: {}", config.keep_workspaces);
    match config.compile_timeout() {
        Some(timeout) => println!("Compile timeout: {:.1}s", timeout.as_secs_f64()),
        None => println!("Compile timeout: none"),
    }
    println!("Max body size: {} bytes", config.max_body_bytes);
    println!("Strict Content-Length: {}", config.strict_content_length);
}

async fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
