use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{Context, IntoDiagnostic};

use fpc_backend_cpp::Settings;

/// fpc — fragment-processor to C++ compiler
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input program model (JSON)
    input: PathBuf,

    /// Processor name (default: derived from the input file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Output directory for Gr{Name}.h and Gr{Name}.cpp (default: cwd)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep shader helpers that were inlined at every call site
    #[arg(long)]
    keep_dead_functions: bool,

    /// Dump the program model to stderr before emission
    #[arg(long)]
    emit_ir: bool,

    /// Analyze without writing artifacts
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    // 1. Read the program model.
    let source = std::fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.input.display()))?;
    let module: fpc_ir::Module = serde_json::from_str(&source)
        .into_diagnostic()
        .wrap_err("program model parse failed")?;

    // 2. Resolve the processor name: --name, or the input file stem
    //    with any Gr prefix stripped.
    let name = match &cli.name {
        Some(name) => name.clone(),
        None => {
            let stem = cli
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| miette::miette!("cannot derive a name from the input path"))?;
            stem.strip_prefix("Gr").unwrap_or(stem).to_string()
        }
    };

    // 3. Optionally dump the model to stderr.
    if cli.emit_ir {
        eprintln!("{}", fpc_ir::dump_module(&module));
    }

    // 4. Compile.
    let settings = Settings {
        remove_dead_functions: !cli.keep_dead_functions,
    };
    let artifacts = fpc_backend_cpp::compile(&module, &name, &settings)
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err("compilation failed")?;

    // 5. Dry-run: stop here.
    if cli.dry_run {
        return Ok(());
    }

    // 6. Write the artifacts.
    let dir = cli.output.unwrap_or_else(|| PathBuf::from("."));
    let header_path = dir.join(format!("Gr{name}.h"));
    let cpp_path = dir.join(format!("Gr{name}.cpp"));
    std::fs::write(&header_path, &artifacts.header)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", header_path.display()))?;
    std::fs::write(&cpp_path, &artifacts.cpp)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", cpp_path.display()))?;

    Ok(())
}
