//! Max-tree code generator binary.
//!
//! Writes the per-N blocks of the max kernel as GNU assembler text, a C
//! header or an ELF object. Set `RUST_LOG=debug` for plan details.

use clap::Parser;
use fmaxgen::core::GenResult;
use fmaxgen::encodegen::{self, Emit, GenConfig, DEFAULT_MAX_INPUTS};
use fmaxgen::x64::{Framing, RegisterMap};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fmaxgen",
    version,
    about = "Generate x86-64 tournament max-reduction code for 0..N doubles"
)]
struct Cli {
    /// Smallest input count to generate
    #[arg(long, default_value_t = 0)]
    min_n: usize,
    /// Largest input count to generate
    #[arg(long, default_value_t = DEFAULT_MAX_INPUTS)]
    max_n: usize,
    /// XMM register holding slot 0
    #[arg(long, default_value_t = 3)]
    xmm_base: u8,
    /// Output format
    #[arg(long, value_enum, default_value = "asm")]
    emit: Emit,
    /// Close every block with `vmovapd <result>,%xmm0; ret`
    #[arg(long)]
    function: bool,
    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// Include guard for headers (default: derived from --out)
    #[arg(long)]
    guard: Option<String>,
}

fn run(cli: Cli) -> GenResult<()> {
    let framing = if cli.function {
        Framing::Function
    } else {
        Framing::Block
    };
    let config = GenConfig::default()
        .with_range(cli.min_n, cli.max_n)?
        .with_registers(RegisterMap::new(cli.xmm_base)?)
        .with_framing(framing);

    encodegen::check_output(cli.emit, cli.out.as_deref())?;
    let guard = encodegen::resolve_guard(cli.guard.as_deref(), cli.out.as_deref());

    let output = encodegen::generate(&config, cli.emit, &guard)?;
    match &cli.out {
        Some(path) => {
            fs::write(path, &output)?;
            println!("wrote {}", path.display());
        }
        None => io::stdout().lock().write_all(&output)?,
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
