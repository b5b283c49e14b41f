use std::fs::{self, File};
use std::process;
use std::time::Instant;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use memmap2::Mmap;

use hashchain::{naive_count, search, Variant};

/// Decode a hex string ("6162ff" or "61 62 ff") into bytes.
fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{}'", s));
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .map_err(|_| format!("invalid hex byte '{}'", &compact[i..i + 2]))
        })
        .collect()
}

/// Render a byte slice for the summary: printable ASCII as-is, the rest
/// escaped, truncated past 40 bytes.
fn preview(bytes: &[u8]) -> String {
    let shown: String = bytes
        .iter()
        .take(40)
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(|b| b as char)
        .collect();
    if bytes.len() > 40 {
        format!("{}... ({} bytes)", shown, bytes.len())
    } else {
        shown
    }
}

// ── mmap helper ──────────────────────────────────────────────────────────

/// Memory-map a file read-only.  Empty files cannot be mapped, so they come
/// back as an empty buffer instead.
fn mmap_text(path: &str) -> std::io::Result<(Option<Mmap>, usize)> {
    let file = File::open(path)?;
    let len = file.metadata()?.len() as usize;
    if len == 0 {
        return Ok((None, 0));
    }
    // SAFETY: mapped read-only; the search borrows it only for this call.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok((Some(mmap), len))
}

// ── CLI types ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Plain,
    Rolling,
    Qverify,
    Weaker,
    Linear,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Plain => Variant::Plain,
            VariantArg::Rolling => Variant::Rolling,
            VariantArg::Qverify => Variant::QVerify,
            VariantArg::Weaker => Variant::Weaker,
            VariantArg::Linear => Variant::Linear,
        }
    }
}

#[derive(Parser)]
#[command(about = "Exact string search with chained q-gram fingerprints")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count occurrences of a pattern in a file
    #[command(group(
        ArgGroup::new("pat")
            .required(true)
            .args(["pattern", "hex_pattern", "pattern_file"]),
    ))]
    Count {
        /// Scanner variant
        #[arg(value_enum)]
        variant: VariantArg,

        /// Text file to search
        file: String,

        /// Pattern as a literal string
        #[arg(short, long)]
        pattern: Option<String>,

        /// Pattern as hex bytes, e.g. "00ff1a"
        #[arg(long)]
        hex_pattern: Option<String>,

        /// Read the pattern from a file
        #[arg(long)]
        pattern_file: Option<String>,

        /// Override the preset q-gram length
        #[arg(long)]
        gram_len: Option<usize>,

        /// Override the preset table bits (table size = 1 << bits)
        #[arg(long)]
        table_bits: Option<u32>,

        /// Override the preset chain-hash shift
        #[arg(long)]
        chain_shift: Option<u32>,

        /// Override the preset anchor-hash shift
        #[arg(long)]
        anchor_shift: Option<u32>,

        /// Override the preset rolling shift
        #[arg(long)]
        roll_shift: Option<u32>,

        /// Print preprocessing diagnostics to stderr
        #[arg(long)]
        verbose: bool,
    },

    /// Run every variant plus the naive reference and report agreement
    #[command(group(
        ArgGroup::new("pat")
            .required(true)
            .args(["pattern", "hex_pattern", "pattern_file"]),
    ))]
    Check {
        /// Text file to search
        file: String,

        /// Pattern as a literal string
        #[arg(short, long)]
        pattern: Option<String>,

        /// Pattern as hex bytes
        #[arg(long)]
        hex_pattern: Option<String>,

        /// Read the pattern from a file
        #[arg(long)]
        pattern_file: Option<String>,
    },
}

/// Resolve the three pattern sources into bytes.
fn load_pattern(
    pattern: Option<String>,
    hex_pattern: Option<String>,
    pattern_file: Option<String>,
) -> Vec<u8> {
    if let Some(p) = pattern {
        return p.into_bytes();
    }
    if let Some(h) = hex_pattern {
        return parse_hex(&h).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
    }
    let path = pattern_file.expect("clap guarantees one pattern source");
    fs::read(&path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        process::exit(1);
    })
}

// ── main ─────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Count {
            variant,
            file,
            pattern,
            hex_pattern,
            pattern_file,
            gram_len,
            table_bits,
            chain_shift,
            anchor_shift,
            roll_shift,
            verbose,
        } => {
            let variant: Variant = variant.into();
            let mut params = variant.default_params();
            if let Some(q) = gram_len {
                params.gram_len = q;
            }
            if let Some(bits) = table_bits {
                params.table_bits = bits;
            }
            if let Some(s) = chain_shift {
                params.chain_shift = s;
            }
            if let Some(s) = anchor_shift {
                params.anchor_shift = s;
            }
            if let Some(s) = roll_shift {
                params.roll_shift = s;
            }
            params.verbose = verbose;
            if let Err(e) = params.validate() {
                eprintln!("Error: {}", e);
                process::exit(1);
            }

            let x = load_pattern(pattern, hex_pattern, pattern_file);
            let (mmap, n) = mmap_text(&file).unwrap_or_else(|e| {
                eprintln!("Error mapping {}: {}", file, e);
                process::exit(1);
            });
            let y: &[u8] = mmap.as_deref().unwrap_or(&[]);

            let t0 = Instant::now();
            let count = search(variant, &x, y, &params).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                process::exit(1);
            });
            let elapsed = t0.elapsed();

            println!("Variant:      {}", variant);
            println!(
                "Parameters:   q={} table=2^{} shifts chain={} anchor={} roll={}",
                params.gram_len,
                params.table_bits,
                params.chain_shift,
                params.anchor_shift,
                params.roll_shift
            );
            println!("Pattern:      {}", preview(&x));
            println!("Text:         {} ({} bytes)", file, n);
            println!("Occurrences:  {}", count);
            println!("Time:         {:.3}s", elapsed.as_secs_f64());
        }

        Commands::Check {
            file,
            pattern,
            hex_pattern,
            pattern_file,
        } => {
            let x = load_pattern(pattern, hex_pattern, pattern_file);
            let (mmap, n) = mmap_text(&file).unwrap_or_else(|e| {
                eprintln!("Error mapping {}: {}", file, e);
                process::exit(1);
            });
            let y: &[u8] = mmap.as_deref().unwrap_or(&[]);

            let t0 = Instant::now();
            let expected = naive_count(&x, y);
            let naive_time = t0.elapsed();
            println!("Pattern:      {}", preview(&x));
            println!("Text:         {} ({} bytes)", file, n);
            println!(
                "naive:        {} ({:.3}s)",
                expected,
                naive_time.as_secs_f64()
            );

            let mut disagreements = 0;
            for variant in Variant::ALL {
                let params = variant.default_params();
                let t0 = Instant::now();
                match search(variant, &x, y, &params) {
                    Ok(count) => {
                        let tag = if count == expected { "ok" } else { "MISMATCH" };
                        if count != expected {
                            disagreements += 1;
                        }
                        println!(
                            "{}:{}{} ({:.3}s) {}",
                            variant,
                            " ".repeat(13 - variant.to_string().len()),
                            count,
                            t0.elapsed().as_secs_f64(),
                            tag
                        );
                    }
                    Err(e) => {
                        println!(
                            "{}:{}skipped ({})",
                            variant,
                            " ".repeat(13 - variant.to_string().len()),
                            e
                        );
                    }
                }
            }

            if disagreements > 0 {
                eprintln!("error: {} variant(s) disagree with the reference", disagreements);
                process::exit(1);
            }
        }
    }
}
