//! Command-line pack/unpack tool for the huffrle format.
//!
//!   hzpack pack <input> <output>
//!   hzpack unpack <input> <output>

use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use huffrle::{decode, encode, max_compressed_size, verify};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hzpack: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        bail!("usage: hzpack <pack|unpack> <input> <output>");
    }

    match args[1].as_str() {
        "pack" => pack(&args[2], &args[3]),
        "unpack" => unpack(&args[2], &args[3]),
        other => bail!("unknown command `{other}` (expected `pack` or `unpack`)"),
    }
}

fn pack(input_path: &str, output_path: &str) -> Result<()> {
    let input = fs::read(input_path).with_context(|| format!("reading {input_path}"))?;

    let mut compressed = vec![0u8; max_compressed_size(input.len())];
    let size = encode(&input, &mut compressed).context("encoding failed")?;
    compressed.truncate(size);

    fs::write(output_path, &compressed).with_context(|| format!("writing {output_path}"))?;

    let ratio = if size > 0 {
        input.len() as f64 / size as f64
    } else {
        0.0
    };
    println!(
        "{input_path}: {} -> {} bytes ({ratio:.2}:1)",
        input.len(),
        size
    );
    Ok(())
}

fn unpack(input_path: &str, output_path: &str) -> Result<()> {
    let compressed = fs::read(input_path).with_context(|| format!("reading {input_path}"))?;

    let decoded_size = verify(&compressed).context("not a valid huffrle artifact")?;
    let mut output = vec![0u8; decoded_size];
    decode(&compressed, &mut output).context("decoding failed")?;

    fs::write(output_path, &output).with_context(|| format!("writing {output_path}"))?;

    println!("{input_path}: {} -> {decoded_size} bytes", compressed.len());
    Ok(())
}
