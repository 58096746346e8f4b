use std::fs;
use std::path::PathBuf;
use std::process;

use argh::FromArgs;
use srcmap::{SourceMap, UnpackedSourceMap};

/// Print a summary and the decoded mappings of a source map file.
#[derive(FromArgs, Debug)]
pub struct Cli {
    /// path of the source map file
    #[argh(positional)]
    path: PathBuf,
}

fn run(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let sm = SourceMap::from_slice(&fs::read(&args.path)?)?;

    println!("version: {}", sm.get_version());
    println!("file: {}", sm.get_file().unwrap_or("<none>"));
    println!("source root: {}", sm.get_source_root().unwrap_or("<none>"));
    for (idx, source) in sm.sources().iter().enumerate() {
        let has_content = if source.content.is_some() {
            " (has content)"
        } else {
            ""
        };
        println!("source[{}] {}{}", idx, source.url, has_content);
    }

    let unpacked = UnpackedSourceMap::new(sm)?;
    println!("{}", unpacked.segments_description());
    Ok(())
}

fn main() {
    let args: Cli = argh::from_env();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
