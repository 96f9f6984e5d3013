//! svgmod - convert SVG drawings into KiCad footprint modules
//!
//! Usage:
//!   svgmod convert -i <svg> [options]   Convert an SVG into a footprint
//!   svgmod inspect -i <svg> [--json]    Report layers and shapes found
//!   svgmod layers                       List recognized layer names

use std::env;

use svgmod::LayerMap;

mod cli;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() >= 2 {
        match args[1].as_str() {
            "convert" => {
                cli::cmd_convert(&args[2..]);
                return;
            }
            "inspect" => {
                cli::cmd_inspect(&args[2..]);
                return;
            }
            "layers" => {
                cmd_layers();
                return;
            }
            "help" | "--help" | "-h" => {
                print_usage(&args[0]);
                return;
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!();
            }
        }
    }

    print_usage(&args[0]);
    std::process::exit(1);
}

fn cmd_layers() {
    println!("Recognized layer names:");
    for (name, info) in LayerMap::kicad_default().iter() {
        let mut formats = Vec::new();
        if info.front.is_some() {
            formats.push("legacy");
        }
        if info.pretty.is_some() {
            formats.push("pretty");
        }
        println!("  {:10} ({})", name, formats.join(", "));
    }
}

fn print_usage(prog: &str) {
    eprintln!("svgmod - convert SVG drawings into KiCad footprint modules");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} convert -i <svg> [options]", prog);
    eprintln!("  {} inspect -i <svg> [--json]", prog);
    eprintln!("  {} layers", prog);
    eprintln!();
    eprintln!("Convert options:");
    eprintln!("  -i, --input-file <file>    SVG file to read ('-' for stdin, required)");
    eprintln!("  -o, --output-file <file>   Module file to write ('-' for stdout,");
    eprintln!("                             default: input name with the format's extension)");
    eprintln!("  --name, --module-name <s>  Base name of the module (default: svgmod)");
    eprintln!("  --value, --module-value <s> Value of the module (default: G***)");
    eprintln!("  -f, --factor <n>           Scale paths by this factor (default: 1.0)");
    eprintln!("  -t, --tolerance <n>        Curve flattening tolerance (default: 0.1)");
    eprintln!("  --front-only               Omit the mirrored back module (legacy only)");
    eprintln!("  --format <fmt>             Output format: legacy, pretty (default: legacy)");
    eprintln!("  --units <units>            Legacy output units: mm, decimil (default: mm)");
    eprintln!();
    eprintln!("Inspect options:");
    eprintln!("  -i, --input-file <file>    SVG file to read ('-' for stdin, required)");
    eprintln!("  -t, --tolerance <n>        Curve flattening tolerance (default: 0.1)");
    eprintln!("  --json                     Output the report as JSON");
    eprintln!();
    eprintln!("Layer groups are matched by their inkscape:label (or id) against");
    eprintln!("the names shown by the 'layers' command.");
}
