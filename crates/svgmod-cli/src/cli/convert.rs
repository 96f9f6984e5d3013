//! `convert` - turn an SVG drawing into a KiCad footprint module.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use svgmod::{
    import_drawing, write_footprint, ExportOptions, ImportOptions, LayerMap, OutputFormat, Units,
};

use super::common::{read_svg_input, source_timestamp};

pub fn cmd_convert(args: &[String]) {
    let mut input_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut module_name = "svgmod".to_string();
    let mut module_value = "G***".to_string();
    let mut scale_factor = 1.0_f64;
    let mut tolerance = 0.1_f32;
    let mut front_only = false;
    let mut format = OutputFormat::Legacy;
    let mut units = Units::Millimeters;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-i" | "--input-file" => {
                i += 1;
                if i < args.len() {
                    input_path = Some(&args[i]);
                }
            }
            "-o" | "--output-file" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(&args[i]);
                }
            }
            "--name" | "--module-name" => {
                i += 1;
                if i < args.len() {
                    module_name = args[i].clone();
                }
            }
            "--value" | "--module-value" => {
                i += 1;
                if i < args.len() {
                    module_value = args[i].clone();
                }
            }
            "-f" | "--factor" => {
                i += 1;
                if i < args.len() {
                    scale_factor = args[i].parse().unwrap_or(1.0);
                }
            }
            "-t" | "--tolerance" => {
                i += 1;
                if i < args.len() {
                    tolerance = args[i].parse().unwrap_or(0.1);
                }
            }
            "--front-only" => {
                front_only = true;
            }
            "--format" => {
                i += 1;
                if i < args.len() {
                    format = OutputFormat::from_name(&args[i]).unwrap_or_else(|| {
                        eprintln!("Unknown format: {}. Use 'legacy' or 'pretty'.", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--units" => {
                i += 1;
                if i < args.len() {
                    units = Units::from_name(&args[i]).unwrap_or_else(|| {
                        eprintln!("Unknown units: {}. Use 'mm' or 'decimil'.", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            other => {
                eprintln!("Unknown option: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input_path.unwrap_or_else(|| {
        eprintln!("Error: input file required (-i, use '-' for stdin)");
        std::process::exit(1);
    });

    if format == OutputFormat::Pretty && units == Units::Decimil {
        eprintln!("Error: decimil units only allowed with legacy output type");
        std::process::exit(1);
    }

    let svg_content = read_svg_input(input_path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let layer_map = LayerMap::kicad_default();
    let import_options = ImportOptions {
        curve_tolerance: tolerance,
    };

    let drawing = import_drawing(&svg_content, &layer_map, &import_options).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!("Loaded {} shapes", drawing.shapes.len());

    let options = ExportOptions {
        module_name,
        module_value,
        scale_factor,
        units,
        format,
        front_only,
        source_name: input_path.to_string(),
        timestamp: source_timestamp(input_path),
    };

    let output_path = resolve_output_name(output_path, input_path, format);

    let result = if output_path == "-" {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        write_footprint(&mut out, &drawing, &layer_map, &options).and_then(|()| {
            out.flush().map_err(Into::into)
        })
    } else {
        eprintln!("Writing module file: {}", output_path);
        match File::create(&output_path) {
            Ok(file) => {
                let mut out = BufWriter::new(file);
                write_footprint(&mut out, &drawing, &layer_map, &options)
                    .and_then(|()| out.flush().map_err(Into::into))
            }
            Err(e) => {
                eprintln!("Failed to create {}: {}", output_path, e);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve the output file name. A missing name derives from the input's
/// base name with its extension stripped; the format extension is appended
/// to any name not already carrying it. "-" always means stdout.
fn resolve_output_name(output: Option<&str>, input: &str, format: OutputFormat) -> String {
    let extension = match format {
        OutputFormat::Legacy => ".mod",
        OutputFormat::Pretty => ".kicad_mod",
    };

    match output {
        Some("-") => "-".to_string(),
        Some(path) if path.ends_with(extension) => path.to_string(),
        Some(path) => format!("{}{}", path, extension),
        None if input == "-" => "-".to_string(),
        None => {
            let stem = Path::new(input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "svgmod".to_string());
            format!("{}{}", stem, extension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_name_swaps_extension() {
        assert_eq!(
            resolve_output_name(None, "logo.svg", OutputFormat::Legacy),
            "logo.mod"
        );
        assert_eq!(
            resolve_output_name(None, "logo.svg", OutputFormat::Pretty),
            "logo.kicad_mod"
        );
    }

    #[test]
    fn derived_name_drops_the_input_directory() {
        assert_eq!(
            resolve_output_name(None, "artwork/logo.svg", OutputFormat::Legacy),
            "logo.mod"
        );
    }

    #[test]
    fn user_name_gets_the_format_extension_appended() {
        assert_eq!(
            resolve_output_name(Some("out"), "logo.svg", OutputFormat::Legacy),
            "out.mod"
        );
        assert_eq!(
            resolve_output_name(Some("out.mod"), "logo.svg", OutputFormat::Legacy),
            "out.mod"
        );
        assert_eq!(
            resolve_output_name(Some("out"), "logo.svg", OutputFormat::Pretty),
            "out.kicad_mod"
        );
    }

    #[test]
    fn dash_stays_stdout_regardless_of_format() {
        assert_eq!(
            resolve_output_name(Some("-"), "logo.svg", OutputFormat::Pretty),
            "-"
        );
        assert_eq!(resolve_output_name(None, "-", OutputFormat::Legacy), "-");
    }
}
