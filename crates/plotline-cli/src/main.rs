mod logging;
mod settings;

use clap::Parser;
use plotline_lib::{SvgImport, VectorData, read_multilayer_svg, read_svg};
use rand::SeedableRng;
use rand::rngs::StdRng;
use settings::Settings;
use std::fmt::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::setup_logging();
    let settings = Settings::parse();

    match run(&settings) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}: {e}", settings.file.display());
            ExitCode::FAILURE
        }
    }
}

/// Import, process and measure the file named in `settings`
fn run(settings: &Settings) -> plotline_lib::Result<String> {
    let import_config = settings.import_config();
    let SvgImport {
        data: mut vector_data,
        width,
        height,
    } = if settings.single_layer {
        let import = read_svg(&settings.file, &import_config)?;
        let mut vector_data = VectorData::new();
        vector_data.add(import.data, Some(1))?;
        SvgImport {
            data: vector_data,
            width: import.width,
            height: import.height,
        }
    } else {
        read_multilayer_svg(&settings.file, &import_config)?
    };

    tracing::info!(
        layers = vector_data.count(),
        width,
        height,
        "imported {}",
        settings.file.display()
    );

    if settings.merge {
        vector_data.merge(&settings.merge_config());
    }

    if settings.reloop {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        vector_data.reloop(&settings.reloop_config(), &mut rng);
    }

    Ok(format_report(&vector_data, width, height))
}

/// Per-layer metrics table
fn format_report(vector_data: &VectorData, width: f64, height: f64) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "page: {width:.2} x {height:.2} px");

    for (layer_id, lc) in vector_data.layers() {
        let pen_up = lc.pen_up_length();
        let _ = writeln!(
            out,
            "layer {layer_id}: {} lines, length {:.2}, pen-up {:.2} (mean {:.2}, median {:.2}), {} segments",
            lc.len(),
            lc.length(),
            pen_up.total,
            pen_up.mean,
            pen_up.median,
            lc.segment_count(),
        );
    }

    let _ = writeln!(
        out,
        "total: {} layers, length {:.2}, pen-up {:.2}, {} segments",
        vector_data.count(),
        vector_data.length(),
        vector_data.pen_up_length(),
        vector_data.segment_count(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;
    use plotline_lib::LineCollection;

    #[test]
    fn test_format_report() {
        let mut vector_data = VectorData::new();
        let lc = LineCollection::from_lines(vec![
            LineString::from(vec![(0.0, 0.0), (3.0, 4.0)]),
            LineString::from(vec![(3.0, 5.0), (3.0, 6.0)]),
        ]);
        vector_data.add(lc, Some(2)).unwrap();

        let report = format_report(&vector_data, 100.0, 50.0);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "page: 100.00 x 50.00 px");
        assert_eq!(
            lines[1],
            "layer 2: 2 lines, length 6.00, pen-up 1.00 (mean 1.00, median 1.00), 2 segments"
        );
        assert_eq!(
            lines[2],
            "total: 1 layers, length 6.00, pen-up 1.00, 2 segments"
        );
    }

    #[test]
    fn test_run_missing_file() {
        let settings = Settings::parse_from(["plotline", "/nonexistent/drawing.svg"]);
        assert!(matches!(run(&settings), Err(plotline_lib::DataError::Io(_))));
    }

    #[test]
    fn test_run_merges_layers() {
        let path = std::env::temp_dir().join(format!("plotline-run-{}.svg", std::process::id()));
        std::fs::write(
            &path,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10" width="10" height="10">
                <g id="layer1"><path d="M 0 0 L 1 0"/><path d="M 1 0 L 2 0"/></g>
                <g id="layer2"><path d="M 5 5 L 6 6"/></g>
            </svg>"#,
        )
        .unwrap();

        let settings = Settings::parse_from(["plotline", path.to_str().unwrap(), "--merge"]);
        let report = run(&settings);
        std::fs::remove_file(&path).unwrap();

        let report = report.unwrap();
        assert!(report.starts_with("page: 10.00 x 10.00 px"));
        assert!(report.contains("layer 1: 1 lines, length 2.00"));
        assert!(report.contains("layer 2: 1 lines"));
    }
}
