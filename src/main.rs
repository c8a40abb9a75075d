//! # embedfont CLI
//!
//! Usage:
//!   embedfont font.ttf
//!   embedfont font.ttf --text "Hello" --size 12
//!   embedfont font.ttf --text "Hello" --options opts.json -o objects.txt
//!   embedfont font.ttf --json
//!   embedfont --manifest fonts.json
//!
//! Set `RUST_LOG=debug` to see what the parser reads.

use std::env;
use std::fs;

use embedfont::font::FontData;
use embedfont::{pdf, FontError, FontOptions, FontSource, TrueTypeFont};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let result = if let Some(manifest) = flag_value(&args, "--manifest") {
        list_manifest(&manifest)
    } else if args.len() > 1 && !args[1].starts_with('-') {
        inspect_font(&args)
    } else {
        eprintln!("Usage: embedfont <font.ttf> [--text TEXT] [--size PT] [--json] [--options FILE] [-o FILE]");
        eprintln!("       embedfont --manifest FILE");
        std::process::exit(2);
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn inspect_font(args: &[String]) -> Result<(), FontError> {
    let options = match flag_value(args, "--options") {
        Some(path) => FontOptions::load(path)?,
        None => FontOptions::default(),
    };
    let mut font = TrueTypeFont::from_file_with_options(&args[1], options)?;

    let size: f64 = match flag_value(args, "--size") {
        Some(s) => s
            .parse()
            .map_err(|_| FontError::Config(format!("invalid --size '{}'", s)))?,
        None => 12.0,
    };

    if let Some(text) = flag_value(args, "--text") {
        font.mark_used(&text);
        eprintln!(
            "✓ \"{}\" at {}pt: width {:.3}, ascent {:.3}, descent {:.3}",
            text,
            size,
            font.measure(&text, size),
            font.ascent(size),
            font.descent(size)
        );
    }

    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&font.summary())
            .map_err(|e| FontError::Config(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    let objects = pdf::write_truetype_font_objects(&font, 1);
    match flag_value(args, "-o") {
        Some(output_path) => {
            let bytes = pdf::serialize_objects(&objects);
            fs::write(&output_path, &bytes)?;
            eprintln!("✓ Written {} bytes to {}", bytes.len(), output_path);
        }
        None => {
            let summary = font.summary();
            println!(
                "{}: {} glyphs, {} mapped codes, {} units/em",
                summary.name, summary.glyph_count, summary.mapped_codes, summary.units_per_em
            );
            // The font file stream is binary, print only the dictionaries
            for obj in &objects[1..] {
                println!("{} 0 obj {}", obj.id, String::from_utf8_lossy(&obj.data));
            }
        }
    }
    Ok(())
}

fn list_manifest(path: &str) -> Result<(), FontError> {
    let registry = embedfont::load_manifest(path)?;
    let mut entries: Vec<_> = registry.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        a.family
            .cmp(&b.family)
            .then(a.weight.cmp(&b.weight))
            .then(a.italic.cmp(&b.italic))
    });

    for (key, data) in entries {
        let kind = match data {
            FontData::Standard(_) => "standard",
            FontData::Embedded(_) => "embedded",
        };
        println!(
            "{:<16} {:>3} {:<6} {:<8} {}",
            key.family,
            key.weight,
            if key.italic { "italic" } else { "normal" },
            kind,
            data.source().base_font_name()
        );
    }
    eprintln!("✓ {} fonts registered", registry.len());
    Ok(())
}
