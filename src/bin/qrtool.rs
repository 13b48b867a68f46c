use clap::{Parser, Subcommand};
use qrcodec::tools::{load_rgba, save_png};
use qrcodec::{decode_with_options, encode_segments, DataChunk, DecodeOptions, ECLevel, InversionAttempts, Segment};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "qrcodec encode/decode CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a PNG symbol
    Encode {
        /// Payload text
        text: String,
        /// Output path
        #[arg(long, short, default_value = "qr.png")]
        out: PathBuf,
        /// Error correction level: L, M, Q or H
        #[arg(long, default_value = "M")]
        ecl: String,
        /// Symbol version 1-40, or 0 to pick the smallest that fits
        #[arg(long, default_value_t = 0)]
        version: u8,
        /// Pixels per module
        #[arg(long, default_value_t = 8)]
        module_size: usize,
        /// Quiet zone width in modules
        #[arg(long, default_value_t = 4)]
        margin: usize,
        /// Force Kanji mode (payload must be Shift-JIS double-byte text)
        #[arg(long)]
        kanji: bool,
    },
    /// Decode the first QR symbol in an image
    Decode {
        /// Image path
        image: PathBuf,
        /// Also try the image with colours inverted
        #[arg(long)]
        try_inverted: bool,
    },
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Encode {
            text,
            out,
            ecl,
            version,
            module_size,
            margin,
            kanji,
        } => encode_cmd(&text, &out, &ecl, version, module_size, margin, kanji),
        Command::Decode {
            image,
            try_inverted,
        } => decode_cmd(&image, try_inverted),
    }
}

fn encode_cmd(
    text: &str,
    out: &PathBuf,
    ecl: &str,
    version: u8,
    module_size: usize,
    margin: usize,
    kanji: bool,
) -> ExitCode {
    let ec_level = match ecl.to_ascii_uppercase().as_str() {
        "L" => ECLevel::L,
        "M" => ECLevel::M,
        "Q" => ECLevel::Q,
        "H" => ECLevel::H,
        other => {
            eprintln!("Unknown EC level {:?}; expected L, M, Q or H", other);
            return ExitCode::FAILURE;
        }
    };

    let segments = if kanji {
        match Segment::kanji(text) {
            Ok(segment) => vec![segment],
            Err(err) => {
                eprintln!("Cannot encode payload in Kanji mode: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Segment::make_segments(text)
    };

    let qr = match encode_segments(&segments, ec_level, version) {
        Ok(qr) => qr,
        Err(err) => {
            eprintln!("Encoding failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = save_png(&qr, module_size, margin, out) {
        eprintln!("Failed to write {}: {}", out.display(), err);
        return ExitCode::FAILURE;
    }
    println!(
        "Wrote {}: version {}, {}x{} modules, mask {}",
        out.display(),
        qr.version,
        qr.size(),
        qr.size(),
        qr.mask.id()
    );
    ExitCode::SUCCESS
}

fn decode_cmd(image: &PathBuf, try_inverted: bool) -> ExitCode {
    let (rgba, width, height) = match load_rgba(image) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("Failed to load {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let options = DecodeOptions {
        inversion: if try_inverted {
            InversionAttempts::AttemptBoth
        } else {
            InversionAttempts::DontInvert
        },
    };

    match decode_with_options(&rgba, width, height, &options) {
        Some(decoded) => {
            println!("Image: {} ({}x{})", image.display(), width, height);
            println!(
                "Symbol: version {}, ec {:?}, mask {}",
                decoded.version,
                decoded.ec_level,
                decoded.mask.id()
            );
            println!("Text: {}", decoded.text);
            for (i, chunk) in decoded.chunks.iter().enumerate() {
                match chunk {
                    DataChunk::Numeric(s) => println!("  chunk {}: numeric {:?}", i, s),
                    DataChunk::Alphanumeric(s) => println!("  chunk {}: alphanumeric {:?}", i, s),
                    DataChunk::Byte(b) => println!("  chunk {}: byte, {} bytes", i, b.len()),
                    DataChunk::Kanji(s) => println!("  chunk {}: kanji {:?}", i, s),
                    DataChunk::Eci(v) => println!("  chunk {}: ECI assignment {}", i, v),
                    DataChunk::StructuredAppend {
                        index,
                        total,
                        parity,
                    } => println!(
                        "  chunk {}: structured append {}/{} parity {:#04x}",
                        i,
                        index + 1,
                        total + 1,
                        parity
                    ),
                }
            }
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("No QR symbol found in {}", image.display());
            ExitCode::FAILURE
        }
    }
}
