use freespacer::error::Error;
use freespacer::offset::{OffsetFormat, format_offset, parse_offset};
use freespacer::scanner::FillByte;
use freespacer::script;
use freespacer::state::AppState;
use freespacer::viewport::{BYTES_PER_ROW, row_label};

use anyhow::Result;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

const ERASE_WARNING: &str = "WARNING! You are about to erase data from the ROM!\n\
Have you verified this data is not needed? Re-run with --force to proceed.";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut file_to_load = None;
    let mut load_last = false;
    let mut format_override = None;
    let mut fill_override = None;
    let mut find_size = None;
    let mut find_start = None;
    let mut check_args = None;
    let mut diff_args = None;
    let mut erase_range_args = None;
    let mut erase_count_args = None;
    let mut force = false;
    let mut dump_offset = None;
    let mut save = false;
    let mut save_as = None;
    let mut script_kind: Option<String> = None;
    let mut species = None;
    let mut level = None;
    let mut item = None;
    let mut quantity = None;
    let mut flag = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--version" => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                println!("Usage: {} [OPTIONS] [FILE]", env!("CARGO_PKG_NAME"));
                println!();
                println!("Loads a GBA ROM and runs free-space and hex editing operations on it.");
                println!();
                println!("Options:");
                println!("    --help                        Print this help message");
                println!("    --version                     Print version information");
                println!("    --last                        Load the most recently opened ROM");
                println!("    --format <0x|$|plain>         Offset notation for input and output");
                println!("    --fill <FF|00>                Byte value treated as free space");
                println!("    --find <SIZE>                 Find SIZE bytes of free space");
                println!("    --start <OFFSET>              Search start offset for --find");
                println!("    --check <START> <SIZE>        Report whether the range is free");
                println!("    --diff <A> <B>                Byte difference between two offsets");
                println!("    --erase-range <START> <END>   Overwrite the inclusive range with the fill byte");
                println!("    --erase-count <START> <N>     Overwrite N bytes starting at START");
                println!("    --force                       Skip the erase confirmation warning");
                println!("    --dump <OFFSET>               Print the hex rows around OFFSET");
                println!("    --save                        Write the ROM back (backup first)");
                println!("    --save-as <PATH>              Write the ROM to PATH");
                println!("    --script <KIND>               Print a script template (give_item,");
                println!("                                  wild_encounter, person_talking,");
                println!("                                  road_closed, find_item)");
                println!("    --species/--level/--item/--qty/--flag <VALUE>");
                println!("                                  Arguments for --script");
                return Ok(());
            }
            "--last" => {
                load_last = true;
                i += 1;
            }
            "--force" => {
                force = true;
                i += 1;
            }
            "--save" => {
                save = true;
                i += 1;
            }
            "--format" => {
                if i + 1 < args.len() {
                    match OffsetFormat::from_name(&args[i + 1]) {
                        Some(fmt) => format_override = Some(fmt),
                        None => {
                            eprintln!("Error: --format must be one of 0x, $, plain");
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --format requires a value");
                    std::process::exit(1);
                }
            }
            "--fill" => {
                if i + 1 < args.len() {
                    match FillByte::from_name(&args[i + 1]) {
                        Some(f) => fill_override = Some(f),
                        None => {
                            eprintln!("Error: --fill must be FF or 00");
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --fill requires a value");
                    std::process::exit(1);
                }
            }
            "--find" => {
                if i + 1 < args.len() {
                    find_size = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --find requires a size");
                    std::process::exit(1);
                }
            }
            "--start" => {
                if i + 1 < args.len() {
                    find_start = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --start requires an offset");
                    std::process::exit(1);
                }
            }
            "--check" => {
                if i + 2 < args.len() {
                    check_args = Some((args[i + 1].clone(), args[i + 2].clone()));
                    i += 3;
                } else {
                    eprintln!("Error: --check requires a start offset and a size");
                    std::process::exit(1);
                }
            }
            "--diff" => {
                if i + 2 < args.len() {
                    diff_args = Some((args[i + 1].clone(), args[i + 2].clone()));
                    i += 3;
                } else {
                    eprintln!("Error: --diff requires two offsets");
                    std::process::exit(1);
                }
            }
            "--erase-range" => {
                if i + 2 < args.len() {
                    erase_range_args = Some((args[i + 1].clone(), args[i + 2].clone()));
                    i += 3;
                } else {
                    eprintln!("Error: --erase-range requires a start and an end offset");
                    std::process::exit(1);
                }
            }
            "--erase-count" => {
                if i + 2 < args.len() {
                    erase_count_args = Some((args[i + 1].clone(), args[i + 2].clone()));
                    i += 3;
                } else {
                    eprintln!("Error: --erase-count requires a start offset and a count");
                    std::process::exit(1);
                }
            }
            "--dump" => {
                if i + 1 < args.len() {
                    dump_offset = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --dump requires an offset");
                    std::process::exit(1);
                }
            }
            "--save-as" => {
                if i + 1 < args.len() {
                    save_as = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --save-as requires a file path");
                    std::process::exit(1);
                }
            }
            "--script" => {
                if i + 1 < args.len() {
                    script_kind = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --script requires a template name");
                    std::process::exit(1);
                }
            }
            "--species" => {
                if i + 1 < args.len() {
                    species = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --species requires a value");
                    std::process::exit(1);
                }
            }
            "--level" => {
                if i + 1 < args.len() {
                    level = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --level requires a value");
                    std::process::exit(1);
                }
            }
            "--item" => {
                if i + 1 < args.len() {
                    item = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --item requires a value");
                    std::process::exit(1);
                }
            }
            "--qty" => {
                if i + 1 < args.len() {
                    quantity = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --qty requires a value");
                    std::process::exit(1);
                }
            }
            "--flag" => {
                if i + 1 < args.len() {
                    flag = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --flag requires a value");
                    std::process::exit(1);
                }
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Invalid command line option: {}", arg);
                std::process::exit(1);
            }
            arg => {
                file_to_load = Some(arg.to_string());
                i += 1;
            }
        }
    }

    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let mut state = AppState::new();
    let format = format_override.unwrap_or(state.system_config.offset_format);
    let fill = fill_override.unwrap_or(state.system_config.default_fill);

    // Script templates need no ROM; handle them first
    if let Some(kind) = script_kind {
        let snippet = match kind.as_str() {
            "give_item" => script::give_item(
                &state.names,
                item.as_deref().unwrap_or("ITEM_ID"),
                quantity.as_deref().unwrap_or("1"),
            ),
            "wild_encounter" => script::wild_encounter(
                &state.names,
                species.as_deref().unwrap_or("SPECIES"),
                level.as_deref().unwrap_or("5"),
                item.as_deref().unwrap_or("ITEM"),
                flag.as_deref().unwrap_or("0x807"),
            ),
            "person_talking" => script::person_talking(),
            "road_closed" => script::road_closed(),
            "find_item" => script::find_item(),
            other => {
                eprintln!("Error: unknown script template: {}", other);
                std::process::exit(1);
            }
        };
        print!("{}", script::wrap_message(&snippet));
        println!();
        return Ok(());
    }

    if let Some(path) = &file_to_load {
        state.load_rom(PathBuf::from(path))?;
        println!("{}", state.status_message);
    } else if load_last {
        state.load_last_rom()?;
        println!("{}", state.status_message);
    } else {
        println!("No ROM given. Pass a file path or --last; see --help.");
        return Ok(());
    }

    if let Some(size_raw) = find_size {
        let size = size_raw
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("size must be a plain number"))?;
        let start = match find_start {
            Some(raw) => parse_offset(&raw, format)?,
            None => 0,
        };
        match state.find_free_space(start, size, fill) {
            Ok((m, _rows)) => {
                println!("Free space found ({}):", fill);
                println!("Start: 0x{:06X}", m.start);
                println!("End: 0x{:06X}", m.end());
                println!("Offset: {}", format_offset(m.start, format));
            }
            Err(Error::NotFound(_)) => println!("No free space found ({}).", fill),
            Err(e) => return Err(e.into()),
        }
    }

    if let Some((start_raw, size_raw)) = check_args {
        let start = parse_offset(&start_raw, format)?;
        let size = size_raw
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("byte count must be a plain number"))?;
        let report = state.check_range(start, size)?;
        println!("End Offset: {}", format_offset(report.end, format));
        match report.free {
            Some(f) => println!("Designated range is free ({}).", f),
            None => println!("WARNING: Range includes offsets used by the ROM!"),
        }
    }

    if let Some((a_raw, b_raw)) = diff_args {
        let a = parse_offset(&a_raw, format)?;
        let b = parse_offset(&b_raw, format)?;
        let report = state.byte_difference(a, b)?;
        println!("Byte Difference: {} bytes", report.size);
        match report.free {
            Some(f) => println!("Range is free ({})", f),
            None => println!("WARNING: Range includes offsets used by the ROM!"),
        }
    }

    if erase_range_args.is_some() || erase_count_args.is_some() {
        if !force {
            eprintln!("{}", ERASE_WARNING);
            std::process::exit(1);
        }
        if let Some((start_raw, end_raw)) = erase_range_args {
            let start = parse_offset(&start_raw, format)?;
            let end = parse_offset(&end_raw, format)?;
            state.erase_range(start, end, fill)?;
            println!("{}", state.status_message);
        }
        if let Some((start_raw, count_raw)) = erase_count_args {
            let start = parse_offset(&start_raw, format)?;
            let count = count_raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("byte count must be a plain number"))?;
            state.erase_count(start, count, fill)?;
            println!("{}", state.status_message);
        }
    }

    if let Some(raw) = dump_offset {
        let offset = parse_offset(&raw, format)?;
        let rows = state.scroll_to_offset(offset)?;
        let target_row = offset / BYTES_PER_ROW;
        let first = target_row.saturating_sub(8);
        for row in rows.iter().filter(|r| r.row >= first && r.row <= target_row + 8) {
            println!("{}\t{}    {}", row_label(row.row), row.hex, row.ascii);
        }
    }

    if let Some(path) = save_as {
        state.save_as(PathBuf::from(path))?;
        println!("{}", state.status_message);
    } else if save {
        state.save()?;
        println!("{}", state.status_message);
    }

    Ok(())
}
