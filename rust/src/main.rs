use std::env;
use std::path::{Path, PathBuf};
use std::process;

use serde_json::json;
use zettel::{
    NoteStore, VaultDir, ZettelAction, create_zettel, current_zettel_id, is_zettel_id,
    open_parent, parent_id, parse_id,
};

#[derive(Debug, Clone)]
struct NoteOpts {
    file: String,
    vault: PathBuf,
    create: bool,
    content: Option<String>,
    json: bool,
}

fn default_vault() -> PathBuf {
    env::var("ZETTEL_VAULT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn print_help() {
    eprintln!(
        "zettel - Zettelkasten note ID tool\n\n\
Usage:\n  zettel id <filename> [--json]\n  zettel parent <filename> [--vault <dir>] [--json]\n  zettel child <filename> [--vault <dir>] [--create] [--content <text>] [--json]\n  zettel sibling <filename> [--vault <dir>] [--create] [--content <text>] [--json]\n  zettel next <filename> [--vault <dir>] [--create] [--content <text>] [--json]\n\n\
The vault defaults to $ZETTEL_VAULT, then the current directory.\n\
Set RUST_LOG=debug for scan details.\n"
    );
}

fn parse_note_flags(args: &[String], allow_create: bool) -> Result<NoteOpts, String> {
    let mut opts = NoteOpts {
        file: String::new(),
        vault: default_vault(),
        create: false,
        content: None,
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--vault" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --vault".to_string());
                }
                opts.vault = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--content" if allow_create => {
                if i + 1 >= args.len() {
                    return Err("missing value for --content".to_string());
                }
                opts.content = Some(args[i + 1].clone());
                i += 2;
            }
            "--create" if allow_create => {
                opts.create = true;
                i += 1;
            }
            "--json" => {
                opts.json = true;
                i += 1;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            file if opts.file.is_empty() => {
                opts.file = file.to_string();
                i += 1;
            }
            extra => return Err(format!("unexpected argument: {extra}")),
        }
    }

    if opts.file.is_empty() {
        return Err("a note filename is required".to_string());
    }
    if opts.content.is_some() && !opts.create {
        return Err("--content requires --create".to_string());
    }
    Ok(opts)
}

fn print_json(payload: &serde_json::Value) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string(payload).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_id(args: &[String]) -> Result<(), String> {
    let mut json_out = false;
    let mut filename = None;
    for arg in args {
        match arg.as_str() {
            "--json" => json_out = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            name if filename.is_none() => filename = Some(name),
            extra => return Err(format!("unexpected argument: {extra}")),
        }
    }
    let filename = filename.ok_or("id requires a filename")?;

    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let id = parse_id(name);

    if json_out {
        print_json(&json!({
            "filename": name,
            "id": id,
            "valid": is_zettel_id(&id),
            "parent": parent_id(&id),
        }))?;
    } else if !id.is_empty() {
        println!("{id}");
    }

    if id.is_empty() {
        Err(format!("no zettel ID prefix in filename: {name}"))
    } else {
        Ok(())
    }
}

fn run_parent(args: &[String]) -> Result<(), String> {
    let opts = parse_note_flags(args, false)?;
    let vault = VaultDir::open(&opts.vault).map_err(|e| e.to_string())?;
    let current = vault.relative_path(Path::new(&opts.file));

    let parent = open_parent(&vault, Some(current)).map_err(|e| e.to_string())?;
    if opts.json {
        print_json(&json!({ "from": opts.file, "parent": parent }))?;
    } else {
        println!("{parent}");
    }
    Ok(())
}

fn run_action(action: ZettelAction, args: &[String]) -> Result<(), String> {
    let opts = parse_note_flags(args, true)?;
    let vault = VaultDir::open(&opts.vault).map_err(|e| e.to_string())?;
    let current = vault.relative_path(Path::new(&opts.file));

    if opts.create {
        let content = opts.content.as_deref().unwrap_or("");
        let created =
            create_zettel(&vault, Some(current), action, content).map_err(|e| e.to_string())?;
        if opts.json {
            println!(
                "{}",
                serde_json::to_string(&created).map_err(|e| e.to_string())?
            );
        } else {
            println!("id={}", created.id);
            println!("path={}", created.path.display());
            println!("link={}", created.link);
        }
        return Ok(());
    }

    let id = current_zettel_id(Some(current)).map_err(|e| e.to_string())?;
    let filenames = vault.markdown_filenames().map_err(|e| e.to_string())?;
    let next = action.compute(&id, &filenames);
    if opts.json {
        print_json(&json!({
            "action": action.as_str(),
            "from": id,
            "id": next,
        }))?;
    } else {
        println!("{next}");
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        process::exit(2);
    }

    if args[0] == "-h" || args[0] == "--help" || args[0] == "help" {
        print_help();
        return;
    }

    let cmd = args[0].as_str();
    let rest = &args[1..];

    let res = match cmd {
        "id" => run_id(rest),
        "parent" => run_parent(rest),
        _ => match ZettelAction::parse(cmd) {
            Some(action) => run_action(action, rest),
            None => Err(format!("unknown command: {cmd}")),
        },
    };

    if let Err(err) = res {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
