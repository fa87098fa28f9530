use cbot_lexer::config::RuntimeConfig;
use cbot_lexer::keywords::{KeywordTable, TableStrings};
use cbot_lexer::lexical::Lexer;
use cbot_lexer::logging::{self, codes};
use cbot_lexer::source::SourceLoader;
use cbot_lexer::tokens::TokenStream;
use std::env;
use std::path::Path;

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    input: String,
    json: bool,
    defines: Vec<(String, i64)>,
    keywords: Option<String>,
    config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <script.txt> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let options = match parse_options(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    let runtime = match &options.config {
        Some(path) => RuntimeConfig::load(Path::new(path))?,
        None => RuntimeConfig::default(),
    };

    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;

    let keywords = match &options.keywords {
        Some(path) => KeywordTable::new(TableStrings::load(Path::new(path))?),
        None => KeywordTable::builtin(),
    };

    let mut lexer = Lexer::with_keywords(keywords).with_preferences(runtime.lexical.clone());
    for (name, value) in &options.defines {
        lexer.define(name, *value)?;
    }

    let loader = SourceLoader::from_preferences(&runtime.source);
    let source = match loader.load(&options.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("FAILED: {}", error);
            eprintln!(
                "  [{}] {}",
                error.error_code(),
                codes::get_action(error.error_code().as_str())
            );
            std::process::exit(1);
        }
    };

    let stream = logging::with_source_context(&source.name, || lexer.tokenize(&source.text));

    if !lexer.diagnostics().is_empty() {
        let map = source.source_map();
        for diagnostic in lexer.diagnostics() {
            eprint!("{}", diagnostic.render(&map));
        }
    }

    if options.json {
        match &stream {
            Some(stream) => println!("{}", serde_json::to_string_pretty(stream)?),
            None => println!("[]"),
        }
    } else {
        match &stream {
            Some(stream) => print_tokens(stream),
            None => println!("{}: empty script, no tokens", source.name),
        }
        let metrics = lexer.metrics();
        eprintln!(
            "{}: {} tokens ({} keywords, {} constants) in {:.2} ms",
            source.name,
            metrics.total_tokens,
            metrics.keyword_tokens,
            metrics.defined_constants,
            metrics.duration_ms
        );
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("CBOT tokenizer v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    {} <script> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help                  Show this help message");
    println!("    --json                  Print tokens as a JSON array");
    println!("    --define NAME=VALUE     Bind a numeric constant (repeatable)");
    println!("    --keywords FILE         Load keyword spellings from a TOML file");
    println!("    --config FILE           Load runtime preferences from a TOML file");
    println!();
    println!("EXAMPLES:");
    println!("    {} miner.txt", program_name);
    println!(
        "    {} miner.txt --define TitaniumOre=1 --json",
        program_name
    );
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut input = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => options.json = true,
            "--define" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--define requires NAME=VALUE".to_string())?;
                options.defines.push(parse_define(value)?);
                i += 1;
            }
            "--keywords" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--keywords requires a file".to_string())?;
                options.keywords = Some(path.clone());
                i += 1;
            }
            "--config" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a file".to_string())?;
                options.config = Some(path.clone());
                i += 1;
            }
            arg if arg.starts_with("--") => {
                eprintln!("Warning: Unknown option '{}'", arg);
            }
            arg => {
                if input.is_some() {
                    return Err(format!("Unexpected extra argument '{}'", arg));
                }
                input = Some(arg.to_string());
            }
        }
        i += 1;
    }

    options.input = input.ok_or_else(|| "No script given".to_string())?;
    Ok(options)
}

fn parse_define(arg: &str) -> Result<(String, i64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("Invalid define '{}', expected NAME=VALUE", arg))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid value in define '{}'", arg))?;
    Ok((name.trim().to_string(), value))
}

fn print_tokens(stream: &TokenStream) {
    for token in stream {
        println!(
            "{:>6}..{:<6} {:<16} {:>5}  {:?}",
            token.span.start,
            token.span.end,
            token.kind.as_str(),
            token.id,
            token.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&[
            "miner.txt",
            "--json",
            "--define",
            "TitaniumOre=1",
            "--define",
            "Max = -20",
            "--keywords",
            "fr.toml",
        ]))
        .unwrap();

        assert_eq!(options.input, "miner.txt");
        assert!(options.json);
        assert_eq!(
            options.defines,
            vec![("TitaniumOre".to_string(), 1), ("Max".to_string(), -20)]
        );
        assert_eq!(options.keywords.as_deref(), Some("fr.toml"));
        assert_eq!(options.config, None);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(parse_options(&args(&["--json"])).is_err());
        assert!(parse_options(&args(&["a.txt", "b.txt"])).is_err());
        assert!(parse_options(&args(&["a.txt", "--define"])).is_err());
        assert!(parse_options(&args(&["a.txt", "--define", "X"])).is_err());
        assert!(parse_options(&args(&["a.txt", "--define", "X=abc"])).is_err());
    }
}
