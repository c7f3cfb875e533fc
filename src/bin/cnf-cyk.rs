//! cnf-cyk: convert a grammar to Chomsky Normal Form and check words with CYK.

use chomsky_cyk::{
    parse_grammar_text, CnfConverter, ConverterBuilder, CykParser, Grammar, ParsedGrammar,
};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cnf-cyk")]
#[command(about = "Convert a context-free grammar to CNF and recognize words with CYK")]
#[command(version)]
struct Cli {
    /// Grammar file, one `A -> α | β | ε` rule per line (default: built-in example)
    #[arg(short, long)]
    grammar: Option<PathBuf>,

    /// Keep the original start symbol instead of introducing a fresh one
    #[arg(long)]
    no_fresh_start: bool,

    /// Prefix of generated nonterminal names
    #[arg(short, long, default_value = "X")]
    prefix: String,

    /// Upper bound on generated nonterminal names
    #[arg(long)]
    symbol_limit: Option<u32>,

    /// Print the grammar after every conversion stage
    #[arg(long)]
    steps: bool,

    /// Split words on whitespace instead of into characters
    #[arg(short, long)]
    tokens: bool,

    /// Words to check (default: read from stdin until `quit`)
    words: Vec<String>,
}

fn load_grammar(cli: &Cli) -> chomsky_cyk::Result<ParsedGrammar> {
    match &cli.grammar {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(parse_grammar_text(&text)?)
        }
        None => {
            println!("No grammar given. Using example grammar.");
            Ok(ParsedGrammar {
                grammar: Grammar::example(),
                start: "S".into(),
            })
        }
    }
}

fn convert(cli: &Cli, parsed: &ParsedGrammar) -> chomsky_cyk::Result<CnfConverter> {
    let mut builder = ConverterBuilder::new(&parsed.grammar, parsed.start.clone())
        .fresh_start(!cli.no_fresh_start)
        .fresh_prefix(cli.prefix.as_str());
    if let Some(limit) = cli.symbol_limit {
        builder = builder.symbol_limit(limit);
    }
    let mut converter = builder.build();

    if cli.steps {
        for stage in converter.stages() {
            converter.run_stage(stage)?;
            println!("\n=== After {} ===", stage);
            print!("{}", converter.grammar());
        }
    } else {
        converter.convert()?;
    }
    Ok(converter)
}

fn check(parser: &mut CykParser, word: &str, tokens: bool) {
    let accepted = if tokens {
        let tokens: Vec<&str> = word.split_whitespace().collect();
        parser.parse_tokens(&tokens)
    } else {
        parser.parse(word)
    };

    println!(
        "\nWord '{}' is {}",
        word,
        if accepted { "ACCEPTED" } else { "REJECTED" }
    );
    println!("\nParse Table:");
    print!("{}", parser.table());
}

fn main() -> chomsky_cyk::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    let parsed = load_grammar(&cli)?;
    println!("\n=== Original Grammar (start {}) ===", parsed.start);
    print!("{}", parsed.grammar);

    let converter = convert(&cli, &parsed)?;
    println!("\n=== Grammar in Chomsky Normal Form (start {}) ===", converter.start());
    print!("{}", converter.grammar());

    let (grammar, start) = converter.into_parts();
    let mut parser = CykParser::new(&grammar, start);

    if !cli.words.is_empty() {
        for word in &cli.words {
            check(&mut parser, word, cli.tokens);
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }
        check(&mut parser, &line, cli.tokens);
    }
    Ok(())
}
