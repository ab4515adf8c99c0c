use anyhow::Context as _;
use clap::Parser as _;
use lalrun_demo_arithmetic::parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print the grammar and its parse table, then exit.
    #[arg(long)]
    dump_table: bool,

    /// Print the syntax tree before evaluating it.
    #[arg(long)]
    ast: bool,

    /// The expression to evaluate.
    input: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_ansi(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let parser = parser::parser().context("failed to build the parser")?;

    if args.dump_table {
        println!("{}", parser.grammar());
        println!("{}", parser.table().display(parser.grammar()));
        return Ok(());
    }

    let input = args.input.context("missing input")?;

    let parsed = parser::parse(parser, &input).context("parser error")?;
    if args.ast {
        println!("parsed: {}", parsed);
    }

    let value = parsed.eval().context("evaluation error")?;
    println!("{}", value);

    Ok(())
}
