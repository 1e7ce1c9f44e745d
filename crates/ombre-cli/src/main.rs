use ombre::{ColorResolver, CssColorResolver, Engine, Rgba};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Gradient(ombre::Error),
    Json(serde_json::Error),
    Unresolved,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Gradient(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Unresolved => write!(f, "descriptor could not be used; base color kept"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ombre::Error> for CliError {
    fn from(value: ombre::Error) -> Self {
        Self::Gradient(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Css,
    Svg,
}

#[derive(Debug, Default)]
struct Args {
    command: Option<Command>,
    input: Option<String>,
    base: Option<String>,
    pretty: bool,
    log_filter: Option<String>,
}

fn usage() -> &'static str {
    "ombre-cli\n\
\n\
USAGE:\n\
  ombre-cli css [--base <color>] [--pretty] [--log <filter>] <descriptor>\n\
  ombre-cli svg [--pretty] [--log <filter>] [<path>|-]\n\
\n\
NOTES:\n\
  - css prints the parsed paint (solid color plus optional gradient) as JSON.\n\
  - svg prints the first linearGradient/radialGradient of the document as JSON.\n\
  - If <path> is omitted or '-', svg input is read from stdin.\n\
  - Warnings go to stderr; --log takes an env_logger filter (default: RUST_LOG, else warn).\n\
  - Exit code 3 means the CSS descriptor could not be used at all.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "css" if args.command.is_none() => args.command = Some(Command::Css),
            "svg" if args.command.is_none() => args.command = Some(Command::Svg),
            "--pretty" => args.pretty = true,
            "--base" => {
                let Some(base) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.base = Some(base.clone());
            }
            "--log" => {
                let Some(filter) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.log_filter = Some(filter.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            // A lone "-" is stdin for svg.
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            input => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(input.to_string());
            }
        }
    }

    match args.command {
        None => Err(CliError::Usage(usage())),
        Some(Command::Css) if args.input.is_none() => Err(CliError::Usage(usage())),
        Some(Command::Svg) if args.base.is_some() => Err(CliError::Usage(usage())),
        Some(_) => Ok(args),
    }
}

fn open_input(input: Option<&str>) -> Result<Box<dyn Read>, CliError> {
    match input {
        None | Some("-") => Ok(Box::new(std::io::stdin().lock())),
        Some(path) => Ok(Box::new(std::fs::File::open(path)?)),
    }
}

/// `--log` wins over `RUST_LOG`; warnings are shown by default. Library warnings are `tracing`
/// events and reach `env_logger` through `tracing`'s `log` feature.
fn init_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    match filter.map(str::to_string).or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => builder.parse_filters(&filter),
        None => builder.filter_level(log::LevelFilter::Warn),
    };
    builder.target(env_logger::Target::Stderr);
    if builder.try_init().is_ok() {
        log::debug!("logging initialized");
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    use std::io::Write;

    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let engine = Engine::new();

    match args.command.unwrap_or_default() {
        Command::Css => {
            let base = match args.base.as_deref() {
                Some(token) => CssColorResolver
                    .resolve(token, None)
                    .map_err(|_| CliError::Usage(usage()))?,
                None => Rgba::default(),
            };
            let descriptor = args.input.as_deref().unwrap_or_default();
            let parsed = engine.parse_css(descriptor, base, None);
            log::debug!(
                "css parse: success={} warnings={}",
                parsed.success,
                parsed.warnings.len()
            );
            write_json(&parsed.paint, args.pretty)?;
            if parsed.success {
                Ok(())
            } else {
                Err(CliError::Unresolved)
            }
        }
        Command::Svg => {
            let input = open_input(args.input.as_deref())?;
            let gradient = engine.read_xml(input)?;
            write_json(&gradient, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.log_filter.as_deref());

    match run(args) {
        Ok(()) => {}
        Err(CliError::Unresolved) => {
            eprintln!("{}", CliError::Unresolved);
            std::process::exit(3);
        }
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
